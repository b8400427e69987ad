use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::{debug, info, trace};
use ndarray::{Array2, ArrayView1, ArrayView2, LinalgScalar};
use num_traits::Float;
use rand::seq::SliceRandom;
use rand::Rng;

use super::distance::pairwise_distance;
use super::loss::Loss;
use crate::error::{Error, Result};

/// Outcome of [`select_k`]: the winning `k` and the validation loss of every candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct KSelection {
    pub best_k: usize,
    pub best_loss: f64,
    /// `(k, loss)` pairs in the order the candidates were given.
    pub losses: Vec<(usize, f64)>,
}

/// Predicts a label for every row of `x_query` by majority vote among its `k`
/// nearest rows of `x_train`.
///
/// Nothing is fitted or retained between calls. `rng` is only drawn from when
/// two or more labels tie for the most votes; the winner is then picked
/// uniformly among the tied labels. Passing identically seeded generators
/// gives identical predictions.
///
/// # Errors
///
/// - [`Error::ShapeMismatch`] if `x_train` and `y_train` differ in length, or
///   the feature counts of `x_train` and `x_query` differ.
/// - [`Error::EmptyInput`] if either point set has no rows.
/// - [`Error::InvalidK`] if `k` is 0 or larger than the number of training points.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
/// use knn_baseline::predict;
///
/// let x_train = array![[1.0, 2.0], [2.0, 3.0], [2.5, 2.7], [10.0, 10.0]];
/// let y_train = [0, 0, 1, 1];
/// let x_query = array![[2.1, 2.9], [9.5, 9.7]];
///
/// let mut rng = ChaCha20Rng::seed_from_u64(13290);
/// let predicted = predict(x_train.view(), &y_train, x_query.view(), 3, &mut rng).unwrap();
/// assert_eq!(predicted, vec![0, 1]);
/// ```
pub fn predict<F, L, R>(
    x_train: ArrayView2<F>,
    y_train: &[L],
    x_query: ArrayView2<F>,
    k: usize,
    rng: &mut R,
) -> Result<Vec<L>>
where
    F: Float + LinalgScalar,
    L: Ord + Clone,
    R: Rng + ?Sized,
{
    let available = check_training_pair(&x_train, y_train)?;
    check_k(k, available)?;
    debug!(
        "k-NN predict: {} queries, {} training points, {} features, k = {}",
        x_query.nrows(),
        available,
        x_train.ncols(),
        k
    );

    let distances = pairwise_distance(x_query, x_train)?;
    predict_from_distances(&distances, y_train, k, rng)
}

/// Predicts labels for `x_val` and returns `loss(y_val, predictions)`.
///
/// The labels are handed to `loss` as-is; `score` does no work of its own
/// beyond running [`predict`].
///
/// # Errors
///
/// Everything [`predict`] returns, plus [`Error::ShapeMismatch`] when
/// `y_val` does not have one label per row of `x_val`.
pub fn score<F, L, R, M>(
    x_train: ArrayView2<F>,
    y_train: &[L],
    x_val: ArrayView2<F>,
    y_val: &[L],
    k: usize,
    loss: &M,
    rng: &mut R,
) -> Result<f64>
where
    F: Float + LinalgScalar,
    L: Ord + Clone,
    R: Rng + ?Sized,
    M: Loss<L> + ?Sized,
{
    check_validation_pair(&x_val, y_val)?;
    let predictions = predict(x_train, y_train, x_val, k, rng)?;
    Ok(loss.loss(y_val, &predictions))
}

/// Scores every candidate `k` against the validation set and picks the one
/// with the lowest loss. Equal losses go to the smaller `k`.
///
/// The distance matrix is computed once and shared by all candidates. Each
/// candidate's vote ties draw from `rng` in candidate order.
///
/// # Errors
///
/// Same as [`score`]. An empty `candidates` slice is [`Error::InvalidK`]
/// with `k = 0`, and so is any candidate out of range.
pub fn select_k<F, L, R, M>(
    x_train: ArrayView2<F>,
    y_train: &[L],
    x_val: ArrayView2<F>,
    y_val: &[L],
    candidates: &[usize],
    loss: &M,
    rng: &mut R,
) -> Result<KSelection>
where
    F: Float + LinalgScalar,
    L: Ord + Clone,
    R: Rng + ?Sized,
    M: Loss<L> + ?Sized,
{
    let available = check_training_pair(&x_train, y_train)?;
    if candidates.is_empty() {
        return Err(Error::InvalidK { k: 0, available });
    }
    for &k in candidates {
        check_k(k, available)?;
    }
    check_validation_pair(&x_val, y_val)?;
    debug!(
        "k-NN select_k: {} candidates, {} validation points, {} training points",
        candidates.len(),
        x_val.nrows(),
        available
    );

    let distances = pairwise_distance(x_val, x_train)?;

    let mut losses = Vec::with_capacity(candidates.len());
    let mut best: Option<(usize, f64)> = None;
    for &k in candidates {
        let predictions = predict_from_distances(&distances, y_train, k, rng)?;
        let value = loss.loss(y_val, &predictions);
        debug!("k = {}: validation loss {:.6}", k, value);
        losses.push((k, value));

        let improves = match best {
            None => true,
            Some((best_k, best_loss)) => value < best_loss || (value == best_loss && k < best_k),
        };
        if improves {
            best = Some((k, value));
        }
    }

    let (best_k, best_loss) = best.ok_or(Error::InvalidK { k: 0, available })?;
    info!("selected k = {} with validation loss {:.6}", best_k, best_loss);
    Ok(KSelection {
        best_k,
        best_loss,
        losses,
    })
}

/// Indices of the `k` smallest entries of `distances`, nearest first.
///
/// Equal distances are ordered by index, so the lower training index wins a
/// place in the neighbor set. NaN distances sort after everything else,
/// infinity included. If `k` exceeds the row length the whole row is returned.
pub fn k_nearest_indices<F: Float>(distances: ArrayView1<F>, k: usize) -> Vec<usize> {
    let by_distance = |a: &usize, b: &usize| {
        let (da, db) = (distances[*a], distances[*b]);
        da.is_nan()
            .cmp(&db.is_nan())
            .then_with(|| da.partial_cmp(&db).unwrap_or(Ordering::Equal))
            .then_with(|| a.cmp(b))
    };

    let mut indices: Vec<usize> = (0..distances.len()).collect();
    let k = k.min(indices.len());
    if k == 0 {
        return Vec::new();
    }
    if k < indices.len() {
        indices.select_nth_unstable_by(k - 1, &by_distance);
        indices.truncate(k);
    }
    indices.sort_unstable_by(&by_distance);
    indices
}

/// Majority vote over the labels at `neighbors`.
///
/// A unique winner is returned without touching `rng`. When several labels
/// share the top count, one of them is drawn uniformly; the tied labels are
/// considered in ascending order so the draw depends only on the generator
/// state.
///
/// # Errors
///
/// - [`Error::InvalidK`] if `neighbors` is empty. There is nothing to vote on.
/// - [`Error::ShapeMismatch`] if a neighbor index is out of range for `labels`.
pub fn majority_vote<L, R>(labels: &[L], neighbors: &[usize], rng: &mut R) -> Result<L>
where
    L: Ord + Clone,
    R: Rng + ?Sized,
{
    if neighbors.is_empty() {
        return Err(Error::InvalidK {
            k: 0,
            available: labels.len(),
        });
    }

    let mut counts: BTreeMap<&L, usize> = BTreeMap::new();
    for &idx in neighbors {
        let label = labels.get(idx).ok_or_else(|| {
            Error::ShapeMismatch(format!(
                "neighbor index {} is out of range for {} labels",
                idx,
                labels.len()
            ))
        })?;
        *counts.entry(label).or_insert(0) += 1;
    }

    let top = counts.values().copied().max().unwrap_or(0);
    let tied: Vec<&L> = counts
        .iter()
        .filter(|(_, &count)| count == top)
        .map(|(&label, _)| label)
        .collect();

    let winner = match tied.as_slice() {
        [only] => *only,
        [first, ..] => {
            trace!("vote tie between {} labels at {} votes each", tied.len(), top);
            tied.choose(rng).copied().unwrap_or(*first)
        }
        [] => return Err(Error::EmptyInput("no label received a vote".into())),
    };
    Ok(winner.clone())
}

fn predict_from_distances<F, L, R>(
    distances: &Array2<F>,
    y_train: &[L],
    k: usize,
    rng: &mut R,
) -> Result<Vec<L>>
where
    F: Float,
    L: Ord + Clone,
    R: Rng + ?Sized,
{
    let mut predictions = Vec::with_capacity(distances.nrows());
    for row in distances.outer_iter() {
        let neighbors = k_nearest_indices(row, k);
        predictions.push(majority_vote(y_train, &neighbors, rng)?);
    }
    Ok(predictions)
}

/// Returns the number of training points.
fn check_training_pair<F, L>(x_train: &ArrayView2<F>, y_train: &[L]) -> Result<usize> {
    if x_train.nrows() != y_train.len() {
        return Err(Error::ShapeMismatch(format!(
            "{} training points but {} training labels",
            x_train.nrows(),
            y_train.len()
        )));
    }
    if x_train.nrows() == 0 {
        return Err(Error::EmptyInput("training set has no points".into()));
    }
    Ok(x_train.nrows())
}

fn check_k(k: usize, available: usize) -> Result<()> {
    if k == 0 || k > available {
        return Err(Error::InvalidK { k, available });
    }
    Ok(())
}

fn check_validation_pair<F, L>(x_val: &ArrayView2<F>, y_val: &[L]) -> Result<()> {
    if x_val.nrows() != y_val.len() {
        return Err(Error::ShapeMismatch(format!(
            "{} validation points but {} validation labels",
            x_val.nrows(),
            y_val.len()
        )));
    }
    Ok(())
}
