use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, LinalgScalar};
use num_traits::Float;

use crate::error::{Error, Result};

/// Radicands at or below this fraction of `||q||² + ||r||²` have lost too many
/// digits to cancellation and are recomputed from the coordinate differences.
const CANCELLATION_RATIO: f64 = 1e-3;

/// Squared L2 norm of every row of `points`.
pub fn squared_norms<F>(points: &ArrayView2<F>) -> Array1<F>
where
    F: Float + LinalgScalar,
{
    points.map_axis(Axis(1), |row| row.dot(&row))
}

/// Computes the dense matrix of Euclidean distances between every row of
/// `queries` and every row of `references`.
///
/// The result has shape `(queries.nrows(), references.nrows())` and entry
/// `[i, j]` is `||q_i - r_j||`. It is evaluated through the expansion
/// `||q||² + ||r||² - 2 q·r`, so the cross terms come from a single matrix
/// product instead of a per-pair loop.
///
/// The expansion cancels badly for (near-)duplicate points far from the
/// origin and can even go negative. Entries whose radicand is small relative
/// to the norms, negative or not finite are recomputed directly, so
/// `d(a, a)` is exactly zero. NaN features give NaN distances; they are
/// never turned into zero.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if either set has no rows.
/// - [`Error::ShapeMismatch`] if the column counts differ or are zero.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use knn_baseline::pairwise_distance;
///
/// let q = array![[0.0_f64, 0.0]];
/// let r = array![[3.0, 4.0], [0.0, 0.0]];
/// let d = pairwise_distance(q.view(), r.view()).unwrap();
/// assert_eq!(d.shape(), &[1, 2]);
/// assert!((d[[0, 0]] - 5.0).abs() < 1e-12);
/// assert_eq!(d[[0, 1]], 0.0);
/// ```
pub fn pairwise_distance<F>(queries: ArrayView2<F>, references: ArrayView2<F>) -> Result<Array2<F>>
where
    F: Float + LinalgScalar,
{
    if queries.nrows() == 0 {
        return Err(Error::EmptyInput("query point set has no rows".into()));
    }
    if references.nrows() == 0 {
        return Err(Error::EmptyInput("reference point set has no rows".into()));
    }
    if queries.ncols() != references.ncols() {
        return Err(Error::ShapeMismatch(format!(
            "query points have {} features but reference points have {}",
            queries.ncols(),
            references.ncols()
        )));
    }
    if queries.ncols() == 0 {
        return Err(Error::ShapeMismatch(
            "points must have at least one feature".into(),
        ));
    }

    let query_norms = squared_norms(&queries);
    let reference_norms = squared_norms(&references);
    let two = F::one() + F::one();
    let ratio = F::from(CANCELLATION_RATIO).unwrap_or_else(F::epsilon);

    // Start from the cross terms and finish each entry in place.
    let mut distances = queries.dot(&references.t());
    for (i, mut row) in distances.outer_iter_mut().enumerate() {
        let qn = query_norms[i];
        for (j, d) in row.iter_mut().enumerate() {
            let rn = reference_norms[j];
            let radicand = qn + rn - two * *d;
            // NaN and infinite radicands fail the comparison and go direct.
            *d = if radicand > ratio * (qn + rn) {
                radicand.sqrt()
            } else {
                squared_difference(queries.row(i), references.row(j)).sqrt()
            };
        }
    }

    Ok(distances)
}

fn squared_difference<F: Float>(a: ArrayView1<F>, b: ArrayView1<F>) -> F {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .fold(F::zero(), |acc, v| acc + v)
}
