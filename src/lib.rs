//! k-nearest-neighbors baseline classifier.
//!
//! [`pairwise_distance`] builds the query-by-training distance matrix,
//! [`predict`] turns it into majority-vote labels and [`score`] hands those
//! labels to a [`Loss`]. Randomness is only used to break vote ties and is
//! always supplied by the caller.

pub mod config;
pub mod error;
pub mod ml;

pub use config::KnnConfig;
pub use error::{Error, Result};
pub use ml::classic::{
    k_nearest_indices, majority_vote, pairwise_distance, predict, score, select_k, squared_norms,
    KSelection, Loss, ZeroOneLoss,
};
