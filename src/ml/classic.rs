pub mod distance;
pub mod k_nearest;
pub mod loss;

// Re-export public types and functions
pub use distance::{pairwise_distance, squared_norms};
pub use k_nearest::{k_nearest_indices, majority_vote, predict, score, select_k, KSelection};
pub use loss::{Loss, ZeroOneLoss};
