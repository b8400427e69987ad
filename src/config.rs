use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::error::{Error, Result};

/// Parameters of a baseline run.
///
/// Loading, shuffling and splitting happen outside this crate; the driver
/// reads `data_path`/`dataset_name`/`train_percent` and passes `k` and the
/// generator from [`KnnConfig::rng`] into the predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnConfig {
    pub data_path: PathBuf,
    pub dataset_name: String,
    /// Fraction of the shuffled data used for training, in `(0, 1)`.
    pub train_percent: f64,
    pub k: usize,
    pub random_seed: u64,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("../data"),
            dataset_name: "zipcombo.dat".to_string(),
            train_percent: 0.8,
            k: 5,
            random_seed: 13290,
        }
    }
}

impl KnnConfig {
    pub fn new(data_path: impl AsRef<Path>, dataset_name: impl Into<String>) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            dataset_name: dataset_name.into(),
            ..Self::default()
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_seed(mut self, random_seed: u64) -> Self {
        self.random_seed = random_seed;
        self
    }

    pub fn with_train_percent(mut self, train_percent: f64) -> Self {
        self.train_percent = train_percent;
        self
    }

    /// Checks `train_percent` and `k`.
    ///
    /// `k` can only be checked against the training set size once the data
    /// is loaded; here it just has to be positive.
    pub fn validate(&self) -> Result<()> {
        if !(self.train_percent > 0.0 && self.train_percent < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "train_percent must be in (0, 1), got {}",
                self.train_percent
            )));
        }
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be at least 1".into()));
        }
        Ok(())
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_path.join(&self.dataset_name)
    }

    /// A fresh generator seeded from `random_seed`.
    pub fn rng(&self) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(self.random_seed)
    }
}
