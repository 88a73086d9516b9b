//! Deterministic k-fold evaluation sampling.
//!
//! Evaluation tasks consume a shuffled subset of the corpus's videos whose
//! length is divisible by the fold count. The shuffle is a pure function of
//! the explicit seed, so two invocations with the same inputs always produce
//! the same sequence; callers must not rely on any particular video's fold
//! membership beyond that determinism contract.

use crate::core::{CorpusError, CorpusResult};
use crate::corpus::dataset::Dataset;
use crate::corpus::entities::Video;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Default fold count of the evaluation protocol.
pub const DEFAULT_FOLDS: usize = 17;

/// Default shuffle seed of the evaluation protocol.
pub const DEFAULT_SEED: u64 = 12345;

/// Produces an evaluation sample of the dataset's videos.
///
/// The video list is shuffled under a generator seeded with `seed` and
/// truncated to the largest multiple of `k_folds` not exceeding its length,
/// allowing for k-fold cross-validation over the result.
///
/// # Errors
///
/// Returns an invalid-input error if `k_folds` is zero.
pub fn evaluation_sample(
    dataset: &Dataset,
    k_folds: usize,
    seed: u64,
) -> CorpusResult<Vec<&Video>> {
    if k_folds == 0 {
        return Err(CorpusError::invalid_input("fold count must be non-zero"));
    }
    let mut sample: Vec<&Video> = dataset.videos.iter().collect();
    let mut rng = StdRng::seed_from_u64(seed);
    sample.shuffle(&mut rng);
    sample.truncate(sample.len() - sample.len() % k_folds);
    Ok(sample)
}

impl Dataset {
    /// Produces an evaluation sample of this dataset's videos; see
    /// [`evaluation_sample`].
    pub fn evaluation_sample(&self, k_folds: usize, seed: u64) -> CorpusResult<Vec<&Video>> {
        evaluation_sample(self, k_folds, seed)
    }
}
