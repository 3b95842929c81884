//! Deterministic k-fold partitioning
//!
//! Indices `0..n` are optionally permuted with a seeded generator (see
//! [`crate::rng`]) and then walked in contiguous blocks. Each block is the
//! validation set of one fold; everything before and after it, in permuted
//! order, is that fold's training set. The first `n % k` folds hold one extra
//! index so fold sizes never differ by more than one.

use crate::error::{Error, Result};
use crate::rng::{self, ShuffleRng, DEFAULT_SEED};

/// Train/validation indices for one fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldAssignment {
    /// Position of this fold in the split, starting at 0
    pub ordinal: usize,
    /// Training indices, in permuted order
    pub train: Vec<usize>,
    /// Validation indices, in permuted order
    pub validation: Vec<usize>,
}

impl FoldAssignment {
    /// Total number of indices covered by this fold
    pub fn len(&self) -> usize {
        self.train.len() + self.validation.len()
    }

    /// Whether the fold covers no indices at all
    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.validation.is_empty()
    }
}

/// K-fold splitter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    /// Number of folds, at least 1
    pub n_splits: usize,
    /// Whether to permute indices before cutting folds
    pub shuffle: bool,
    /// Seed for the default generator
    pub seed: u64,
}

impl Default for KFold {
    fn default() -> Self {
        Self {
            n_splits: 5,
            shuffle: true,
            seed: DEFAULT_SEED,
        }
    }
}

impl KFold {
    /// Create a shuffling splitter with the default seed
    pub fn new(n_splits: usize) -> Result<Self> {
        let kfold = Self {
            n_splits,
            ..Self::default()
        };
        kfold.validate()?;
        Ok(kfold)
    }

    /// Set the seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable shuffling
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Reject configurations that cannot produce a split
    pub fn validate(&self) -> Result<()> {
        if self.n_splits == 0 {
            return Err(Error::InvalidArgument(
                "Fold count must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Validation block sizes for `n` indices
    pub fn fold_sizes(&self, n: usize) -> Result<Vec<usize>> {
        self.validate()?;
        let base = n / self.n_splits;
        let extra = n % self.n_splits;
        Ok((0..self.n_splits)
            .map(|fold| if fold < extra { base + 1 } else { base })
            .collect())
    }

    /// Split `n` indices using the default generator for `self.seed`
    pub fn split(&self, n: usize) -> Result<Folds> {
        self.split_with_rng(n, &mut rng::seeded(self.seed))
    }

    /// Split `n` indices drawing the permutation from `rng`.
    ///
    /// `rng` is not touched when shuffling is disabled.
    pub fn split_with_rng<R: ShuffleRng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Folds> {
        let sizes = self.fold_sizes(n)?;
        let mut indices: Vec<usize> = (0..n).collect();
        if self.shuffle {
            rng::shuffle(&mut indices, rng);
        }
        Ok(Folds {
            indices,
            sizes,
            next_fold: 0,
            offset: 0,
        })
    }
}

/// Iterator over the fold assignments of one split, in ordinal order
#[derive(Debug, Clone)]
pub struct Folds {
    indices: Vec<usize>,
    sizes: Vec<usize>,
    next_fold: usize,
    offset: usize,
}

impl Folds {
    /// The full index sequence after permutation
    pub fn permutation(&self) -> &[usize] {
        &self.indices
    }
}

impl Iterator for Folds {
    type Item = FoldAssignment;

    fn next(&mut self) -> Option<FoldAssignment> {
        let size = *self.sizes.get(self.next_fold)?;
        let (start, stop) = (self.offset, self.offset + size);

        let validation = self.indices[start..stop].to_vec();
        let mut train = Vec::with_capacity(self.indices.len() - size);
        train.extend_from_slice(&self.indices[..start]);
        train.extend_from_slice(&self.indices[stop..]);

        let assignment = FoldAssignment {
            ordinal: self.next_fold,
            train,
            validation,
        };
        self.next_fold += 1;
        self.offset = stop;
        Some(assignment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sizes.len() - self.next_fold;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Folds {}

/// Partition `0..n` into `k` folds.
///
/// With `shuffle` the permutation comes from the default generator seeded with
/// `seed`; without it folds are contiguous runs of the identity order.
pub fn partition(n: usize, k: usize, seed: u64, shuffle: bool) -> Result<Vec<FoldAssignment>> {
    let kfold = KFold {
        n_splits: k,
        shuffle,
        seed,
    };
    Ok(kfold.split(n)?.collect())
}
