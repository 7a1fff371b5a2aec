//! Batch loading over a client's partition view.
//!
//! [`select_dataset`] turns a client rank into a [`BatchLoader`]: it picks
//! the client's view from the partitioner and derives loader settings from
//! the split type. Training loaders drop a trailing incomplete batch and carry
//! a 60 s worker timeout; test loaders keep every sample and disable the
//! timeout. Worker count and timeout are recorded for the caller's worker
//! pool; batches here are fetched sequentially.

use crate::partition::Partition;
use crate::partitioner::DataPartitioner;

use fedsplit_env::{Dataset, PartitionError, Result};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Worker retrieval timeout for training epochs.
pub const TRAIN_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for a [`BatchLoader`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Number of samples per batch
    pub batch_size: usize,
    
    /// Whether to reshuffle the view order each epoch
    pub shuffle: bool,
    
    /// Whether to drop the last incomplete batch
    pub drop_last: bool,
    
    /// Worker retrieval timeout (zero = disabled)
    pub timeout: Duration,
    
    /// Worker count for the caller's loading pool
    pub num_workers: usize,
    
    /// Seed for epoch shuffles
    pub seed: u64,
}

impl LoaderConfig {
    /// Settings for a training (`is_test = false`) or test split.
    pub fn for_split(batch_size: usize, is_test: bool, num_workers: usize, seed: u64) -> Self {
        Self {
            batch_size,
            shuffle: true,
            drop_last: !is_test,
            timeout: if is_test { Duration::ZERO } else { TRAIN_TIMEOUT },
            num_workers,
            seed,
        }
    }
    
    pub fn shuffle(mut self, s: bool) -> Self {
        self.shuffle = s;
        self
    }
    
    pub fn drop_last(mut self, d: bool) -> Self {
        self.drop_last = d;
        self
    }
}

/// Lazy, restartable batch source over one [`Partition`].
pub struct BatchLoader<D: Dataset> {
    partition: Partition<D>,
    config: LoaderConfig,
    rng: ChaCha8Rng,
    order: Vec<usize>,
}

impl<D: Dataset> BatchLoader<D> {
    /// Creates a loader over `partition`.
    pub fn new(partition: Partition<D>, config: LoaderConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(PartitionError::config("batch_size must be at least 1"));
        }
        let order = (0..partition.len()).collect();
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            partition,
            config,
            order,
        })
    }
    
    /// Loader settings.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
    
    /// The view being loaded.
    pub fn partition(&self) -> &Partition<D> {
        &self.partition
    }
    
    /// Number of samples in the view.
    pub fn len(&self) -> usize {
        self.partition.len()
    }
    
    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.partition.is_empty()
    }
    
    /// Number of batches per epoch.
    pub fn num_batches(&self) -> usize {
        if self.config.drop_last {
            self.len() / self.config.batch_size
        } else {
            self.len().div_ceil(self.config.batch_size)
        }
    }
    
    fn reshuffle(&mut self) {
        if self.config.shuffle {
            self.order.shuffle(&mut self.rng);
        }
    }
    
    /// Starts a new epoch and iterates its batches.
    pub fn iter_batches(&mut self) -> BatchIter<'_, D> {
        self.reshuffle();
        BatchIter {
            loader: self,
            batch_idx: 0,
        }
    }
    
    /// Starts a new epoch, merging each batch with `collate`.
    pub fn iter_collated<B, F>(&mut self, collate: F) -> CollatedIter<'_, D, F>
    where
        F: FnMut(Vec<D::Item>) -> B,
    {
        CollatedIter {
            inner: self.iter_batches(),
            collate,
        }
    }
}

/// Iterator over one epoch's batches.
pub struct BatchIter<'l, D: Dataset> {
    loader: &'l BatchLoader<D>,
    batch_idx: usize,
}

impl<'l, D: Dataset> Iterator for BatchIter<'l, D> {
    type Item = Result<Vec<D::Item>>;
    
    fn next(&mut self) -> Option<Self::Item> {
        let bs = self.loader.config.batch_size;
        let n = self.loader.len();
        let start = self.batch_idx * bs;
        
        if start >= n {
            return None;
        }
        if self.loader.config.drop_last && start + bs > n {
            return None;
        }
        
        let end = (start + bs).min(n);
        self.batch_idx += 1;
        
        let batch = self.loader.order[start..end]
            .iter()
            .map(|&i| self.loader.partition.get(i))
            .collect();
        Some(batch)
    }
}

/// Iterator over one epoch's batches, each passed through a merge function.
pub struct CollatedIter<'l, D: Dataset, F> {
    inner: BatchIter<'l, D>,
    collate: F,
}

impl<'l, D, B, F> Iterator for CollatedIter<'l, D, F>
where
    D: Dataset,
    F: FnMut(Vec<D::Item>) -> B,
{
    type Item = Result<B>;
    
    fn next(&mut self) -> Option<Self::Item> {
        let batch = self.inner.next()?;
        Some(batch.map(&mut self.collate))
    }
}

/// Builds the batch loader for client `rank` (1-based).
///
/// Rank `r` reads partition `r - 1`. The loader's shuffle seed is drawn from
/// the partitioner's numeric stream, so loaders are reproducible without
/// touching the shuffle stream beyond the view's own reshuffle. A rejected
/// rank or batch size leaves both streams untouched.
pub fn select_dataset<D: Dataset>(
    rank: usize,
    partitioner: &mut DataPartitioner<D>,
    batch_size: usize,
    is_test: bool,
) -> Result<BatchLoader<D>> {
    let id = rank
        .checked_sub(1)
        .ok_or_else(|| PartitionError::config("rank must be at least 1"))?;
    // Reject before the view draws from the shuffle stream
    if batch_size == 0 {
        return Err(PartitionError::config("batch_size must be at least 1"));
    }
    let partition = partitioner.use_partition(id, is_test)?;
    
    let seed: u64 = partitioner.rng_mut().numeric().gen();
    let config = LoaderConfig::for_split(
        batch_size,
        is_test,
        partitioner.config().num_loaders,
        seed,
    );
    BatchLoader::new(partition, config)
}

impl<D: Dataset> std::fmt::Debug for BatchLoader<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLoader")
            .field("partition", &self.partition)
            .field("config", &self.config)
            .finish()
    }
}
