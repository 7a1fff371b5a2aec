//! DataPartitioner - splits a dataset into per-client index groups.
//!
//! Two strategies populate the partition set:
//! - **Trace**: groups follow the real client that produced each sample
//! - **Uniform**: one seeded shuffle, then equal-size contiguous slices
//!
//! Clients then obtain their views through [`DataPartitioner::use_partition`].
//!
//! # Determinism
//!
//! All randomness flows through one owned [`SeededRng`]. Given the same seed,
//! dataset length and call sequence, every group and every returned view is
//! bit-identical across runs. Views are reshuffled on each call, so two
//! identical calls at different points in the sequence differ in order.
//!
//! # Usage
//!
//! ```ignore
//! use fedsplit_core::DataPartitioner;
//! use fedsplit_env::DivideConfig;
//!
//! let mut partitioner = DataPartitioner::new(dataset, DivideConfig::default())?
//!     .with_seed(42);
//! partitioner.partition_data_helper(10, None)?;
//! let train = partitioner.use_partition(0, false)?;
//! ```

use crate::partition::Partition;
use crate::rng::{SeededRng, DEFAULT_SEED};
use crate::trace::TraceMap;

use fedsplit_env::{Dataset, DivideConfig, PartitionError, Result};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Group sizes in partition order, serialized as `{"size": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSizes {
    pub size: Vec<usize>,
}

impl PartitionSizes {
    /// Total number of assigned indices.
    pub fn total(&self) -> usize {
        self.size.iter().sum()
    }
}

/// Owns the partition set and the seeded random state for one simulation run.
pub struct DataPartitioner<D: Dataset> {
    /// Index groups, one per client
    partitions: Vec<Vec<usize>>,
    
    /// Shuffle and numeric streams
    rng: SeededRng,
    
    /// Shared, never mutated
    data: Arc<D>,
    
    /// Explicit configuration (task, test ratio, loader workers)
    config: DivideConfig,
    
    /// Whether this instance serves test data
    is_test: bool,
    
    /// Cached dataset length
    data_len: usize,
    
    /// Expected label count (0 = unused)
    num_of_labels: usize,
}

impl<D: Dataset> DataPartitioner<D> {
    /// Creates a partitioner with the default seed and no label count.
    ///
    /// Fails with `InvalidConfig` when the test ratio is not within `[0, 1]`.
    pub fn new(data: Arc<D>, config: DivideConfig) -> Result<Self> {
        config.validate()?;
        let data_len = data.len();
        Ok(Self {
            partitions: Vec::new(),
            rng: SeededRng::new(DEFAULT_SEED),
            data,
            config,
            is_test: false,
            data_len,
            num_of_labels: 0,
        })
    }
    
    /// Reseeds both random streams.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SeededRng::new(seed);
        self
    }
    
    /// Sets the expected label count.
    pub fn with_num_of_labels(mut self, n: usize) -> Self {
        self.num_of_labels = n;
        self
    }
    
    /// Marks this instance as serving a test split.
    pub fn for_test(mut self, is_test: bool) -> Self {
        self.is_test = is_test;
        self
    }
    
    /// Expected label count.
    pub fn num_of_labels(&self) -> usize {
        self.num_of_labels
    }
    
    /// Number of dataset elements.
    pub fn data_len(&self) -> usize {
        self.data_len
    }
    
    /// Whether this instance serves a test split.
    pub fn is_test(&self) -> bool {
        self.is_test
    }
    
    /// Experiment type from the configuration.
    pub fn task(&self) -> &str {
        &self.config.task
    }
    
    /// The configuration this partitioner reads.
    pub fn config(&self) -> &DivideConfig {
        &self.config
    }
    
    /// Per-element labels of the backing dataset.
    pub fn labels(&self) -> &[usize] {
        self.data.labels()
    }
    
    /// The backing dataset.
    pub fn dataset(&self) -> &Arc<D> {
        &self.data
    }
    
    /// The current partition set.
    pub fn partitions(&self) -> &[Vec<usize>] {
        &self.partitions
    }
    
    /// Number of groups in the partition set.
    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }
    
    /// Mutable access to the random state, for downstream numeric sampling.
    pub fn rng_mut(&mut self) -> &mut SeededRng {
        &mut self.rng
    }
    
    /// Snapshot of the random state.
    pub fn rng_snapshot(&self) -> SeededRng {
        self.rng.clone()
    }
    
    /// Replaces the random state with an earlier snapshot.
    pub fn restore_rng(&mut self, snapshot: SeededRng) {
        self.rng = snapshot;
    }
    
    /// Groups samples by the client that produced them, per a trace file.
    ///
    /// There is one group per distinct client id, in first-seen order. Each
    /// group holds, in dataset order, every index whose identity the trace
    /// assigns to that client. Every dataset identity must appear in the
    /// trace; a miss aborts and leaves the previous partition set in place.
    pub fn trace_partition<P: AsRef<Path>>(&mut self, data_map_file: P) -> Result<()> {
        let path = data_map_file.as_ref();
        info!("Partitioning data by profile {}...", path.display());
        
        let trace = TraceMap::from_path(path)?;
        self.apply_trace(&trace)
    }
    
    /// Groups samples by an already-loaded trace.
    pub fn apply_trace(&mut self, trace: &TraceMap) -> Result<()> {
        let mut partitions = vec![Vec::new(); trace.num_clients()];
        
        for idx in 0..self.data_len {
            let data_path = self
                .data
                .identity(idx)
                .ok_or(PartitionError::MissingIdentity { index: idx })?;
            let client = trace
                .client_of(data_path)
                .ok_or_else(|| PartitionError::UnmappedSample {
                    index: idx,
                    identity: data_path.to_string(),
                })?;
            partitions[client].push(idx);
        }
        
        info!(
            "Mapped {} samples onto {} clients",
            self.data_len,
            partitions.len()
        );
        self.partitions = partitions;
        Ok(())
    }
    
    /// Splits a seeded shuffle of `[0, data_len)` into `num_clients` groups.
    ///
    /// Every group has `data_len / num_clients` elements; the remaining
    /// `data_len % num_clients` shuffled indices are never assigned.
    pub fn uniform_partition(&mut self, num_clients: usize) -> Result<()> {
        if num_clients == 0 {
            return Err(PartitionError::config("num_clients must be at least 1"));
        }
        
        let data_len = self.data_len;
        info!("Randomly partitioning data, {} samples...", data_len);
        
        let mut indexes: Vec<usize> = (0..data_len).collect();
        indexes.shuffle(self.rng.shuffler());
        
        let part_len = data_len / num_clients;
        let mut remaining = indexes.as_slice();
        let mut partitions = Vec::with_capacity(num_clients);
        for _ in 0..num_clients {
            let (part, rest) = remaining.split_at(part_len);
            partitions.push(part.to_vec());
            remaining = rest;
        }
        self.partitions = partitions;
        
        debug!(
            "{} groups of {} samples, {} left unassigned",
            num_clients,
            part_len,
            data_len - part_len * num_clients
        );
        Ok(())
    }
    
    /// Routes to trace partitioning when a trace file is given, uniform otherwise.
    pub fn partition_data_helper(
        &mut self,
        num_clients: usize,
        data_map_file: Option<&Path>,
    ) -> Result<()> {
        match data_map_file {
            Some(path) => self.trace_partition(path),
            None => self.uniform_partition(num_clients),
        }
    }
    
    /// Returns a reshuffled view of group `partition`.
    ///
    /// Test views keep only the first `floor(len * test_ratio)` indices of
    /// the group. The shuffle advances the random state on every call.
    pub fn use_partition(&mut self, partition: usize, is_test: bool) -> Result<Partition<D>> {
        let group = self
            .partitions
            .get(partition)
            .ok_or(PartitionError::PartitionOutOfRange {
                id: partition,
                count: self.partitions.len(),
            })?;
        
        let execute_len = if is_test {
            (group.len() as f64 * self.config.test_ratio) as usize
        } else {
            group.len()
        };
        
        let mut result_index = group[..execute_len].to_vec();
        result_index.shuffle(self.rng.shuffler());
        
        debug!(
            "Partition {} (test={}) -> {} samples",
            partition,
            is_test,
            result_index.len()
        );
        Ok(Partition::new(Arc::clone(&self.data), result_index))
    }
    
    /// Size of each group, in partition order.
    pub fn get_size(&self) -> PartitionSizes {
        PartitionSizes {
            size: self.partitions.iter().map(Vec::len).collect(),
        }
    }
}

impl<D: Dataset> std::fmt::Debug for DataPartitioner<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataPartitioner")
            .field("dataset", &self.data.name())
            .field("data_len", &self.data_len)
            .field("partitions", &self.partitions.len())
            .field("seed", &self.rng.seed())
            .finish()
    }
}
