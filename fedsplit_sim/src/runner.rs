//! Split runner - executes one partitioning run and reports per-client views.

use fedsplit_core::{select_dataset, DataPartitioner, Partition};
use fedsplit_env::{Dataset, DivideConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What one simulated client receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientReport {
    /// Partition id (rank - 1)
    pub client_id: usize,
    
    /// Samples in the training view
    pub train_samples: usize,
    
    /// Samples in the test view
    pub test_samples: usize,
    
    /// Full training batches per epoch
    pub train_batches: usize,
    
    /// Training samples per label
    pub label_counts: Vec<usize>,
}

/// Results from one split run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitReport {
    /// Seed used
    pub seed: u64,
    
    /// "trace" or "uniform"
    pub strategy: String,
    
    /// Number of dataset samples
    pub data_len: usize,
    
    /// Group sizes in partition order
    pub sizes: Vec<usize>,
    
    /// Indices assigned to some group
    pub total_assigned: usize,
    
    /// Indices left out (uniform remainder)
    pub unassigned: usize,
    
    /// Per-client details
    pub clients: Vec<ClientReport>,
}

/// Runs partitioning and view extraction for a simulated population.
pub struct SplitRunner {
    /// Partition seed
    seed: u64,
    
    /// Client count for uniform partitioning
    num_clients: usize,
    
    /// Trace file (switches to trace partitioning)
    trace: Option<PathBuf>,
    
    /// Shared configuration
    config: DivideConfig,
    
    /// Expected label count (0 = derive from data)
    num_of_labels: usize,
    
    /// Training batch size
    batch_size: usize,
}

impl SplitRunner {
    /// Creates a runner for a uniform split into `num_clients` groups.
    pub fn new(seed: u64, num_clients: usize) -> Self {
        Self {
            seed,
            num_clients,
            trace: None,
            config: DivideConfig::default(),
            num_of_labels: 0,
            batch_size: 32,
        }
    }
    
    /// Partitions by trace file instead.
    pub fn with_trace(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace = Some(path.into());
        self
    }
    
    /// Sets the shared configuration.
    pub fn with_config(mut self, config: DivideConfig) -> Self {
        self.config = config;
        self
    }
    
    /// Sets the expected label count.
    pub fn with_num_of_labels(mut self, n: usize) -> Self {
        self.num_of_labels = n;
        self
    }
    
    /// Sets the training batch size.
    pub fn with_batch_size(mut self, bs: usize) -> Self {
        self.batch_size = bs;
        self
    }
    
    /// Runs the split over `data` and returns the report.
    pub fn run<D: Dataset>(&self, data: Arc<D>) -> Result<SplitReport> {
        let strategy = if self.trace.is_some() { "trace" } else { "uniform" };
        info!(
            "Starting {} split of {} (seed={})",
            strategy,
            data.name(),
            self.seed
        );
        
        let mut partitioner = DataPartitioner::new(data, self.config.clone())?
            .with_seed(self.seed)
            .with_num_of_labels(self.num_of_labels);
        partitioner.partition_data_helper(self.num_clients, self.trace.as_deref())?;
        
        let sizes = partitioner.get_size();
        let total_assigned = sizes.total();
        let data_len = partitioner.data_len();
        let num_labels = self.label_slots(partitioner.labels());
        
        let mut clients = Vec::with_capacity(partitioner.num_partitions());
        for rank in 1..=partitioner.num_partitions() {
            let train = select_dataset(rank, &mut partitioner, self.batch_size, false)?;
            let test = partitioner.use_partition(rank - 1, true)?;
            
            let report = ClientReport {
                client_id: rank - 1,
                train_samples: train.len(),
                test_samples: test.len(),
                train_batches: train.num_batches(),
                label_counts: label_histogram(train.partition(), num_labels),
            };
            debug!(
                "client {}: train={} test={} batches={}",
                report.client_id, report.train_samples, report.test_samples, report.train_batches
            );
            
            if report.train_batches == 0 {
                warn!(
                    "client {} has {} samples, fewer than one batch of {}",
                    report.client_id, report.train_samples, self.batch_size
                );
            }
            clients.push(report);
        }
        
        info!(
            "Split {} samples across {} clients ({} unassigned)",
            total_assigned,
            clients.len(),
            data_len - total_assigned
        );
        
        Ok(SplitReport {
            seed: self.seed,
            strategy: strategy.to_string(),
            data_len,
            sizes: sizes.size,
            total_assigned,
            unassigned: data_len - total_assigned,
            clients,
        })
    }
    
    fn label_slots(&self, labels: &[usize]) -> usize {
        let observed = labels.iter().max().map_or(0, |&max| max + 1);
        self.num_of_labels.max(observed)
    }
}

fn label_histogram<D: Dataset>(view: &Partition<D>, num_labels: usize) -> Vec<usize> {
    let mut counts = vec![0; num_labels];
    for i in 0..view.len() {
        if let Some(label) = view.label(i) {
            counts[label] += 1;
        }
    }
    counts
}
