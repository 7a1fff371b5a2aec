//! Seeded synthetic datasets and traces.
//!
//! Stands in for a real dataset when the simulator runs without a manifest:
//! identities are `sample_000000`, `sample_000001`, ... and labels are drawn
//! from a ChaCha8 stream, so the same seed always yields the same dataset.

use fedsplit_env::{InMemoryDataset, PartitionError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Generator for a labeled synthetic dataset.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// Data seed (separate from the partition seed)
    seed: u64,
    
    /// Number of samples
    num_samples: usize,
    
    /// Number of distinct labels
    num_labels: usize,
}

impl SyntheticDataset {
    /// Creates a generator with 1000 samples over 10 labels.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            num_samples: 1000,
            num_labels: 10,
        }
    }
    
    /// Sets the sample count.
    pub fn with_samples(mut self, n: usize) -> Self {
        self.num_samples = n;
        self
    }
    
    /// Sets the label count (0 labels every sample 0).
    pub fn with_labels(mut self, k: usize) -> Self {
        self.num_labels = k;
        self
    }
    
    /// Identity of sample `i`.
    pub fn identity(i: usize) -> String {
        format!("sample_{:06}", i)
    }
    
    /// Builds the dataset.
    pub fn build(&self) -> InMemoryDataset {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let pairs = (0..self.num_samples)
            .map(|i| {
                let label = if self.num_labels > 0 {
                    rng.gen_range(0..self.num_labels)
                } else {
                    0
                };
                (Self::identity(i), label)
            })
            .collect();
        
        InMemoryDataset::from_pairs(pairs).with_name("synthetic")
    }
    
    /// Writes a trace assigning every sample to one of `num_clients` clients.
    ///
    /// Client ids are `client_<k>`; each sample's client is drawn uniformly,
    /// so group sizes vary the way real client populations do.
    pub fn write_trace<P: AsRef<Path>>(&self, path: P, num_clients: usize) -> Result<()> {
        if num_clients == 0 {
            return Err(PartitionError::config("num_clients must be at least 1"));
        }
        
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| PartitionError::io(path, e))?;
        let mut out = BufWriter::new(file);
        
        // Separate stream so the trace does not depend on label draws
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_mul(0x9e3779b97f4a7c15));
        
        let mut write = || -> std::io::Result<()> {
            writeln!(out, "client_id,sample_name,sample_category,category_id")?;
            for i in 0..self.num_samples {
                let client = rng.gen_range(0..num_clients);
                writeln!(out, "client_{},{},synthetic,0", client, Self::identity(i))?;
            }
            out.flush()
        };
        write().map_err(|e| PartitionError::io(path, e))
    }
}
