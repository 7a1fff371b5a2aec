//! fedsplit Core - Deterministic Dataset Partitioning for Federated Simulation
//!
//! This library splits one centralized dataset across simulated clients:
//! 1. **Trace partitioning**: recover the real client population from a trace file
//! 2. **Uniform partitioning**: a seeded shuffle cut into equal-size groups
//! 3. **Client views**: per-client train/test views, reshuffled on every request
//!
//! All randomness is derived from one seed held by the [`DataPartitioner`],
//! so a run is reproducible from its seed and call sequence.

pub mod loader;
pub mod partition;
pub mod partitioner;
pub mod rng;
pub mod trace;

// Re-export key types for convenience
pub use loader::{select_dataset, BatchLoader, LoaderConfig};
pub use partition::Partition;
pub use partitioner::{DataPartitioner, PartitionSizes};
pub use rng::{SeededRng, DEFAULT_SEED};
pub use trace::TraceMap;
