//! fedsplit Environment Abstraction Layer
//!
//! This crate holds everything the partitioning engine reads but does not own:
//! - The [`Dataset`] capability interface (length, indexed access, labels, identities)
//! - The shared [`DivideConfig`] (task, test ratio, loader worker count)
//! - The [`PartitionError`] taxonomy used across the workspace
//! - [`split_record`], the quote-aware row splitter for trace and manifest files
//!
//! Concrete datasets implement [`Dataset`]; [`InMemoryDataset`] is the
//! adapter used by the simulator and the tests.
//!
//! # Example
//!
//! ```ignore
//! use fedsplit_env::{Dataset, InMemoryDataset};
//!
//! let ds = InMemoryDataset::from_pairs(vec![
//!     ("f1".to_string(), 0),
//!     ("f2".to_string(), 1),
//! ]);
//! assert_eq!(ds.len(), 2);
//! assert_eq!(ds.identity(1), Some("f2"));
//! ```

mod config;
mod dataset;
mod error;
mod memory_impl;
mod record;

pub use config::DivideConfig;
pub use dataset::Dataset;
pub use error::{PartitionError, Result};
pub use memory_impl::InMemoryDataset;
pub use record::split_record;
