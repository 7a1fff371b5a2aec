//! fedsplit Split Simulator
//!
//! Runs the partitioning engine end to end the way a federated experiment
//! would: build or load a dataset, split it across simulated clients, hand
//! every client its training and test views, and report what each received.
//!
//! # Determinism
//!
//! The data seed (synthetic labels, synthetic traces) and the partition seed
//! are independent, so changing the client population never changes the data.
//!
//! # Usage
//!
//! ```ignore
//! use fedsplit_sim::{SplitRunner, SyntheticDataset};
//! use std::sync::Arc;
//!
//! let data = Arc::new(SyntheticDataset::new(1).with_samples(1000).build());
//! let report = SplitRunner::new(10, 20).run(data)?;
//! println!("{:?}", report.sizes);
//! ```

mod exporter;
mod runner;
mod synthetic;

pub use exporter::SplitExport;
pub use runner::{ClientReport, SplitReport, SplitRunner};
pub use synthetic::SyntheticDataset;
