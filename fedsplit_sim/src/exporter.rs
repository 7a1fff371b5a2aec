//! JSON exporter for split reports.

use crate::runner::SplitReport;
use fedsplit_env::DivideConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// Complete export of one split run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitExport {
    /// Tool version that produced the export
    pub version: String,
    
    /// Configuration the partitioner read
    pub config: DivideConfig,
    
    /// Dataset source (manifest path or "synthetic")
    pub dataset: String,
    
    /// The run's results
    pub report: SplitReport,
}

impl SplitExport {
    /// Creates a new export container.
    pub fn new(config: DivideConfig, dataset: &str, report: SplitReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            dataset: dataset.to_string(),
            report,
        }
    }
    
    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
