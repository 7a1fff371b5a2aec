//! Shared experiment configuration read by the partitioning engine.

use crate::error::{PartitionError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration values the partitioner and its batch loaders read.
///
/// Passed explicitly into `DataPartitioner`; there is no process-wide
/// configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DivideConfig {
    /// Experiment type (e.g. "cv", "speech", "nlp")
    pub task: String,
    
    /// Fraction of a group kept when serving a test view, in [0, 1]
    pub test_ratio: f64,
    
    /// Worker count handed to the batch-loading collaborator
    pub num_loaders: usize,
}

impl Default for DivideConfig {
    fn default() -> Self {
        Self {
            task: "cv".to_string(),
            test_ratio: 1.0,
            num_loaders: 2,
        }
    }
}

impl DivideConfig {
    /// Sets the test ratio.
    pub fn with_test_ratio(mut self, ratio: f64) -> Self {
        self.test_ratio = ratio;
        self
    }
    
    /// Sets the task name.
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }
    
    /// Sets the loader worker count.
    pub fn with_num_loaders(mut self, n: usize) -> Self {
        self.num_loaders = n;
        self
    }
    
    /// Loads and validates a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| PartitionError::io(path, e))?;
        Self::from_json_str(&content)
    }
    
    /// Parses and validates a JSON configuration string.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: DivideConfig = serde_json::from_str(content)
            .map_err(|e| PartitionError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
    
    /// Rejects a test ratio outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        if !self.test_ratio.is_finite() || !(0.0..=1.0).contains(&self.test_ratio) {
            return Err(PartitionError::config(format!(
                "test_ratio must be within [0, 1], got {}",
                self.test_ratio
            )));
        }
        Ok(())
    }
}
