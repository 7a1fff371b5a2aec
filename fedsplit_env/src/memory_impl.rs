//! In-memory dataset adapter backed by identity and label vectors.

use crate::dataset::Dataset;
use crate::error::{PartitionError, Result};
use crate::record::split_record;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A dataset whose elements are `(identity, label)` pairs held in memory.
///
/// This is the adapter the simulator builds from a manifest file or a
/// synthetic generator. Sample payloads are not decoded; the identity stands
/// in for the sample.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    /// Raw identity per element (file path or sample name)
    identities: Vec<String>,
    
    /// Label per element
    labels: Vec<usize>,
    
    /// Name used in log lines
    name: String,
}

impl InMemoryDataset {
    /// Creates a dataset from parallel identity and label vectors.
    pub fn new(identities: Vec<String>, labels: Vec<usize>) -> Result<Self> {
        if identities.len() != labels.len() {
            return Err(PartitionError::config(format!(
                "{} identities but {} labels",
                identities.len(),
                labels.len()
            )));
        }
        Ok(Self {
            identities,
            labels,
            name: "in-memory".to_string(),
        })
    }
    
    /// Creates a dataset from `(identity, label)` pairs.
    pub fn from_pairs(pairs: Vec<(String, usize)>) -> Self {
        let (identities, labels) = pairs.into_iter().unzip();
        Self {
            identities,
            labels,
            name: "in-memory".to_string(),
        }
    }
    
    /// Sets the dataset name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
    
    /// Loads a manifest CSV: a header row, then `sample_name,label` rows.
    ///
    /// Extra columns are ignored and blank lines are skipped.
    pub fn from_manifest<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PartitionError::io(path, e))?;
        let dataset = Self::from_manifest_reader(BufReader::new(file), path)?;
        Ok(dataset.with_name(path.display().to_string()))
    }
    
    fn from_manifest_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut identities = Vec::new();
        let mut labels = Vec::new();
        
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| PartitionError::io(path, e))?;
            let line = line.trim_end_matches('\r');
            if line_no == 0 || line.trim().is_empty() {
                continue;
            }
            
            let fields = split_record(line);
            if fields.len() < 2 {
                return Err(PartitionError::MalformedRow {
                    line: line_no + 1,
                    expected: 2,
                    found: fields.len(),
                });
            }
            
            let label = fields[1].trim().parse::<usize>().map_err(|e| {
                PartitionError::config(format!(
                    "line {}: invalid label {:?}: {}",
                    line_no + 1,
                    fields[1],
                    e
                ))
            })?;
            identities.push(fields[0].clone());
            labels.push(label);
        }
        
        Self::new(identities, labels)
    }
}

impl Dataset for InMemoryDataset {
    type Item = (String, usize);
    
    fn len(&self) -> usize {
        self.identities.len()
    }
    
    fn get(&self, index: usize) -> Option<Self::Item> {
        let identity = self.identities.get(index)?;
        Some((identity.clone(), self.labels[index]))
    }
    
    fn labels(&self) -> &[usize] {
        &self.labels
    }
    
    fn identity(&self, index: usize) -> Option<&str> {
        self.identities.get(index).map(String::as_str)
    }
    
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    
    #[test]
    fn test_from_pairs() {
        let ds = InMemoryDataset::from_pairs(vec![
            ("f1".to_string(), 3),
            ("f2".to_string(), 7),
        ]);
        
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1), Some(("f2".to_string(), 7)));
        assert_eq!(ds.get(2), None);
        assert_eq!(ds.labels(), &[3, 7]);
        assert_eq!(ds.identity(0), Some("f1"));
        assert_eq!(ds.identity(5), None);
    }
    
    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = InMemoryDataset::new(vec!["a".to_string()], vec![]).unwrap_err();
        assert!(matches!(err, PartitionError::InvalidConfig(_)));
    }
    
    #[test]
    fn test_empty_dataset() {
        let ds = InMemoryDataset::default();
        assert!(ds.is_empty());
        assert_eq!(ds.get(0), None);
    }
    
    #[test]
    fn test_from_manifest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sample_name,label").unwrap();
        writeln!(file, "img/a.png,0").unwrap();
        writeln!(file, "img/b.png,2,extra").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "img/c.png,1\r").unwrap();
        
        let ds = InMemoryDataset::from_manifest(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.labels(), &[0, 2, 1]);
        assert_eq!(ds.identity(2), Some("img/c.png"));
        assert_eq!(ds.name(), file.path().display().to_string());
    }
    
    #[test]
    fn test_manifest_quoted_identity() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sample_name,label").unwrap();
        writeln!(file, "\"img/a,b.png\",4").unwrap();
        
        let ds = InMemoryDataset::from_manifest(file.path()).unwrap();
        assert_eq!(ds.identity(0), Some("img/a,b.png"));
        assert_eq!(ds.labels(), &[4]);
    }
    
    #[test]
    fn test_manifest_short_row() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sample_name,label").unwrap();
        writeln!(file, "only_one_field").unwrap();
        
        let err = InMemoryDataset::from_manifest(file.path()).unwrap_err();
        assert!(matches!(
            err,
            PartitionError::MalformedRow { line: 2, expected: 2, found: 1 }
        ));
    }
    
    #[test]
    fn test_manifest_bad_label() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sample_name,label").unwrap();
        writeln!(file, "a,cat").unwrap();
        
        let err = InMemoryDataset::from_manifest(file.path()).unwrap_err();
        assert!(matches!(err, PartitionError::InvalidConfig(_)));
    }
    
    #[test]
    fn test_manifest_missing_file() {
        let err = InMemoryDataset::from_manifest("/nonexistent/manifest.csv").unwrap_err();
        assert!(matches!(err, PartitionError::Io { .. }));
    }
}
