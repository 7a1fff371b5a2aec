//! Client trace reader.
//!
//! A trace is a comma-separated file recording which real client produced
//! each sample:
//!
//! ```text
//! client_id,sample_name,sample_category,category_id
//! 1934,img/0001.png,cat,3
//! 1934,img/0002.png,dog,5
//! 2012,img/0003.png,cat,3
//! ```
//!
//! Only the first two columns are read. Fields may be double-quoted to carry
//! commas. Every row after the header must have at least two fields, so a
//! blank row is malformed. Client ids are mapped to dense indices in
//! first-seen order.

use fedsplit_env::{split_record, PartitionError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Sample-to-client mapping recovered from a trace file.
#[derive(Debug, Clone, Default)]
pub struct TraceMap {
    /// Column names from the header row
    header: Vec<String>,
    
    /// Raw client ids, indexed by their dense client index
    client_ids: Vec<String>,
    
    /// Raw client id -> dense client index
    client_index: HashMap<String, usize>,
    
    /// Sample name -> dense client index
    sample_client: HashMap<String, usize>,
}

impl TraceMap {
    /// Streams a trace file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PartitionError::io(path, e))?;
        Self::read(BufReader::new(file), path)
    }
    
    /// Streams a trace from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::read(reader, Path::new("<reader>"))
    }
    
    fn read<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut map = TraceMap::default();
        let mut read_header = true;
        
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| PartitionError::io(path, e))?;
            let line = line.trim_end_matches('\r');
            let fields = split_record(line);
            
            if read_header {
                map.header = fields;
                info!("Trace names are {}", map.header.join(", "));
                read_header = false;
                continue;
            }
            
            // Blank rows carry no client and are malformed like any short row
            if fields.len() < 2 {
                return Err(PartitionError::MalformedRow {
                    line: line_no + 1,
                    expected: 2,
                    found: fields.len(),
                });
            }
            map.insert(&fields[0], &fields[1]);
        }
        
        Ok(map)
    }
    
    fn insert(&mut self, client_id: &str, sample_name: &str) {
        let client = match self.client_index.get(client_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.client_ids.len();
                self.client_ids.push(client_id.to_string());
                self.client_index.insert(client_id.to_string(), idx);
                idx
            }
        };
        
        // A sample listed twice belongs to the client of its last row
        self.sample_client.insert(sample_name.to_string(), client);
    }
    
    /// Column names from the header row.
    pub fn header(&self) -> &[String] {
        &self.header
    }
    
    /// Number of distinct client ids seen.
    pub fn num_clients(&self) -> usize {
        self.client_ids.len()
    }
    
    /// Raw client ids in first-seen order.
    pub fn client_ids(&self) -> &[String] {
        &self.client_ids
    }
    
    /// Number of distinct sample names mapped.
    pub fn num_samples(&self) -> usize {
        self.sample_client.len()
    }
    
    /// Dense client index of a sample, if the trace lists it.
    pub fn client_of(&self, sample_name: &str) -> Option<usize> {
        self.sample_client.get(sample_name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    
    const TRACE: &str = "client_id,sample_name,sample_category,category_id\n\
                         B,f3,cat,0\n\
                         A,f1,dog,1\n\
                         B,f2,cat,0\n";
    
    #[test]
    fn test_first_seen_client_order() {
        let map = TraceMap::from_reader(Cursor::new(TRACE)).unwrap();
        
        assert_eq!(map.num_clients(), 2);
        assert_eq!(map.client_ids(), &["B".to_string(), "A".to_string()]);
        assert_eq!(map.client_of("f3"), Some(0));
        assert_eq!(map.client_of("f1"), Some(1));
        assert_eq!(map.client_of("f2"), Some(0));
        assert_eq!(map.client_of("f4"), None);
        assert_eq!(map.num_samples(), 3);
    }
    
    #[test]
    fn test_header_is_recorded_not_mapped() {
        let map = TraceMap::from_reader(Cursor::new(TRACE)).unwrap();
        assert_eq!(
            map.header(),
            &["client_id", "sample_name", "sample_category", "category_id"]
        );
        assert_eq!(map.client_of("sample_name"), None);
    }
    
    #[test]
    fn test_two_field_rows_and_crlf() {
        let map = TraceMap::from_reader(Cursor::new("c,s\r\nA,f1\r\nB,f2\r\n")).unwrap();
        assert_eq!(map.num_clients(), 2);
        assert_eq!(map.client_of("f2"), Some(1));
    }
    
    #[test]
    fn test_quoted_sample_name_keeps_comma() {
        let map = TraceMap::from_reader(Cursor::new("c,s\nA,\"img/a,b.png\",cat,0\n")).unwrap();
        assert_eq!(map.client_of("img/a,b.png"), Some(0));
        assert_eq!(map.client_of("\"img/a"), None);
        assert_eq!(map.num_samples(), 1);
    }
    
    #[test]
    fn test_short_row_is_fatal() {
        let err = TraceMap::from_reader(Cursor::new("c,s\nA,f1\nlonely\n")).unwrap_err();
        assert!(matches!(
            err,
            PartitionError::MalformedRow { line: 3, expected: 2, found: 1 }
        ));
    }
    
    #[test]
    fn test_blank_row_is_fatal() {
        let err = TraceMap::from_reader(Cursor::new("c,s\nA,f1\n\nB,f2\n")).unwrap_err();
        assert!(matches!(
            err,
            PartitionError::MalformedRow { line: 3, expected: 2, found: 0 }
        ));
    }
    
    #[test]
    fn test_blank_crlf_row_is_fatal() {
        let err = TraceMap::from_reader(Cursor::new("c,s\r\nA,f1\r\n\r\n")).unwrap_err();
        assert!(matches!(err, PartitionError::MalformedRow { found: 0, .. }));
    }
    
    #[test]
    fn test_empty_trace() {
        let map = TraceMap::from_reader(Cursor::new("")).unwrap();
        assert_eq!(map.num_clients(), 0);
        assert!(map.header().is_empty());
    }
    
    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", TRACE).unwrap();
        
        let map = TraceMap::from_path(file.path()).unwrap();
        assert_eq!(map.num_clients(), 2);
    }
    
    #[test]
    fn test_missing_file() {
        let err = TraceMap::from_path("/nonexistent/trace.csv").unwrap_err();
        assert!(matches!(err, PartitionError::Io { .. }));
    }
}
