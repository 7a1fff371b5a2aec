//! Read-only view over a dataset restricted to an index list.

use fedsplit_env::{Dataset, PartitionError, Result};
use std::sync::Arc;

/// One client's window onto the shared dataset.
///
/// Local position `i` maps to dataset element `index_map[i]`. The dataset is
/// shared, never copied.
pub struct Partition<D: Dataset> {
    data: Arc<D>,
    index_map: Vec<usize>,
}

impl<D: Dataset> Partition<D> {
    /// Wraps `data` restricted to `index_map`.
    pub fn new(data: Arc<D>, index_map: Vec<usize>) -> Self {
        Self { data, index_map }
    }
    
    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        self.index_map.len()
    }
    
    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.index_map.is_empty()
    }
    
    /// Returns the dataset element at local position `index`.
    pub fn get(&self, index: usize) -> Result<D::Item> {
        let data_idx = *self
            .index_map
            .get(index)
            .ok_or(PartitionError::IndexOutOfRange {
                index,
                len: self.index_map.len(),
            })?;
        
        self.data.get(data_idx).ok_or(PartitionError::IndexOutOfRange {
            index: data_idx,
            len: self.data.len(),
        })
    }
    
    /// Dataset indices backing this view, in view order.
    pub fn indices(&self) -> &[usize] {
        &self.index_map
    }
    
    /// Label of the element at local position `index`.
    pub fn label(&self, index: usize) -> Option<usize> {
        let data_idx = *self.index_map.get(index)?;
        self.data.labels().get(data_idx).copied()
    }
    
    /// The backing dataset.
    pub fn dataset(&self) -> &Arc<D> {
        &self.data
    }
}

impl<D: Dataset> Clone for Partition<D> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            index_map: self.index_map.clone(),
        }
    }
}

impl<D: Dataset> std::fmt::Debug for Partition<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partition")
            .field("dataset", &self.data.name())
            .field("len", &self.index_map.len())
            .finish()
    }
}
