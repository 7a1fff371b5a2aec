//! Dataset capability interface consumed by the partitioning engine.

/// An indexed, read-only collection of labeled samples.
///
/// The partitioner never mutates a dataset. It is held behind an `Arc` and
/// shared by every partition view, so implementations must be `Send + Sync`
/// for concurrent batch loaders.
///
/// # Identities
///
/// Trace-based partitioning maps each element to a client through its raw
/// identity (a file path or sample name). Datasets that only support uniform
/// partitioning may keep the default [`Dataset::identity`], which returns `None`.
///
/// # Ordering
///
/// `labels()[i]` and `identity(i)` must describe the same element as `get(i)`.
pub trait Dataset: Send + Sync {
    /// The element type handed to batch loaders, typically `(sample, label)`.
    type Item;
    
    /// Total number of elements.
    fn len(&self) -> usize;
    
    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    
    /// Returns the element at `index`, or `None` if `index >= len()`.
    fn get(&self, index: usize) -> Option<Self::Item>;
    
    /// Per-element labels, in element order.
    fn labels(&self) -> &[usize];
    
    /// Raw identity of the element at `index` (trace mode only).
    fn identity(&self, _index: usize) -> Option<&str> {
        None
    }
    
    /// Optional human-readable name (for logging).
    fn name(&self) -> &str {
        "dataset"
    }
}
