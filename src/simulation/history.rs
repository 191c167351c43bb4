//! Bounded dataset history
//!
//! Keeps the most recent datasets in memory for backup snapshots and the final
//! dump. Oldest datasets are evicted first.

use std::collections::VecDeque;

use crate::readings::Dataset;

/// Default number of datasets retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// FIFO ring of recent datasets
#[derive(Debug, Clone)]
pub struct DatasetHistory {
    capacity: usize,
    datasets: VecDeque<Dataset>,
}

impl DatasetHistory {
    /// Create a history retaining at most `capacity` datasets
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, datasets: VecDeque::with_capacity(capacity) }
    }

    /// Append a dataset, evicting the oldest when full
    pub fn push(&mut self, dataset: Dataset) {
        if self.datasets.len() == self.capacity {
            self.datasets.pop_front();
        }
        self.datasets.push_back(dataset);
    }

    /// The last `count` datasets, oldest first
    pub fn recent(&self, count: usize) -> Vec<Dataset> {
        let skip = self.datasets.len().saturating_sub(count);
        self.datasets.iter().skip(skip).cloned().collect()
    }

    /// Most recent dataset
    pub fn latest(&self) -> Option<&Dataset> {
        self.datasets.back()
    }

    /// Number of datasets retained
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether no dataset has been recorded
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Maximum number of datasets retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DatasetHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
