use std::num::NonZeroUsize;

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::{Batch, DataSource, InMemoryDataset};

/// Splits an `InMemoryDataset` into batches of `batch_size` rows, the last one possibly
/// smaller.
#[derive(Debug, Clone)]
pub struct DataLoader {
    dataset: InMemoryDataset,
    batch_size: NonZeroUsize,
    order: Vec<usize>,
    shuffle: Option<StdRng>,
    cursor: usize,
}

impl DataLoader {
    /// Creates a new `DataLoader` that yields samples in dataset order.
    pub fn new(dataset: InMemoryDataset, batch_size: NonZeroUsize) -> Self {
        let order = (0..dataset.len()).collect();

        Self {
            dataset,
            batch_size,
            order,
            shuffle: None,
            cursor: 0,
        }
    }

    /// Creates a new `DataLoader` that reshuffles the samples on every `reset`.
    ///
    /// # Arguments
    /// * `dataset` - The samples to batch.
    /// * `batch_size` - The maximum amount of rows per batch.
    /// * `seed` - Seeds the shuffling, equal seeds yield equal orders.
    pub fn shuffled(dataset: InMemoryDataset, batch_size: NonZeroUsize, seed: u64) -> Self {
        Self {
            shuffle: Some(StdRng::seed_from_u64(seed)),
            ..Self::new(dataset, batch_size)
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    pub fn dataset(&self) -> &InMemoryDataset {
        &self.dataset
    }
}

impl DataSource for DataLoader {
    fn len(&self) -> usize {
        self.dataset.len()
    }

    fn num_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size.get())
    }

    fn reset(&mut self) {
        self.cursor = 0;

        if let Some(rng) = &mut self.shuffle {
            self.order.shuffle(rng);
        }
    }

    fn next_batch(&mut self) -> Option<Batch> {
        if self.cursor >= self.order.len() {
            return None;
        }

        let end = (self.cursor + self.batch_size.get()).min(self.order.len());
        let (x, y) = self.dataset.select(&self.order[self.cursor..end]);
        self.cursor = end;

        // rows always match, they come from the same dataset
        Batch::new(x, y).ok()
    }
}
