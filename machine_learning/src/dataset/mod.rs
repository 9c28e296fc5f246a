mod batch;
mod dataloader;
mod in_memory;

pub use batch::Batch;
pub use dataloader::DataLoader;
pub use in_memory::{InMemoryDataset, one_hot};

/// A finite sequence of batches that can be iterated again after a `reset`.
pub trait DataSource {
    /// Returns the total amount of samples in one pass.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the amount of batches in one pass.
    fn num_batches(&self) -> usize;

    /// Starts a new pass from the first batch.
    fn reset(&mut self);

    /// Yields the next batch of the current pass, or `None` once it's exhausted.
    fn next_batch(&mut self) -> Option<Batch>;
}

impl<T: DataSource + ?Sized> DataSource for &mut T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn num_batches(&self) -> usize {
        (**self).num_batches()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn next_batch(&mut self) -> Option<Batch> {
        (**self).next_batch()
    }
}
