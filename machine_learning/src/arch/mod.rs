pub mod activations;
pub mod layers;
pub mod loss;
mod model;
mod sequential;
pub mod spec;

pub use model::{Mode, Model};
pub use sequential::Sequential;
