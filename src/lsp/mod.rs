pub mod engine;
pub mod error;
pub mod features;
pub mod position;

pub use engine::{placeholder_candidate, PhelEngine};
pub use error::CompletionError;
