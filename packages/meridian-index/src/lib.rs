mod engine;
mod error;
mod postings;
mod snapshot;

pub use engine::{DocKey, Index};
pub use error::{Error, Result};
