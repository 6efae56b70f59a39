pub mod config;
pub mod error;
pub mod export;
pub mod labeling;
pub mod layers;
pub mod metadata;
pub mod pipeline;
pub mod taxonomy;
pub mod tree;

pub use error::{Error, Result};
