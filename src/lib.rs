pub mod cli;
pub mod config;
pub mod embed;
pub mod error;
pub mod features;
pub mod loader;
pub mod pipeline;
pub mod progress;
pub mod types;
pub mod writer;

pub use error::{Error, Result};
