//! Input collaborators: file discovery, delimited parsing, timestamps.

pub mod loader;
pub mod timestamp;

pub use loader::{LoaderOptions, load_entities};
pub use timestamp::TimestampParser;
