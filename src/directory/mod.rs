//! Candidate center directory.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::DirectoryError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockDirectory;
pub use store::{DirectoryStore, JsonDirectory};
