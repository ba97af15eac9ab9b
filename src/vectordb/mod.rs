//! Qdrant vector store integration.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantVectorStore, VectorStore};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockStoreFailure, MockVectorStore, cosine_similarity};
pub use model::{SimilarityHit, check_query_vector};
