//! Text embedding.
//!
//! - [`EmbeddingProvider`] is the upstream seam: [`HttpEmbeddingProvider`] for
//!   OpenAI-compatible APIs, [`StubEmbeddingProvider`] for offline runs.
//! - [`EmbeddingClient`] adds input validation, caching and retry on top of a provider.

pub mod client;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod provider;
pub mod stub;


pub use client::{EmbeddingClient, EmbeddingClientConfig, RetryPolicy};
pub use error::EmbeddingError;
pub use http::{HttpEmbeddingProvider, HttpProviderConfig};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEmbeddingProvider, MockFailure};
pub use provider::EmbeddingProvider;
pub use stub::{STUB_PROVIDER_VERSION, StubEmbeddingProvider, stub_vector};
