//! Retrieval gateway adapters.

mod mock_gateway;
mod pinecone_gateway;

pub use mock_gateway::MockRetrievalGateway;
pub use pinecone_gateway::{EmbeddingConfig, PineconeConfig, PineconeGateway};
