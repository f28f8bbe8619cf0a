//! Embedding models for the semantic relevance bonus

pub mod engine;
pub mod manager;

pub use engine::{cosine_similarity, Embedder, Model2VecEmbedder};
pub use manager::EmbeddingModelManager;
