//! Optional semantic similarity bonus

use crate::discovery::Posting;
use crate::embeddings::{cosine_similarity, Embedder};
use crate::error::{JobHunterError, Result};
use crate::scoring::components::round_to;
use log::debug;
use std::sync::Arc;

/// Bonus used when an available embedder fails on a posting
pub const NEUTRAL_SEMANTIC_BONUS: f64 = 5.0;
/// Weight of the bonus in the final score
pub const SEMANTIC_WEIGHT: f64 = 0.1;
/// Characters of the description that get embedded
const POSTING_TEXT_CHARS: usize = 500;

/// Whether semantic scoring runs at all, decided once per run
#[derive(Clone)]
pub enum SemanticCapability {
    Available(Arc<dyn Embedder>),
    Unavailable,
}

impl SemanticCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, SemanticCapability::Available(_))
    }
}

pub struct SemanticScorer {
    capability: SemanticCapability,
    profile_embedding: Option<std::result::Result<Vec<f32>, String>>,
}

impl SemanticScorer {
    /// Embeds the profile text once up front when an embedder is available
    pub fn new(capability: SemanticCapability, profile_text: &str) -> Self {
        let profile_embedding = match &capability {
            SemanticCapability::Available(embedder) => {
                Some(embedder.embed(profile_text).map_err(|e| e.to_string()))
            }
            SemanticCapability::Unavailable => None,
        };
        Self {
            capability,
            profile_embedding,
        }
    }

    pub fn unavailable() -> Self {
        Self::new(SemanticCapability::Unavailable, "")
    }

    pub fn is_available(&self) -> bool {
        self.capability.is_available()
    }

    /// Bonus on a 0-10 scale, `None` without an embedder.
    ///
    /// Opposed embeddings floor at zero rather than subtracting from the base.
    pub fn bonus(&self, posting: &Posting) -> Option<f64> {
        let embedder = match &self.capability {
            SemanticCapability::Available(embedder) => embedder,
            SemanticCapability::Unavailable => return None,
        };

        match self.similarity(embedder.as_ref(), posting) {
            Ok(similarity) => Some(round_to(f64::from(similarity) * 10.0, 2).clamp(0.0, 10.0)),
            Err(e) => {
                debug!("Semantic scoring failed for {}: {}", posting.id, e);
                Some(NEUTRAL_SEMANTIC_BONUS)
            }
        }
    }

    fn similarity(&self, embedder: &dyn Embedder, posting: &Posting) -> Result<f32> {
        let profile = match &self.profile_embedding {
            Some(Ok(embedding)) => embedding,
            Some(Err(e)) => {
                return Err(JobHunterError::Embedding(format!(
                    "profile embedding unavailable: {}",
                    e
                )))
            }
            None => {
                return Err(JobHunterError::Embedding(
                    "no profile embedding".to_string(),
                ))
            }
        };
        let job = embedder.embed(&posting_text(posting))?;
        cosine_similarity(profile, &job)
    }
}

/// Start of the description, or the title when there is none
pub fn posting_text(posting: &Posting) -> String {
    if posting.description.is_empty() {
        posting.title.clone()
    } else {
        posting.description.chars().take(POSTING_TEXT_CHARS).collect()
    }
}
