//! Text embeddings using Model2Vec

use crate::config::Config;
use crate::error::{JobHunterError, Result};
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Turns text into a fixed-length vector
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn model_name(&self) -> &str;
}

pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEmbedder {
    pub fn new(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| JobHunterError::Embedding(format!("Failed to load model: {}", e)))?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }

    /// Load the configured model from the models directory
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_path = Self::model_path(config);
        if !model_path.exists() {
            return Err(JobHunterError::ModelNotFound(format!(
                "{} (run `job-hunter models download {}`)",
                model_path.display(),
                config.embeddings.model
            )));
        }
        Self::new(&model_path, &config.embeddings.model)
    }

    fn model_path(config: &Config) -> PathBuf {
        let configured = PathBuf::from(&config.embeddings.model);
        if configured.is_absolute() {
            configured
        } else {
            config.embeddings.models_dir.join(&config.embeddings.model)
        }
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.model.encode_single(text);
        if embedding.is_empty() {
            return Err(JobHunterError::Embedding(format!(
                "{} produced an empty embedding",
                self.model_name
            )));
        }
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity between two embeddings of equal dimension
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(JobHunterError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}
