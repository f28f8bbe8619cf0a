//! Downloading and listing Model2Vec models from the Hugging Face Hub

use crate::error::{JobHunterError, Result};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct EmbeddingModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub repo_id: &'static str,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: &'static str,
}

pub const KNOWN_MODELS: [EmbeddingModelInfo; 3] = [
    EmbeddingModelInfo {
        id: "potion-base-8M",
        name: "Potion Base 8M",
        repo_id: "minishlab/potion-base-8M",
        size_mb: 33,
        dimensions: 256,
        description: "High-quality Model2Vec embeddings with 8M parameters",
    },
    EmbeddingModelInfo {
        id: "potion-base-4M",
        name: "Potion Base 4M",
        repo_id: "minishlab/potion-base-4M",
        size_mb: 16,
        dimensions: 128,
        description: "Smaller Potion model for constrained machines",
    },
    EmbeddingModelInfo {
        id: "m2v-base",
        name: "Model2Vec Base",
        repo_id: "minishlab/M2V_base_output",
        size_mb: 90,
        dimensions: 256,
        description: "Legacy Model2Vec base embeddings model",
    },
];

/// Files fetched per model; only the weights and tokenizer are required
const MODEL_FILES: [(&str, bool); 3] = [
    ("model.safetensors", true),
    ("tokenizer.json", true),
    ("config.json", false),
];

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            JobHunterError::ModelError(format!("Failed to create models directory: {}", e))
        })?;
        Ok(Self { models_dir })
    }

    pub fn list_available_models(&self) -> &'static [EmbeddingModelInfo] {
        &KNOWN_MODELS
    }

    /// Resolve a model id, repo id or display name
    pub fn resolve(&self, input: &str) -> Option<&'static EmbeddingModelInfo> {
        let lower = input.to_lowercase();
        KNOWN_MODELS.iter().find(|m| {
            m.id == input || m.repo_id == input || m.name.to_lowercase() == lower
        })
    }

    pub fn model_dir(&self, model_id: &str) -> PathBuf {
        self.models_dir.join(model_id)
    }

    pub async fn is_downloaded(&self, model_id: &str) -> bool {
        is_model_directory(&self.model_dir(model_id)).await
    }

    pub async fn list_downloaded_models(&self) -> Result<Vec<String>> {
        let mut downloaded = Vec::new();
        let mut entries = fs::read_dir(&self.models_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if is_model_directory(&entry.path()).await {
                downloaded.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        downloaded.sort();
        Ok(downloaded)
    }

    pub async fn download_model(&self, input: &str, force: bool) -> Result<PathBuf> {
        let model = self
            .resolve(input)
            .ok_or_else(|| JobHunterError::ModelNotFound(input.to_string()))?;
        let model_dir = self.model_dir(model.id);

        if !force && self.is_downloaded(model.id).await {
            info!("Model {} already present at {}", model.id, model_dir.display());
            return Ok(model_dir);
        }

        info!("Downloading {} ({} MB) from {}", model.name, model.size_mb, model.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| JobHunterError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.repo(hf_hub::Repo::model(model.repo_id.to_string()));

        for (file, required) in MODEL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                        JobHunterError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("Downloaded {}", file);
                }
                Err(e) if required => {
                    return Err(JobHunterError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
                Err(e) => warn!("Optional file {} not available: {}", file, e),
            }
        }

        Ok(model_dir)
    }
}

async fn is_model_directory(path: &Path) -> bool {
    for (file, required) in MODEL_FILES {
        if required && fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert_eq!(manager.resolve("potion-base-8M").map(|m| m.id), Some("potion-base-8M"));
        assert_eq!(manager.resolve("minishlab/potion-base-8M").map(|m| m.id), Some("potion-base-8M"));
        assert_eq!(manager.resolve("potion base 8m").map(|m| m.id), Some("potion-base-8M"));
        assert!(manager.resolve("unknown").is_none());
    }

    #[tokio::test]
    async fn test_downloaded_models_detected_by_files() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        let complete = temp_dir.path().join("potion-base-8M");
        std::fs::create_dir_all(&complete).unwrap();
        std::fs::write(complete.join("model.safetensors"), b"weights").unwrap();
        std::fs::write(complete.join("tokenizer.json"), b"{}").unwrap();

        let partial = temp_dir.path().join("m2v-base");
        std::fs::create_dir_all(&partial).unwrap();
        std::fs::write(partial.join("tokenizer.json"), b"{}").unwrap();

        assert!(manager.is_downloaded("potion-base-8M").await);
        assert!(!manager.is_downloaded("m2v-base").await);
        assert_eq!(manager.list_downloaded_models().await.unwrap(), vec!["potion-base-8M"]);
    }

    #[tokio::test]
    async fn test_unknown_model_download_fails() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert!(matches!(
            manager.download_model("not-a-model", false).await,
            Err(JobHunterError::ModelNotFound(_))
        ));
    }
}
