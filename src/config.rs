//! Configuration management for the job hunter

use crate::error::{JobHunterError, Result};
use crate::retry::RetryPolicy;
use crate::scoring::CandidateProfile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub search: SearchConfig,
    pub generation: GenerationConfig,
    pub embeddings: EmbeddingConfig,
    pub retry: RetryConfig,
    pub tracker: TrackerConfig,
    pub notifier: NotifierConfig,
    pub schedule: ScheduleConfig,
    pub candidate: CandidateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub location: String,
    pub status: String,
    pub available_from: String,
    pub preferred_company_keywords: Vec<String>,
    pub blacklist_keywords: Vec<String>,
    /// Resume document (PDF, TXT, MD) used as the semantic profile text
    pub resume_path: Option<PathBuf>,
    /// Structured base resume (JSON) used for tailoring
    pub base_resume_path: Option<PathBuf>,
    pub skill_groups: Vec<SkillGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum relevance score (percentage) a posting needs to be selected
    pub min_relevance_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub queries: Vec<String>,
    pub location: String,
    pub max_postings_per_run: usize,
    pub max_age_days: u32,
    pub min_query_delay_ms: u64,
    pub max_query_delay_ms: u64,
    /// Local JSON files with raw postings
    pub posting_files: Vec<PathBuf>,
    pub feeds: Vec<FeedConfig>,
}

/// A JSON job feed; `{query}` and `{location}` are substituted into the URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url_template: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    OpenAi,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub provider: GenerationProvider,
    pub openai_model: String,
    pub openai_endpoint: String,
    /// Environment variable holding the OpenAI API key
    pub api_key_env: String,
    pub ollama_model: String,
    pub ollama_endpoint: String,
    pub fallback_to_ollama: bool,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub enabled: bool,
    pub model: String,
    pub models_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub output_dir: PathBuf,
    pub csv_path: PathBuf,
    pub follow_up_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub bot_token_env: String,
    pub chat_id_env: String,
    pub max_detail_messages: usize,
    pub message_pause_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local times of day, `HH:MM`
    pub run_times: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            search: SearchConfig::default(),
            generation: GenerationConfig::default(),
            embeddings: EmbeddingConfig::default(),
            retry: RetryConfig::default(),
            tracker: TrackerConfig::default(),
            notifier: NotifierConfig::default(),
            schedule: ScheduleConfig::default(),
            candidate: CandidateConfig::default(),
        }
    }
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            name: "Your Name".to_string(),
            email: "your@email.com".to_string(),
            phone: String::new(),
            linkedin: "linkedin.com/in/yourprofile".to_string(),
            github: "github.com/yourusername".to_string(),
            location: "India".to_string(),
            status: "Final-year student / Fresher".to_string(),
            available_from: "May 16, 2025".to_string(),
            preferred_company_keywords: strings(&[
                "AI", "ML", "GenAI", "LLM", "Generative", "Agentic",
                "NLP", "Computer Vision", "Deep Learning", "SaaS", "startup",
            ]),
            blacklist_keywords: strings(&[
                "senior", "lead", "principal", "staff", "director",
                "5+ years", "7+ years", "10+ years", "3+ years",
                "2+ years mandatory",
            ]),
            resume_path: None,
            base_resume_path: None,
            skill_groups: vec![
                SkillGroup {
                    name: "Languages".to_string(),
                    skills: strings(&["Python", "C++", "Java", "JavaScript", "SQL"]),
                },
                SkillGroup {
                    name: "ML Frameworks".to_string(),
                    skills: strings(&["PyTorch", "Hugging Face", "scikit-learn", "BERT", "LLaMA"]),
                },
                SkillGroup {
                    name: "Generative AI".to_string(),
                    skills: strings(&[
                        "LangChain", "LangGraph", "RAG", "Text Embeddings",
                        "Prompt Engineering", "LoRA", "QLoRA", "LLMs",
                        "Fine-tuning", "FAISS", "Chroma", "Vector Databases",
                        "OpenAI API",
                    ]),
                },
                SkillGroup {
                    name: "MLOps".to_string(),
                    skills: strings(&[
                        "DVC", "Apache Airflow", "AWS", "Docker", "MLflow",
                        "CI/CD Pipelines", "Data Pipelines",
                    ]),
                },
                SkillGroup {
                    name: "Data".to_string(),
                    skills: strings(&["Pandas", "NumPy", "Matplotlib"]),
                },
                SkillGroup {
                    name: "Tools".to_string(),
                    skills: strings(&["Git", "GitHub", "Linux", "Gradio", "REST APIs"]),
                },
            ],
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_relevance_score: 60.0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            queries: strings(&[
                "Machine Learning Intern",
                "GenAI Intern",
                "LLM Engineer fresher",
                "AI Agent Developer entry level",
                "Deep Learning intern",
                "NLP engineer fresher",
            ]),
            location: "India".to_string(),
            max_postings_per_run: 20,
            max_age_days: 7,
            min_query_delay_ms: 1500,
            max_query_delay_ms: 3500,
            posting_files: Vec::new(),
            feeds: Vec::new(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::OpenAi,
            openai_model: "gpt-4o-mini".to_string(),
            openai_endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            ollama_model: "mistral".to_string(),
            ollama_endpoint: "http://localhost:11434/api/chat".to_string(),
            fallback_to_ollama: true,
            temperature: 0.3,
            max_tokens: 4096,
            timeout_secs: 60,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".job-hunter")
            .join("models");

        Self {
            enabled: true,
            model: "potion-base-8M".to_string(),
            models_dir,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay_ms: 1500,
            max_delay_ms: 3500,
            timeout_secs: 15,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            csv_path: PathBuf::from("output").join("application_tracker.csv"),
            follow_up_days: 5,
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            bot_token_env: "TELEGRAM_BOT_TOKEN".to_string(),
            chat_id_env: "TELEGRAM_CHAT_ID".to_string(),
            max_detail_messages: 5,
            message_pause_ms: 1500,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_times: strings(&["08:00", "13:00", "18:00"]),
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| JobHunterError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobHunterError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-hunter")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.scoring.min_relevance_score;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(JobHunterError::Configuration(format!(
                "scoring.min_relevance_score must be within 0-100, got {}",
                threshold
            )));
        }
        if self.search.min_query_delay_ms > self.search.max_query_delay_ms {
            return Err(JobHunterError::Configuration(
                "search.min_query_delay_ms exceeds search.max_query_delay_ms".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(JobHunterError::Configuration(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// All candidate skills in configuration order
    pub fn flat_skills(&self) -> Vec<String> {
        self.candidate
            .skill_groups
            .iter()
            .flat_map(|group| group.skills.iter().cloned())
            .collect()
    }

    pub fn candidate_profile(&self) -> CandidateProfile {
        CandidateProfile::new(
            self.flat_skills(),
            self.candidate.preferred_company_keywords.clone(),
            self.candidate.blacklist_keywords.clone(),
            self.scoring.min_relevance_score,
        )
    }

    /// Retry policy for scraping and feed requests
    pub fn network_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.min_delay_ms),
            Duration::from_millis(self.retry.max_delay_ms),
            Duration::from_secs(self.retry.timeout_secs),
        )
    }

    /// Same backoff as network calls, with the longer generation timeout
    pub fn generation_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.min_delay_ms),
            Duration::from_millis(self.retry.max_delay_ms),
            Duration::from_secs(self.generation.timeout_secs),
        )
    }

    pub fn ensure_models_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.embeddings.models_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.scoring.min_relevance_score, 60.0);
        assert_eq!(config.search.max_postings_per_run, 20);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.flat_skills(), config.flat_skills());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\nmin_relevance_score = 72.5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.scoring.min_relevance_score, 72.5);
        assert_eq!(config.retry.max_attempts, 3);
        assert!(!config.candidate.blacklist_keywords.is_empty());
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\nmin_relevance_score = 140.0\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(JobHunterError::Configuration(_))
        ));
    }

    #[test]
    fn test_candidate_profile_from_config() {
        let config = Config::default();
        let profile = config.candidate_profile();
        assert!(profile.has_skill("pytorch"));
        assert_eq!(profile.min_score(), 60.0);
    }
}
