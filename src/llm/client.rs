//! OpenAI-compatible and Ollama chat clients

use crate::config::{Config, GenerationConfig, GenerationProvider};
use crate::error::{JobHunterError, Result};
use crate::llm::TextGenerator;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

fn chat_messages<'a>(prompt: &'a str, system: Option<&'a str>) -> Vec<ChatMessage<'a>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system.filter(|s| !s.trim().is_empty()) {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
    });
    messages
}

async fn error_for_status(response: reqwest::Response, provider: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(JobHunterError::Generation(format!(
        "{} returned {}: {}",
        provider,
        status,
        body.chars().take(300).collect::<String>()
    )))
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiReply,
}

#[derive(Debug, Deserialize)]
struct OpenAiReply {
    content: Option<String>,
}

/// Chat completions against an OpenAI-compatible endpoint
pub struct OpenAiGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    retry: RetryPolicy,
}

impl OpenAiGenerator {
    pub fn new(settings: &GenerationConfig, api_key: String, retry: RetryPolicy) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(retry.timeout).build()?,
            endpoint: settings.openai_endpoint.clone(),
            api_key,
            model: settings.openai_model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            retry,
        })
    }

    async fn call(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let request = OpenAiRequest {
            model: &self.model,
            messages: chat_messages(prompt, system),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let response = error_for_status(response, "OpenAI").await?;
        let body: OpenAiResponse = response.json().await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| JobHunterError::Generation("OpenAI returned empty content".to_string()))
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        debug!("Calling {} ({} prompt chars)", self.model, prompt.len());
        self.retry
            .execute(&format!("OpenAI {}", self.model), || self.call(prompt, system))
            .await
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaReply>,
}

#[derive(Debug, Deserialize)]
struct OllamaReply {
    content: String,
}

/// Local models served by Ollama
pub struct OllamaGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    retry: RetryPolicy,
}

impl OllamaGenerator {
    pub fn new(settings: &GenerationConfig, retry: RetryPolicy) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(retry.timeout).build()?,
            endpoint: settings.ollama_endpoint.clone(),
            model: settings.ollama_model.clone(),
            temperature: settings.temperature,
            retry,
        })
    }

    async fn call(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let request = OllamaRequest {
            model: &self.model,
            messages: chat_messages(prompt, system),
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let response = error_for_status(response, "Ollama").await?;
        let body: OllamaResponse = response.json().await?;

        body.message
            .map(|m| m.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| JobHunterError::Generation("Ollama returned empty content".to_string()))
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        debug!("Calling Ollama {} ({} prompt chars)", self.model, prompt.len());
        self.retry
            .execute(&format!("Ollama {}", self.model), || self.call(prompt, system))
            .await
    }
}

/// Pick the generation provider for this run.
///
/// OpenAI is used when selected and its API key is set; otherwise Ollama,
/// when selected directly or allowed as a fallback. With neither there is
/// nothing to generate with and the run cannot start.
pub fn build_generator(config: &Config) -> Result<Arc<dyn TextGenerator>> {
    let settings = &config.generation;
    let retry = config.generation_retry_policy();

    if settings.provider == GenerationProvider::OpenAi {
        match std::env::var(&settings.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                info!("Using OpenAI ({}) for text generation", settings.openai_model);
                return Ok(Arc::new(OpenAiGenerator::new(settings, key, retry)?));
            }
            _ if settings.fallback_to_ollama => {
                warn!("{} is not set, falling back to Ollama", settings.api_key_env);
            }
            _ => {
                return Err(JobHunterError::Initialization(format!(
                    "No text generation available: set {} or enable generation.fallback_to_ollama",
                    settings.api_key_env
                )));
            }
        }
    }

    info!("Using Ollama ({}) for text generation", settings.ollama_model);
    Ok(Arc::new(OllamaGenerator::new(settings, retry)?))
}
