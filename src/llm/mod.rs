//! Text generation through hosted or local chat models

pub mod client;
pub mod prompts;

pub use client::{build_generator, OllamaGenerator, OpenAiGenerator};

use crate::error::{JobHunterError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Turns a prompt (plus optional system instruction) into free text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String>;
}

/// Strips ```json ... ``` or ``` ... ``` fences models like to add
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .map(|rest| rest.trim_end().strip_suffix("```").unwrap_or(rest));
    inner.unwrap_or(text).trim()
}

/// Generate and decode a JSON reply
pub async fn generate_json<T: DeserializeOwned>(
    generator: &dyn TextGenerator,
    prompt: &str,
    system: Option<&str>,
) -> Result<T> {
    let reply = generator.generate(prompt, system).await?;
    serde_json::from_str(strip_json_fences(&reply)).map_err(|e| {
        JobHunterError::Generation(format!("{} returned unparseable JSON: {}", generator.name(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n[1, 2]\n```  "), "[1, 2]");
        assert_eq!(strip_json_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }
}
