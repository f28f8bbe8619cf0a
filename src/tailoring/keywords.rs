//! Keyword extraction from a job description

use crate::discovery::Posting;
use crate::llm::prompts::{render, JD_KEYWORDS_SYSTEM, JD_KEYWORDS_TEMPLATE};
use crate::llm::{generate_json, TextGenerator};
use log::warn;
use serde::{Deserialize, Serialize};

const DESCRIPTION_PROMPT_CHARS: usize = 3000;
const FALLBACK_ACTION_VERBS: [&str; 5] = ["develop", "build", "implement", "optimize", "deploy"];
const FALLBACK_ATS_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JdKeywords {
    pub must_have_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub tools_and_frameworks: Vec<String>,
    pub domain_keywords: Vec<String>,
    pub action_verbs: Vec<String>,
    pub ats_keywords: Vec<String>,
}

impl JdKeywords {
    /// Built from the posting's own skill lists when generation is unusable
    pub fn fallback(posting: &Posting) -> Self {
        Self {
            must_have_skills: posting.required_skills.clone(),
            nice_to_have_skills: posting.preferred_skills.clone(),
            tools_and_frameworks: Vec::new(),
            domain_keywords: Vec::new(),
            action_verbs: FALLBACK_ACTION_VERBS.iter().map(|v| v.to_string()).collect(),
            ats_keywords: posting.required_skills.iter().take(FALLBACK_ATS_KEYWORDS).cloned().collect(),
        }
    }

    /// Must-have skills and tools, lowercased
    pub fn priority_terms(&self) -> Vec<String> {
        self.must_have_skills
            .iter()
            .chain(self.tools_and_frameworks.iter())
            .map(|k| k.to_lowercase())
            .collect()
    }
}

pub async fn extract_keywords(posting: &Posting, generator: &dyn TextGenerator) -> JdKeywords {
    let description: String = posting.description.chars().take(DESCRIPTION_PROMPT_CHARS).collect();
    let prompt = render(
        JD_KEYWORDS_TEMPLATE,
        &[
            ("title", posting.title.as_str()),
            ("company", posting.company.as_str()),
            ("description", description.as_str()),
        ],
    );

    match generate_json::<JdKeywords>(generator, &prompt, Some(JD_KEYWORDS_SYSTEM)).await {
        Ok(keywords) => keywords,
        Err(e) => {
            warn!("Keyword extraction failed for {}, using posting skills: {}", posting.id, e);
            JdKeywords::fallback(posting)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::RawPosting;
    use crate::error::{JobHunterError, Result};
    use async_trait::async_trait;

    struct Reply(Option<&'static str>);

    #[async_trait]
    impl TextGenerator for Reply {
        fn name(&self) -> &str {
            "reply"
        }

        async fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| JobHunterError::Generation("down".to_string()))
        }
    }

    fn posting() -> Posting {
        Posting::from_raw(
            RawPosting {
                title: Some("ML Intern".to_string()),
                company: Some("Acme AI".to_string()),
                required_skills: vec!["Python".to_string(), "PyTorch".to_string()],
                preferred_skills: vec!["Docker".to_string()],
                ..Default::default()
            },
            "test",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_parsed_reply_with_missing_keys() {
        let generator = Reply(Some(r#"{"must_have_skills": ["Python"], "ats_keywords": ["RAG"]}"#));
        let keywords = extract_keywords(&posting(), &generator).await;
        assert_eq!(keywords.must_have_skills, vec!["Python"]);
        assert_eq!(keywords.ats_keywords, vec!["RAG"]);
        assert!(keywords.tools_and_frameworks.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_on_failure() {
        let keywords = extract_keywords(&posting(), &Reply(None)).await;
        assert_eq!(keywords, JdKeywords::fallback(&posting()));
        assert_eq!(keywords.must_have_skills, vec!["Python", "PyTorch"]);
        assert_eq!(keywords.nice_to_have_skills, vec!["Docker"]);
        assert_eq!(keywords.action_verbs.len(), 5);
        assert_eq!(keywords.ats_keywords, vec!["Python", "PyTorch"]);
    }

    #[test]
    fn test_priority_terms_are_lowercased() {
        let keywords = JdKeywords {
            must_have_skills: vec!["PyTorch".to_string()],
            tools_and_frameworks: vec!["FAISS".to_string()],
            ..Default::default()
        };
        assert_eq!(keywords.priority_terms(), vec!["pytorch", "faiss"]);
    }
}
