//! Fill in skill lists and experience text from the description

use crate::discovery::posting::Posting;
use crate::llm::prompts::{render, ENRICH_TEMPLATE, JSON_ONLY_SYSTEM};
use crate::llm::{generate_json, TextGenerator};
use log::debug;
use serde::Deserialize;

/// Descriptions shorter than this carry too little to extract from
const MIN_DESCRIPTION_CHARS: usize = 50;
const DESCRIPTION_PROMPT_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
struct Extracted {
    #[serde(default)]
    required_skills: Vec<String>,
    #[serde(default)]
    preferred_skills: Vec<String>,
    experience_required: Option<String>,
    joining_date_flexible: Option<bool>,
}

/// Ask the generator for structured fields. Failures leave the posting as it was.
pub async fn enrich_posting(mut posting: Posting, generator: &dyn TextGenerator) -> Posting {
    if posting.description.chars().count() < MIN_DESCRIPTION_CHARS {
        return posting;
    }

    let description: String = posting.description.chars().take(DESCRIPTION_PROMPT_CHARS).collect();
    let prompt = render(
        ENRICH_TEMPLATE,
        &[
            ("title", posting.title.as_str()),
            ("company", posting.company.as_str()),
            ("description", description.as_str()),
        ],
    );

    match generate_json::<Extracted>(generator, &prompt, Some(JSON_ONLY_SYSTEM)).await {
        Ok(extracted) => {
            posting.required_skills = extracted.required_skills;
            posting.preferred_skills = extracted.preferred_skills;
            if let Some(experience) = extracted.experience_required {
                posting.experience_required = experience;
            }
            posting.start_date_flexible = extracted.joining_date_flexible.unwrap_or(true);
        }
        Err(e) => debug!("Enrichment failed for {}: {}", posting.id, e),
    }
    posting
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::RawPosting;
    use crate::error::{JobHunterError, Result};
    use async_trait::async_trait;

    struct Canned(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl TextGenerator for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String> {
            match self.0 {
                Ok(reply) => Ok(reply.to_string()),
                Err(e) => Err(JobHunterError::Generation(e.to_string())),
            }
        }
    }

    fn posting(description: &str) -> Posting {
        Posting::from_raw(
            RawPosting {
                title: Some("GenAI Intern".to_string()),
                company: Some("Acme AI".to_string()),
                description: Some(description.to_string()),
                experience: Some("Intern".to_string()),
                ..Default::default()
            },
            "test",
        )
        .unwrap()
    }

    const LONG: &str = "We are hiring an intern to build retrieval pipelines with LangChain and Python.";

    #[tokio::test]
    async fn test_fields_are_filled_from_reply() {
        let generator = Canned(Ok(
            "```json\n{\"required_skills\": [\"Python\", \"LangChain\"], \"preferred_skills\": [\"FAISS\"], \"experience_required\": \"Fresher\", \"joining_date_flexible\": false}\n```",
        ));
        let enriched = enrich_posting(posting(LONG), &generator).await;
        assert_eq!(enriched.required_skills, vec!["Python", "LangChain"]);
        assert_eq!(enriched.preferred_skills, vec!["FAISS"]);
        assert_eq!(enriched.experience_required, "Fresher");
        assert!(!enriched.start_date_flexible);
    }

    #[tokio::test]
    async fn test_failure_leaves_posting_unchanged() {
        let original = posting(LONG);
        let enriched = enrich_posting(original.clone(), &Canned(Err("offline"))).await;
        assert_eq!(enriched, original);

        let garbled = enrich_posting(original.clone(), &Canned(Ok("not json"))).await;
        assert_eq!(garbled, original);
    }

    #[tokio::test]
    async fn test_short_descriptions_are_skipped() {
        let generator = Canned(Ok("{\"required_skills\": [\"Go\"]}"));
        let enriched = enrich_posting(posting("Short"), &generator).await;
        assert!(enriched.required_skills.is_empty());
    }
}
