//! Per-posting resume tailoring

use crate::config::Config;
use crate::discovery::Posting;
use crate::error::Result;
use crate::llm::prompts::{render, BULLETS_SYSTEM, BULLETS_TEMPLATE};
use crate::llm::{generate_json, TextGenerator};
use crate::scoring::components::round_to;
use crate::tailoring::base_resume::{BaseResume, SkillCategories};
use crate::tailoring::keywords::{extract_keywords, JdKeywords};
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// ATS score reported when the posting yields no ATS keywords at all
pub const DEFAULT_ATS_SCORE: f64 = 75.0;
const MAX_MISSING_KEYWORDS: usize = 5;
const MAX_REORDERED_LISTED: usize = 5;
const PROMPT_KEYWORDS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeVersion {
    pub job_id: String,
    pub version_id: String,
    pub keywords_added: Vec<String>,
    pub bullets_modified: Vec<String>,
    pub skills_reordered: Vec<String>,
    pub resume_content: BaseResume,
    pub ats_score: f64,
}

/// `v_` followed by 6 random hex characters
pub fn new_version_id() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..0x0100_0000);
    format!("v_{:06x}", value)
}

/// Front-load skills that mention a must-have skill or tool, per category
pub fn reorder_skills(skills: &SkillCategories, keywords: &JdKeywords) -> SkillCategories {
    let priority = keywords.priority_terms();
    let categories = skills
        .0
        .iter()
        .map(|(category, list)| {
            let (mut matched, others): (Vec<String>, Vec<String>) = list
                .iter()
                .cloned()
                .partition(|skill| {
                    let skill = skill.to_lowercase();
                    priority.iter().any(|p| !p.is_empty() && skill.contains(p.as_str()))
                });
            matched.extend(others);
            (category.clone(), matched)
        })
        .collect();
    SkillCategories(categories)
}

/// JD keywords the candidate does not list, at most five
pub fn missing_keywords<'a>(
    keywords: &JdKeywords,
    candidate_skills: impl Iterator<Item = &'a String>,
    summary: &str,
) -> Vec<String> {
    let known: Vec<String> = candidate_skills.map(|s| s.to_lowercase()).collect();
    let summary = summary.to_lowercase();

    keywords
        .must_have_skills
        .iter()
        .chain(keywords.nice_to_have_skills.iter())
        .chain(keywords.tools_and_frameworks.iter())
        .filter(|kw| {
            let kw = kw.to_lowercase();
            !kw.trim().is_empty() && !known.contains(&kw) && !summary.contains(&kw)
        })
        .take(MAX_MISSING_KEYWORDS)
        .cloned()
        .collect()
}

/// Share of ATS keywords present in the serialised resume, as a percentage
pub fn ats_score(resume: &BaseResume, keywords: &JdKeywords) -> Result<f64> {
    if keywords.ats_keywords.is_empty() {
        return Ok(DEFAULT_ATS_SCORE);
    }
    let text = serde_json::to_string(resume)?.to_lowercase();
    let matched = keywords
        .ats_keywords
        .iter()
        .filter(|kw| text.contains(&kw.to_lowercase()))
        .count();
    Ok(round_to(matched as f64 / keywords.ats_keywords.len() as f64 * 100.0, 1))
}

fn join_first(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

/// Rewrites the base resume for individual postings
pub struct ResumeTailor {
    base: BaseResume,
    candidate_status: String,
}

impl ResumeTailor {
    pub fn new(base: BaseResume, candidate_status: impl Into<String>) -> Self {
        Self {
            base,
            candidate_status: candidate_status.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            BaseResume::load_or_synthesise(config)?,
            config.candidate.status.clone(),
        ))
    }

    pub fn base(&self) -> &BaseResume {
        &self.base
    }

    pub fn tailored_summary(&self, posting: &Posting, keywords: &JdKeywords) -> String {
        format!(
            "{} specializing in {}-aligned skills including {}. Experienced in building \
             production-grade AI systems with LangChain, LangGraph, and modern LLM frameworks. \
             Passionate about {}'s mission. Available to join from {}.",
            self.candidate_status,
            posting.title,
            join_first(&keywords.must_have_skills, 4),
            posting.company,
            self.base.header.available_from
        )
    }

    /// One rewritten bullet per project, or the original descriptions
    pub async fn rewrite_bullets(
        &self,
        posting: &Posting,
        keywords: &JdKeywords,
        generator: &dyn TextGenerator,
    ) -> Vec<String> {
        let originals: Vec<String> = self.base.projects.iter().map(|p| p.description.clone()).collect();
        if originals.is_empty() {
            return originals;
        }

        let projects = self
            .base
            .projects
            .iter()
            .map(|p| format!("- {}: {}", p.name, p.description))
            .collect::<Vec<_>>()
            .join("\n");
        let action_verbs = if keywords.action_verbs.is_empty() {
            "Built, Developed, Optimized".to_string()
        } else {
            keywords.action_verbs.join(", ")
        };
        let ats_keywords = join_first(&keywords.ats_keywords, PROMPT_KEYWORDS);
        let must_have = join_first(&keywords.must_have_skills, PROMPT_KEYWORDS);

        let prompt = render(
            BULLETS_TEMPLATE,
            &[
                ("action_verbs", action_verbs.as_str()),
                ("ats_keywords", ats_keywords.as_str()),
                ("title", posting.title.as_str()),
                ("company", posting.company.as_str()),
                ("must_have", must_have.as_str()),
                ("projects", projects.as_str()),
            ],
        );

        match generate_json::<Vec<String>>(generator, &prompt, Some(BULLETS_SYSTEM)).await {
            Ok(bullets) if !bullets.is_empty() => bullets,
            Ok(_) => originals,
            Err(e) => {
                warn!("Bullet rewriting failed for {}, keeping originals: {}", posting.id, e);
                originals
            }
        }
    }

    pub async fn tailor(&self, posting: &Posting, generator: &dyn TextGenerator) -> Result<ResumeVersion> {
        let keywords = extract_keywords(posting, generator).await;
        debug!("ATS keywords for {}: {:?}", posting.id, keywords.ats_keywords);

        let bullets = self.rewrite_bullets(posting, &keywords, generator).await;
        let keywords_added = missing_keywords(&keywords, self.base.all_skills(), &self.base.summary);

        let mut resume = self.base.clone();
        resume.technical_skills = reorder_skills(&self.base.technical_skills, &keywords);
        for (project, bullet) in resume.projects.iter_mut().zip(bullets.iter()) {
            project.description = bullet.clone();
        }
        resume.summary = self.tailored_summary(posting, &keywords);

        let coverage = ats_score(&resume, &keywords)?;
        info!("ATS score {}% for {} @ {}", coverage, posting.title, posting.company);

        Ok(ResumeVersion {
            job_id: posting.id.clone(),
            version_id: new_version_id(),
            keywords_added,
            bullets_modified: (1..=bullets.len()).map(|i| format!("Project {}: Rewritten", i)).collect(),
            skills_reordered: keywords.must_have_skills.iter().take(MAX_REORDERED_LISTED).cloned().collect(),
            resume_content: resume,
            ats_score: coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::RawPosting;
    use crate::error::JobHunterError;
    use crate::tailoring::base_resume::Project;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies in order, failing once the script runs out
    struct Scripted(Mutex<Vec<&'static str>>);

    impl Scripted {
        fn new(replies: &[&'static str]) -> Self {
            Self(Mutex::new(replies.iter().rev().copied().collect()))
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String> {
            self.0
                .lock()
                .unwrap()
                .pop()
                .map(str::to_string)
                .ok_or_else(|| JobHunterError::Generation("script exhausted".to_string()))
        }
    }

    fn base() -> BaseResume {
        BaseResume {
            summary: "Student building RAG systems".to_string(),
            technical_skills: SkillCategories(vec![
                ("Languages".to_string(), vec!["Java".to_string(), "Python".to_string()]),
                (
                    "ML".to_string(),
                    vec!["scikit-learn".to_string(), "PyTorch Lightning".to_string()],
                ),
            ]),
            projects: vec![
                Project {
                    name: "DocQA".to_string(),
                    description: "RAG over PDFs".to_string(),
                    ..Default::default()
                },
                Project {
                    name: "Tuner".to_string(),
                    description: "LoRA fine-tuning".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn posting() -> Posting {
        Posting::from_raw(
            RawPosting {
                title: Some("ML Intern".to_string()),
                company: Some("Acme AI".to_string()),
                required_skills: vec!["Python".to_string(), "PyTorch".to_string(), "Kubernetes".to_string()],
                ..Default::default()
            },
            "test",
        )
        .unwrap()
    }

    fn keywords(must: &[&str], ats: &[&str]) -> JdKeywords {
        JdKeywords {
            must_have_skills: must.iter().map(|s| s.to_string()).collect(),
            ats_keywords: ats.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_reorder_front_loads_matches() {
        let reordered = reorder_skills(&base().technical_skills, &keywords(&["python", "pytorch"], &[]));
        assert_eq!(reordered.0[0].1, vec!["Python", "Java"]);
        assert_eq!(reordered.0[1].1, vec!["PyTorch Lightning", "scikit-learn"]);
    }

    #[test]
    fn test_missing_keywords() {
        let resume = base();
        let mut kw = keywords(&["Python", "Kubernetes", "RAG"], &[]);
        kw.tools_and_frameworks = vec!["Docker".to_string(), "Airflow".to_string(), "Ray".to_string(), "Spark".to_string(), "Kafka".to_string()];
        let missing = missing_keywords(&kw, resume.all_skills(), &resume.summary);
        // Python is a listed skill, RAG appears in the summary
        assert_eq!(missing, vec!["Kubernetes", "Docker", "Airflow", "Ray", "Spark"]);
    }

    #[test]
    fn test_ats_score() {
        let resume = base();
        assert_eq!(ats_score(&resume, &keywords(&[], &[])).unwrap(), DEFAULT_ATS_SCORE);
        assert_eq!(ats_score(&resume, &keywords(&[], &["python", "LoRA", "Go-kart"])).unwrap(), 66.7);
    }

    #[test]
    fn test_version_id_format() {
        let id = new_version_id();
        assert_eq!(id.len(), 8);
        assert!(id.starts_with("v_"));
        assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_tailor_with_generated_content() {
        let generator = Scripted::new(&[
            r#"{"must_have_skills": ["Python", "PyTorch"], "ats_keywords": ["python", "retrieval"], "action_verbs": ["Built"]}"#,
            r#"["Built retrieval over PDFs", "Fine-tuned LLaMA with LoRA"]"#,
        ]);
        let tailor = ResumeTailor::new(base(), "Final-year student");
        let version = tailor.tailor(&posting(), &generator).await.unwrap();

        assert_eq!(version.job_id, posting().id);
        assert_eq!(version.resume_content.projects[0].description, "Built retrieval over PDFs");
        assert_eq!(version.bullets_modified, vec!["Project 1: Rewritten", "Project 2: Rewritten"]);
        assert_eq!(version.skills_reordered, vec!["Python", "PyTorch"]);
        assert_eq!(version.keywords_added, vec!["PyTorch"]);
        assert_eq!(version.ats_score, 100.0);
        assert!(version.resume_content.summary.starts_with("Final-year student specializing in ML Intern-aligned"));
        assert!(version.resume_content.summary.contains("Acme AI's mission"));
    }

    #[tokio::test]
    async fn test_tailor_falls_back_when_generation_fails() {
        let tailor = ResumeTailor::new(base(), "Student");
        let version = tailor.tailor(&posting(), &Scripted::new(&[])).await.unwrap();

        assert_eq!(version.resume_content.projects[1].description, "LoRA fine-tuning");
        assert_eq!(version.skills_reordered, vec!["Python", "PyTorch", "Kubernetes"]);
        // ATS keywords fall back to the required skills, all named in the tailored summary
        assert_eq!(version.ats_score, 100.0);
        assert!(version.keywords_added.contains(&"Kubernetes".to_string()));
    }
}
