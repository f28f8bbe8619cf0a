//! Composite relevance scoring with hard disqualification

use crate::discovery::Posting;
use crate::scoring::components::{
    company_preference, experience_match, round_to, skill_overlap, tech_alignment, tech_terms,
};
use crate::scoring::keywords::KeywordSet;
use crate::scoring::profile::CandidateProfile;
use crate::scoring::semantic::{SemanticScorer, SEMANTIC_WEIGHT};
use log::{debug, info};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub skill: f64,
    pub experience: f64,
    pub tech: f64,
    pub company: f64,
    /// Raw 0-10 bonus before weighting; `None` without an embedder
    pub semantic: Option<f64>,
    pub final_score: f64,
}

impl ScoreBreakdown {
    /// Sum of the four deterministic components
    pub fn base(&self) -> f64 {
        self.skill + self.experience + self.tech + self.company
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredPosting {
    pub posting: Posting,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Default)]
pub struct ScoringOutcome {
    /// Scored postings in input order
    pub scored: Vec<ScoredPosting>,
    pub disqualified: Vec<Posting>,
}

/// True when any blacklist keyword appears in title, description or experience text
pub fn is_disqualified(posting: &Posting, blacklist: &KeywordSet) -> bool {
    let combined = format!(
        "{} {} {}",
        posting.title, posting.description, posting.experience_required
    );
    blacklist.matches_any(&combined)
}

pub struct RelevanceScorer {
    profile: CandidateProfile,
    tech_terms: KeywordSet,
    semantic: SemanticScorer,
}

impl RelevanceScorer {
    pub fn new(profile: CandidateProfile, semantic: SemanticScorer) -> Self {
        Self {
            profile,
            tech_terms: tech_terms(),
            semantic,
        }
    }

    pub fn profile(&self) -> &CandidateProfile {
        &self.profile
    }

    pub fn semantic_enabled(&self) -> bool {
        self.semantic.is_available()
    }

    pub fn is_disqualified(&self, posting: &Posting) -> bool {
        is_disqualified(posting, self.profile.blacklist())
    }

    /// Component scores for a posting, regardless of disqualification
    pub fn breakdown(&self, posting: &Posting) -> ScoreBreakdown {
        let skill = skill_overlap(posting, &self.profile);
        let experience = experience_match(posting);
        let tech = tech_alignment(posting, &self.tech_terms);
        let company = company_preference(posting, self.profile.preferred_companies());
        let semantic = self.semantic.bonus(posting);

        let base = skill + experience + tech + company;
        let blended = base + semantic.unwrap_or(0.0) * SEMANTIC_WEIGHT;
        let final_score = round_to(blended.clamp(0.0, 100.0), 1);

        ScoreBreakdown {
            skill,
            experience,
            tech,
            company,
            semantic,
            final_score,
        }
    }

    /// Score one posting; `None` when it is disqualified
    pub fn score(&self, mut posting: Posting) -> Option<ScoredPosting> {
        if self.is_disqualified(&posting) {
            debug!("DISQUALIFIED: {} at {}", posting.title, posting.company);
            return None;
        }

        let breakdown = self.breakdown(&posting);
        posting.relevance_score = breakdown.final_score;

        info!(
            "Score {:.1}% | [Skills:{:.0} Exp:{:.0} Tech:{:.0} Co:{:.0}{}] | {} @ {}",
            breakdown.final_score,
            breakdown.skill,
            breakdown.experience,
            breakdown.tech,
            breakdown.company,
            breakdown
                .semantic
                .map(|s| format!(" Sem:{:.1}", s))
                .unwrap_or_default(),
            posting.title,
            posting.company
        );

        Some(ScoredPosting { posting, breakdown })
    }

    pub fn score_all(&self, postings: Vec<Posting>) -> ScoringOutcome {
        let mut outcome = ScoringOutcome::default();
        for posting in postings {
            if self.is_disqualified(&posting) {
                debug!("DISQUALIFIED: {} at {}", posting.title, posting.company);
                outcome.disqualified.push(posting);
                continue;
            }
            if let Some(scored) = self.score(posting) {
                outcome.scored.push(scored);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::RawPosting;
    use crate::embeddings::Embedder;
    use crate::error::{JobHunterError, Result};
    use crate::scoring::semantic::SemanticCapability;
    use std::sync::Arc;

    struct FixedEmbedder(Vec<f32>);

    impl Embedder for FixedEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    /// The profile text embeds to one direction, postings to the opposite one
    struct OpposedEmbedder;

    impl Embedder for OpposedEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text == "profile" {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![-1.0, 0.0])
            }
        }

        fn model_name(&self) -> &str {
            "opposed"
        }
    }

    struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(JobHunterError::Embedding("offline".to_string()))
        }

        fn model_name(&self) -> &str {
            "broken"
        }
    }

    fn profile() -> CandidateProfile {
        CandidateProfile::new(
            ["Python", "PyTorch", "LangChain", "SQL"].iter().map(|s| s.to_string()).collect(),
            ["AI", "ML", "startup"].iter().map(|s| s.to_string()).collect(),
            ["senior", "lead", "5+ years"].iter().map(|s| s.to_string()).collect(),
            60.0,
        )
    }

    fn acme_intern() -> Posting {
        Posting::from_raw(
            RawPosting {
                title: Some("Machine Learning Intern".to_string()),
                company: Some("Acme AI".to_string()),
                description: Some("Build retrieval with LangChain and RAG".to_string()),
                required_skills: vec!["Python".to_string(), "PyTorch".to_string()],
                experience: Some("Machine Learning Intern, fresher welcome".to_string()),
                ..Default::default()
            },
            "test",
        )
        .unwrap()
    }

    #[test]
    fn test_end_to_end_example_scores_73() {
        let scorer = RelevanceScorer::new(profile(), SemanticScorer::unavailable());
        let scored = scorer.score(acme_intern()).unwrap();

        assert_eq!(scored.breakdown.skill, 40.0);
        assert_eq!(scored.breakdown.experience, 25.0);
        assert_eq!(scored.breakdown.tech, 6.0);
        assert_eq!(scored.breakdown.company, 2.0);
        assert_eq!(scored.breakdown.semantic, None);
        assert_eq!(scored.breakdown.final_score, 73.0);
        assert_eq!(scored.posting.relevance_score, 73.0);
    }

    #[test]
    fn test_failing_embedder_adds_half_point() {
        let semantic = SemanticScorer::new(
            SemanticCapability::Available(Arc::new(BrokenEmbedder)),
            "profile",
        );
        let scorer = RelevanceScorer::new(profile(), semantic);
        let scored = scorer.score(acme_intern()).unwrap();

        assert_eq!(scored.breakdown.semantic, Some(5.0));
        assert_eq!(scored.breakdown.final_score, 73.5);
        assert_eq!(scored.breakdown.final_score, scored.breakdown.base() + 0.5);
    }

    #[test]
    fn test_blacklist_disqualifies_regardless_of_fit() {
        let scorer = RelevanceScorer::new(profile(), SemanticScorer::unavailable());
        let mut posting = acme_intern();
        posting.title = "Senior Machine Learning Engineer".to_string();

        assert!(scorer.score(posting.clone()).is_none());

        let outcome = scorer.score_all(vec![posting, acme_intern()]);
        assert_eq!(outcome.scored.len(), 1);
        assert_eq!(outcome.disqualified.len(), 1);
        assert_eq!(outcome.disqualified[0].relevance_score, 0.0);
    }

    #[test]
    fn test_blacklist_checks_experience_text() {
        let scorer = RelevanceScorer::new(profile(), SemanticScorer::unavailable());
        let mut posting = acme_intern();
        posting.experience_required = "5+ YEARS in production ML".to_string();
        assert!(scorer.is_disqualified(&posting));
    }

    #[test]
    fn test_blacklist_not_checked_against_company() {
        let scorer = RelevanceScorer::new(profile(), SemanticScorer::unavailable());
        let mut posting = acme_intern();
        posting.company = "Lead Genius".to_string();
        assert!(!scorer.is_disqualified(&posting));
    }

    #[test]
    fn test_components_stay_within_caps() {
        let scorer = RelevanceScorer::new(profile(), SemanticScorer::unavailable());
        let mut posting = acme_intern();
        posting.description = "LangChain LangGraph LLM RAG PyTorch transformers HuggingFace OpenAI \
            generative agent vector embedding GPT llama mistral AI ML startup"
            .to_string();

        let breakdown = scorer.breakdown(&posting);
        assert!(breakdown.skill <= 40.0);
        assert!(breakdown.experience <= 25.0);
        assert_eq!(breakdown.tech, 25.0);
        assert!(breakdown.company <= 10.0);
        assert!(breakdown.base() <= 100.0);
        assert!((0.0..=100.0).contains(&breakdown.final_score));
    }

    #[test]
    fn test_full_base_with_full_bonus_stays_at_100() {
        let profile = CandidateProfile::new(
            vec!["Python".to_string(), "PyTorch".to_string()],
            ["ai", "ml", "nlp", "saas", "startup"].iter().map(|s| s.to_string()).collect(),
            vec!["senior".to_string()],
            60.0,
        );
        let semantic = SemanticScorer::new(
            SemanticCapability::Available(Arc::new(FixedEmbedder(vec![1.0, 0.0]))),
            "profile",
        );
        let scorer = RelevanceScorer::new(profile, semantic);

        let posting = Posting::from_raw(
            RawPosting {
                title: Some("GenAI Intern".to_string()),
                company: Some("AI ML NLP SaaS Startup".to_string()),
                description: Some(
                    "LangChain LangGraph LLM RAG PyTorch transformers HuggingFace OpenAI generative agent"
                        .to_string(),
                ),
                required_skills: vec!["python".to_string(), "PYTORCH".to_string()],
                experience: Some("Internship".to_string()),
                ..Default::default()
            },
            "test",
        )
        .unwrap();

        let breakdown = scorer.breakdown(&posting);
        assert_eq!(breakdown.base(), 100.0);
        assert_eq!(breakdown.semantic, Some(10.0));
        assert_eq!(breakdown.final_score, 100.0);
    }

    #[test]
    fn test_zero_base_with_opposed_embeddings_stays_at_0() {
        let profile = CandidateProfile::new(
            vec!["Python".to_string()],
            vec!["fintech".to_string()],
            vec![],
            60.0,
        );
        let semantic = SemanticScorer::new(SemanticCapability::Available(Arc::new(OpposedEmbedder)), "profile");
        let scorer = RelevanceScorer::new(profile, semantic);

        let posting = Posting::from_raw(
            RawPosting {
                title: Some("Backend Engineer".to_string()),
                company: Some("Widget Co".to_string()),
                description: Some("Senior Go backend work".to_string()),
                required_skills: vec!["Rust".to_string()],
                ..Default::default()
            },
            "test",
        )
        .unwrap();

        let breakdown = scorer.breakdown(&posting);
        assert_eq!(breakdown.base(), 0.0);
        assert_eq!(breakdown.semantic, Some(0.0));
        assert_eq!(breakdown.final_score, 0.0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = RelevanceScorer::new(profile(), SemanticScorer::unavailable());
        let first = scorer.score(acme_intern()).unwrap();
        let second = scorer.score(first.posting.clone()).unwrap();
        assert_eq!(first.breakdown, second.breakdown);
    }
}
