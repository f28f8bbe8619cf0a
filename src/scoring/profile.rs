//! Candidate profile the scorer compares postings against

use crate::scoring::keywords::KeywordSet;
use std::collections::HashSet;

/// How many skills go into the synthesised profile text
const PROFILE_TEXT_SKILLS: usize = 30;

#[derive(Debug, Clone)]
pub struct CandidateProfile {
    skills: Vec<String>,
    skill_lookup: HashSet<String>,
    preferred_companies: KeywordSet,
    blacklist: KeywordSet,
    min_score: f64,
}

impl CandidateProfile {
    pub fn new(
        skills: Vec<String>,
        preferred_company_keywords: Vec<String>,
        blacklist_keywords: Vec<String>,
        min_score: f64,
    ) -> Self {
        let skill_lookup = skills.iter().map(|s| s.to_lowercase()).collect();
        Self {
            skills,
            skill_lookup,
            preferred_companies: KeywordSet::new(preferred_company_keywords),
            blacklist: KeywordSet::new(blacklist_keywords),
            min_score,
        }
    }

    /// Exact, case-insensitive membership in the flat skill set
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skill_lookup.contains(&skill.to_lowercase())
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn preferred_companies(&self) -> &KeywordSet {
        &self.preferred_companies
    }

    pub fn blacklist(&self) -> &KeywordSet {
        &self.blacklist
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Profile text used for embeddings when no resume document is configured
    pub fn summary_text(&self) -> String {
        let skills: Vec<&str> = self
            .skills
            .iter()
            .take(PROFILE_TEXT_SKILLS)
            .map(String::as_str)
            .collect();
        format!("Machine learning engineer with expertise in: {}", skills.join(", "))
    }
}
