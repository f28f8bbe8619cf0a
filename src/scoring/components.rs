//! The four deterministic relevance components

use crate::discovery::Posting;
use crate::scoring::keywords::KeywordSet;
use crate::scoring::profile::CandidateProfile;

pub const SKILL_WEIGHT: f64 = 40.0;
/// Skill score when a posting lists no required skills
pub const SKILL_NEUTRAL: f64 = 20.0;
pub const EXPERIENCE_MAX: f64 = 25.0;
pub const TECH_MAX: f64 = 25.0;
pub const TECH_POINTS_PER_HIT: f64 = 3.0;
pub const COMPANY_MAX: f64 = 10.0;
pub const COMPANY_POINTS_PER_HIT: f64 = 2.0;

/// Experience tiers, checked in order; the first tier with a hit wins
const EXPERIENCE_TIERS: [(&[&str], f64); 4] = [
    (&["intern", "fresher", "0-1", "entry", "graduate", "trainee"], 25.0),
    (&["1-2 year", "1+ year", "junior"], 18.0),
    (&["2+ year", "2-3 year"], 8.0),
    (&["3+", "4+", "5+", "senior", "lead"], 0.0),
];
const EXPERIENCE_AMBIGUOUS: f64 = 15.0;

pub const TECH_PRIORITY_TERMS: [&str; 17] = [
    "langchain", "langgraph", "llm", "rag", "pytorch", "transformers",
    "huggingface", "openai", "generative", "agent", "vector", "fine-tun",
    "mistral", "llama", "gpt", "embedding", "langsmith",
];

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Share of required skills the candidate has, scaled to 40
pub fn skill_overlap(posting: &Posting, profile: &CandidateProfile) -> f64 {
    if posting.required_skills.is_empty() {
        return SKILL_NEUTRAL;
    }
    let matched = posting
        .required_skills
        .iter()
        .filter(|skill| profile.has_skill(skill))
        .count();
    let overlap = matched as f64 / posting.required_skills.len() as f64;
    round_to(overlap * SKILL_WEIGHT, 2)
}

/// Tiered scan of experience text plus description
pub fn experience_match(posting: &Posting) -> f64 {
    let combined = format!("{} {}", posting.experience_required, posting.description).to_lowercase();

    EXPERIENCE_TIERS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| combined.contains(k)))
        .map(|(_, points)| *points)
        .unwrap_or(EXPERIENCE_AMBIGUOUS)
}

pub fn tech_terms() -> KeywordSet {
    KeywordSet::new(TECH_PRIORITY_TERMS)
}

/// Priority stack terms in the description and preferred skills, 3 points each.
///
/// Required skills are left out here; skill overlap already scores them.
pub fn tech_alignment(posting: &Posting, terms: &KeywordSet) -> f64 {
    let text = format!("{} {}", posting.description, posting.preferred_skills.join(" "));
    let hits = terms.count_present(&text) as f64;
    (hits * TECH_POINTS_PER_HIT).min(TECH_MAX)
}

/// Preferred-company keywords in company name plus description, 2 points each
pub fn company_preference(posting: &Posting, preferred: &KeywordSet) -> f64 {
    let text = format!("{} {}", posting.company, posting.description);
    let hits = preferred.count_present(&text) as f64;
    (hits * COMPANY_POINTS_PER_HIT).min(COMPANY_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{Posting, RawPosting};

    fn posting(configure: impl FnOnce(&mut RawPosting)) -> Posting {
        let mut raw = RawPosting {
            title: Some("Engineer".to_string()),
            company: Some("Plain Co".to_string()),
            ..Default::default()
        };
        configure(&mut raw);
        Posting::from_raw(raw, "test").unwrap()
    }

    fn profile() -> CandidateProfile {
        CandidateProfile::new(
            vec!["Python".to_string(), "PyTorch".to_string(), "SQL".to_string()],
            vec!["AI".to_string(), "startup".to_string(), "NLP".to_string()],
            vec![],
            60.0,
        )
    }

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_required_skills_is_neutral() {
        let p = posting(|r| r.preferred_skills = skills(&["Python"]));
        assert_eq!(skill_overlap(&p, &profile()), 20.0);
    }

    #[test]
    fn test_skill_overlap_fraction() {
        let p = posting(|r| r.required_skills = skills(&["python", "Go", "pytorch"]));
        assert_eq!(skill_overlap(&p, &profile()), 26.67);

        let all = posting(|r| r.required_skills = skills(&["PYTHON", "SQL"]));
        assert_eq!(skill_overlap(&all, &profile()), 40.0);

        let none = posting(|r| r.required_skills = skills(&["Rust"]));
        assert_eq!(skill_overlap(&none, &profile()), 0.0);
    }

    #[test]
    fn test_experience_tiers_in_order() {
        let intern = posting(|r| r.experience = Some("Internship, 6 months".to_string()));
        assert_eq!(experience_match(&intern), 25.0);

        // an earlier tier wins even when a later one also matches
        let mixed = posting(|r| {
            r.experience = Some("Junior role".to_string());
            r.description = Some("Work with a senior mentor".to_string());
        });
        assert_eq!(experience_match(&mixed), 18.0);

        let two = posting(|r| r.experience = Some("2-3 years".to_string()));
        assert_eq!(experience_match(&two), 8.0);

        let senior = posting(|r| r.experience = Some("5+".to_string()));
        assert_eq!(experience_match(&senior), 0.0);

        let vague = posting(|r| r.description = Some("Build models".to_string()));
        assert_eq!(experience_match(&vague), 15.0);
    }

    #[test]
    fn test_tech_alignment_capped() {
        let terms = tech_terms();
        let two = posting(|r| r.description = Some("Build LangChain RAG flows".to_string()));
        assert_eq!(tech_alignment(&two, &terms), 6.0);

        let many = posting(|r| {
            r.description = Some(
                "LangChain LangGraph LLM RAG PyTorch transformers HuggingFace OpenAI generative agent"
                    .to_string(),
            )
        });
        assert_eq!(tech_alignment(&many, &terms), 25.0);
    }

    #[test]
    fn test_tech_terms_in_preferred_skills_only() {
        let terms = tech_terms();
        let p = posting(|r| {
            r.required_skills = skills(&["PyTorch"]);
            r.preferred_skills = skills(&["Mistral", "Vector DBs"]);
        });
        assert_eq!(tech_alignment(&p, &terms), 6.0);
    }

    #[test]
    fn test_company_preference_capped() {
        let profile = profile();
        let one = posting(|r| r.company = Some("Acme AI".to_string()));
        assert_eq!(company_preference(&one, profile.preferred_companies()), 2.0);

        let wide = CandidateProfile::new(
            vec![],
            skills(&["ai", "ml", "nlp", "saas", "startup", "genai"]),
            vec![],
            60.0,
        );
        let many = posting(|r| {
            r.company = Some("GenAI Labs".to_string());
            r.description = Some("An ML NLP SaaS startup".to_string());
        });
        assert_eq!(company_preference(&many, wide.preferred_companies()), 10.0);
    }
}
