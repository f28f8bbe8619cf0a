//! Canonical job posting and its raw, partially-filled source form

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkMode {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "remote" => Some(WorkMode::Remote),
            "hybrid" => Some(WorkMode::Hybrid),
            "onsite" | "on-site" | "on site" | "office" => Some(WorkMode::Onsite),
            _ => None,
        }
    }

    /// Guess from location text such as "Bengaluru (Hybrid)"
    pub fn infer(location: &str) -> Self {
        let location = location.to_lowercase();
        if location.contains("remote") {
            WorkMode::Remote
        } else if location.contains("hybrid") {
            WorkMode::Hybrid
        } else {
            WorkMode::Onsite
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "Remote",
            WorkMode::Hybrid => "Hybrid",
            WorkMode::Onsite => "Onsite",
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A posting as a source reports it; every field may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPosting {
    #[serde(alias = "job_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    #[serde(alias = "job_url")]
    pub url: Option<String>,
    pub description: Option<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub posted_date: Option<String>,
    #[serde(alias = "experience_required")]
    pub experience: Option<String>,
    pub salary_range: Option<String>,
    pub source: Option<String>,
    #[serde(alias = "joining_date_flexible")]
    pub start_date_flexible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub work_mode: WorkMode,
    pub url: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub posted_date: Option<String>,
    pub experience_required: String,
    pub salary_range: Option<String>,
    pub source: String,
    pub start_date_flexible: bool,
    pub relevance_score: f64,
}

/// Stable identifier: first 10 hex characters of SHA-256 over `title + company`
pub fn posting_id(title: &str, company: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(company.as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(10);
    for byte in digest.iter().take(5) {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Posting {
    /// Normalise a raw posting. Returns `None` when title or company is missing.
    pub fn from_raw(raw: RawPosting, default_source: &str) -> Option<Self> {
        let title = non_blank(raw.title)?;
        let company = non_blank(raw.company)?;
        let location = non_blank(raw.location).unwrap_or_default();

        let work_mode = raw
            .work_mode
            .as_deref()
            .and_then(WorkMode::parse)
            .unwrap_or_else(|| WorkMode::infer(&location));

        Some(Self {
            id: posting_id(&title, &company),
            work_mode,
            url: raw.url.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            required_skills: raw.required_skills,
            preferred_skills: raw.preferred_skills,
            posted_date: non_blank(raw.posted_date),
            experience_required: raw.experience.unwrap_or_default(),
            salary_range: non_blank(raw.salary_range),
            source: non_blank(raw.source).unwrap_or_else(|| default_source.to_string()),
            start_date_flexible: raw.start_date_flexible.unwrap_or(true),
            relevance_score: 0.0,
            title,
            company,
            location,
        })
    }

    /// Skills the posting asks for, required first
    pub fn all_skills(&self) -> impl Iterator<Item = &String> {
        self.required_skills.iter().chain(self.preferred_skills.iter())
    }
}
