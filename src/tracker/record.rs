//! One tracked application per selected posting

use crate::discovery::Posting;
use crate::tailoring::ResumeVersion;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Discovered,
    Applied,
    #[serde(rename = "Followed Up")]
    FollowedUp,
    Interview,
    Rejected,
    Offered,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Discovered,
        ApplicationStatus::Applied,
        ApplicationStatus::FollowedUp,
        ApplicationStatus::Interview,
        ApplicationStatus::Rejected,
        ApplicationStatus::Offered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Discovered => "Discovered",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::FollowedUp => "Followed Up",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Offered => "Offered",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CSV row; column order follows field order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub job_id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub work_mode: String,
    pub job_url: String,
    pub match_score: String,
    pub applied: bool,
    pub resume_version_id: String,
    pub applied_date: Option<String>,
    pub follow_up_date: Option<String>,
    pub status: ApplicationStatus,
    pub source: String,
    pub notes: String,
}

impl ApplicationRecord {
    pub fn new(
        posting: &Posting,
        version: Option<&ResumeVersion>,
        today: NaiveDate,
        follow_up_days: i64,
    ) -> Self {
        let follow_up = today + Duration::days(follow_up_days);
        let notes = version
            .map(|v| format!("Match: {:.1}% | ATS: {:.1}%", posting.relevance_score, v.ats_score))
            .unwrap_or_default();

        Self {
            job_id: posting.id.clone(),
            company: posting.company.clone(),
            role: posting.title.clone(),
            location: posting.location.clone(),
            work_mode: posting.work_mode.to_string(),
            job_url: posting.url.clone(),
            match_score: format!("{:.1}%", posting.relevance_score),
            applied: false,
            resume_version_id: version.map(|v| v.version_id.clone()).unwrap_or_default(),
            applied_date: None,
            follow_up_date: Some(follow_up.format("%Y-%m-%d").to_string()),
            status: ApplicationStatus::Discovered,
            source: posting.source.clone(),
            notes,
        }
    }
}
