//! Run context threaded through the pipeline stages

use crate::discovery::{DiscoveryStats, Posting};
use crate::letters::CoverLetter;
use crate::scoring::ScoredPosting;
use crate::tailoring::ResumeVersion;
use crate::tracker::ApplicationRecord;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Discovery,
    Scoring,
    Tailoring,
    Letters,
    Tracking,
    Notification,
    Done,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::Discovery => Stage::Scoring,
            Stage::Scoring => Stage::Tailoring,
            Stage::Tailoring => Stage::Letters,
            Stage::Letters => Stage::Tracking,
            Stage::Tracking => Stage::Notification,
            Stage::Notification | Stage::Done => Stage::Done,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovery => "discovery",
            Stage::Scoring => "scoring",
            Stage::Tailoring => "tailoring",
            Stage::Letters => "cover letters",
            Stage::Tracking => "tracking",
            Stage::Notification => "notification",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Everything one run has produced so far. Stages take it by value and
/// hand back the next version; fields written by a stage are never
/// touched by an earlier one.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub stage: Stage,
    pub started_at: NaiveDateTime,
    pub threshold: f64,

    pub discovered: Vec<Posting>,
    pub discovery_stats: DiscoveryStats,

    /// Every posting that survived disqualification, best first
    pub ranked: Vec<ScoredPosting>,
    pub disqualified: usize,
    pub selected: Vec<Posting>,

    pub resume_versions: Vec<ResumeVersion>,
    pub cover_letters: Vec<CoverLetter>,

    pub records: Vec<ApplicationRecord>,
    pub tracker_location: Option<String>,
    pub report_path: Option<PathBuf>,

    pub notifications_sent: usize,
    /// Non-fatal per-item failures, `<Stage>: <job id> - <reason>`
    pub errors: Vec<String>,
}

impl RunContext {
    pub fn new(started_at: NaiveDateTime, threshold: f64) -> Self {
        Self {
            stage: Stage::Discovery,
            started_at,
            threshold,
            discovered: Vec::new(),
            discovery_stats: DiscoveryStats::default(),
            ranked: Vec::new(),
            disqualified: 0,
            selected: Vec::new(),
            resume_versions: Vec::new(),
            cover_letters: Vec::new(),
            records: Vec::new(),
            tracker_location: None,
            report_path: None,
            notifications_sent: 0,
            errors: Vec::new(),
        }
    }

    /// Move on to the following stage
    pub fn advance(mut self) -> Self {
        self.stage = self.stage.next();
        self
    }

    pub fn resume_for(&self, job_id: &str) -> Option<&ResumeVersion> {
        self.resume_versions.iter().find(|v| v.job_id == job_id)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            discovered: self.discovered.len(),
            scored: self.ranked.len(),
            disqualified: self.disqualified,
            qualifying: self.selected.len(),
            threshold: self.threshold,
            resume_versions: self.resume_versions.len(),
            cover_letters: self.cover_letters.len(),
            tracker_location: self.tracker_location.clone(),
            report_path: self.report_path.clone(),
            errors: self.errors.len(),
            timestamp: self.started_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub discovered: usize,
    pub scored: usize,
    pub disqualified: usize,
    pub qualifying: usize,
    pub threshold: f64,
    pub resume_versions: usize,
    pub cover_letters: usize,
    pub tracker_location: Option<String>,
    pub report_path: Option<PathBuf>,
    pub errors: usize,
    pub timestamp: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_stages_are_linear() {
        let mut stage = Stage::Discovery;
        let mut seen = vec![stage];
        while stage != Stage::Done {
            stage = stage.next();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                Stage::Discovery,
                Stage::Scoring,
                Stage::Tailoring,
                Stage::Letters,
                Stage::Tracking,
                Stage::Notification,
                Stage::Done,
            ]
        );
        assert_eq!(Stage::Done.next(), Stage::Done);
    }

    #[test]
    fn test_empty_summary() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let context = RunContext::new(at, 60.0).advance();
        assert_eq!(context.stage, Stage::Scoring);

        let summary = context.summary();
        assert_eq!(summary.discovered, 0);
        assert_eq!(summary.qualifying, 0);
        assert_eq!(summary.timestamp, at);
    }
}
