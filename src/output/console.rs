//! Terminal presentation for runs, score tables and tracker status

use crate::discovery::Posting;
use crate::pipeline::{RunContext, RunSummary};
use crate::scoring::ScoredPosting;
use crate::tracker::ApplicationStatus;
use colored::{Color, Colorize};
use std::collections::BTreeMap;
use std::path::Path;

const TITLE_WIDTH: usize = 34;
const COMPANY_WIDTH: usize = 18;

pub struct ConsoleFormatter {
    use_colors: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".blue().bold(), title.blue().bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }

    fn score_badge(&self, score: f64, threshold: f64) -> String {
        let (badge, color) = if score >= threshold + 20.0 {
            ("STRONG", Color::Green)
        } else if score >= threshold {
            ("MATCH", Color::BrightGreen)
        } else if score >= threshold - 10.0 {
            ("CLOSE", Color::Yellow)
        } else {
            ("LOW", Color::BrightBlack)
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    pub fn banner(&self, queries: &[String], threshold: f64, dry_run: bool) -> String {
        let mut output = self.header("🎯 JOB HUNTER");
        output.push_str(&format!("Queries: {}\n", queries.join(", ")));
        output.push_str(&format!("Minimum relevance: {:.1}%\n", threshold));
        if dry_run {
            output.push_str(&self.colorize("Dry run: discovery and scoring only\n", Color::Yellow));
        }
        output
    }

    /// Ranked postings with their component scores, then any disqualified ones
    pub fn score_table(&self, ranked: &[ScoredPosting], disqualified: &[Posting], threshold: f64) -> String {
        let mut output = self.header("📊 RELEVANCE SCORES");

        if ranked.is_empty() && disqualified.is_empty() {
            output.push_str("No postings to score.\n");
            return output;
        }

        output.push_str(&format!(
            "{:>6}  {:<tw$}  {:<cw$}  {:>5} {:>5} {:>5} {:>5} {:>5}\n",
            "Score",
            "Title",
            "Company",
            "Skill",
            "Exp",
            "Tech",
            "Comp",
            "Sem",
            tw = TITLE_WIDTH,
            cw = COMPANY_WIDTH
        ));
        for scored in ranked {
            let b = &scored.breakdown;
            let semantic = b.semantic.map(|s| format!("{:.1}", s)).unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:>6.1}  {:<tw$}  {:<cw$}  {:>5.1} {:>5.1} {:>5.1} {:>5.1} {:>5}  {}\n",
                b.final_score,
                clip(&scored.posting.title, TITLE_WIDTH),
                clip(&scored.posting.company, COMPANY_WIDTH),
                b.skill,
                b.experience,
                b.tech,
                b.company,
                semantic,
                self.score_badge(b.final_score, threshold),
                tw = TITLE_WIDTH,
                cw = COMPANY_WIDTH
            ));
        }

        for posting in disqualified {
            output.push_str(&format!(
                "{:>6}  {:<tw$}  {:<cw$}  {}\n",
                "-",
                clip(&posting.title, TITLE_WIDTH),
                clip(&posting.company, COMPANY_WIDTH),
                self.colorize("DISQUALIFIED", Color::Red),
                tw = TITLE_WIDTH,
                cw = COMPANY_WIDTH
            ));
        }

        let qualifying = ranked.iter().filter(|s| s.breakdown.final_score >= threshold).count();
        output.push_str(&format!(
            "\n{} of {} scored postings clear {:.1}%\n",
            qualifying,
            ranked.len(),
            threshold
        ));
        output
    }

    /// Postings that cleared the threshold, for dry runs
    pub fn selection(&self, ctx: &RunContext) -> String {
        let mut output = self.header("✅ SELECTED POSTINGS");
        if ctx.selected.is_empty() {
            output.push_str(&format!("No postings scored at least {:.1}%.\n", ctx.threshold));
            return output;
        }
        for (i, posting) in ctx.selected.iter().enumerate() {
            output.push_str(&format!(
                "{}. {} @ {} ({:.1}%)\n   {} | {}\n",
                i + 1,
                self.colorize(&posting.title, Color::Cyan),
                posting.company,
                posting.relevance_score,
                posting.work_mode,
                posting.url
            ));
        }
        output
    }

    pub fn run_summary(&self, summary: &RunSummary, errors: &[String]) -> String {
        let mut output = self.header("📋 RUN SUMMARY");
        let rows = [
            ("Discovered", summary.discovered.to_string()),
            ("Scored", summary.scored.to_string()),
            ("Disqualified", summary.disqualified.to_string()),
            (
                "Qualifying",
                format!("{} (>= {:.1}%)", summary.qualifying, summary.threshold),
            ),
            ("Resume versions", summary.resume_versions.to_string()),
            ("Cover letters", summary.cover_letters.to_string()),
            (
                "Tracker",
                summary.tracker_location.clone().unwrap_or_else(|| "not updated".to_string()),
            ),
            (
                "Report",
                summary
                    .report_path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "not written".to_string()),
            ),
            ("Started", summary.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        ];
        for (label, value) in rows {
            output.push_str(&format!("  {:<16} {}\n", label, value));
        }

        if errors.is_empty() {
            output.push_str(&self.colorize("  No errors\n", Color::Green));
        } else {
            output.push_str(&self.colorize(&format!("  Errors ({}):\n", errors.len()), Color::Red));
            for error in errors {
                output.push_str(&format!("    • {}\n", error));
            }
        }
        output
    }

    pub fn status_counts(&self, counts: &BTreeMap<ApplicationStatus, usize>, csv_path: &Path) -> String {
        let mut output = self.header("🗂️  APPLICATION TRACKER");
        output.push_str(&format!("File: {}\n", csv_path.display()));

        let total: usize = counts.values().sum();
        if total == 0 {
            output.push_str("No applications tracked yet.\n");
            return output;
        }
        for status in ApplicationStatus::ALL {
            let count = counts.get(&status).copied().unwrap_or(0);
            output.push_str(&format!("  {:<12} {}\n", status.as_str(), count));
        }
        output.push_str(&format!("  {:<12} {}\n", "Total", total));
        output
    }
}

/// Cut to `width` characters with an ellipsis
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
