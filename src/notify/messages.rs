//! Operator-facing message texts

use crate::discovery::Posting;
use crate::letters::CoverLetter;
use crate::pipeline::RunSummary;
use crate::tailoring::ResumeVersion;

const TOP_MATCHES: usize = 5;
const LETTER_PREVIEW_CHARS: usize = 600;

pub fn summary_message(summary: &RunSummary, selected: &[Posting], run_times: &[String]) -> String {
    let mut lines = vec![
        "Job Hunter: new jobs found".to_string(),
        String::new(),
        format!("Time: {}", summary.timestamp.format("%d %b %Y, %I:%M %p")),
        format!("Jobs discovered: {}", summary.discovered),
        format!("Qualifying jobs (>= {}%): {}", summary.threshold, summary.qualifying),
        format!("Resumes tailored: {}", summary.resume_versions),
        format!("Cover letters: {}", summary.cover_letters),
        String::new(),
        "Top matches:".to_string(),
    ];

    for (i, posting) in selected.iter().take(TOP_MATCHES).enumerate() {
        lines.push(format!(
            "{}. {} @ {}\n   {} | {}\n   Match: {:.0}%\n   {}",
            i + 1,
            posting.title,
            posting.company,
            posting.location,
            posting.work_mode,
            posting.relevance_score,
            posting.url
        ));
    }
    if selected.len() > TOP_MATCHES {
        lines.push(format!("...and {} more in the tracker", selected.len() - TOP_MATCHES));
    }
    if !run_times.is_empty() {
        lines.push(String::new());
        lines.push(format!("Scheduled runs: {}", run_times.join(" | ")));
    }
    lines.join("\n")
}

pub fn detail_message(
    index: usize,
    posting: &Posting,
    version: Option<&ResumeVersion>,
    letter: Option<&CoverLetter>,
) -> String {
    let skills = posting.required_skills.iter().take(6).cloned().collect::<Vec<_>>().join(", ");
    let mut lines = vec![
        format!("Job #{}: {}", index, posting.title),
        String::new(),
        format!("Company: {}", posting.company),
        format!("Location: {} ({})", posting.location, posting.work_mode),
        format!("Match score: {:.1}%", posting.relevance_score),
        format!("Apply: {}", posting.url),
        format!("Skills required: {}", if skills.is_empty() { "See JD".to_string() } else { skills }),
    ];

    if let Some(version) = version {
        let added = if version.keywords_added.is_empty() {
            "None needed".to_string()
        } else {
            version.keywords_added.join(", ")
        };
        lines.push(String::new());
        lines.push("Resume optimization:".to_string());
        lines.push(format!("  ATS score: {:.1}%", version.ats_score));
        lines.push(format!("  Version: {}", version.version_id));
        lines.push(format!("  Keywords added: {}", added));
        lines.push(format!(
            "  Skills reordered: {}",
            version.skills_reordered.iter().take(4).cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    if let Some(letter) = letter {
        let mut preview: String = letter.content.chars().take(LETTER_PREVIEW_CHARS).collect();
        if letter.content.chars().count() > LETTER_PREVIEW_CHARS {
            preview.push_str("...");
        }
        lines.push(String::new());
        lines.push("Cover letter preview:".to_string());
        lines.push(preview);
    }
    lines.join("\n")
}

pub fn no_jobs_message(threshold: f64) -> String {
    format!(
        "Job Hunter\n\nNo qualifying jobs found in this run.\n\nTry:\n\
         - Lowering scoring.min_relevance_score (currently {})\n\
         - Adding more search queries\n\
         - Running again in a few hours",
        threshold
    )
}
