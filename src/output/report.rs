//! Markdown run report

use crate::discovery::Posting;
use crate::error::{JobHunterError, Result};
use crate::letters::CoverLetter;
use crate::tailoring::ResumeVersion;
use askama::Template;
use chrono::NaiveDateTime;
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Askama template for the Markdown report
#[derive(Template)]
#[template(
    source = r#"# Job Hunter Run Report
Generated: {{ generated_at }}
Total qualifying jobs processed: {{ jobs.len() }}

---
{% for job in jobs %}
## Job {{ loop.index }}: {{ job.title }}

### Job Summary
- **Role:** {{ job.title }}
- **Company:** {{ job.company }}
- **Location:** {{ job.location }}
- **Work Mode:** {{ job.work_mode }}
- **Match Score:** {{ job.match_score }}
- **Source:** {{ job.source }}
- **URL:** {{ job.url }}
- **Required Skills:** {{ job.required_skills }}
{% if job.has_resume %}
### Resume Changes
- **ATS Score:** {{ job.ats_score }}
- **Version ID:** {{ job.version_id }}
- **Skills Reordered:** {{ job.skills_reordered }}
- **Keywords Added:** {{ job.keywords_added }}
- **Bullets Modified:** {{ job.bullets_modified }} project bullets rewritten
{% endif %}{% if job.has_letter %}
### Cover Letter
*({{ job.letter_words }} words)*

{{ job.letter }}
{% endif %}
---
{% endfor %}"#,
    ext = "md",
    escape = "none"
)]
struct ReportTemplate {
    generated_at: String,
    jobs: Vec<ReportJob>,
}

/// Pre-formatted fields for one posting
struct ReportJob {
    title: String,
    company: String,
    location: String,
    work_mode: String,
    match_score: String,
    source: String,
    url: String,
    required_skills: String,
    has_resume: bool,
    ats_score: String,
    version_id: String,
    skills_reordered: String,
    keywords_added: String,
    bullets_modified: usize,
    has_letter: bool,
    letter_words: usize,
    letter: String,
}

impl ReportJob {
    fn new(posting: &Posting, version: Option<&ResumeVersion>, letter: Option<&CoverLetter>) -> Self {
        let required_skills = posting
            .required_skills
            .iter()
            .take(8)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        let mut job = Self {
            title: posting.title.clone(),
            company: posting.company.clone(),
            location: posting.location.clone(),
            work_mode: posting.work_mode.to_string(),
            match_score: format!("{:.1}%", posting.relevance_score),
            source: posting.source.clone(),
            url: posting.url.clone(),
            required_skills,
            has_resume: false,
            ats_score: String::new(),
            version_id: String::new(),
            skills_reordered: String::new(),
            keywords_added: String::new(),
            bullets_modified: 0,
            has_letter: false,
            letter_words: 0,
            letter: String::new(),
        };

        if let Some(version) = version {
            job.has_resume = true;
            job.ats_score = format!("{:.1}%", version.ats_score);
            job.version_id = version.version_id.clone();
            job.skills_reordered = version.skills_reordered.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
            job.keywords_added = if version.keywords_added.is_empty() {
                "None needed".to_string()
            } else {
                version.keywords_added.join(", ")
            };
            job.bullets_modified = version.bullets_modified.len();
        }

        if let Some(letter) = letter {
            job.has_letter = true;
            job.letter_words = letter.word_count;
            job.letter = letter.content.clone();
        }
        job
    }
}

/// Render the report for the selected postings, joined to their outputs by job id
pub fn render_report(
    postings: &[Posting],
    versions: &[ResumeVersion],
    letters: &[CoverLetter],
    generated_at: NaiveDateTime,
) -> Result<String> {
    let versions: HashMap<&str, &ResumeVersion> = versions.iter().map(|v| (v.job_id.as_str(), v)).collect();
    let letters: HashMap<&str, &CoverLetter> = letters.iter().map(|l| (l.job_id.as_str(), l)).collect();

    let template = ReportTemplate {
        generated_at: generated_at.format("%Y-%m-%d %H:%M").to_string(),
        jobs: postings
            .iter()
            .map(|p| {
                ReportJob::new(
                    p,
                    versions.get(p.id.as_str()).copied(),
                    letters.get(p.id.as_str()).copied(),
                )
            })
            .collect(),
    };

    template
        .render()
        .map_err(|e| JobHunterError::OutputFormatting(format!("Report template failed: {}", e)))
}

pub fn report_path(output_dir: &Path, generated_at: NaiveDateTime) -> PathBuf {
    output_dir.join(format!("job_hunt_report_{}.md", generated_at.format("%Y%m%d_%H%M")))
}

/// Render and write the report, returning its path
pub fn save_report(
    output_dir: &Path,
    postings: &[Posting],
    versions: &[ResumeVersion],
    letters: &[CoverLetter],
    generated_at: NaiveDateTime,
) -> Result<PathBuf> {
    let content = render_report(postings, versions, letters, generated_at)?;
    std::fs::create_dir_all(output_dir)?;
    let path = report_path(output_dir, generated_at);
    std::fs::write(&path, content)?;
    info!("Report saved: {}", path.display());
    Ok(path)
}
