//! Cover letter generation

use crate::discovery::Posting;
use crate::error::Result;
use crate::llm::prompts::{render, COVER_LETTER_SYSTEM, COVER_LETTER_TEMPLATE};
use crate::llm::TextGenerator;
use crate::tailoring::{BaseResume, Project};
use log::info;
use serde::{Deserialize, Serialize};

const TOP_PROJECTS: usize = 2;
const MAX_RELEVANT_SKILLS: usize = 12;
const MAX_REQUIRED_SKILLS: usize = 10;
const PROJECT_DESCRIPTION_CHARS: usize = 120;
const JD_SUMMARY_CHARS: usize = 800;
const AGENTIC_TERMS: [&str; 4] = ["langgraph", "agent", "rag", "langchain"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub job_id: String,
    pub content: String,
    pub word_count: usize,
}

fn project_relevance(project: &Project, posting: &Posting) -> u32 {
    let tech = project.tech.join(" ").to_lowercase();
    let description = project.description.to_lowercase();

    let mut score = posting
        .required_skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| tech.contains(s.as_str()) || description.contains(s.as_str()))
        .count() as u32
        * 2;
    if AGENTIC_TERMS.iter().any(|t| tech.contains(t)) {
        score += 3;
    }
    score
}

/// The two projects closest to the posting, ties in resume order
pub fn top_projects<'a>(posting: &Posting, resume: &'a BaseResume) -> Vec<&'a Project> {
    let mut scored: Vec<(u32, &Project)> = resume
        .projects
        .iter()
        .map(|p| (project_relevance(p, posting), p))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(TOP_PROJECTS).map(|(_, p)| p).collect()
}

pub fn format_project(project: &Project) -> String {
    let description: String = project.description.chars().take(PROJECT_DESCRIPTION_CHARS).collect();
    let metrics = project.metrics.iter().take(2).cloned().collect::<Vec<_>>().join(" | ");
    format!("• {}: {}... [{}]", project.name, description, metrics)
}

/// Candidate skills that contain one of the required skills, else the first twelve
pub fn relevant_skills(posting: &Posting, resume: &BaseResume) -> Vec<String> {
    let required: Vec<String> = posting
        .required_skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let relevant: Vec<String> = resume
        .all_skills()
        .filter(|skill| {
            let skill = skill.to_lowercase();
            required.iter().any(|r| skill.contains(r.as_str()))
        })
        .take(MAX_RELEVANT_SKILLS)
        .cloned()
        .collect();

    if relevant.is_empty() {
        resume.all_skills().take(MAX_RELEVANT_SKILLS).cloned().collect()
    } else {
        relevant
    }
}

pub fn cover_letter_prompt(posting: &Posting, resume: &BaseResume) -> String {
    let header = &resume.header;
    let jd_summary = if posting.description.trim().is_empty() {
        format!("{} role", posting.title)
    } else {
        posting.description.chars().take(JD_SUMMARY_CHARS).collect()
    };
    let required = posting
        .required_skills
        .iter()
        .take(MAX_REQUIRED_SKILLS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    let projects = top_projects(posting, resume)
        .into_iter()
        .map(format_project)
        .collect::<Vec<_>>()
        .join("\n");
    let skills = relevant_skills(posting, resume).join(", ");
    let work_mode = posting.work_mode.to_string();

    render(
        COVER_LETTER_TEMPLATE,
        &[
            ("name", header.name.as_str()),
            ("email", header.email.as_str()),
            ("linkedin", header.linkedin.as_str()),
            ("github", header.github.as_str()),
            ("available_from", header.available_from.as_str()),
            ("title", posting.title.as_str()),
            ("company", posting.company.as_str()),
            ("work_mode", work_mode.as_str()),
            ("location", posting.location.as_str()),
            ("jd_summary", jd_summary.as_str()),
            ("required_skills", required.as_str()),
            ("top_projects", projects.as_str()),
            ("relevant_skills", skills.as_str()),
        ],
    )
}

/// Write a letter against the resume version prepared for this posting
pub async fn write_cover_letter(
    posting: &Posting,
    resume: &BaseResume,
    generator: &dyn TextGenerator,
) -> Result<CoverLetter> {
    let prompt = cover_letter_prompt(posting, resume);
    let content = generator.generate(&prompt, Some(COVER_LETTER_SYSTEM)).await?;
    let content = content.trim().to_string();
    let word_count = content.split_whitespace().count();

    info!("Cover letter: {} words | {} @ {}", word_count, posting.title, posting.company);
    Ok(CoverLetter {
        job_id: posting.id.clone(),
        content,
        word_count,
    })
}
