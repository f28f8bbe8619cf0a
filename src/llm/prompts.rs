//! Prompt templates for enrichment, tailoring and cover letters

/// Fill `{name}` placeholders in a template
pub fn render(template: &str, params: &[(&str, &str)]) -> String {
    params.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

pub const JSON_ONLY_SYSTEM: &str = "You extract structured data from job postings. Return only valid JSON.";

pub const ENRICH_TEMPLATE: &str = r#"Extract structured information from this job description.
Return ONLY valid JSON with these keys:
- required_skills: list of strings
- preferred_skills: list of strings
- experience_required: string
- joining_date_flexible: boolean (true if no strict joining date or flexible)

Job: {title} at {company}
Description: {description}

JSON only, no markdown:"#;

pub const JD_KEYWORDS_SYSTEM: &str = "You are an expert ATS optimization specialist. Return only valid JSON.";

pub const JD_KEYWORDS_TEMPLATE: &str = r#"Analyze this job description and extract keywords in JSON format.

Job Title: {title}
Company: {company}
Description: {description}

Return ONLY valid JSON with these exact keys:
{
  "must_have_skills": ["list of required/essential skills"],
  "nice_to_have_skills": ["list of preferred/bonus skills"],
  "tools_and_frameworks": ["specific tools, libraries, platforms mentioned"],
  "domain_keywords": ["domain-specific terms, concepts, methodologies"],
  "action_verbs": ["verbs used in the JD like build, deploy, optimize, etc."],
  "ats_keywords": ["top 10 keywords most critical for ATS matching"]
}

JSON only, no explanation:"#;

pub const BULLETS_SYSTEM: &str = "You are an ATS expert resume writer. Never fabricate. Return only valid JSON.";

pub const BULLETS_TEMPLATE: &str = r#"You are an expert resume writer. Rewrite these project bullet points to better align
with the job description.

STRICT RULES:
1. Never fabricate or exaggerate - only rephrase truthfully
2. Use strong action verbs: {action_verbs}
3. Keep quantified metrics (numbers, percentages)
4. Naturally incorporate these keywords where honest: {ats_keywords}
5. Each bullet should be 1-2 sentences max

Job: {title} at {company}
Key JD terms: {must_have}

Current Projects:
{projects}

Return a JSON array of modified bullets, one per project, in the same order.

JSON only:"#;

pub const COVER_LETTER_SYSTEM: &str = r#"You are an expert career coach and professional writer specializing in tech/AI job applications.
Write compelling, concise cover letters that:
- Are 200-280 words (never longer)
- Sound human, not AI-generated
- Lead with specific value, not "I am applying for..."
- Reference the company's actual product/mission
- Highlight 2-3 most relevant projects with metrics
- End with a clear, confident call to action
- Mention availability date naturally
Avoid: generic phrases, excessive praise, "I believe", "I am passionate about""#;

pub const COVER_LETTER_TEMPLATE: &str = r#"Write a cover letter for this application:

CANDIDATE: {name}
EMAIL: {email}
LINKEDIN: {linkedin}
GITHUB: {github}
AVAILABLE FROM: {available_from}

JOB: {title}
COMPANY: {company}
WORK MODE: {work_mode}
LOCATION: {location}

JOB DESCRIPTION SUMMARY:
{jd_summary}

KEY REQUIRED SKILLS (to highlight naturally):
{required_skills}

CANDIDATE'S STRONGEST RELEVANT PROJECTS:
{top_projects}

CANDIDATE'S RELEVANT SKILLS:
{relevant_skills}

TONE: Professional, confident, concise. No fluff.
FORMAT: 3 paragraphs max. Opening, then value and projects, then a closing call to action.
No "Dear Hiring Manager" intro - start with the hook directly.

Write the cover letter:"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let out = render("{a} and {a} then {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and x then y");
    }

    #[test]
    fn test_unknown_placeholders_survive() {
        let out = render("{known} {unknown}", &[("known", "k")]);
        assert_eq!(out, "k {unknown}");
    }

    #[test]
    fn test_keyword_template_keeps_json_braces() {
        let out = render(
            JD_KEYWORDS_TEMPLATE,
            &[("title", "ML Intern"), ("company", "Acme"), ("description", "Build RAG")],
        );
        assert!(out.contains("Job Title: ML Intern"));
        assert!(out.contains("\"ats_keywords\""));
        assert!(out.starts_with("Analyze"));
    }

    #[test]
    fn test_cover_letter_template_fields() {
        let out = render(COVER_LETTER_TEMPLATE, &[("name", "Asha"), ("available_from", "June 2025")]);
        assert!(out.contains("CANDIDATE: Asha"));
        assert!(out.contains("AVAILABLE FROM: June 2025"));
    }
}
