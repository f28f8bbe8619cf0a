//! Structured base resume the tailoring stage rewrites per posting

use crate::config::Config;
use crate::error::{JobHunterError, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeHeader {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub location: String,
    pub available_from: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub tech: Vec<String>,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub cgpa: String,
    pub relevant_courses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseResume {
    pub header: ResumeHeader,
    pub summary: String,
    pub technical_skills: SkillCategories,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub certifications: Vec<String>,
    pub achievements: Vec<String>,
}

/// Skill categories in file order, serialised as a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillCategories(pub Vec<(String, Vec<String>)>);

impl Serialize for SkillCategories {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, skills) in &self.0 {
            map.serialize_entry(category, skills)?;
        }
        map.end()
    }
}

struct CategoriesVisitor;

impl<'de> Visitor<'de> for CategoriesVisitor {
    type Value = SkillCategories;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of category name to skill list")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut categories = Vec::new();
        while let Some((category, skills)) = access.next_entry::<String, Vec<String>>()? {
            categories.push((category, skills));
        }
        Ok(SkillCategories(categories))
    }
}

impl<'de> Deserialize<'de> for SkillCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(CategoriesVisitor)
    }
}

impl BaseResume {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            JobHunterError::InvalidInput(format!("Invalid base resume {}: {}", path.display(), e))
        })
    }

    /// The configured base resume, or one assembled from the candidate section
    pub fn load_or_synthesise(config: &Config) -> Result<Self> {
        match &config.candidate.base_resume_path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_config(config)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let candidate = &config.candidate;
        let skills: Vec<(String, Vec<String>)> = candidate
            .skill_groups
            .iter()
            .map(|group| (group.name.clone(), group.skills.clone()))
            .collect();

        Self {
            header: ResumeHeader {
                name: candidate.name.clone(),
                email: candidate.email.clone(),
                phone: candidate.phone.clone(),
                linkedin: candidate.linkedin.clone(),
                github: candidate.github.clone(),
                portfolio: String::new(),
                location: candidate.location.clone(),
                available_from: candidate.available_from.clone(),
            },
            summary: format!(
                "{} with hands-on experience in {}.",
                candidate.status,
                config.flat_skills().into_iter().take(6).collect::<Vec<_>>().join(", ")
            ),
            technical_skills: SkillCategories(skills),
            ..Default::default()
        }
    }

    /// All skills across categories, in order
    pub fn all_skills(&self) -> impl Iterator<Item = &String> {
        self.technical_skills.0.iter().flat_map(|(_, skills)| skills.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "header": {"name": "Asha Rao", "email": "asha@example.com"},
        "summary": "ML student",
        "technical_skills": {"Languages": ["Python", "SQL"], "GenAI": ["LangChain", "RAG"]},
        "projects": [{"name": "DocQA", "description": "RAG over PDFs", "tech": ["LangChain"], "metrics": ["90% recall"]}]
    }"#;

    #[test]
    fn test_categories_keep_file_order() {
        let resume: BaseResume = serde_json::from_str(SAMPLE).unwrap();
        let names: Vec<&str> = resume.technical_skills.0.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Languages", "GenAI"]);
        assert_eq!(resume.all_skills().count(), 4);
        assert_eq!(resume.projects[0].metrics, vec!["90% recall"]);
    }

    #[test]
    fn test_from_file_and_invalid_json() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("resume.json");
        std::fs::write(&good, SAMPLE).unwrap();
        assert_eq!(BaseResume::from_file(&good).unwrap().header.name, "Asha Rao");

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ nope").unwrap();
        assert!(matches!(
            BaseResume::from_file(&bad),
            Err(JobHunterError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_synthesised_from_config() {
        let config = Config::default();
        let resume = BaseResume::load_or_synthesise(&config).unwrap();
        assert_eq!(resume.header.name, config.candidate.name);
        assert_eq!(resume.all_skills().count(), config.flat_skills().len());
        assert!(resume.projects.is_empty());
    }
}
