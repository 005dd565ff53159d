//! Portfolio content served to the frontend
//!
//! The frontend expects its own record shapes, so these are projections of the
//! knowledge base rather than the raw JSON.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::context::title_case;
use super::ResumeFacts;

const DEFAULT_TITLE: &str = "Full Stack Developer";
const DEFAULT_BIO: &str = "A passionate Full Stack Developer who builds web applications with React.js and the libraries and frameworks around it.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub github_url: String,
    pub live_url: String,
    pub image_url: String,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    pub category: String,
    pub proficiency: String,
}

/// Errors from a content backend
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Content backend unavailable: {0}")]
    Unavailable(String),
}

/// Read-only source of the portfolio sections shown on the website
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_profile(&self) -> Result<ProfileRecord, ContentError>;

    async fn get_experiences(&self) -> Result<Vec<ExperienceRecord>, ContentError>;

    async fn get_projects(&self) -> Result<Vec<ProjectRecord>, ContentError>;

    async fn get_skills(&self) -> Result<Vec<SkillRecord>, ContentError>;
}

/// Content store backed by the in-memory knowledge base
pub struct JsonContentStore {
    facts: Arc<ResumeFacts>,
}

impl JsonContentStore {
    pub fn new(facts: Arc<ResumeFacts>) -> Self {
        Self { facts }
    }

    pub fn profile(&self) -> ProfileRecord {
        let p = &self.facts.personal_info;
        ProfileRecord {
            name: p.name.clone().unwrap_or_default(),
            title: p.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            bio: p.summary.clone().unwrap_or_else(|| DEFAULT_BIO.to_string()),
            email: p.email.clone().unwrap_or_default(),
            phone: p.phone.clone().unwrap_or_default(),
            location: p.location.clone().unwrap_or_default(),
            linkedin: p.linkedin.clone().unwrap_or_default(),
            github: p.github.clone().unwrap_or_default(),
        }
    }

    pub fn experiences(&self) -> Vec<ExperienceRecord> {
        self.facts
            .internship
            .iter()
            .filter(|internship| !internship.is_empty())
            .map(|internship| ExperienceRecord {
                company: internship.company.clone().unwrap_or_default(),
                position: internship.role.clone().unwrap_or_default(),
                location: internship.location.clone().unwrap_or_default(),
                start_date: internship.start_date.clone(),
                end_date: internship.end_date.clone(),
                description: internship.responsibilities.join("\n"),
                technologies: internship.technologies_used.clone(),
            })
            .collect()
    }

    pub fn projects(&self) -> Vec<ProjectRecord> {
        self.facts
            .projects
            .iter()
            .map(|project| ProjectRecord {
                title: project.name.clone().unwrap_or_default(),
                description: project.description.clone().unwrap_or_default(),
                technologies: project.technologies.clone(),
                github_url: project.github_url.clone().unwrap_or_default(),
                live_url: project.live_url.clone().unwrap_or_default(),
                image_url: project.image_url.clone().unwrap_or_default(),
                featured: true,
            })
            .collect()
    }

    pub fn skills(&self) -> Vec<SkillRecord> {
        self.facts
            .technical_skills
            .iter()
            .flat_map(|(key, names)| {
                let category = category_label(key);
                let proficiency = if key == "programming_languages" {
                    "Advanced"
                } else {
                    "Intermediate"
                };
                names.iter().map(move |name| SkillRecord {
                    name: name.clone(),
                    category: category.clone(),
                    proficiency: proficiency.to_string(),
                })
            })
            .collect()
    }
}

fn category_label(key: &str) -> String {
    match key {
        "programming_languages" => "Programming Languages".to_string(),
        "web_technologies" => "Web Technologies".to_string(),
        "databases" => "Databases".to_string(),
        "soft_skills" => "Soft Skills".to_string(),
        other => title_case(other),
    }
}

#[async_trait]
impl ContentStore for JsonContentStore {
    async fn get_profile(&self) -> Result<ProfileRecord, ContentError> {
        Ok(self.profile())
    }

    async fn get_experiences(&self) -> Result<Vec<ExperienceRecord>, ContentError> {
        Ok(self.experiences())
    }

    async fn get_projects(&self) -> Result<Vec<ProjectRecord>, ContentError> {
        Ok(self.projects())
    }

    async fn get_skills(&self) -> Result<Vec<SkillRecord>, ContentError> {
        Ok(self.skills())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::Internship;

    fn store(json: &str) -> JsonContentStore {
        JsonContentStore::new(Arc::new(ResumeFacts::from_json_str(json).unwrap()))
    }

    #[test]
    fn test_profile_defaults() {
        let profile = store(r#"{ "personal_info": { "name": "Ada" } }"#).profile();

        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.title, DEFAULT_TITLE);
        assert_eq!(profile.bio, DEFAULT_BIO);
        assert_eq!(profile.email, "");
    }

    #[test]
    fn test_internship_becomes_single_experience() {
        let store = store(
            r#"{
                "internship": {
                    "company": "Acme",
                    "role": "Intern",
                    "responsibilities": ["Built APIs", "Wrote tests"],
                    "technologies_used": ["Rust"]
                }
            }"#,
        );

        let experiences = store.experiences();
        assert_eq!(experiences.len(), 1);
        assert_eq!(experiences[0].position, "Intern");
        assert_eq!(experiences[0].description, "Built APIs\nWrote tests");
        assert_eq!(experiences[0].technologies, vec!["Rust"]);

        assert!(self::store("{}").experiences().is_empty());
    }

    #[test]
    fn test_empty_internship_has_no_experience() {
        assert!(store(r#"{ "internship": {} }"#).experiences().is_empty());

        let facts = ResumeFacts {
            internship: Some(Internship::default()),
            ..Default::default()
        };
        assert!(JsonContentStore::new(Arc::new(facts)).experiences().is_empty());
    }

    #[test]
    fn test_projects_are_featured() {
        let projects = store(r#"{ "projects": [{ "name": "Widget", "technologies": ["Go"] }] }"#)
            .projects();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Widget");
        assert!(projects[0].featured);
        assert_eq!(projects[0].live_url, "");
    }

    #[test]
    fn test_skills_flatten_with_proficiency() {
        let skills = store(
            r#"{
                "technical_skills": {
                    "programming_languages": ["Rust", "Go"],
                    "cloud_platforms": ["AWS"]
                }
            }"#,
        )
        .skills();

        assert_eq!(skills.len(), 3);
        assert_eq!(skills[0].category, "Programming Languages");
        assert_eq!(skills[0].proficiency, "Advanced");
        assert_eq!(skills[1].name, "Go");
        assert_eq!(skills[2].category, "Cloud Platforms");
        assert_eq!(skills[2].proficiency, "Intermediate");
    }
}
