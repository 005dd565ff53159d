//! Resume knowledge base
//!
//! The structured facts every chat reply is grounded on. They are read once at
//! startup from a JSON file and shared read-only for the life of the process.
//!
//! # Example Knowledge File
//!
//! ```json
//! {
//!   "personal_info": { "name": "Ada", "email": "ada@example.com" },
//!   "projects": [{ "name": "Widget", "technologies": ["Go"] }],
//!   "technical_skills": { "programming_languages": ["Rust", "Go"] },
//!   "faq_responses": { "why_hire_me": "..." }
//! }
//! ```

mod content;
mod context;

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

pub use content::{
    ContentError, ContentStore, ExperienceRecord, JsonContentStore, ProfileRecord, ProjectRecord,
    SkillRecord,
};
pub use context::{render_context, EMPTY_CONTEXT};

/// Everything the assistant knows about the portfolio owner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFacts {
    #[serde(default)]
    pub personal_info: PersonalInfo,

    #[serde(default)]
    pub education: Education,

    #[serde(default)]
    pub projects: Vec<Project>,

    /// An empty `{}` object counts as no internship
    #[serde(default, deserialize_with = "non_empty_internship")]
    pub internship: Option<Internship>,

    /// Skill category key (e.g. `programming_languages`) to skill names
    #[serde(default, deserialize_with = "lenient_skill_map")]
    pub technical_skills: IndexMap<String, Vec<String>>,

    #[serde(default)]
    pub certifications: Vec<Certification>,

    #[serde(default)]
    pub domain_expertise: Vec<String>,

    #[serde(default)]
    pub key_strengths: Vec<String>,

    /// FAQ key (e.g. `why_hire_me`) to a canned answer
    #[serde(default, deserialize_with = "lenient_text_map")]
    pub faq_responses: IndexMap<String, String>,
}

impl ResumeFacts {
    /// Parse facts from a JSON document
    pub fn from_json_str(content: &str) -> Result<Self, ResumeError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load facts from a JSON file
    ///
    /// A missing, malformed or empty file is not fatal: the service still
    /// answers, just without any resume context. This is the one place that
    /// condition is logged.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(facts) if facts.is_empty() => {
                tracing::warn!(path = %path.display(), "Resume knowledge file is empty, continuing with empty context");
                facts
            }
            Ok(facts) => {
                tracing::info!(
                    path = %path.display(),
                    projects = facts.projects.len(),
                    "Loaded resume knowledge base"
                );
                facts
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Resume knowledge unavailable, continuing with empty context");
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, ResumeError> {
        if !path.exists() {
            return Err(ResumeError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// True when there is nothing at all to tell the model
    pub fn is_empty(&self) -> bool {
        self.personal_info.is_empty()
            && self.education.is_empty()
            && self.projects.is_empty()
            && self.internship.as_ref().map_or(true, Internship::is_empty)
            && self.technical_skills.is_empty()
            && self.certifications.is_empty()
            && self.domain_expertise.is_empty()
            && self.key_strengths.is_empty()
            && self.faq_responses.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl PersonalInfo {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub current: Option<CurrentEducation>,
    #[serde(default)]
    pub hsc: Option<SchoolRecord>,
    #[serde(default)]
    pub sslc: Option<SchoolRecord>,
}

impl Education {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.hsc.is_none() && self.sslc.is_none()
    }
}

/// The degree currently being pursued
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentEducation {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cgpa: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub upto_semester: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub expected_graduation: Option<String>,
}

/// A prior qualification tier (higher secondary, secondary)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub percentage: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Internship {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub technologies_used: Vec<String>,
}

impl Internship {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
}

/// Accept `"2024"`, `2024` or `8.6` for fields that are free text in practice
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn non_empty_internship<'de, D>(deserializer: D) -> Result<Option<Internship>, D::Error>
where
    D: Deserializer<'de>,
{
    let internship = Option::<Internship>::deserialize(deserializer)?;
    Ok(internship.filter(|i| !i.is_empty()))
}

/// Keep the categories whose value is a list, and the string entries in each
///
/// A stray `"summary": "..."` next to the skill lists must not cost the whole
/// knowledge base.
fn lenient_skill_map<'de, D>(deserializer: D) -> Result<IndexMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IndexMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(category, value)| match value {
            serde_json::Value::Array(items) => {
                let skills: Vec<String> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect();
                Some((category, skills))
            }
            _ => {
                tracing::warn!(category = %category, "Skipping skill category that is not a list");
                None
            }
        })
        .collect())
}

/// Keep only the entries whose value is a string
fn lenient_text_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IndexMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(answer) => Some((key, answer)),
            _ => {
                tracing::warn!(key = %key, "Skipping FAQ entry that is not text");
                None
            }
        })
        .collect())
}

/// Errors from loading the knowledge base
#[derive(Debug, thiserror::Error)]
pub enum ResumeError {
    #[error("Resume knowledge file not found at {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "personal_info": { "name": "Ada", "email": "ada@example.com" },
        "education": {
            "current": { "degree": "B.E. CSE", "cgpa": 8.6, "upto_semester": 5 },
            "hsc": { "year": 2021, "percentage": "92%", "institution": "City School" }
        },
        "projects": [
            { "name": "Widget", "type": "Web App", "technologies": ["Go"] }
        ],
        "technical_skills": {
            "web_technologies": ["React"],
            "programming_languages": ["Rust", "Go"]
        },
        "faq_responses": { "why_hire_me": "Because.", "availability": "Now." }
    }"#;

    #[test]
    fn test_parse_knowledge_file() {
        let facts = ResumeFacts::from_json_str(SAMPLE).unwrap();

        assert_eq!(facts.personal_info.name.as_deref(), Some("Ada"));
        let current = facts.education.current.as_ref().unwrap();
        assert_eq!(current.cgpa.as_deref(), Some("8.6"));
        assert_eq!(current.upto_semester.as_deref(), Some("5"));
        assert_eq!(facts.education.hsc.as_ref().unwrap().year.as_deref(), Some("2021"));
        assert_eq!(facts.projects[0].kind.as_deref(), Some("Web App"));
        assert!(facts.internship.is_none());
    }

    #[test]
    fn test_maps_keep_insertion_order() {
        let facts = ResumeFacts::from_json_str(SAMPLE).unwrap();

        let categories: Vec<_> = facts.technical_skills.keys().collect();
        assert_eq!(categories, vec!["web_technologies", "programming_languages"]);

        let questions: Vec<_> = facts.faq_responses.keys().collect();
        assert_eq!(questions, vec!["why_hire_me", "availability"]);
    }

    #[test]
    fn test_empty_document_is_empty() {
        assert!(ResumeFacts::from_json_str("{}").unwrap().is_empty());
        assert!(!ResumeFacts::from_json_str(SAMPLE).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file_yields_empty_facts() {
        let dir = tempfile::tempdir().unwrap();
        let facts = ResumeFacts::load(&dir.path().join("nope.json"));
        assert!(facts.is_empty());
    }

    #[test]
    fn test_load_malformed_file_yields_empty_facts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let facts = ResumeFacts::load(file.path());
        assert!(facts.is_empty());
    }

    #[test]
    fn test_load_empty_object_yields_empty_facts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        assert!(ResumeFacts::load(file.path()).is_empty());
    }

    #[test]
    fn test_bundled_example_parses() {
        let facts =
            ResumeFacts::from_json_str(include_str!("../../data/resume_knowledge.example.json"))
                .unwrap();

        assert!(facts.internship.is_some());
        assert_eq!(facts.technical_skills.len(), 4);
        assert_eq!(facts.certifications[0].issuer.as_deref(), Some("Example Academy"));
    }

    #[test]
    fn test_non_list_skill_category_is_skipped() {
        let facts = ResumeFacts::from_json_str(
            r#"{
                "personal_info": { "name": "Ada" },
                "technical_skills": {
                    "programming_languages": ["Rust", 3, "Go"],
                    "summary": "Full stack",
                    "tools": ["Git"]
                },
                "faq_responses": { "why_hire_me": "Because.", "rating": 10 }
            }"#,
        )
        .unwrap();

        assert_eq!(facts.personal_info.name.as_deref(), Some("Ada"));
        let categories: Vec<_> = facts.technical_skills.keys().collect();
        assert_eq!(categories, vec!["programming_languages", "tools"]);
        assert_eq!(facts.technical_skills["programming_languages"], vec!["Rust", "Go"]);
        let questions: Vec<_> = facts.faq_responses.keys().collect();
        assert_eq!(questions, vec!["why_hire_me"]);
    }

    #[test]
    fn test_empty_internship_object_is_absent() {
        let facts =
            ResumeFacts::from_json_str(r#"{ "personal_info": { "name": "Ada" }, "internship": {} }"#)
                .unwrap();
        assert!(facts.internship.is_none());

        let facts = ResumeFacts::from_json_str(r#"{ "internship": null }"#).unwrap();
        assert!(facts.internship.is_none());
        assert!(facts.is_empty());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let facts = ResumeFacts::load(file.path());
        assert_eq!(facts.projects.len(), 1);
    }
}
