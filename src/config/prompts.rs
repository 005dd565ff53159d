//! Assistant persona
//!
//! The persona wraps the rendered resume context in the system prompt. A
//! built-in persona is used unless a TOML file overrides it.
//!
//! # Example Persona File
//!
//! ```toml
//! [persona]
//! name = "Ada's Assistant"
//!
//! [system_prompt]
//! preamble = """
//! You are an AI assistant representing Ada's portfolio...
//! """
//! closing = "Be helpful, accurate, and engaging!"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// A persona/prompt template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaPrompt {
    /// Persona metadata
    pub persona: PersonaInfo,

    /// Text surrounding the resume context
    pub system_prompt: SystemPrompt,
}

/// Persona metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaInfo {
    /// Display name of the persona
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemPrompt {
    /// Instructions placed before the resume context
    pub preamble: String,

    /// Reminder placed after the resume context
    #[serde(default)]
    pub closing: String,
}

impl PersonaPrompt {
    /// Load a persona from a TOML file
    pub async fn load_from_file(path: &Path) -> Result<Self, PromptError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PromptError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| PromptError::ParseError(e.to_string()))
    }

    /// Load the persona at `path`, falling back to the built-in one
    pub async fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load_from_file(path).await {
            Ok(persona) => {
                tracing::info!(name = %persona.persona.name, "Loaded persona");
                persona
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Falling back to built-in persona");
                Self::default()
            }
        }
    }

    /// Wrap the rendered resume context into the full system prompt
    pub fn system_message(&self, context: &str) -> String {
        let mut prompt = format!(
            "{}\n\nRESUME INFORMATION:\n{}",
            self.system_prompt.preamble.trim_end(),
            context
        );
        if !self.system_prompt.closing.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(self.system_prompt.closing.trim());
        }
        prompt
    }
}

impl Default for PersonaPrompt {
    fn default() -> Self {
        Self {
            persona: PersonaInfo {
                name: "Portfolio Assistant".to_string(),
            },
            system_prompt: SystemPrompt {
                preamble: builtin::PREAMBLE.to_string(),
                closing: builtin::CLOSING.to_string(),
            },
        }
    }
}

/// Errors from persona loading
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Built-in persona that doesn't require a file
pub mod builtin {
    pub const PREAMBLE: &str = r#"You are an intelligent AI assistant representing the owner of this portfolio. Your role is to help visitors learn about their background, skills, projects, and experience.

PERSONALITY & TONE:
- Be professional yet friendly and conversational
- Show enthusiasm about their work and achievements
- Be concise but informative
- Use a warm, welcoming tone

RESPONSE GUIDELINES:
1. Answer questions based ONLY on the resume information provided below
2. If asked about something not in the resume, politely say that you don't have that specific information, and suggest reaching out directly via email or LinkedIn
3. For project questions, highlight the technical aspects and real-world impact
4. For skills questions, mention both technical proficiency and practical application
5. For contact requests, provide the email, phone, LinkedIn, and GitHub information
6. Keep responses focused and to-the-point (2-4 sentences for simple questions)
7. For complex questions, you can provide more detail but stay organized"#;

    pub const CLOSING: &str = "Remember: You're here to showcase this person's expertise and help visitors connect with them. Be helpful, accurate, and engaging!";
}
