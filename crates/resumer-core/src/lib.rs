use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod layout;
pub mod resume;

// Re-export for convenience
pub use backend::{InMemorySource, PageText, PageTextSource, PdfBackend};
pub use layout::{BoundingBox, Line, Section, SectionKind, TextToken, is_bold_font};
pub use resume::{
    FeaturedSkill, Resume, ResumeCustom, ResumeEducation, ResumeProfile, ResumeProject,
    ResumeSkills, ResumeWorkExperience,
};

/// The only failure surface of the parsing pipeline.
///
/// Everything after token extraction is total, so callers either get a
/// complete [`Resume`] or one of these.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("document contains no extractable text")]
    NoText,
    #[error("document is password-protected")]
    PasswordProtected,
    #[error("extraction timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("failed to decode document: {0}")]
    Corrupt(String),
}

impl ExtractionError {
    /// The payload-free discriminant, for callers that only branch on the kind.
    pub fn reason(&self) -> ExtractionReason {
        match self {
            ExtractionError::NoText => ExtractionReason::NoText,
            ExtractionError::PasswordProtected => ExtractionReason::PasswordProtected,
            ExtractionError::Timeout(_) => ExtractionReason::Timeout,
            ExtractionError::Corrupt(_) => ExtractionReason::Corrupt,
        }
    }
}

impl From<std::io::Error> for ExtractionError {
    fn from(err: std::io::Error) -> Self {
        ExtractionError::Corrupt(err.to_string())
    }
}

/// Kind of an [`ExtractionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionReason {
    NoText,
    PasswordProtected,
    Timeout,
    Corrupt,
}

impl ExtractionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionReason::NoText => "no_text",
            ExtractionReason::PasswordProtected => "password_protected",
            ExtractionReason::Timeout => "timeout",
            ExtractionReason::Corrupt => "corrupt",
        }
    }
}

impl std::fmt::Display for ExtractionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
