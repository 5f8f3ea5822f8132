//! Resume parsing pipeline.
//!
//! 1. Pull positioned tokens from every page of a [`PageTextSource`]
//! 2. Cluster tokens into visual lines
//! 3. Partition lines into sections at detected headings
//! 4. Extract profile, entries and skills into a [`Resume`]
//!
//! Only step 1 can fail; the rest are total.

pub mod config;
pub mod dates;
pub mod entries;
pub mod extract;
pub mod extractor;
pub mod lines;
pub mod profile;
pub mod resume;
pub mod scoring;
pub mod sections;
pub mod skills;
pub mod text_processing;

pub use config::{ConfigError, ListOverride, ParsingConfig, ParsingConfigBuilder, Thresholds};
pub use extractor::{ParsedDocument, ResumeParser};
pub use scoring::FeatureWeights;
pub use sections::{HeadingClass, Vocabulary};
// Re-export domain types from core (canonical definitions live there)
pub use resumer_core::{
    ExtractionError, ExtractionReason, Line, PageTextSource, Resume, Section, SectionKind,
    TextToken,
};

/// Parse a resume from a page source with the default configuration.
pub fn parse_resume(source: &dyn PageTextSource) -> Result<Resume, ExtractionError> {
    ResumeParser::new().parse(source)
}
