use serde::Serialize;

use resumer_core::{ExtractionError, Line, PageTextSource, Resume, Section, TextToken};

use crate::config::ParsingConfig;
use crate::{extract, lines, resume, sections};

/// A configurable resume parsing pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use [`ResumeParser::with_config`]
/// to supply custom thresholds and vocabularies.
#[derive(Debug, Clone)]
pub struct ResumeParser {
    config: ParsingConfig,
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Every intermediate stage of one parse, for inspection.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub tokens: Vec<TextToken>,
    pub lines: Vec<Line>,
    pub sections: Vec<Section>,
    pub resume: Resume,
}

impl ResumeParser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create a parser with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Pull positioned text tokens out of every page (step 1).
    pub fn extract_tokens(
        &self,
        source: &dyn PageTextSource,
    ) -> Result<Vec<TextToken>, ExtractionError> {
        extract::extract_tokens(source)
    }

    /// Cluster tokens into visual lines (step 2).
    pub fn group_lines(&self, tokens: &[TextToken]) -> Vec<Line> {
        lines::group_lines(tokens, &self.config)
    }

    /// Partition lines into sections at detected headings (step 3).
    pub fn group_sections(&self, lines: &[Line]) -> Vec<Section> {
        sections::group_sections(lines, &self.config)
    }

    /// Build the typed resume from sections (step 4).
    pub fn extract_resume(&self, sections: &[Section]) -> Resume {
        resume::extract_resume(sections, &self.config)
    }

    /// Run the full pipeline. Only token extraction can fail.
    pub fn parse(&self, source: &dyn PageTextSource) -> Result<Resume, ExtractionError> {
        Ok(self.parse_stages(source)?.resume)
    }

    /// Run the full pipeline and keep every intermediate stage.
    pub fn parse_stages(
        &self,
        source: &dyn PageTextSource,
    ) -> Result<ParsedDocument, ExtractionError> {
        let tokens = self.extract_tokens(source)?;
        let lines = self.group_lines(&tokens);
        let sections = self.group_sections(&lines);
        let resume = self.extract_resume(&sections);
        Ok(ParsedDocument {
            tokens,
            lines,
            sections,
            resume,
        })
    }
}
