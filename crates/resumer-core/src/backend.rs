use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ExtractionError, TextToken};

/// Tokens of a single page, in page-local coordinates.
///
/// `y` grows downwards from the top edge of this page; the extractor stacks
/// pages into document space using `height`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    pub height: f64,
    #[serde(default)]
    pub tokens: Vec<TextToken>,
}

/// Page-by-page access to decoded text.
///
/// This is the only capability the parsing pipeline needs from a PDF library;
/// pages are requested strictly in order, once each.
pub trait PageTextSource {
    fn page_count(&self) -> usize;

    fn page(&self, index: usize) -> Result<PageText, ExtractionError>;
}

/// Trait for PDF decoding backends.
///
/// Implementors only turn bytes into a [`PageTextSource`]; line, section and
/// field extraction live in `resumer_parsing::ResumeParser`.
pub trait PdfBackend: Send + Sync {
    /// Open a document held in memory.
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PageTextSource + Send>, ExtractionError>;

    /// Open a document on disk. I/O failures surface as [`ExtractionError::Corrupt`].
    fn open_path(&self, path: &Path) -> Result<Box<dyn PageTextSource + Send>, ExtractionError> {
        let bytes = std::fs::read(path)?;
        self.open(&bytes)
    }
}

/// Pre-decoded pages, e.g. a JSON token dump or test fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemorySource {
    pub pages: Vec<PageText>,
}

impl InMemorySource {
    pub fn new(pages: Vec<PageText>) -> Self {
        Self { pages }
    }

    /// A single page holding `tokens`.
    pub fn single_page(height: f64, tokens: Vec<TextToken>) -> Self {
        Self {
            pages: vec![PageText { height, tokens }],
        }
    }
}

impl PageTextSource for InMemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageText, ExtractionError> {
        self.pages.get(index).cloned().ok_or_else(|| {
            ExtractionError::Corrupt(format!(
                "page {index} out of range ({} pages)",
                self.pages.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_out_of_range_is_corrupt() {
        let source = InMemorySource::default();
        assert_eq!(source.page_count(), 0);
        assert!(matches!(source.page(0), Err(ExtractionError::Corrupt(_))));
    }

    #[test]
    fn token_dump_deserializes() {
        let json = r#"{"pages":[{"height":792,"tokens":[
            {"text":"Jane Doe","x":72,"y":80,"width":60,"height":18}
        ]}]}"#;
        let source: InMemorySource = serde_json::from_str(json).unwrap();
        assert_eq!(source.page_count(), 1);
        let page = source.page(0).unwrap();
        assert_eq!(page.tokens[0].text, "Jane Doe");
        assert!(page.tokens[0].font_name.is_empty());
    }
}
