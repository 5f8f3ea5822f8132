use std::path::{Path, PathBuf};

use resumer_core::{ExtractionError, InMemorySource, PageTextSource};

use crate::IngestError;

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    /// An `http://` or `https://` locator.
    Url(String),
}

impl DocumentSource {
    /// Interpret a command-line argument: URLs by scheme, everything else as a path.
    pub fn from_arg(arg: &str) -> Self {
        let lower = arg.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DocumentSource::Url(arg.to_string())
        } else {
            DocumentSource::Path(PathBuf::from(arg))
        }
    }

    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            DocumentSource::Path(p) => p.display().to_string(),
            DocumentSource::Bytes(b) => format!("<{} bytes>", b.len()),
            DocumentSource::Url(u) => u.clone(),
        }
    }
}

/// Whether `path` names a pre-extracted token dump rather than a PDF.
pub fn is_token_dump_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Open a file on disk.
///
/// Dispatches on extension:
/// - `.json` → token dump (serialized [`InMemorySource`])
/// - anything else → PDF (requires the `pdf` feature)
pub fn open_path(path: &Path) -> Result<Box<dyn PageTextSource + Send>, IngestError> {
    let bytes = std::fs::read(path).map_err(ExtractionError::from)?;
    if is_token_dump_path(path) {
        let dump: InMemorySource = serde_json::from_slice(&bytes)?;
        return Ok(Box::new(dump));
    }
    open_bytes(&bytes)
}

/// Open PDF bytes held in memory.
#[cfg(feature = "pdf")]
pub fn open_bytes(bytes: &[u8]) -> Result<Box<dyn PageTextSource + Send>, IngestError> {
    use resumer_core::PdfBackend;

    let backend = resumer_pdf_lopdf::LopdfBackend::new();
    Ok(backend.open(bytes)?)
}

#[cfg(not(feature = "pdf"))]
pub fn open_bytes(_bytes: &[u8]) -> Result<Box<dyn PageTextSource + Send>, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Download a document.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, IngestError> {
    let fetch_error = |reason: String| IngestError::Fetch {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .user_agent(concat!("resumer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(fetch_error(format!("HTTP error: {}", response.status())));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;
    tracing::debug!(url, bytes = bytes.len(), "fetched document");
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_arg_detects_urls() {
        assert_eq!(
            DocumentSource::from_arg("https://example.com/cv.pdf"),
            DocumentSource::Url("https://example.com/cv.pdf".into())
        );
        assert_eq!(
            DocumentSource::from_arg("HTTP://example.com/cv.pdf"),
            DocumentSource::Url("HTTP://example.com/cv.pdf".into())
        );
        assert_eq!(
            DocumentSource::from_arg("resume.pdf"),
            DocumentSource::Path(PathBuf::from("resume.pdf"))
        );
    }

    #[test]
    fn token_dump_by_extension() {
        assert!(is_token_dump_path(Path::new("tokens.json")));
        assert!(is_token_dump_path(Path::new("TOKENS.JSON")));
        assert!(!is_token_dump_path(Path::new("resume.pdf")));
        assert!(!is_token_dump_path(Path::new("json")));
    }

    #[test]
    fn describe_bytes() {
        assert_eq!(DocumentSource::Bytes(vec![0; 3]).describe(), "<3 bytes>");
    }
}
