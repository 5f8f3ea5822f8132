use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use resumer_parsing::{ParsedDocument, ResumeParser};

pub mod source;

// Re-export domain types for convenience
pub use resumer_core::{ExtractionError, ExtractionReason, Resume};
pub use source::{DocumentSource, fetch_bytes, is_token_dump_path, open_bytes, open_path};

/// Wall-clock ceiling for loading and parsing one document.
pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("invalid token dump: {0}")]
    TokenDump(#[from] serde_json::Error),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of resumer-ingest)")]
    NoPdfSupport,
}

impl IngestError {
    /// The extraction failure kind, if this is one.
    pub fn extraction_reason(&self) -> Option<ExtractionReason> {
        match self {
            IngestError::Extraction(e) => Some(e.reason()),
            _ => None,
        }
    }
}

/// Parse a resume from a PDF file or a `.json` token dump.
pub fn parse_resume_path(path: &Path, parser: &ResumeParser) -> Result<Resume, IngestError> {
    let source = open_path(path)?;
    Ok(parser.parse(&*source)?)
}

/// Parse a resume from PDF bytes.
pub fn parse_resume_bytes(bytes: &[u8], parser: &ResumeParser) -> Result<Resume, IngestError> {
    let source = open_bytes(bytes)?;
    Ok(parser.parse(&*source)?)
}

/// Fetch a PDF over HTTP(S) and parse it under [`DEFAULT_EXTRACTION_TIMEOUT`].
pub async fn parse_resume_url(url: &str, parser: &ResumeParser) -> Result<Resume, IngestError> {
    parse_resume_with_timeout(
        DocumentSource::Url(url.to_string()),
        parser.clone(),
        DEFAULT_EXTRACTION_TIMEOUT,
    )
    .await
}

/// Run blocking extraction work on a worker thread with a wall-clock limit.
///
/// Expiry yields [`ExtractionError::Timeout`]. The worker is not interrupted;
/// its result is discarded when it eventually finishes.
pub async fn run_with_timeout<T, F>(timeout: Duration, work: F) -> Result<T, IngestError>
where
    F: FnOnce() -> Result<T, IngestError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(work)).await {
        Err(_) => {
            tracing::warn!(timeout_secs = timeout.as_secs_f64(), "extraction timed out");
            Err(ExtractionError::Timeout(timeout).into())
        }
        Ok(Err(join)) => {
            Err(ExtractionError::Corrupt(format!("extraction worker failed: {join}")).into())
        }
        Ok(Ok(result)) => result,
    }
}

/// Load `source` and run every pipeline stage under `timeout`.
///
/// URLs are downloaded first; the download is not counted against `timeout`.
pub async fn parse_document(
    source: DocumentSource,
    parser: ResumeParser,
    timeout: Duration,
) -> Result<ParsedDocument, IngestError> {
    tracing::debug!(source = %source.describe(), "parsing document");

    let bytes = match source {
        DocumentSource::Path(path) => {
            return run_with_timeout(timeout, move || {
                Ok(parser.parse_stages(&*open_path(&path)?)?)
            })
            .await;
        }
        DocumentSource::Bytes(bytes) => bytes,
        DocumentSource::Url(url) => fetch_bytes(&url).await?,
    };
    run_with_timeout(timeout, move || Ok(parser.parse_stages(&*open_bytes(&bytes)?)?)).await
}

/// Parse a resume from any source under `timeout`.
pub async fn parse_resume_with_timeout(
    source: DocumentSource,
    parser: ResumeParser,
    timeout: Duration,
) -> Result<Resume, IngestError> {
    Ok(parse_document(source, parser, timeout).await?.resume)
}

/// Substitute the empty resume for a failed parse, logging the failure.
pub fn resume_or_default(result: Result<Resume, IngestError>) -> Resume {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "resume extraction failed, using empty resume");
        Resume::default()
    })
}

/// Like [`parse_resume_with_timeout`], but never fails.
pub async fn parse_resume_or_default(
    source: DocumentSource,
    parser: ResumeParser,
    timeout: Duration,
) -> Resume {
    resume_or_default(parse_resume_with_timeout(source, parser, timeout).await)
}
