mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use resumer_core::{InMemorySource, TextToken};
use resumer_ingest::{
    DEFAULT_EXTRACTION_TIMEOUT, DocumentSource, ExtractionError, ExtractionReason, IngestError,
    Resume, parse_resume_bytes, parse_resume_or_default, parse_resume_path,
    parse_resume_with_timeout, resume_or_default, run_with_timeout,
};
use resumer_parsing::ResumeParser;

use common::{SIMPLE_RESUME, build_pdf};

fn write_temp(name: &str, bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}

#[test]
fn pdf_bytes_parse() {
    let resume = parse_resume_bytes(&build_pdf(&[SIMPLE_RESUME]), &ResumeParser::new()).unwrap();
    assert_eq!(resume.profile.name, "Jane Doe");
    assert_eq!(resume.educations.len(), 1);
    assert_eq!(resume.educations[0].school, "State University");
    assert_eq!(resume.educations[0].degree, "B.S. Computer Science");
    assert_eq!(resume.educations[0].date, "2015 - 2019");
}

#[test]
fn pdf_path_parse() {
    let (_dir, path) = write_temp("resume.pdf", &build_pdf(&[SIMPLE_RESUME]));
    let resume = parse_resume_path(&path, &ResumeParser::new()).unwrap();
    assert_eq!(resume.profile.email, "jane@example.com");
}

#[test]
fn token_dump_path_parse() {
    let dump = InMemorySource::single_page(
        792.0,
        vec![TextToken {
            text: "Jane Doe jane@example.com".into(),
            x: 72.0,
            y: 72.0,
            width: 125.0,
            height: 10.0,
            font_name: "Helvetica".into(),
            has_end_of_line: true,
        }],
    );
    let (_dir, path) = write_temp("tokens.json", serde_json::to_vec(&dump).unwrap().as_slice());
    let resume = parse_resume_path(&path, &ResumeParser::new()).unwrap();
    assert_eq!(resume.profile.name, "Jane Doe");
    assert_eq!(resume.profile.email, "jane@example.com");
}

#[test]
fn bad_token_dump() {
    let (_dir, path) = write_temp("tokens.json", b"{ not json");
    let err = parse_resume_path(&path, &ResumeParser::new()).unwrap_err();
    assert!(matches!(err, IngestError::TokenDump(_)));
    assert_eq!(err.extraction_reason(), None);
}

#[test]
fn missing_file_is_corrupt() {
    let err = parse_resume_path(
        std::path::Path::new("/nonexistent/resume.pdf"),
        &ResumeParser::new(),
    )
    .unwrap_err();
    assert_eq!(err.extraction_reason(), Some(ExtractionReason::Corrupt));
}

#[test]
fn empty_pdf_is_no_text_and_falls_back() {
    let result = parse_resume_bytes(&build_pdf(&[]), &ResumeParser::new());
    assert!(matches!(
        result,
        Err(IngestError::Extraction(ExtractionError::NoText))
    ));
    assert_eq!(resume_or_default(result), Resume::default());
}

#[test]
fn garbage_bytes_are_corrupt() {
    let err = parse_resume_bytes(b"definitely not a pdf", &ResumeParser::new()).unwrap_err();
    assert_eq!(err.extraction_reason(), Some(ExtractionReason::Corrupt));
}

#[tokio::test]
async fn slow_work_times_out() {
    let err = run_with_timeout(Duration::from_millis(20), || {
        std::thread::sleep(Duration::from_millis(500));
        Ok(())
    })
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        IngestError::Extraction(ExtractionError::Timeout(d)) if d == Duration::from_millis(20)
    ));
}

#[tokio::test]
async fn bytes_within_timeout() {
    let resume = parse_resume_with_timeout(
        DocumentSource::Bytes(build_pdf(&[SIMPLE_RESUME])),
        ResumeParser::new(),
        DEFAULT_EXTRACTION_TIMEOUT,
    )
    .await
    .unwrap();
    assert_eq!(resume.profile.name, "Jane Doe");
}

#[tokio::test]
async fn or_default_never_fails() {
    let resume = parse_resume_or_default(
        DocumentSource::Bytes(b"%PDF-broken".to_vec()),
        ResumeParser::new(),
        DEFAULT_EXTRACTION_TIMEOUT,
    )
    .await;
    assert_eq!(resume, Resume::default());
}

#[tokio::test]
async fn unreachable_url_is_fetch_error() {
    let err = parse_resume_with_timeout(
        DocumentSource::Url("http://127.0.0.1:9/resume.pdf".into()),
        ResumeParser::new(),
        DEFAULT_EXTRACTION_TIMEOUT,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, IngestError::Fetch { .. }));
}
