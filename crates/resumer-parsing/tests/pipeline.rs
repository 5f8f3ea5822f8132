//! End-to-end scenarios over in-memory pages.

use pretty_assertions::assert_eq;
use resumer_core::{InMemorySource, Resume, TextToken};
use resumer_parsing::{
    ExtractionError, FeatureWeights, ParsingConfigBuilder, ResumeParser, SectionKind,
    parse_resume,
};

const REGULAR: &str = "Helvetica";
const BOLD: &str = "Helvetica-Bold";

/// Tokens for one visual line, one token per word, left to right.
fn line_tokens(text: &str, y: f64, size: f64, font: &str) -> Vec<TextToken> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut x = 72.0;
    let mut out = Vec::new();
    for (i, word) in words.iter().enumerate() {
        let width = word.chars().count() as f64 * size * 0.5;
        out.push(TextToken {
            text: word.to_string(),
            x,
            y,
            width,
            height: size,
            font_name: font.to_string(),
            has_end_of_line: i + 1 == words.len(),
        });
        x += width + size * 0.3;
    }
    out
}

fn page(lines: &[(&str, f64, f64, &str)]) -> InMemorySource {
    let tokens = lines
        .iter()
        .flat_map(|(text, y, size, font)| line_tokens(text, *y, *size, font))
        .collect();
    InMemorySource::single_page(792.0, tokens)
}

fn sample_resume() -> InMemorySource {
    page(&[
        ("Jane Doe", 60.0, 18.0, BOLD),
        ("jane@example.com | (555) 123-4567 | Austin, TX", 84.0, 10.0, REGULAR),
        ("EXPERIENCE", 110.0, 12.0, BOLD),
        ("Acme Corp", 128.0, 10.0, REGULAR),
        ("Software Engineer", 142.0, 10.0, REGULAR),
        ("Jan 2021 - Present", 156.0, 10.0, REGULAR),
        ("• Built X", 170.0, 10.0, REGULAR),
        ("• Shipped Y", 184.0, 10.0, REGULAR),
        ("SKILLS", 210.0, 12.0, BOLD),
        ("• Rust", 228.0, 10.0, REGULAR),
        ("Python: 4/5", 242.0, 10.0, REGULAR),
    ])
}

#[test]
fn single_profile_line() {
    let source = page(&[("Jane Doe jane@example.com", 72.0, 10.0, REGULAR)]);
    let resume = parse_resume(&source).unwrap();
    assert_eq!(resume.profile.name, "Jane Doe");
    assert_eq!(resume.profile.email, "jane@example.com");
    assert!(resume.work_experiences.is_empty());
}

#[test]
fn full_resume() {
    let resume = parse_resume(&sample_resume()).unwrap();

    assert_eq!(resume.profile.name, "Jane Doe");
    assert_eq!(resume.profile.email, "jane@example.com");
    assert_eq!(resume.profile.phone, "(555) 123-4567");
    assert_eq!(resume.profile.location, "Austin, TX");

    assert_eq!(resume.work_experiences.len(), 1);
    let work = &resume.work_experiences[0];
    assert_eq!(work.company, "Acme Corp");
    assert_eq!(work.job_title, "Software Engineer");
    assert_eq!(work.date, "Jan 2021 - Present");
    assert_eq!(work.descriptions, vec!["Built X", "Shipped Y"]);

    let skills: Vec<(&str, u8)> = resume
        .skills
        .featured_skills
        .iter()
        .map(|s| (s.skill.as_str(), s.rating))
        .collect();
    assert_eq!(skills, vec![("Rust", 3), ("Python", 4)]);
}

#[test]
fn larger_heading_starts_education() {
    let source = page(&[
        ("Jane Doe", 60.0, 10.0, REGULAR),
        ("jane@example.com", 74.0, 10.0, REGULAR),
        ("EDUCATION", 100.0, 14.0, REGULAR),
        ("State University", 120.0, 10.0, REGULAR),
        ("B.S. Computer Science", 134.0, 10.0, REGULAR),
        ("2015 - 2019", 148.0, 10.0, REGULAR),
        ("Dean's list", 162.0, 10.0, REGULAR),
    ]);
    let parser = ResumeParser::new();
    let stages = parser.parse_stages(&source).unwrap();

    let kinds: Vec<SectionKind> = stages.sections.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![SectionKind::Profile, SectionKind::Education]);
    assert_eq!(stages.sections[1].title, "EDUCATION");
    assert_eq!(stages.sections[1].lines.len(), 5);

    let edu = &stages.resume.educations[0];
    assert_eq!(edu.school, "State University");
    assert_eq!(edu.degree, "B.S. Computer Science");
    assert_eq!(edu.date, "2015 - 2019");
    assert_eq!(edu.descriptions, vec!["Dean's list"]);
}

#[test]
fn no_pages_is_no_text() {
    let err = parse_resume(&InMemorySource::default()).unwrap_err();
    assert!(matches!(err, ExtractionError::NoText));
    assert_eq!(
        parse_resume(&InMemorySource::default()).unwrap_or_default(),
        Resume::default()
    );
}

#[test]
fn whitespace_only_page_is_no_text() {
    let source = InMemorySource::single_page(
        792.0,
        vec![TextToken {
            text: "   ".into(),
            x: 72.0,
            y: 72.0,
            width: 6.0,
            height: 10.0,
            font_name: REGULAR.into(),
            has_end_of_line: false,
        }],
    );
    assert!(matches!(parse_resume(&source), Err(ExtractionError::NoText)));
}

#[test]
fn second_page_follows_first() {
    let first = page(&[("Jane Doe", 60.0, 10.0, REGULAR)]).pages.remove(0);
    let second = page(&[("Hobbies", 60.0, 14.0, BOLD), ("Chess", 80.0, 10.0, REGULAR)])
        .pages
        .remove(0);
    let source = InMemorySource::new(vec![first, second]);

    let stages = ResumeParser::new().parse_stages(&source).unwrap();
    let texts: Vec<&str> = stages.lines.iter().map(|l| l.text()).collect();
    assert_eq!(texts, vec!["Jane Doe", "Hobbies", "Chess"]);
    assert!(stages.lines[1].mean_y() > 792.0);
    assert_eq!(stages.resume.custom.descriptions, vec!["Chess"]);
}

#[test]
fn parsing_is_idempotent() {
    let source = sample_resume();
    let first = parse_resume(&source).unwrap();
    let second = parse_resume(&source).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn custom_vocabulary_recognizes_heading() {
    let source = page(&[
        ("Jane Doe", 60.0, 10.0, REGULAR),
        ("Where I Worked", 90.0, 10.0, REGULAR),
        ("Acme Corp", 110.0, 10.0, REGULAR),
        ("Engineer", 124.0, 10.0, REGULAR),
    ]);
    let config = ParsingConfigBuilder::new()
        .add_work_heading("Where I Worked".into())
        .feature_weights(FeatureWeights::default())
        .build()
        .unwrap();
    let resume = ResumeParser::with_config(config).parse(&source).unwrap();
    assert_eq!(resume.work_experiences.len(), 1);
    assert_eq!(resume.work_experiences[0].company, "Acme Corp");
    assert_eq!(resume.work_experiences[0].job_title, "Engineer");
}
