use resumer_core::{Line, Section, SectionKind};

use crate::config::ParsingConfig;
use crate::lines::body_font_size;
use crate::text_processing::normalize_phrase;

pub(crate) const WORK_HEADINGS: &[&str] = &[
    "experience",
    "experiences",
    "work experience",
    "professional experience",
    "employment",
    "employment history",
    "work history",
    "career history",
    "relevant experience",
];

pub(crate) const EDUCATION_HEADINGS: &[&str] = &[
    "education",
    "academic background",
    "academics",
    "education and training",
];

pub(crate) const PROJECT_HEADINGS: &[&str] = &[
    "projects",
    "personal projects",
    "academic projects",
    "selected projects",
    "side projects",
];

pub(crate) const SKILL_HEADINGS: &[&str] = &[
    "skills",
    "technical skills",
    "core competencies",
    "competencies",
    "technologies",
    "skills and interests",
    "languages and tools",
];

/// Headings whose content belongs to the profile when they open the document.
pub(crate) const PROFILE_HEADINGS: &[&str] = &[
    "summary",
    "professional summary",
    "profile",
    "objective",
    "about",
    "about me",
];

/// What a heading's text refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingClass {
    Section(SectionKind),
    /// Summary/objective style heading.
    Profile,
}

/// Resolved heading vocabulary, normalized for matching.
pub struct Vocabulary {
    entries: Vec<(String, HeadingClass)>,
}

impl Vocabulary {
    pub fn from_config(config: &ParsingConfig) -> Self {
        let groups = [
            (
                config.work_headings.resolve_static(WORK_HEADINGS),
                HeadingClass::Section(SectionKind::WorkExperience),
            ),
            (
                config.education_headings.resolve_static(EDUCATION_HEADINGS),
                HeadingClass::Section(SectionKind::Education),
            ),
            (
                config.project_headings.resolve_static(PROJECT_HEADINGS),
                HeadingClass::Section(SectionKind::Projects),
            ),
            (
                config.skill_headings.resolve_static(SKILL_HEADINGS),
                HeadingClass::Section(SectionKind::Skills),
            ),
            (
                config.profile_headings.resolve_static(PROFILE_HEADINGS),
                HeadingClass::Profile,
            ),
        ];

        let entries = groups
            .into_iter()
            .flat_map(|(words, class)| {
                words
                    .into_iter()
                    .map(|w| normalize_phrase(&w))
                    .filter(|w| !w.is_empty())
                    .map(move |w| (w, class))
            })
            .collect();
        Self { entries }
    }

    /// Classify heading text by exact or word-prefix match; the longest
    /// matching vocabulary entry wins.
    pub fn classify(&self, text: &str) -> Option<HeadingClass> {
        let norm = normalize_phrase(text);
        if norm.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .filter(|(entry, _)| {
                norm == *entry
                    || norm
                        .strip_prefix(entry.as_str())
                        .is_some_and(|rest| rest.starts_with(' '))
            })
            .max_by_key(|(entry, _)| entry.len())
            .map(|(_, class)| *class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    None,
    Weak,
    Strong,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    signal: Signal,
    class: Option<HeadingClass>,
    size: f64,
    bold: bool,
    all_caps: bool,
}

/// Partition lines into labeled sections.
///
/// Total: every line lands in exactly one section, in order. Lines before
/// the first accepted heading form the implicit Profile section; zero lines
/// produce zero sections.
pub fn group_sections(lines: &[Line], config: &ParsingConfig) -> Vec<Section> {
    if lines.is_empty() {
        return Vec::new();
    }

    let vocabulary = Vocabulary::from_config(config);
    let body = body_font_size(lines);
    let candidates: Vec<Candidate> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| classify_line(i, line, body, &vocabulary, config))
        .collect();
    let accepted = accept_headings(&candidates, config);

    let mut sections = Vec::new();
    let mut current = Section {
        kind: SectionKind::Profile,
        title: String::new(),
        lines: Vec::new(),
    };
    let mut seen_heading = false;

    for (i, line) in lines.iter().enumerate() {
        if !accepted[i] {
            current.lines.push(line.clone());
            continue;
        }

        let kind = match candidates[i].class {
            Some(HeadingClass::Section(kind)) => kind,
            Some(HeadingClass::Profile) if !seen_heading => {
                // A summary heading before any other section continues the profile.
                tracing::trace!(line = i, text = line.text(), "profile heading absorbed");
                current.lines.push(line.clone());
                continue;
            }
            Some(HeadingClass::Profile) | None => SectionKind::Custom,
        };
        tracing::trace!(line = i, text = line.text(), %kind, "section heading");

        seen_heading = true;
        let next = Section {
            kind,
            title: line.text().to_string(),
            lines: vec![line.clone()],
        };
        let done = std::mem::replace(&mut current, next);
        if !done.lines.is_empty() {
            sections.push(done);
        }
    }
    sections.push(current);

    tracing::debug!(
        lines = lines.len(),
        sections = sections.len(),
        body_size = body,
        "grouped sections"
    );
    sections
}

fn classify_line(
    index: usize,
    line: &Line,
    body: f64,
    vocabulary: &Vocabulary,
    config: &ParsingConfig,
) -> Candidate {
    let text = line.text();
    let class = vocabulary.classify(text);
    let all_caps = is_all_caps(text);
    let mut candidate = Candidate {
        signal: Signal::None,
        class,
        size: line.font_size(),
        bold: line.is_bold(),
        all_caps,
    };

    let eligible = !line.is_blank()
        && line.word_count() <= config.thresholds.max_heading_words
        && text.chars().any(char::is_alphabetic);
    if !eligible {
        return candidate;
    }

    let larger = body > 0.0 && line.font_size() >= body * config.thresholds.heading_font_ratio;
    // The first line is nearly always the candidate's name; it is never a
    // heading on looks alone.
    let styled = index > 0 && (larger || (line.is_bold() && all_caps && !is_label(text)));

    candidate.signal = if (class.is_some() && (larger || line.is_bold())) || styled {
        Signal::Strong
    } else if class.is_some() && is_heading_case(text) && !is_label(text) {
        Signal::Weak
    } else {
        Signal::None
    };
    candidate
}

fn accept_headings(candidates: &[Candidate], config: &ParsingConfig) -> Vec<bool> {
    let neighborhood = config.thresholds.heading_neighborhood;

    // Style of the recognized headings; unrecognized strong candidates must
    // look at least as prominent to count.
    let known: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.signal == Signal::Strong && c.class.is_some())
        .collect();
    let min_size = known.iter().map(|c| c.size).fold(f64::INFINITY, f64::min);
    let all_bold = known.iter().all(|c| c.bold);
    let all_caps = known.iter().all(|c| c.all_caps);

    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| match c.signal {
            Signal::None => false,
            Signal::Strong if c.class.is_some() || known.is_empty() => true,
            Signal::Strong => {
                c.size >= min_size - 0.5 && (!all_bold || c.bold) && (!all_caps || c.all_caps)
            }
            Signal::Weak => {
                let lo = i.saturating_sub(neighborhood);
                let hi = (i + neighborhood).min(candidates.len() - 1);
                !(lo..=hi).any(|j| j != i && candidates[j].signal == Signal::Strong)
            }
        })
        .collect()
}

fn is_all_caps(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

/// Small connectives allowed in lowercase inside a title-cased heading.
const CONNECTIVES: &[&str] = &["and", "of", "the", "for", "in", "to", "with"];

/// All caps, or every word capitalized (`"Work Experience"`, `"Honors and Awards"`).
/// Sentence-case body text like `"Projects shipped quarterly"` is not.
fn is_heading_case(text: &str) -> bool {
    if is_all_caps(text) {
        return true;
    }
    let mut words = text
        .split_whitespace()
        .filter(|w| w.chars().next().is_some_and(char::is_alphabetic))
        .peekable();
    words.peek().is_some()
        && words.enumerate().all(|(i, w)| {
            w.chars().next().is_some_and(char::is_uppercase)
                || (i > 0 && CONNECTIVES.contains(&w.to_lowercase().as_str()))
        })
}

/// `"Skills: Rust, Go"` style label/value lines are content, not headings.
fn is_label(text: &str) -> bool {
    text.split_once(':')
        .is_some_and(|(_, rest)| !rest.trim().is_empty())
}
