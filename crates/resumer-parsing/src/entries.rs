//! Work experience, education and project entries.
//!
//! A section body is split into entries at emphasis changes and unusually
//! large vertical gaps. The leading lines of each entry are scanned for the
//! organization, the role and the date; everything else becomes a
//! description, one per line.

use once_cell::sync::Lazy;
use regex::Regex;

use resumer_core::{Line, ResumeEducation, ResumeProject, ResumeWorkExperience};

use crate::config::ParsingConfig;
use crate::dates::find_date;
use crate::profile::LOCATION_RE;
use crate::scoring::RoleScorer;
use crate::text_processing::{is_bullet, strip_bullet, trim_fragment};

/// Points above body size at which a line counts as emphasized.
const SIZE_EMPHASIS_DELTA: f64 = 0.5;

static FRAGMENT_SEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:[|•·\t]|\s[—–]\s|\s{2,})\s*").unwrap());

static GPA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bGPA\b\s*(?:of\s*)?[:\-]?\s*([0-4]\.\d{1,2})(?:\s*/\s*[45](?:\.0{1,2})?)?|\b([0-4]\.\d{1,2})\s*/\s*[45](?:\.0{1,2})?\b|\b([0-4]\.\d{1,2})\s+GPA\b",
    )
    .unwrap()
});

/// One line of an entry, possibly rewritten (GPA removed).
#[derive(Debug, Clone)]
struct EntryLine {
    text: String,
    bold: bool,
}

impl EntryLine {
    fn from_line(line: &Line) -> Self {
        Self {
            text: line.text().to_string(),
            bold: line.is_bold(),
        }
    }
}

#[derive(Debug, Clone)]
struct Field {
    text: String,
    bold: bool,
}

#[derive(Debug, Default)]
struct Header {
    primary: Option<Field>,
    secondary: Option<Field>,
    date: String,
}

struct ParsedEntry {
    header: Header,
    descriptions: Vec<String>,
}

pub fn extract_work(
    lines: &[Line],
    body_size: f64,
    config: &ParsingConfig,
) -> Vec<ResumeWorkExperience> {
    let scorer = RoleScorer::work(config);
    split_entries(lines, body_size, config)
        .into_iter()
        .map(|entry| {
            let lines: Vec<EntryLine> = entry.iter().map(|&l| EntryLine::from_line(l)).collect();
            let parsed = parse_entry(&lines, Some(&scorer), config);
            let (company, job_title) = parsed.header.fields();
            ResumeWorkExperience {
                company,
                job_title,
                date: parsed.header.date,
                descriptions: parsed.descriptions,
            }
        })
        .collect()
}

pub fn extract_education(
    lines: &[Line],
    body_size: f64,
    config: &ParsingConfig,
) -> Vec<ResumeEducation> {
    let scorer = RoleScorer::education(config);
    split_entries(lines, body_size, config)
        .into_iter()
        .map(|entry| {
            let mut gpa = String::new();
            let lines: Vec<EntryLine> = entry
                .iter()
                .filter_map(|&l| {
                    let mut line = EntryLine::from_line(l);
                    if let Some((value, rest)) = take_gpa(&line.text) {
                        if gpa.is_empty() {
                            gpa = value;
                        }
                        if rest.is_empty() {
                            return None;
                        }
                        line.text = rest;
                    }
                    Some(line)
                })
                .collect();
            let parsed = parse_entry(&lines, Some(&scorer), config);
            let (school, degree) = parsed.header.fields();
            ResumeEducation {
                school,
                degree,
                date: parsed.header.date,
                gpa,
                descriptions: parsed.descriptions,
            }
        })
        .collect()
}

pub fn extract_projects(
    lines: &[Line],
    body_size: f64,
    config: &ParsingConfig,
) -> Vec<ResumeProject> {
    split_entries(lines, body_size, config)
        .into_iter()
        .map(|entry| {
            let lines: Vec<EntryLine> = entry.iter().map(|&l| EntryLine::from_line(l)).collect();
            let parsed = parse_entry(&lines, None, config);
            let (project, _) = parsed.header.fields();
            ResumeProject {
                project,
                date: parsed.header.date,
                descriptions: parsed.descriptions,
            }
        })
        .collect()
}

/// Split a section body into entries.
///
/// A new entry starts at an emphasized line (bold or larger than body text)
/// following a plain one, or after a vertical gap larger than
/// `entry_gap_ratio` times the median line gap. Blank lines are skipped.
pub(crate) fn split_entries<'a>(
    lines: &'a [Line],
    body_size: f64,
    config: &ParsingConfig,
) -> Vec<Vec<&'a Line>> {
    let lines: Vec<&Line> = lines.iter().filter(|l| !l.is_blank()).collect();
    let typical_gap = median(
        lines
            .windows(2)
            .map(|w| w[1].mean_y() - w[0].mean_y())
            .filter(|g| *g > 0.0)
            .collect(),
    );
    let emphasized = |l: &Line| {
        l.is_bold() || (body_size > 0.0 && l.font_size() >= body_size + SIZE_EMPHASIS_DELTA)
    };

    let mut entries: Vec<Vec<&Line>> = Vec::new();
    let mut current: Vec<&Line> = Vec::new();
    for (i, &line) in lines.iter().enumerate() {
        if i > 0 && !current.is_empty() {
            let prev = lines[i - 1];
            let style_break = emphasized(line) && !emphasized(prev);
            let gap = line.mean_y() - prev.mean_y();
            let gap_break = typical_gap
                .is_some_and(|t| t > 0.0 && gap > config.thresholds.entry_gap_ratio * t);
            if style_break || gap_break {
                entries.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }
    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Scan the leading lines for organization, role and date.
///
/// `scorer` is `None` for entries without a role (projects).
fn parse_entry(
    lines: &[EntryLine],
    scorer: Option<&RoleScorer>,
    config: &ParsingConfig,
) -> ParsedEntry {
    let t = &config.thresholds;
    let window = t.entry_header_lines.min(lines.len());
    let mut header = Header::default();
    let mut leftovers: Vec<String> = Vec::new();
    let mut body_start = 0;

    for line in &lines[..window] {
        if is_bullet(&line.text) {
            break;
        }
        let date_known = !header.date.is_empty();
        let mut fragments = Vec::new();
        let mut used = false;

        let mut text = line.text.clone();
        if !date_known {
            if let Some(m) = find_date(&text, t.min_date_tokens) {
                header.date = m.date;
                text = m.remainder;
                used = true;
            }
        }
        for fragment in split_fragments(&text) {
            if header.date.is_empty() {
                // A fragment of its own may hold a short date, e.g. "Project | 2023".
                if let Some(m) = find_date(&fragment, usize::MAX) {
                    header.date = m.date;
                    used = true;
                    if m.remainder.is_empty() {
                        continue;
                    }
                }
            }
            fragments.push(fragment);
        }

        let mut rest = fragments.into_iter().peekable();
        if header.primary.is_none() {
            if let Some(first) = rest.next() {
                header.primary = Some(Field {
                    text: first,
                    bold: line.bold,
                });
                used = true;
            }
            if scorer.is_some() && header.secondary.is_none() {
                let next = rest
                    .next_if(|f| !LOCATION_RE.is_match(f) && is_title_like(f, t.max_title_words));
                if let Some(next) = next {
                    header.secondary = Some(Field {
                        text: next,
                        bold: line.bold,
                    });
                }
            }
        } else if let Some(scorer) = scorer.filter(|_| header.secondary.is_none()) {
            if let Some(first) = rest.peek() {
                let plausible = is_title_like(first, t.max_title_words)
                    && !LOCATION_RE.is_match(first)
                    && (!date_known || scorer.role_score(first) > 0.0);
                if plausible {
                    header.secondary = rest.next().map(|text| Field {
                        text,
                        bold: line.bold,
                    });
                    used = true;
                } else if LOCATION_RE.is_match(first) && rest.len() == 1 {
                    // Location line between organization and role.
                    rest.next();
                    used = true;
                }
            }
        }

        if !used {
            break;
        }
        leftovers.extend(rest.filter(|f| !LOCATION_RE.is_match(f)));
        body_start += 1;
    }

    let swap = match (scorer, &header.primary, &header.secondary) {
        (Some(scorer), Some(first), Some(second)) => {
            scorer.should_swap((&first.text, first.bold), (&second.text, second.bold))
        }
        _ => false,
    };
    if swap {
        std::mem::swap(&mut header.primary, &mut header.secondary);
    }

    let descriptions = leftovers
        .into_iter()
        .chain(lines[body_start..].iter().map(|l| strip_bullet(&l.text).to_string()))
        .filter(|d| !d.is_empty())
        .collect();

    ParsedEntry {
        header,
        descriptions,
    }
}

impl Header {
    fn fields(&self) -> (String, String) {
        let text = |f: &Option<Field>| f.as_ref().map(|f| f.text.clone()).unwrap_or_default();
        (text(&self.primary), text(&self.secondary))
    }
}

fn split_fragments(text: &str) -> Vec<String> {
    FRAGMENT_SEP_RE
        .split(text)
        .map(trim_fragment)
        .filter(|f| f.chars().any(char::is_alphanumeric))
        .map(str::to_string)
        .collect()
}

fn is_title_like(text: &str, max_words: usize) -> bool {
    let words = text.split_whitespace().count();
    words > 0 && words <= max_words && !text.ends_with(['.', '!', '?']) && !is_bullet(text)
}

/// Pull a GPA out of `text`, returning the value and the remaining text.
fn take_gpa(text: &str) -> Option<(String, String)> {
    let caps = GPA_RE.captures(text)?;
    let whole = caps.get(0)?;
    let value = (1..=3).find_map(|i| caps.get(i))?.as_str().to_string();
    let rest = format!("{} {}", &text[..whole.start()], &text[whole.end()..]);
    let rest = trim_fragment(rest.trim()).split_whitespace().collect::<Vec<_>>().join(" ");
    Some((value, rest))
}
