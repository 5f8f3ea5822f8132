use once_cell::sync::Lazy;
use regex::Regex;

use resumer_core::{Line, ResumeProfile};

use crate::config::ParsingConfig;
use crate::scoring::RoleScorer;
use crate::sections::{HeadingClass, Vocabulary};
use crate::text_processing::{strip_bullet, trim_fragment};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}").unwrap()
});

/// Scheme or `www.` URLs, lowercase bare domains, and any bare domain with a
/// path. Mixed-case dotted words (`ASP.NET`, `Socket.IO`) are not URLs.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i:\bhttps?://[^\s|•·,]+|\bwww\.[^\s|•·,]+)|\b(?i:[a-z0-9\-]+\.)+(?i:com|org|net|io|dev|me|edu|app|co|ai|info|xyz|tech)/[^\s|•·,]+|\b(?:[a-z0-9\-]+\.)+(?:com|org|net|io|dev|me|edu|app|co|ai|info|xyz|tech)\b",
    )
    .unwrap()
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+\d[\d\s().\-]{6,}\d|\(?\b\d{3}\)?[\s.\-]?\d{3}[\s.\-]?\d{4}\b").unwrap()
});

/// `City, ST` or `City, Region`, optionally with a postal code. The region is
/// a two-letter code or a known state or country name.
pub(crate) static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^[A-Z][A-Za-z.'\-]*(?: [A-Z][A-Za-z.'\-]*){{0,3}}, ?(?:[A-Z]{{2}}|{})(?: \d{{5}}(?:-\d{{4}})?)?$",
        REGIONS.join("|")
    ))
    .unwrap()
});

const REGIONS: &[&str] = &[
    "USA", "United States", "United Kingdom", "England", "Scotland", "Ireland", "Canada",
    "Australia", "New Zealand", "India", "China", "Japan", "Korea", "Singapore", "Germany",
    "France", "Spain", "Italy", "Netherlands", "Sweden", "Norway", "Denmark", "Finland",
    "Switzerland", "Austria", "Poland", "Portugal", "Brazil", "Mexico", "Argentina", "Israel",
    "Ontario", "Quebec", "British Columbia", "California", "Texas", "New York", "Washington",
    "Massachusetts", "Illinois", "Florida", "Georgia", "Colorado", "Oregon", "Virginia",
    "Pennsylvania", "North Carolina", "New Jersey", "Michigan", "Ohio", "Minnesota", "Arizona",
];

/// Splits what is left of a line into fragments.
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*(?:[|•·◦▪\t]|\s{2,})\s*").unwrap());

const PLACEHOLDER: &str = "  ";

/// Extract the profile from the lines of the Profile section.
///
/// Email and phone are claimed by regex (first match kept, every match
/// removed from the text). The leftover text is split at separators.
/// Sentence-like fragments after the name go to the summary verbatim; the
/// rest give up a URL, then the first place-like piece becomes the location
/// and the first name-like one the name.
pub fn extract_profile(lines: &[Line], config: &ParsingConfig) -> ResumeProfile {
    let vocabulary = Vocabulary::from_config(config);
    let roles = RoleScorer::work(config);
    let t = &config.thresholds;
    let mut profile = ResumeProfile::default();
    let mut summary: Vec<String> = Vec::new();

    for line in lines.iter().filter(|l| !l.is_blank()) {
        if line.word_count() <= t.max_heading_words
            && vocabulary.classify(line.text()) == Some(HeadingClass::Profile)
        {
            continue;
        }

        let mut rest = strip_bullet(line.text()).to_string();
        rest = claim(&EMAIL_RE, &rest, &mut profile.email);
        rest = claim_phone(&rest, &mut profile.phone);

        for fragment in SEPARATOR_RE.split(&rest) {
            let fragment = trim_fragment(fragment);
            if !fragment.chars().any(char::is_alphanumeric) {
                continue;
            }
            if !profile.name.is_empty() && is_summary_like(fragment, t.summary_min_words) {
                summary.push(fragment.to_string());
                continue;
            }

            let rest = claim(&URL_RE, fragment, &mut profile.url);
            for piece in SEPARATOR_RE.split(&rest) {
                let piece = trim_fragment(piece);
                if piece.is_empty() || !piece.chars().any(char::is_alphanumeric) {
                    continue;
                }
                if profile.location.is_empty()
                    && LOCATION_RE.is_match(piece)
                    && roles.role_score(piece) == 0.0
                {
                    profile.location = piece.to_string();
                } else if profile.name.is_empty() && is_name_like(piece, t.max_name_words) {
                    profile.name = piece.to_string();
                }
            }
        }
    }

    profile.summary = summary.join(" ");
    profile
}

/// Keep the first match of `re` in `slot`, blank out every match.
fn claim(re: &Regex, text: &str, slot: &mut String) -> String {
    if slot.is_empty() {
        if let Some(m) = re.find(text) {
            *slot = m.as_str().trim_end_matches(['.', ')']).to_string();
        }
    }
    re.replace_all(text, PLACEHOLDER).into_owned()
}

fn claim_phone(text: &str, slot: &mut String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in PHONE_RE.find_iter(text) {
        let digits = m.as_str().chars().filter(char::is_ascii_digit).count();
        if !(7..=15).contains(&digits) {
            continue;
        }
        if slot.is_empty() {
            *slot = m.as_str().trim().to_string();
        }
        out.push_str(&text[last..m.start()]);
        out.push_str(PLACEHOLDER);
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

fn is_name_like(fragment: &str, max_words: usize) -> bool {
    let words = fragment.split_whitespace().count();
    (1..=max_words).contains(&words)
        && fragment.chars().any(char::is_alphabetic)
        && fragment
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '.' | '\'' | '-' | ','))
        && fragment.chars().next().is_some_and(char::is_uppercase)
}

fn is_summary_like(fragment: &str, min_words: usize) -> bool {
    fragment.split_whitespace().count() >= min_words || fragment.ends_with(['.', '!', '?'])
}
