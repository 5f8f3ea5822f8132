use once_cell::sync::Lazy;
use regex::Regex;

use crate::text_processing::trim_fragment;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
const SEASON: &str = r"(?:spring|summer|fall|autumn|winter)";
const YEAR: &str = r"(?:19|20)\d{2}";
const OPEN_END: &str = r"(?:present|current|now|today|ongoing)";

/// A single date point: `Jan 2021`, `Fall 2019`, `03/2020` or `2020`.
fn point() -> String {
    format!(r"(?:(?:{MONTH}|{SEASON})\s+'?{YEAR}|\d{{1,2}}/{YEAR}|{YEAR})")
}

/// A date point or a range of them, optionally open-ended.
static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    let point = point();
    Regex::new(&format!(
        r"(?i)\b{point}(?:\s*(?:-|–|—|to|until)\s*(?:{point}|{OPEN_END}))?\b|\b{OPEN_END}\b"
    ))
    .unwrap()
});

/// One countable date word inside a match.
static DATE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTH}|{SEASON}|\d{{1,2}}/{YEAR}|{YEAR}|{OPEN_END})(?:\b|$)"
    ))
    .unwrap()
});

/// A date found in a line, with the line text left over after cutting it out.
#[derive(Debug, Clone, PartialEq)]
pub struct DateMatch {
    pub date: String,
    pub remainder: String,
}

/// Number of date words (months, seasons, years, "Present", ...) in `text`.
pub fn count_date_tokens(text: &str) -> usize {
    DATE_TOKEN_RE.find_iter(text).count()
}

/// Find the first acceptable date in `text`.
///
/// A match spanning the whole line (modulo separators) needs one date token;
/// a match embedded in other text needs at least `min_embedded_tokens`, so a
/// stray year inside a sentence is not mistaken for the entry date.
pub fn find_date(text: &str, min_embedded_tokens: usize) -> Option<DateMatch> {
    for m in DATE_RANGE_RE.find_iter(text) {
        let tokens = count_date_tokens(m.as_str());
        if tokens == 0 {
            continue;
        }

        let before = trim_fragment(&text[..m.start()]);
        let after = trim_fragment(&text[m.end()..]);
        let whole_line = before.is_empty() && after.is_empty();

        if whole_line || tokens >= min_embedded_tokens {
            let remainder = match (before.is_empty(), after.is_empty()) {
                (true, true) => String::new(),
                (false, true) => before.to_string(),
                (true, false) => after.to_string(),
                (false, false) => format!("{before} | {after}"),
            };
            return Some(DateMatch {
                date: m.as_str().trim().to_string(),
                remainder,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_of(text: &str) -> Option<String> {
        find_date(text, 2).map(|m| m.date)
    }

    #[test]
    fn whole_line_ranges() {
        assert_eq!(date_of("Jan 2021 - Present").as_deref(), Some("Jan 2021 - Present"));
        assert_eq!(date_of("2015 – 2019").as_deref(), Some("2015 – 2019"));
        assert_eq!(date_of("September 2018 to May 2020").as_deref(), Some("September 2018 to May 2020"));
        assert_eq!(date_of("06/2019 - 08/2019").as_deref(), Some("06/2019 - 08/2019"));
        assert_eq!(date_of("(Fall 2020)").as_deref(), Some("Fall 2020"));
    }

    #[test]
    fn single_year_whole_line_accepted() {
        assert_eq!(date_of("2021").as_deref(), Some("2021"));
        assert_eq!(date_of("Present").as_deref(), Some("Present"));
    }

    #[test]
    fn embedded_needs_enough_tokens() {
        let m = find_date("Acme Corp Jan 2021 - Present", 2).unwrap();
        assert_eq!(m.date, "Jan 2021 - Present");
        assert_eq!(m.remainder, "Acme Corp");

        assert!(find_date("Grew revenue in 2021 by 40%", 2).is_none());
        assert!(find_date("Grew revenue in 2021 by 40%", 1).is_some());
    }

    #[test]
    fn remainder_joins_both_sides() {
        let m = find_date("Acme Corp | 2019 - 2021 | Berlin", 2).unwrap();
        assert_eq!(m.remainder, "Acme Corp | Berlin");
    }

    #[test]
    fn no_date() {
        assert!(date_of("Software Engineer").is_none());
        assert!(date_of("Call 555-1234").is_none());
    }

    #[test]
    fn counts_tokens() {
        assert_eq!(count_date_tokens("Jan 2021 - Present"), 3);
        assert_eq!(count_date_tokens("2015 - 2019"), 2);
    }
}
