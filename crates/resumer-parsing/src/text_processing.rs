use once_cell::sync::Lazy;
use regex::Regex;

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Collapse runs of hyphen-like characters into a single ASCII hyphen.
///
/// PDF producers emit soft hyphens (U+00AD) and Unicode hyphens (U+2010,
/// U+2011) alongside or instead of `-`; `"-\u{AD}\u{2010}"` becomes `"-"`.
pub fn collapse_hyphens(text: &str) -> String {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\u{AD}\u{2010}\u{2011}]+").unwrap());
    RE.replace_all(text, "-").into_owned()
}

/// Normalize the text of a freshly decoded token.
pub fn normalize_token_text(text: &str) -> String {
    collapse_hyphens(&expand_ligatures(text))
}

/// Strip a leading bullet glyph (and the whitespace after it).
///
/// `-` and `*` only count as bullets when followed by whitespace, so
/// `"-5% latency"` is left alone.
pub fn strip_bullet(text: &str) -> &str {
    match BULLET_RE.find(text) {
        Some(m) => text[m.end()..].trim(),
        None => text.trim(),
    }
}

/// Whether the line starts with a bullet glyph.
pub fn is_bullet(text: &str) -> bool {
    BULLET_RE.is_match(text)
}

static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[•◦▪▫‣●○■□·∙➢►▸✓❖]+|[-*–](?:\s|$))\s*").unwrap()
});

/// Lowercase, turn punctuation into spaces and collapse whitespace.
///
/// `"Work Experience:"` → `"work experience"`, `"SKILLS & TOOLS"` → `"skills tools"`.
pub fn normalize_phrase(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c.to_lowercase().next().unwrap_or(c) } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase a word and drop everything but letters and digits: `"Ph.D."` → `"phd"`.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Trim whitespace and dangling separators from both ends of a fragment.
pub fn trim_fragment(text: &str) -> &str {
    text.trim_matches(|c: char| {
        c.is_whitespace()
            || matches!(
                c,
                ',' | ';' | ':' | '|' | '-' | '–' | '—' | '•' | '·' | '(' | ')'
            )
    })
}
