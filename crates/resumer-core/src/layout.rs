//! Positioned text primitives shared by every pipeline stage.
//!
//! Coordinates are in document space: `x` grows rightwards from the left
//! page edge, `y` is the baseline and grows downwards from the top of the
//! first page, with each page stacked below the previous one.

use serde::{Deserialize, Serialize};

/// A positioned run of text as decoded from the page content stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToken {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub font_name: String,
    #[serde(default)]
    pub has_end_of_line: bool,
}

impl TextToken {
    /// Right edge of the token.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Whether this token's font is a bold face.
    pub fn is_bold(&self) -> bool {
        is_bold_font(&self.font_name)
    }
}

/// Whether a PostScript font name denotes a bold weight.
///
/// Subset prefixes (`ABCDEF+`) are ignored since the check is substring based.
pub fn is_bold_font(font_name: &str) -> bool {
    let lower = font_name.to_ascii_lowercase();
    ["bold", "black", "heavy", "semibold", "demi"]
        .iter()
        .any(|w| lower.contains(w))
}

/// Axis-aligned box in document space. `top` < `bottom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// One visual row of tokens, ordered left to right.
///
/// All derived attributes are computed once at construction; a `Line` is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    tokens: Vec<TextToken>,
    text: String,
    font_size: f64,
    bbox: BoundingBox,
    mean_y: f64,
    is_bold: bool,
}

impl Line {
    /// Build a line from tokens already sorted by `x`.
    ///
    /// `word_gap_ratio` is the fraction of the average character width a
    /// horizontal gap must exceed before a space is inserted between tokens.
    pub fn new(tokens: Vec<TextToken>, word_gap_ratio: f64) -> Self {
        let text = render_text(&tokens, word_gap_ratio);
        let font_size = dominant_height(&tokens);
        let bbox = bounding_box(&tokens);
        let mean_y = if tokens.is_empty() {
            0.0
        } else {
            tokens.iter().map(|t| t.y).sum::<f64>() / tokens.len() as f64
        };

        // Bold when most of the visible characters are set in a bold face.
        let (bold_chars, total_chars) = tokens.iter().fold((0usize, 0usize), |(b, n), t| {
            let chars = t.text.chars().filter(|c| !c.is_whitespace()).count();
            (if t.is_bold() { b + chars } else { b }, n + chars)
        });
        let is_bold = total_chars > 0 && bold_chars * 2 >= total_chars;

        Self {
            tokens,
            text,
            font_size,
            bbox,
            mean_y,
            is_bold,
        }
    }

    pub fn tokens(&self) -> &[TextToken] {
        &self.tokens
    }

    /// Rendered text, trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Height that covers the most characters on the line.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn mean_y(&self) -> f64 {
        self.mean_y
    }

    pub fn is_bold(&self) -> bool {
        self.is_bold
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

fn render_text(tokens: &[TextToken], word_gap_ratio: f64) -> String {
    let (width_sum, char_sum) = tokens.iter().fold((0.0, 0usize), |(w, n), t| {
        (w + t.width, n + t.text.chars().count())
    });
    let avg_char_width = if char_sum > 0 && width_sum > 0.0 {
        width_sum / char_sum as f64
    } else {
        dominant_height(tokens) * 0.5
    };
    let min_gap = word_gap_ratio * avg_char_width;

    let mut out = String::new();
    let mut prev: Option<&TextToken> = None;
    for token in tokens {
        if let Some(p) = prev {
            let gap = token.x - p.right();
            let joined_by_space = p.text.ends_with(char::is_whitespace)
                || token.text.starts_with(char::is_whitespace);
            if gap > min_gap && !joined_by_space {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        prev = Some(token);
    }
    out.trim().to_string()
}

fn dominant_height(tokens: &[TextToken]) -> f64 {
    let mut weights: Vec<(f64, usize)> = Vec::new();
    for token in tokens {
        let chars = token.text.chars().filter(|c| !c.is_whitespace()).count().max(1);
        match weights
            .iter_mut()
            .find(|(h, _)| (*h - token.height).abs() < f64::EPSILON)
        {
            Some((_, n)) => *n += chars,
            None => weights.push((token.height, chars)),
        }
    }
    weights
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.total_cmp(&b.0)))
        .map(|(h, _)| h)
        .unwrap_or(0.0)
}

fn bounding_box(tokens: &[TextToken]) -> BoundingBox {
    let mut iter = tokens.iter();
    let Some(first) = iter.next() else {
        return BoundingBox::default();
    };
    let init = BoundingBox {
        left: first.x,
        top: first.y - first.height,
        right: first.right(),
        bottom: first.y,
    };
    iter.fold(init, |b, t| BoundingBox {
        left: b.left.min(t.x),
        top: b.top.min(t.y - t.height),
        right: b.right.max(t.right()),
        bottom: b.bottom.max(t.y),
    })
}

/// Semantic label of a [`Section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Profile,
    WorkExperience,
    Education,
    Projects,
    Skills,
    Custom,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Profile => "profile",
            SectionKind::WorkExperience => "work_experience",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
            SectionKind::Skills => "skills",
            SectionKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous run of lines sharing one label.
///
/// For every kind except [`SectionKind::Profile`] the first line is the
/// heading and `title` holds its text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub lines: Vec<Line>,
}

impl Section {
    /// Lines after the heading.
    pub fn body(&self) -> &[Line] {
        match self.kind {
            SectionKind::Profile => &self.lines,
            _ => self.lines.get(1..).unwrap_or(&[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str, x: f64, width: f64, height: f64, font: &str) -> TextToken {
        TextToken {
            text: text.to_string(),
            x,
            y: 100.0,
            width,
            height,
            font_name: font.to_string(),
            has_end_of_line: false,
        }
    }

    #[test]
    fn bold_font_names() {
        assert!(is_bold_font("ABCDEF+Helvetica-Bold"));
        assert!(is_bold_font("OpenSans-SemiBold"));
        assert!(is_bold_font("Lato-Black"));
        assert!(!is_bold_font("Times-Roman"));
        assert!(!is_bold_font(""));
    }

    #[test]
    fn gap_inserts_space() {
        let line = Line::new(
            vec![
                tok("Jane", 10.0, 20.0, 10.0, "Helvetica"),
                tok("Doe", 34.0, 15.0, 10.0, "Helvetica"),
            ],
            0.25,
        );
        assert_eq!(line.text(), "Jane Doe");
    }

    #[test]
    fn touching_tokens_concatenate() {
        let line = Line::new(
            vec![
                tok("Soft", 10.0, 20.0, 10.0, "Helvetica"),
                tok("ware", 30.0, 20.0, 10.0, "Helvetica"),
            ],
            0.25,
        );
        assert_eq!(line.text(), "Software");
    }

    #[test]
    fn existing_whitespace_not_doubled() {
        let line = Line::new(
            vec![
                tok("Jane ", 10.0, 25.0, 10.0, "Helvetica"),
                tok("Doe", 60.0, 15.0, 10.0, "Helvetica"),
            ],
            0.25,
        );
        assert_eq!(line.text(), "Jane Doe");
    }

    #[test]
    fn dominant_size_weighted_by_characters() {
        let line = Line::new(
            vec![
                tok("A", 0.0, 8.0, 16.0, "Helvetica"),
                tok("longer body text", 20.0, 80.0, 10.0, "Helvetica"),
            ],
            0.25,
        );
        assert_eq!(line.font_size(), 10.0);
    }

    #[test]
    fn bold_by_majority() {
        let line = Line::new(
            vec![
                tok("Skills:", 0.0, 30.0, 10.0, "Helvetica-Bold"),
                tok("Rust, Go, Python and TypeScript", 35.0, 150.0, 10.0, "Helvetica"),
            ],
            0.25,
        );
        assert!(!line.is_bold());

        let heading = Line::new(vec![tok("EDUCATION", 0.0, 60.0, 12.0, "Arial-BoldMT")], 0.25);
        assert!(heading.is_bold());
    }

    #[test]
    fn bbox_spans_tokens() {
        let line = Line::new(
            vec![
                tok("a", 10.0, 5.0, 10.0, ""),
                tok("b", 40.0, 5.0, 12.0, ""),
            ],
            0.25,
        );
        let b = line.bbox();
        assert_eq!(b.left, 10.0);
        assert_eq!(b.right, 45.0);
        assert_eq!(b.top, 88.0);
        assert_eq!(b.bottom, 100.0);
    }

    #[test]
    fn section_body_skips_heading() {
        let heading = Line::new(vec![tok("SKILLS", 0.0, 40.0, 14.0, "")], 0.25);
        let body = Line::new(vec![tok("Rust", 0.0, 20.0, 10.0, "")], 0.25);
        let section = Section {
            kind: SectionKind::Skills,
            title: "SKILLS".into(),
            lines: vec![heading, body.clone()],
        };
        assert_eq!(section.body(), &[body.clone()]);

        let profile = Section {
            kind: SectionKind::Profile,
            title: String::new(),
            lines: vec![body],
        };
        assert_eq!(profile.body().len(), 1);
    }

    #[test]
    fn token_json_uses_camel_case() {
        let json = r#"{"text":"Hi","x":1,"y":2,"width":3,"height":4,"fontName":"F1","hasEndOfLine":true}"#;
        let token: TextToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.font_name, "F1");
        assert!(token.has_end_of_line);
    }
}
