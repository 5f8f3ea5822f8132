//! Content stream interpretation.
//!
//! Tracks the graphics and text state needed to place text-showing operators
//! on the page: the CTM (`q`/`Q`/`cm`), the text and line matrices, font and
//! size, leading, character and word spacing, horizontal scaling and rise.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};

use resumer_core::TextToken;

/// Kerning adjustments in a `TJ` array beyond this many thousandths of an em
/// read as a word break.
const TJ_SPACE_THRESHOLD: f64 = 200.0;

/// Glyph advance assumed when a font carries no usable `/Widths`.
const DEFAULT_GLYPH_WIDTH: f64 = 500.0;

/// A vertical move of more than this fraction of the previous token's height
/// ends the previous line.
const NEW_LINE_RATIO: f64 = 0.5;

/// Affine matrix `[a b c d e f]` in PDF row-vector convention.
type Matrix = [f64; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn translation(tx: f64, ty: f64) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Follow a reference, or return the object itself.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// What the walker needs to know about one font resource.
pub(crate) struct FontInfo<'a> {
    pub(crate) base_name: String,
    dict: &'a Dictionary,
    first_char: i64,
    widths: Vec<f64>,
    two_byte: bool,
}

impl<'a> FontInfo<'a> {
    pub(crate) fn new(doc: &'a Document, dict: &'a Dictionary) -> Self {
        let base_name = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| strip_subset_prefix(&String::from_utf8_lossy(n)).to_string())
            .unwrap_or_default();
        let two_byte = dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Type0");
        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| resolve(doc, o).as_i64().ok())
            .unwrap_or(0);
        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .map(|arr| arr.iter().map(|w| number(resolve(doc, w)).unwrap_or(0.0)).collect())
            .unwrap_or_default();
        Self {
            base_name,
            dict,
            first_char,
            widths,
            two_byte,
        }
    }

    fn glyph_width(&self, code: u8) -> f64 {
        let index = i64::from(code) - self.first_char;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.widths.get(i))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_GLYPH_WIDTH)
    }
}

/// Drop the `ABCDEF+` prefix of subset fonts.
pub(crate) fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

#[derive(Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<Vec<u8>>,
    size: f64,
    leading: f64,
    char_spacing: f64,
    word_spacing: f64,
    horizontal_scale: f64,
    rise: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: IDENTITY,
            font: None,
            size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            rise: 0.0,
        }
    }
}

/// Page geometry: the visible box origin and its top edge, in user space.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageBox {
    pub(crate) left: f64,
    pub(crate) top: f64,
}

pub(crate) struct ContentWalker<'a> {
    doc: &'a Document,
    fonts: BTreeMap<Vec<u8>, FontInfo<'a>>,
    page_box: PageBox,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    tm: Matrix,
    tlm: Matrix,
    tokens: Vec<TextToken>,
}

impl<'a> ContentWalker<'a> {
    pub(crate) fn new(
        doc: &'a Document,
        fonts: BTreeMap<Vec<u8>, FontInfo<'a>>,
        page_box: PageBox,
    ) -> Self {
        Self {
            doc,
            fonts,
            page_box,
            state: GraphicsState::default(),
            stack: Vec::new(),
            tm: IDENTITY,
            tlm: IDENTITY,
            tokens: Vec::new(),
        }
    }

    /// Interpret `content` and return the text tokens in stream order.
    pub(crate) fn walk(mut self, content: &Content) -> Vec<TextToken> {
        for op in &content.operations {
            let nums: Vec<f64> = op.operands.iter().filter_map(number).collect();
            match op.operator.as_str() {
                "q" => self.stack.push(self.state.clone()),
                "Q" => {
                    if let Some(saved) = self.stack.pop() {
                        self.state = saved;
                    }
                }
                "cm" if nums.len() == 6 => {
                    let m = [nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]];
                    self.state.ctm = multiply(&m, &self.state.ctm);
                }
                "BT" => {
                    self.tm = IDENTITY;
                    self.tlm = IDENTITY;
                }
                "ET" => {}
                "Tf" => {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        self.state.font = Some(name.clone());
                    }
                    if let Some(size) = op.operands.get(1).and_then(number) {
                        self.state.size = size;
                    }
                }
                "TL" if !nums.is_empty() => self.state.leading = nums[0],
                "Tc" if !nums.is_empty() => self.state.char_spacing = nums[0],
                "Tw" if !nums.is_empty() => self.state.word_spacing = nums[0],
                "Tz" if !nums.is_empty() => self.state.horizontal_scale = nums[0] / 100.0,
                "Ts" if !nums.is_empty() => self.state.rise = nums[0],
                "Td" if nums.len() == 2 => self.move_line(nums[0], nums[1]),
                "TD" if nums.len() == 2 => {
                    self.state.leading = -nums[1];
                    self.move_line(nums[0], nums[1]);
                }
                "Tm" if nums.len() == 6 => {
                    self.tlm = [nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]];
                    self.tm = self.tlm;
                }
                "T*" => self.next_line(),
                "Tj" => {
                    if let Some(s @ Object::String(..)) = op.operands.first() {
                        self.show(std::slice::from_ref(s));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = op.operands.first() {
                        self.show(items);
                    }
                }
                "'" => {
                    self.next_line();
                    if let Some(s @ Object::String(..)) = op.operands.first() {
                        self.show(std::slice::from_ref(s));
                    }
                }
                "\"" => {
                    if let (Some(aw), Some(ac)) = (
                        op.operands.first().and_then(number),
                        op.operands.get(1).and_then(number),
                    ) {
                        self.state.word_spacing = aw;
                        self.state.char_spacing = ac;
                    }
                    self.next_line();
                    if let Some(s @ Object::String(..)) = op.operands.get(2) {
                        self.show(std::slice::from_ref(s));
                    }
                }
                _ => {}
            }
        }

        if let Some(last) = self.tokens.last_mut() {
            last.has_end_of_line = true;
        }
        self.tokens
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.tlm = multiply(&translation(tx, ty), &self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    /// Show a sequence of strings and kerning adjustments as one token.
    fn show(&mut self, items: &[Object]) {
        let s = &self.state;
        let font = s.font.as_ref().and_then(|name| self.fonts.get(name));
        let encoding = font.and_then(|f| f.dict.get_font_encoding(self.doc).ok());

        let start = multiply(&self.tm, &s.ctm);
        let mut text = String::new();
        let mut advance = 0.0;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = encoding
                        .as_ref()
                        .and_then(|enc| Document::decode_text(enc, bytes).ok())
                        .unwrap_or_else(|| decode_text_simple(bytes));
                    advance += self.string_advance(font, bytes, &decoded);
                    text.push_str(&decoded);
                }
                other => {
                    if let Some(adjust) = number(other) {
                        advance -= adjust / 1000.0 * s.size * s.horizontal_scale;
                        if -adjust > TJ_SPACE_THRESHOLD && !text.is_empty() && !text.ends_with(' ')
                        {
                            text.push(' ');
                        }
                    }
                }
            }
        }

        self.tm = multiply(&translation(advance, 0.0), &self.tm);

        if text.is_empty() {
            return;
        }

        let render = multiply(
            &[s.size * s.horizontal_scale, 0.0, 0.0, s.size, 0.0, s.rise],
            &start,
        );
        let height = (render[2] * render[2] + render[3] * render[3]).sqrt();
        let x_scale = (start[0] * start[0] + start[1] * start[1]).sqrt();
        let token = TextToken {
            text,
            x: render[4] - self.page_box.left,
            y: self.page_box.top - render[5],
            width: advance * x_scale,
            height,
            font_name: font.map(|f| f.base_name.clone()).unwrap_or_default(),
            has_end_of_line: false,
        };

        if let Some(prev) = self.tokens.last_mut() {
            if (token.y - prev.y).abs() > NEW_LINE_RATIO * prev.height.max(f64::EPSILON) {
                prev.has_end_of_line = true;
            }
        }
        self.tokens.push(token);
    }

    /// Horizontal advance of one string in unscaled text space.
    fn string_advance(&self, font: Option<&FontInfo<'_>>, bytes: &[u8], decoded: &str) -> f64 {
        let s = &self.state;
        let two_byte = font.is_some_and(|f| f.two_byte);
        let glyphs: Vec<(f64, bool)> = if two_byte {
            decoded.chars().map(|c| (DEFAULT_GLYPH_WIDTH, c == ' ')).collect()
        } else {
            bytes
                .iter()
                .map(|&b| {
                    let w = font.map_or(DEFAULT_GLYPH_WIDTH, |f| f.glyph_width(b));
                    (w, b == b' ')
                })
                .collect()
        };
        glyphs
            .iter()
            .map(|&(w, is_space)| {
                let word = if is_space && !two_byte {
                    s.word_spacing
                } else {
                    0.0
                };
                let spacing = s.char_spacing + word;
                (w / 1000.0 * s.size + spacing) * s.horizontal_scale
            })
            .sum()
    }
}

/// Fallback decoding when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_multiply_composes_translation() {
        let scaled = multiply(&translation(10.0, 20.0), &[2.0, 0.0, 0.0, 2.0, 5.0, 5.0]);
        assert_eq!(scaled, [2.0, 0.0, 0.0, 2.0, 25.0, 45.0]);
    }

    #[test]
    fn subset_prefix_is_stripped() {
        assert_eq!(strip_subset_prefix("ABCDEF+Calibri-Bold"), "Calibri-Bold");
        assert_eq!(strip_subset_prefix("Helvetica"), "Helvetica");
        assert_eq!(strip_subset_prefix("My+Font"), "My+Font");
    }

    #[test]
    fn simple_decoding() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
        assert_eq!(decode_text_simple(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }

    #[test]
    fn numbers_from_objects() {
        assert_eq!(number(&Object::Integer(3)), Some(3.0));
        assert_eq!(number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(number(&Object::Name(b"F1".to_vec())), None);
    }
}
