use resumer_core::{ExtractionError, PageTextSource, TextToken};

use crate::text_processing::normalize_token_text;

/// Flatten every page of `source` into one ordered token sequence.
///
/// Pages are read strictly in order. Page-local `y` values are shifted by
/// the cumulative height of the preceding pages so that document order is
/// non-decreasing `y`. Token text is normalized (ligatures, hyphen runs) and
/// whitespace-only tokens that do not end a line are dropped.
///
/// Fails with [`ExtractionError::NoText`] when no token carries visible text.
pub fn extract_tokens(source: &dyn PageTextSource) -> Result<Vec<TextToken>, ExtractionError> {
    let page_count = source.page_count();
    let mut tokens = Vec::new();
    let mut page_offset = 0.0;

    for index in 0..page_count {
        let page = source.page(index)?;
        let before = tokens.len();
        for token in page.tokens {
            let text = normalize_token_text(&token.text);
            if !token.has_end_of_line && text.trim().is_empty() {
                continue;
            }
            tokens.push(TextToken {
                text,
                y: token.y + page_offset,
                ..token
            });
        }
        tracing::trace!(page = index, tokens = tokens.len() - before, "decoded page");
        page_offset += page.height;
    }

    tracing::debug!(pages = page_count, tokens = tokens.len(), "extracted text tokens");

    if tokens.iter().all(|t| t.text.trim().is_empty()) {
        return Err(ExtractionError::NoText);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resumer_core::{InMemorySource, PageText};

    fn tok(text: &str, y: f64, eol: bool) -> TextToken {
        TextToken {
            text: text.to_string(),
            x: 0.0,
            y,
            width: 10.0,
            height: 10.0,
            font_name: "Helvetica".into(),
            has_end_of_line: eol,
        }
    }

    #[test]
    fn pages_are_stacked() {
        let source = InMemorySource::new(vec![
            PageText {
                height: 792.0,
                tokens: vec![tok("first", 100.0, false)],
            },
            PageText {
                height: 792.0,
                tokens: vec![tok("second", 50.0, false)],
            },
        ]);
        let tokens = extract_tokens(&source).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].y, 100.0);
        assert_eq!(tokens[1].y, 842.0);
    }

    #[test]
    fn whitespace_noise_dropped_but_eol_kept() {
        let source = InMemorySource::single_page(
            792.0,
            vec![tok("a", 10.0, false), tok("  ", 10.0, false), tok("", 10.0, true)],
        );
        let tokens = extract_tokens(&source).unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].has_end_of_line);
    }

    #[test]
    fn text_is_normalized() {
        let source =
            InMemorySource::single_page(792.0, vec![tok("\u{FB01}t -\u{AD} in", 10.0, false)]);
        let tokens = extract_tokens(&source).unwrap();
        assert_eq!(tokens[0].text, "fit - in");
    }

    #[test]
    fn empty_document_is_no_text() {
        let source = InMemorySource::default();
        assert!(matches!(extract_tokens(&source), Err(ExtractionError::NoText)));

        let blank = InMemorySource::single_page(792.0, vec![tok(" ", 10.0, false)]);
        assert!(matches!(extract_tokens(&blank), Err(ExtractionError::NoText)));

        let line_ends_only = InMemorySource::single_page(792.0, vec![tok("", 10.0, true)]);
        assert!(matches!(
            extract_tokens(&line_ends_only),
            Err(ExtractionError::NoText)
        ));
    }
}
