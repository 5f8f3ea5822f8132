use std::collections::BTreeMap;

use resumer_core::{Line, TextToken};

use crate::config::ParsingConfig;

/// Cluster tokens sharing a visual row into lines.
///
/// Walks tokens in extraction order. A token joins the current line while
/// its baseline stays within `line_y_tolerance_ratio` of the tallest token on
/// the line; an end-of-line flag closes the line after the flagged token.
/// Tokens of each line are stably sorted by `x`, then lines are stably sorted
/// by mean `y`. Zero tokens yield zero lines.
pub fn group_lines(tokens: &[TextToken], config: &ParsingConfig) -> Vec<Line> {
    let tolerance = config.thresholds.line_y_tolerance_ratio;
    let word_gap = config.thresholds.word_gap_ratio;

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<TextToken> = Vec::new();
    let mut baseline = 0.0;
    let mut max_height: f64 = 0.0;

    let flush = |current: &mut Vec<TextToken>, lines: &mut Vec<Line>| {
        if current.is_empty() {
            return;
        }
        let mut row = std::mem::take(current);
        row.sort_by(|a, b| a.x.total_cmp(&b.x));
        lines.push(Line::new(row, word_gap));
    };

    for token in tokens {
        if !current.is_empty() {
            let band = tolerance * max_height.max(token.height);
            if (token.y - baseline).abs() > band {
                flush(&mut current, &mut lines);
            }
        }
        if current.is_empty() {
            baseline = token.y;
            max_height = token.height;
        } else {
            max_height = max_height.max(token.height);
        }

        current.push(token.clone());
        if token.has_end_of_line {
            flush(&mut current, &mut lines);
        }
    }
    flush(&mut current, &mut lines);

    lines.sort_by(|a, b| a.mean_y().total_cmp(&b.mean_y()));
    tracing::debug!(tokens = tokens.len(), lines = lines.len(), "grouped lines");
    lines
}

/// Body text size: the most common dominant font size among non-blank lines,
/// rounded to half a point. Ties go to the smaller size.
pub fn body_font_size(lines: &[Line]) -> f64 {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for line in lines.iter().filter(|l| !l.is_blank()) {
        *counts.entry((line.font_size() * 2.0).round() as i64).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(half_points, _)| half_points as f64 / 2.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str, x: f64, y: f64, height: f64, eol: bool) -> TextToken {
        TextToken {
            text: text.to_string(),
            x,
            y,
            width: text.len() as f64 * height * 0.5,
            height,
            font_name: "Helvetica".into(),
            has_end_of_line: eol,
        }
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text()).collect()
    }

    #[test]
    fn same_baseline_forms_one_line() {
        let tokens = vec![
            tok("Jane", 10.0, 100.0, 10.0, false),
            tok("Doe", 40.0, 100.5, 10.0, false),
            tok("Next", 10.0, 114.0, 10.0, false),
        ];
        let lines = group_lines(&tokens, &ParsingConfig::default());
        assert_eq!(texts(&lines), vec!["Jane Doe", "Next"]);
    }

    #[test]
    fn tokens_sorted_by_x() {
        let tokens = vec![
            tok("Doe", 40.0, 100.0, 10.0, false),
            tok("Jane", 10.0, 100.0, 10.0, false),
        ];
        let lines = group_lines(&tokens, &ParsingConfig::default());
        assert_eq!(texts(&lines), vec!["Jane Doe"]);
    }

    #[test]
    fn end_of_line_forces_break() {
        let tokens = vec![
            tok("left", 10.0, 100.0, 10.0, true),
            tok("right", 200.0, 100.0, 10.0, false),
        ];
        let lines = group_lines(&tokens, &ParsingConfig::default());
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn out_of_order_lines_resorted_by_y() {
        let tokens = vec![
            tok("bottom", 10.0, 300.0, 10.0, false),
            tok("top", 10.0, 100.0, 10.0, false),
        ];
        let lines = group_lines(&tokens, &ParsingConfig::default());
        assert_eq!(texts(&lines), vec!["top", "bottom"]);
    }

    #[test]
    fn taller_token_widens_band() {
        // 6pt apart: outside 0.5 * 10 but inside 0.5 * 14.
        let tokens = vec![
            tok("big", 10.0, 100.0, 14.0, false),
            tok("small", 60.0, 106.0, 10.0, false),
        ];
        let lines = group_lines(&tokens, &ParsingConfig::default());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn no_tokens_no_lines() {
        assert!(group_lines(&[], &ParsingConfig::default()).is_empty());
    }

    #[test]
    fn body_size_is_mode() {
        let tokens = vec![
            tok("Name", 10.0, 50.0, 18.0, true),
            tok("a", 10.0, 100.0, 10.0, true),
            tok("b", 10.0, 120.0, 10.0, true),
            tok("HEADING", 10.0, 140.0, 14.0, true),
            tok("c", 10.0, 160.0, 10.2, true),
        ];
        let lines = group_lines(&tokens, &ParsingConfig::default());
        assert_eq!(body_font_size(&lines), 10.0);
        assert_eq!(body_font_size(&[]), 0.0);
    }
}
