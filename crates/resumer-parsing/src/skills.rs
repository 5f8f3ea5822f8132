use once_cell::sync::Lazy;
use regex::Regex;

use resumer_core::{FeaturedSkill, Line, ResumeSkills};

use crate::config::ParsingConfig;
use crate::text_processing::{is_bullet, strip_bullet, trim_fragment};

/// `Rust: 4`, `Python - 4/5`, `Go – 8`.
static NUMERIC_RATING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s*[:\-–]\s*(\d{1,2}(?:\.\d)?)\s*(?:/\s*(\d{1,2}))?\s*$").unwrap()
});

/// `Rust ●●●●○`, `Python ★★★☆☆`.
static GLYPH_RATING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*[:\-–]?\s*([●○★☆■□⬤◯◉◆◇]{2,})\s*$").unwrap());

const FILLED_GLYPHS: &[char] = &['●', '★', '■', '⬤', '◉', '◆'];

/// Bulleted lines this short (and without commas) are read as one skill.
const MAX_BULLET_SKILL_WORDS: usize = 3;

/// Extract featured skills and free-text descriptions from a Skills body.
pub fn extract_skills(lines: &[Line], config: &ParsingConfig) -> ResumeSkills {
    let t = &config.thresholds;
    let mut skills = ResumeSkills::default();

    for line in lines.iter().filter(|l| !l.is_blank()) {
        let text = line.text();
        let bulleted = is_bullet(text);
        let body = strip_bullet(text);
        if body.is_empty() {
            continue;
        }

        if let Some(skill) = rated_skill(body, t.skill_rating_scale) {
            skills.featured_skills.push(skill);
        } else if bulleted
            && !body.contains(',')
            && body.split_whitespace().count() <= MAX_BULLET_SKILL_WORDS
        {
            skills.featured_skills.push(FeaturedSkill {
                skill: body.to_string(),
                rating: t.default_skill_rating,
            });
        } else {
            skills.descriptions.push(body.to_string());
        }
    }

    skills
}

fn rated_skill(text: &str, scale: u8) -> Option<FeaturedSkill> {
    if let Some(caps) = NUMERIC_RATING_RE.captures(text) {
        let skill = trim_fragment(caps.get(1)?.as_str());
        let value: f64 = caps.get(2)?.as_str().parse().ok()?;
        let out_of = caps.get(3).and_then(|d| d.as_str().parse::<f64>().ok());
        if skill.is_empty() || !skill.chars().any(char::is_alphabetic) {
            return None;
        }
        // A bare trailing year or count is not a rating.
        if out_of.is_none() && value > 10.0 {
            return None;
        }
        return Some(FeaturedSkill {
            skill: skill.to_string(),
            rating: scale_rating(value, out_of, scale),
        });
    }

    let caps = GLYPH_RATING_RE.captures(text)?;
    let skill = trim_fragment(caps.get(1)?.as_str());
    if skill.is_empty() {
        return None;
    }
    let glyphs = caps.get(2)?.as_str();
    let total = glyphs.chars().count() as f64;
    let filled = glyphs.chars().filter(|c| FILLED_GLYPHS.contains(c)).count() as f64;
    let rating = if total > f64::from(scale) {
        scale_rating(filled, Some(total), scale)
    } else {
        scale_rating(filled, None, scale)
    };
    Some(FeaturedSkill {
        skill: skill.to_string(),
        rating,
    })
}

/// Map a rating onto `0..=scale`.
///
/// With an explicit denominator the value is scaled proportionally. Without
/// one, values up to `scale` are taken as-is and values up to 10 are read as
/// out of ten.
fn scale_rating(value: f64, out_of: Option<f64>, scale: u8) -> u8 {
    let scale_f = f64::from(scale);
    let scaled = match out_of {
        Some(d) if d > 0.0 => value / d * scale_f,
        _ if value <= scale_f => value,
        _ => value / 10.0 * scale_f,
    };
    scaled.round().clamp(0.0, scale_f) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use resumer_core::TextToken;

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                Line::new(
                    vec![TextToken {
                        text: text.to_string(),
                        x: 72.0,
                        y: 300.0 + i as f64 * 14.0,
                        width: text.chars().count() as f64 * 5.0,
                        height: 10.0,
                        font_name: "Helvetica".into(),
                        has_end_of_line: true,
                    }],
                    0.25,
                )
            })
            .collect()
    }

    fn skill(name: &str, rating: u8) -> FeaturedSkill {
        FeaturedSkill {
            skill: name.into(),
            rating,
        }
    }

    #[test]
    fn numeric_ratings() {
        let s = extract_skills(
            &lines(&["Rust: 5", "Python - 8/10", "Go: 9", "SQL: 3.5"]),
            &ParsingConfig::default(),
        );
        assert_eq!(
            s.featured_skills,
            vec![skill("Rust", 5), skill("Python", 4), skill("Go", 5), skill("SQL", 4)]
        );
        assert!(s.descriptions.is_empty());
    }

    #[test]
    fn glyph_ratings() {
        let s = extract_skills(&lines(&["Rust ●●●●○", "Haskell ★★☆☆☆"]), &ParsingConfig::default());
        assert_eq!(s.featured_skills, vec![skill("Rust", 4), skill("Haskell", 2)]);
    }

    #[test]
    fn long_glyph_bar_is_scaled() {
        assert_eq!(rated_skill("C ●●●●●●●●○○", 5), Some(skill("C", 4)));
    }

    #[test]
    fn short_bullets_get_default_rating() {
        let s = extract_skills(&lines(&["• Kubernetes", "• Distributed tracing"]), &ParsingConfig::default());
        assert_eq!(
            s.featured_skills,
            vec![skill("Kubernetes", 3), skill("Distributed tracing", 3)]
        );
    }

    #[test]
    fn lists_become_descriptions() {
        let s = extract_skills(
            &lines(&["Languages: Rust, Python, Go", "• Comfortable leading design reviews across teams"]),
            &ParsingConfig::default(),
        );
        assert!(s.featured_skills.is_empty());
        assert_eq!(
            s.descriptions,
            vec![
                "Languages: Rust, Python, Go",
                "Comfortable leading design reviews across teams"
            ]
        );
    }

    #[test]
    fn year_is_not_a_rating() {
        assert_eq!(rated_skill("Certified - 2021", 5), None);
    }

    #[test]
    fn scale_rating_clamps() {
        assert_eq!(scale_rating(7.0, Some(5.0), 5), 5);
        assert_eq!(scale_rating(0.0, None, 5), 0);
        assert_eq!(scale_rating(10.0, None, 5), 5);
    }
}
