use resumer_core::config_file::ConfigFile;
use serde::Serialize;
use thiserror::Error;

use crate::scoring::FeatureWeights;

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

impl ListOverride<String> {
    /// Resolve against a static default list.
    pub(crate) fn resolve_static(&self, defaults: &[&str]) -> Vec<String> {
        let owned: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
        self.resolve(&owned)
    }

    fn push(&mut self, value: String) {
        match self {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(value),
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
        }
    }
}

/// Numeric thresholds used across the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    /// A token joins the current line when its baseline is within this
    /// fraction of the tallest token seen on the line (default: 0.5).
    pub line_y_tolerance_ratio: f64,
    /// Horizontal gap, as a fraction of the average character width, above
    /// which a space separates two tokens (default: 0.25).
    pub word_gap_ratio: f64,
    /// Minimum font size relative to body text for a size-based heading (default: 1.2).
    pub heading_font_ratio: f64,
    /// Longest line, in words, that can be a heading (default: 4).
    pub max_heading_words: usize,
    /// Lines on either side of a weak heading that must hold no strong one (default: 2).
    pub heading_neighborhood: usize,
    /// Vertical gap, relative to the typical line gap, that starts a new entry (default: 1.4).
    pub entry_gap_ratio: f64,
    /// Leading lines of an entry searched for company/title/date (default: 4).
    pub entry_header_lines: usize,
    /// Longest line, in words, accepted as a job title or degree (default: 8).
    pub max_title_words: usize,
    /// Date tokens required for a date embedded in a longer line (default: 2).
    pub min_date_tokens: usize,
    /// Longest fragment, in words, accepted as a person's name (default: 5).
    pub max_name_words: usize,
    /// Shortest fragment, in words, kept as part of the profile summary (default: 6).
    pub summary_min_words: usize,
    /// Rating given to skills listed without one (default: 3).
    pub default_skill_rating: u8,
    /// Top of the skill rating scale (default: 5).
    pub skill_rating_scale: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            line_y_tolerance_ratio: 0.5,
            word_gap_ratio: 0.25,
            heading_font_ratio: 1.2,
            max_heading_words: 4,
            heading_neighborhood: 2,
            entry_gap_ratio: 1.4,
            entry_header_lines: 4,
            max_title_words: 8,
            min_date_tokens: 2,
            max_name_words: 5,
            summary_min_words: 6,
            default_skill_rating: 3,
            skill_rating_scale: 5,
        }
    }
}

/// Configuration for the resume parsing pipeline.
///
/// Use [`ParsingConfigBuilder`] to construct a validated non-default config.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfig {
    pub(crate) thresholds: Thresholds,

    // ── sections.rs ──
    pub(crate) work_headings: ListOverride<String>,
    pub(crate) education_headings: ListOverride<String>,
    pub(crate) project_headings: ListOverride<String>,
    pub(crate) skill_headings: ListOverride<String>,
    /// Headings that continue the profile (summary, objective, ...).
    pub(crate) profile_headings: ListOverride<String>,

    // ── scoring.rs ──
    pub(crate) job_title_keywords: ListOverride<String>,
    pub(crate) company_keywords: ListOverride<String>,
    pub(crate) school_keywords: ListOverride<String>,
    pub(crate) degree_keywords: ListOverride<String>,
    pub(crate) feature_weights: Option<FeatureWeights>,
}

impl ParsingConfig {
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Get the feature weights, using defaults if not configured.
    pub(crate) fn feature_weights(&self) -> FeatureWeights {
        self.feature_weights.clone().unwrap_or_default()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidRatio { name: &'static str, value: f64 },
    #[error("{name} must be at least 1")]
    ZeroLimit { name: &'static str },
    #[error("default skill rating {rating} exceeds the rating scale {scale}")]
    RatingOutOfScale { rating: u8, scale: u8 },
}

/// Builder for [`ParsingConfig`].
///
/// Validates every threshold in [`build()`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    line_y_tolerance_ratio: Option<f64>,
    word_gap_ratio: Option<f64>,
    heading_font_ratio: Option<f64>,
    max_heading_words: Option<usize>,
    heading_neighborhood: Option<usize>,
    entry_gap_ratio: Option<f64>,
    entry_header_lines: Option<usize>,
    max_title_words: Option<usize>,
    min_date_tokens: Option<usize>,
    max_name_words: Option<usize>,
    summary_min_words: Option<usize>,
    default_skill_rating: Option<u8>,
    skill_rating_scale: Option<u8>,
    work_headings: ListOverride<String>,
    education_headings: ListOverride<String>,
    project_headings: ListOverride<String>,
    skill_headings: ListOverride<String>,
    profile_headings: ListOverride<String>,
    job_title_keywords: ListOverride<String>,
    company_keywords: ListOverride<String>,
    school_keywords: ListOverride<String>,
    degree_keywords: ListOverride<String>,
    feature_weights: Option<FeatureWeights>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from a loaded TOML config file.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut builder = Self::new();

        if let Some(t) = &file.thresholds {
            builder.line_y_tolerance_ratio = t.line_y_tolerance_ratio;
            builder.word_gap_ratio = t.word_gap_ratio;
            builder.heading_font_ratio = t.heading_font_ratio;
            builder.max_heading_words = t.max_heading_words;
            builder.heading_neighborhood = t.heading_neighborhood;
            builder.entry_gap_ratio = t.entry_gap_ratio;
            builder.entry_header_lines = t.entry_header_lines;
            builder.max_title_words = t.max_title_words;
            builder.min_date_tokens = t.min_date_tokens;
            builder.max_name_words = t.max_name_words;
            builder.summary_min_words = t.summary_min_words;
            builder.default_skill_rating = t.default_skill_rating;
            builder.skill_rating_scale = t.skill_rating_scale;
        }

        if let Some(v) = &file.vocabulary {
            let replace = v.replace_defaults.unwrap_or(false);
            let apply = |values: &Option<Vec<String>>| match values {
                Some(list) if replace => ListOverride::Replace(list.clone()),
                Some(list) => ListOverride::Extend(list.clone()),
                None => ListOverride::Default,
            };
            builder.work_headings = apply(&v.work_experience);
            builder.education_headings = apply(&v.education);
            builder.project_headings = apply(&v.projects);
            builder.skill_headings = apply(&v.skills);
            builder.profile_headings = apply(&v.profile);
            builder.job_title_keywords = apply(&v.job_title_keywords);
            builder.company_keywords = apply(&v.company_keywords);
            builder.school_keywords = apply(&v.school_keywords);
            builder.degree_keywords = apply(&v.degree_keywords);
        }

        builder
    }

    // ── Scalars ──

    pub fn line_y_tolerance_ratio(mut self, ratio: f64) -> Self {
        self.line_y_tolerance_ratio = Some(ratio);
        self
    }

    pub fn word_gap_ratio(mut self, ratio: f64) -> Self {
        self.word_gap_ratio = Some(ratio);
        self
    }

    pub fn heading_font_ratio(mut self, ratio: f64) -> Self {
        self.heading_font_ratio = Some(ratio);
        self
    }

    pub fn max_heading_words(mut self, n: usize) -> Self {
        self.max_heading_words = Some(n);
        self
    }

    pub fn heading_neighborhood(mut self, n: usize) -> Self {
        self.heading_neighborhood = Some(n);
        self
    }

    pub fn entry_gap_ratio(mut self, ratio: f64) -> Self {
        self.entry_gap_ratio = Some(ratio);
        self
    }

    pub fn entry_header_lines(mut self, n: usize) -> Self {
        self.entry_header_lines = Some(n);
        self
    }

    pub fn max_title_words(mut self, n: usize) -> Self {
        self.max_title_words = Some(n);
        self
    }

    pub fn min_date_tokens(mut self, n: usize) -> Self {
        self.min_date_tokens = Some(n);
        self
    }

    pub fn max_name_words(mut self, n: usize) -> Self {
        self.max_name_words = Some(n);
        self
    }

    pub fn summary_min_words(mut self, n: usize) -> Self {
        self.summary_min_words = Some(n);
        self
    }

    pub fn default_skill_rating(mut self, rating: u8) -> Self {
        self.default_skill_rating = Some(rating);
        self
    }

    pub fn skill_rating_scale(mut self, scale: u8) -> Self {
        self.skill_rating_scale = Some(scale);
        self
    }

    // ── Heading vocabulary ──

    pub fn set_work_headings(mut self, headings: Vec<String>) -> Self {
        self.work_headings = ListOverride::Replace(headings);
        self
    }

    pub fn add_work_heading(mut self, heading: String) -> Self {
        self.work_headings.push(heading);
        self
    }

    pub fn set_education_headings(mut self, headings: Vec<String>) -> Self {
        self.education_headings = ListOverride::Replace(headings);
        self
    }

    pub fn add_education_heading(mut self, heading: String) -> Self {
        self.education_headings.push(heading);
        self
    }

    pub fn set_project_headings(mut self, headings: Vec<String>) -> Self {
        self.project_headings = ListOverride::Replace(headings);
        self
    }

    pub fn add_project_heading(mut self, heading: String) -> Self {
        self.project_headings.push(heading);
        self
    }

    pub fn set_skill_headings(mut self, headings: Vec<String>) -> Self {
        self.skill_headings = ListOverride::Replace(headings);
        self
    }

    pub fn add_skill_heading(mut self, heading: String) -> Self {
        self.skill_headings.push(heading);
        self
    }

    pub fn set_profile_headings(mut self, headings: Vec<String>) -> Self {
        self.profile_headings = ListOverride::Replace(headings);
        self
    }

    pub fn add_profile_heading(mut self, heading: String) -> Self {
        self.profile_headings.push(heading);
        self
    }

    // ── Feature keywords ──

    pub fn set_job_title_keywords(mut self, keywords: Vec<String>) -> Self {
        self.job_title_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_job_title_keyword(mut self, keyword: String) -> Self {
        self.job_title_keywords.push(keyword);
        self
    }

    pub fn set_company_keywords(mut self, keywords: Vec<String>) -> Self {
        self.company_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_company_keyword(mut self, keyword: String) -> Self {
        self.company_keywords.push(keyword);
        self
    }

    pub fn set_school_keywords(mut self, keywords: Vec<String>) -> Self {
        self.school_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_school_keyword(mut self, keyword: String) -> Self {
        self.school_keywords.push(keyword);
        self
    }

    pub fn set_degree_keywords(mut self, keywords: Vec<String>) -> Self {
        self.degree_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_degree_keyword(mut self, keyword: String) -> Self {
        self.degree_keywords.push(keyword);
        self
    }

    /// Set custom weights for company/title and school/degree scoring.
    pub fn feature_weights(mut self, weights: FeatureWeights) -> Self {
        self.feature_weights = Some(weights);
        self
    }

    /// Validate thresholds and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, ConfigError> {
        let d = Thresholds::default();
        let thresholds = Thresholds {
            line_y_tolerance_ratio: self
                .line_y_tolerance_ratio
                .unwrap_or(d.line_y_tolerance_ratio),
            word_gap_ratio: self.word_gap_ratio.unwrap_or(d.word_gap_ratio),
            heading_font_ratio: self.heading_font_ratio.unwrap_or(d.heading_font_ratio),
            max_heading_words: self.max_heading_words.unwrap_or(d.max_heading_words),
            heading_neighborhood: self.heading_neighborhood.unwrap_or(d.heading_neighborhood),
            entry_gap_ratio: self.entry_gap_ratio.unwrap_or(d.entry_gap_ratio),
            entry_header_lines: self.entry_header_lines.unwrap_or(d.entry_header_lines),
            max_title_words: self.max_title_words.unwrap_or(d.max_title_words),
            min_date_tokens: self.min_date_tokens.unwrap_or(d.min_date_tokens),
            max_name_words: self.max_name_words.unwrap_or(d.max_name_words),
            summary_min_words: self.summary_min_words.unwrap_or(d.summary_min_words),
            default_skill_rating: self.default_skill_rating.unwrap_or(d.default_skill_rating),
            skill_rating_scale: self.skill_rating_scale.unwrap_or(d.skill_rating_scale),
        };
        validate(&thresholds)?;

        Ok(ParsingConfig {
            thresholds,
            work_headings: self.work_headings,
            education_headings: self.education_headings,
            project_headings: self.project_headings,
            skill_headings: self.skill_headings,
            profile_headings: self.profile_headings,
            job_title_keywords: self.job_title_keywords,
            company_keywords: self.company_keywords,
            school_keywords: self.school_keywords,
            degree_keywords: self.degree_keywords,
            feature_weights: self.feature_weights,
        })
    }
}

fn validate(t: &Thresholds) -> Result<(), ConfigError> {
    let ratios = [
        ("line_y_tolerance_ratio", t.line_y_tolerance_ratio),
        ("word_gap_ratio", t.word_gap_ratio),
        ("heading_font_ratio", t.heading_font_ratio),
        ("entry_gap_ratio", t.entry_gap_ratio),
    ];
    for (name, value) in ratios {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidRatio { name, value });
        }
    }

    let limits = [
        ("max_heading_words", t.max_heading_words),
        ("entry_header_lines", t.entry_header_lines),
        ("max_title_words", t.max_title_words),
        ("min_date_tokens", t.min_date_tokens),
        ("max_name_words", t.max_name_words),
        ("skill_rating_scale", t.skill_rating_scale as usize),
    ];
    for (name, value) in limits {
        if value == 0 {
            return Err(ConfigError::ZeroLimit { name });
        }
    }

    if t.default_skill_rating > t.skill_rating_scale {
        return Err(ConfigError::RatingOutOfScale {
            rating: t.default_skill_rating,
            scale: t.skill_rating_scale,
        });
    }
    Ok(())
}
