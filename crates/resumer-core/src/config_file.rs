use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub thresholds: Option<ThresholdsConfig>,
    pub vocabulary: Option<VocabularyConfig>,
    pub extraction: Option<ExtractionConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    pub line_y_tolerance_ratio: Option<f64>,
    pub word_gap_ratio: Option<f64>,
    pub heading_font_ratio: Option<f64>,
    pub max_heading_words: Option<usize>,
    pub heading_neighborhood: Option<usize>,
    pub entry_gap_ratio: Option<f64>,
    pub entry_header_lines: Option<usize>,
    pub max_title_words: Option<usize>,
    pub min_date_tokens: Option<usize>,
    pub max_name_words: Option<usize>,
    pub summary_min_words: Option<usize>,
    pub default_skill_rating: Option<u8>,
    pub skill_rating_scale: Option<u8>,
}

/// Extra heading and keyword vocabulary.
///
/// Lists extend the built-in defaults unless `replace_defaults` is true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    pub replace_defaults: Option<bool>,
    pub work_experience: Option<Vec<String>>,
    pub education: Option<Vec<String>>,
    pub projects: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub profile: Option<Vec<String>>,
    pub job_title_keywords: Option<Vec<String>>,
    pub company_keywords: Option<Vec<String>>,
    pub school_keywords: Option<Vec<String>>,
    pub degree_keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub timeout_secs: Option<u64>,
}

/// Platform config directory path: `<config_dir>/resumer/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("resumer").join("config.toml"))
}

/// Load config by cascading CWD `.resumer.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".resumer.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let bt = base.thresholds.unwrap_or_default();
    let ot = overlay.thresholds.unwrap_or_default();
    let bv = base.vocabulary.unwrap_or_default();
    let ov = overlay.vocabulary.unwrap_or_default();
    let be = base.extraction.unwrap_or_default();
    let oe = overlay.extraction.unwrap_or_default();

    ConfigFile {
        thresholds: Some(ThresholdsConfig {
            line_y_tolerance_ratio: ot.line_y_tolerance_ratio.or(bt.line_y_tolerance_ratio),
            word_gap_ratio: ot.word_gap_ratio.or(bt.word_gap_ratio),
            heading_font_ratio: ot.heading_font_ratio.or(bt.heading_font_ratio),
            max_heading_words: ot.max_heading_words.or(bt.max_heading_words),
            heading_neighborhood: ot.heading_neighborhood.or(bt.heading_neighborhood),
            entry_gap_ratio: ot.entry_gap_ratio.or(bt.entry_gap_ratio),
            entry_header_lines: ot.entry_header_lines.or(bt.entry_header_lines),
            max_title_words: ot.max_title_words.or(bt.max_title_words),
            min_date_tokens: ot.min_date_tokens.or(bt.min_date_tokens),
            max_name_words: ot.max_name_words.or(bt.max_name_words),
            summary_min_words: ot.summary_min_words.or(bt.summary_min_words),
            default_skill_rating: ot.default_skill_rating.or(bt.default_skill_rating),
            skill_rating_scale: ot.skill_rating_scale.or(bt.skill_rating_scale),
        }),
        vocabulary: Some(VocabularyConfig {
            replace_defaults: ov.replace_defaults.or(bv.replace_defaults),
            work_experience: ov.work_experience.or(bv.work_experience),
            education: ov.education.or(bv.education),
            projects: ov.projects.or(bv.projects),
            skills: ov.skills.or(bv.skills),
            profile: ov.profile.or(bv.profile),
            job_title_keywords: ov.job_title_keywords.or(bv.job_title_keywords),
            company_keywords: ov.company_keywords.or(bv.company_keywords),
            school_keywords: ov.school_keywords.or(bv.school_keywords),
            degree_keywords: ov.degree_keywords.or(bv.degree_keywords),
        }),
        extraction: Some(ExtractionConfig {
            timeout_secs: oe.timeout_secs.or(be.timeout_secs),
        }),
    }
}
