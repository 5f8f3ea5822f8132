//! Feature scoring for ambiguous entry header fields.
//!
//! Resume entries usually lead with an organization line and a role line,
//! but the order varies between templates. Each candidate is scored against
//! keyword features for both roles; the order-based default is only swapped
//! when the features clearly disagree with it.

use std::collections::HashSet;

use crate::config::ParsingConfig;
use crate::text_processing::normalize_word;

pub(crate) const JOB_TITLE_KEYWORDS: &[&str] = &[
    "engineer", "developer", "manager", "intern", "analyst", "director", "designer",
    "scientist", "consultant", "lead", "architect", "specialist", "coordinator",
    "assistant", "associate", "president", "vp", "officer", "researcher", "technician",
    "administrator", "founder", "cofounder", "head", "senior", "junior", "principal",
    "staff", "programmer", "accountant", "editor", "writer", "teacher", "instructor",
    "tutor", "owner", "representative", "supervisor", "volunteer", "fellow", "cto", "ceo",
];

pub(crate) const COMPANY_KEYWORDS: &[&str] = &[
    "inc", "corp", "corporation", "llc", "ltd", "co", "company", "group", "technologies",
    "technology", "labs", "lab", "systems", "solutions", "partners", "studio", "studios",
    "agency", "bank", "consulting", "gmbh", "plc", "ventures", "holdings", "foundation",
];

pub(crate) const SCHOOL_KEYWORDS: &[&str] = &[
    "university", "college", "institute", "school", "academy", "polytechnic", "universidad",
    "université", "conservatory", "seminary",
];

pub(crate) const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor", "bachelors", "master", "masters", "bs", "ba", "bsc", "ms", "msc", "ma",
    "mba", "phd", "doctor", "doctorate", "associate", "diploma", "degree", "certificate",
    "major", "minor", "be", "btech", "mtech", "meng", "beng", "jd", "md", "ged",
];

/// Weights for the feature scores.
///
/// - `keyword`: added once per word matching the role's vocabulary
/// - `bold`: added to the organization score when the source line is bold
#[derive(Debug, Clone)]
pub struct FeatureWeights {
    pub keyword: f64,
    pub bold: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            keyword: 2.0,
            bold: 1.0,
        }
    }
}

/// Resolved keyword sets for one role pair.
pub(crate) struct RoleScorer {
    organization: HashSet<String>,
    role: HashSet<String>,
    weights: FeatureWeights,
}

impl RoleScorer {
    /// Company vs job title.
    pub(crate) fn work(config: &ParsingConfig) -> Self {
        Self {
            organization: keyword_set(config.company_keywords.resolve_static(COMPANY_KEYWORDS)),
            role: keyword_set(config.job_title_keywords.resolve_static(JOB_TITLE_KEYWORDS)),
            weights: config.feature_weights(),
        }
    }

    /// School vs degree.
    pub(crate) fn education(config: &ParsingConfig) -> Self {
        Self {
            organization: keyword_set(config.school_keywords.resolve_static(SCHOOL_KEYWORDS)),
            role: keyword_set(config.degree_keywords.resolve_static(DEGREE_KEYWORDS)),
            weights: config.feature_weights(),
        }
    }

    pub(crate) fn organization_score(&self, text: &str, bold: bool) -> f64 {
        let mut score = self.weights.keyword * count_matches(text, &self.organization) as f64;
        if bold {
            score += self.weights.bold;
        }
        score
    }

    pub(crate) fn role_score(&self, text: &str) -> f64 {
        self.weights.keyword * count_matches(text, &self.role) as f64
    }

    /// Positive when `text` looks more like a role than an organization.
    pub(crate) fn role_bias(&self, text: &str, bold: bool) -> f64 {
        self.role_score(text) - self.organization_score(text, bold)
    }

    /// Whether the `(organization, role)` candidates should be exchanged.
    ///
    /// Only swaps when the first reads as a role and the second does not.
    pub(crate) fn should_swap(&self, first: (&str, bool), second: (&str, bool)) -> bool {
        let first_bias = self.role_bias(first.0, first.1);
        let second_bias = self.role_bias(second.0, second.1);
        first_bias > 0.0 && second_bias < first_bias && second_bias <= 0.0
    }
}

fn keyword_set(words: Vec<String>) -> HashSet<String> {
    words.iter().map(|w| normalize_word(w)).filter(|w| !w.is_empty()).collect()
}

fn count_matches(text: &str, keywords: &HashSet<String>) -> usize {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == '/')
        .map(normalize_word)
        .filter(|w| keywords.contains(w))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_scores() {
        let scorer = RoleScorer::work(&ParsingConfig::default());
        assert!(scorer.role_bias("Software Engineer", false) > 0.0);
        assert!(scorer.role_bias("Acme Corp.", false) < 0.0);
        assert_eq!(scorer.role_bias("Acme", false), 0.0);
        assert!(scorer.role_bias("Acme", true) < 0.0);
    }

    #[test]
    fn engineering_is_not_engineer() {
        let scorer = RoleScorer::work(&ParsingConfig::default());
        assert_eq!(scorer.role_score("Acme Engineering"), 0.0);
    }

    #[test]
    fn education_scores() {
        let scorer = RoleScorer::education(&ParsingConfig::default());
        assert!(scorer.role_bias("B.S. Computer Science", false) > 0.0);
        assert!(scorer.role_bias("Ph.D. in Physics", false) > 0.0);
        assert!(scorer.role_bias("State University", false) < 0.0);
    }

    #[test]
    fn swap_decision() {
        let scorer = RoleScorer::work(&ParsingConfig::default());
        assert!(scorer.should_swap(("Software Engineer", false), ("Acme Corp", false)));
        assert!(scorer.should_swap(("Software Engineer", false), ("Acme", false)));
        assert!(!scorer.should_swap(("Acme Corp", false), ("Software Engineer", false)));
        assert!(!scorer.should_swap(("Acme", false), ("Globex", false)));
        assert!(!scorer.should_swap(("Lead Engineer", false), ("Senior Developer", false)));
    }
}
