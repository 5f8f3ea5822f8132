//! The typed resume record.
//!
//! Every field has a well-formed default (`""` or an empty list), so a
//! `Resume` is always fully shaped. Keys serialize in camelCase to match the
//! resume-builder JSON contract.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resume {
    pub profile: ResumeProfile,
    pub work_experiences: Vec<ResumeWorkExperience>,
    pub educations: Vec<ResumeEducation>,
    pub projects: Vec<ResumeProject>,
    pub skills: ResumeSkills,
    pub custom: ResumeCustom,
}

impl Resume {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        *self == Resume::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub url: String,
    pub summary: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeWorkExperience {
    pub company: String,
    pub job_title: String,
    pub date: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeEducation {
    pub school: String,
    pub degree: String,
    pub date: String,
    pub gpa: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeProject {
    pub project: String,
    pub date: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeSkills {
    pub featured_skills: Vec<FeaturedSkill>,
    pub descriptions: Vec<String>,
}

/// A skill with a rating on the configured scale (1..=5 by default).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeaturedSkill {
    pub skill: String,
    pub rating: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeCustom {
    pub descriptions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fully_shaped_json() {
        let json = serde_json::to_value(Resume::default()).unwrap();
        assert_eq!(json["profile"]["name"], "");
        assert_eq!(json["workExperiences"], serde_json::json!([]));
        assert_eq!(json["skills"]["featuredSkills"], serde_json::json!([]));
        assert_eq!(json["custom"]["descriptions"], serde_json::json!([]));
    }

    #[test]
    fn camel_case_keys() {
        let resume = Resume {
            work_experiences: vec![ResumeWorkExperience {
                job_title: "Engineer".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&resume).unwrap();
        assert!(json.contains("\"jobTitle\":\"Engineer\""));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let resume: Resume = serde_json::from_str(r#"{"profile":{"name":"Jane"}}"#).unwrap();
        assert_eq!(resume.profile.name, "Jane");
        assert!(resume.educations.is_empty());
        assert!(!resume.is_empty());
        assert!(Resume::default().is_empty());
    }
}
