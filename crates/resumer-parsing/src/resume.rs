use resumer_core::{Line, Resume, ResumeProfile, Section, SectionKind};

use crate::config::ParsingConfig;
use crate::entries::{extract_education, extract_projects, extract_work};
use crate::lines::body_font_size;
use crate::profile::extract_profile;
use crate::skills::extract_skills;

/// Build the typed resume from grouped sections.
///
/// Total: zero sections give `Resume::default()`. Sections of the same kind
/// append to the same lists; a later profile section only fills fields the
/// earlier one left empty.
pub fn extract_resume(sections: &[Section], config: &ParsingConfig) -> Resume {
    let all_lines: Vec<Line> = sections.iter().flat_map(|s| s.lines.iter().cloned()).collect();
    let body_size = body_font_size(&all_lines);
    let mut resume = Resume::default();

    for section in sections {
        let body = section.body();
        match section.kind {
            SectionKind::Profile => {
                fill_missing(&mut resume.profile, extract_profile(body, config));
            }
            SectionKind::WorkExperience => {
                resume.work_experiences.extend(extract_work(body, body_size, config));
            }
            SectionKind::Education => {
                resume.educations.extend(extract_education(body, body_size, config));
            }
            SectionKind::Projects => {
                resume.projects.extend(extract_projects(body, body_size, config));
            }
            SectionKind::Skills => {
                let skills = extract_skills(body, config);
                resume.skills.featured_skills.extend(skills.featured_skills);
                resume.skills.descriptions.extend(skills.descriptions);
            }
            SectionKind::Custom => {
                resume.custom.descriptions.extend(
                    body.iter()
                        .filter(|l| !l.is_blank())
                        .map(|l| l.text().to_string()),
                );
            }
        }
    }

    tracing::debug!(
        sections = sections.len(),
        work = resume.work_experiences.len(),
        education = resume.educations.len(),
        projects = resume.projects.len(),
        skills = resume.skills.featured_skills.len(),
        "extracted resume"
    );
    resume
}

fn fill_missing(into: &mut ResumeProfile, from: ResumeProfile) {
    let fill = |slot: &mut String, value: String| {
        if slot.is_empty() {
            *slot = value;
        }
    };
    fill(&mut into.name, from.name);
    fill(&mut into.email, from.email);
    fill(&mut into.phone, from.phone);
    fill(&mut into.url, from.url);
    fill(&mut into.location, from.location);
    if into.summary.is_empty() {
        into.summary = from.summary;
    } else if !from.summary.is_empty() {
        into.summary = format!("{} {}", into.summary, from.summary);
    }
}
