use std::io::Write;
use std::path::Path;
use std::time::Duration;

use owo_colors::OwoColorize;
use serde::Serialize;

use resumer_core::{Line, Resume, Section, TextToken};
use resumer_parsing::Thresholds;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn heading(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", title.bold().cyan())
    } else {
        writeln!(w, "{}", title)
    }
}

fn field(w: &mut dyn Write, label: &str, value: &str, color: ColorMode) -> std::io::Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    if color.enabled() {
        writeln!(w, "  {:<9} {}", format!("{label}:").dimmed(), value)
    } else {
        writeln!(w, "  {:<9} {}", format!("{label}:"), value)
    }
}

/// Print one work, education or project entry.
fn entry(
    w: &mut dyn Write,
    primary: &str,
    details: &[&str],
    descriptions: &[String],
    color: ColorMode,
) -> std::io::Result<()> {
    let details: Vec<&str> = details.iter().copied().filter(|d| !d.is_empty()).collect();
    let primary = if primary.is_empty() { "(untitled)" } else { primary };
    if color.enabled() {
        write!(w, "  {}", primary.bold())?;
    } else {
        write!(w, "  {}", primary)?;
    }
    if !details.is_empty() {
        write!(w, " | {}", details.join(" | "))?;
    }
    writeln!(w)?;
    for d in descriptions {
        writeln!(w, "    - {}", d)?;
    }
    Ok(())
}

/// Print the resume as a human-readable report.
pub fn print_resume(w: &mut dyn Write, resume: &Resume, color: ColorMode) -> std::io::Result<()> {
    if resume.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "No resume data extracted".yellow())?;
        } else {
            writeln!(w, "No resume data extracted")?;
        }
        return Ok(());
    }

    let p = &resume.profile;
    heading(w, "Profile", color)?;
    field(w, "Name", &p.name, color)?;
    field(w, "Email", &p.email, color)?;
    field(w, "Phone", &p.phone, color)?;
    field(w, "URL", &p.url, color)?;
    field(w, "Location", &p.location, color)?;
    field(w, "Summary", &p.summary, color)?;

    if !resume.work_experiences.is_empty() {
        writeln!(w)?;
        heading(w, "Work Experience", color)?;
        for work in &resume.work_experiences {
            entry(
                w,
                &work.company,
                &[&work.job_title, &work.date],
                &work.descriptions,
                color,
            )?;
        }
    }

    if !resume.educations.is_empty() {
        writeln!(w)?;
        heading(w, "Education", color)?;
        for edu in &resume.educations {
            let gpa = if edu.gpa.is_empty() {
                String::new()
            } else {
                format!("GPA {}", edu.gpa)
            };
            entry(
                w,
                &edu.school,
                &[&edu.degree, &edu.date, &gpa],
                &edu.descriptions,
                color,
            )?;
        }
    }

    if !resume.projects.is_empty() {
        writeln!(w)?;
        heading(w, "Projects", color)?;
        for project in &resume.projects {
            entry(
                w,
                &project.project,
                &[&project.date],
                &project.descriptions,
                color,
            )?;
        }
    }

    let skills = &resume.skills;
    if !skills.featured_skills.is_empty() || !skills.descriptions.is_empty() {
        writeln!(w)?;
        heading(w, "Skills", color)?;
        for s in &skills.featured_skills {
            let bar = "*".repeat(usize::from(s.rating));
            if color.enabled() {
                writeln!(w, "  {:<24} {}", s.skill, bar.green())?;
            } else {
                writeln!(w, "  {:<24} {}", s.skill, bar)?;
            }
        }
        for d in &skills.descriptions {
            writeln!(w, "  {}", d)?;
        }
    }

    if !resume.custom.descriptions.is_empty() {
        writeln!(w)?;
        heading(w, "Other", color)?;
        for d in &resume.custom.descriptions {
            writeln!(w, "  {}", d)?;
        }
    }
    Ok(())
}

/// Serialize any pipeline value as JSON, followed by a newline.
pub fn print_json<T: Serialize + ?Sized>(
    w: &mut dyn Write,
    value: &T,
    pretty: bool,
) -> std::io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *w, value)?;
    } else {
        serde_json::to_writer(&mut *w, value)?;
    }
    writeln!(w)
}

/// Print raw tokens with their geometry and font.
pub fn print_tokens(
    w: &mut dyn Write,
    tokens: &[TextToken],
    color: ColorMode,
) -> std::io::Result<()> {
    let header = format!(
        "{:>8} {:>8} {:>7} {:>6}  {:<24} {:<3} text",
        "x", "y", "width", "height", "font", "eol"
    );
    if color.enabled() {
        writeln!(w, "{}", header.dimmed())?;
    } else {
        writeln!(w, "{}", header)?;
    }
    for t in tokens {
        let eol = if t.has_end_of_line { "yes" } else { "" };
        writeln!(
            w,
            "{:>8.1} {:>8.1} {:>7.1} {:>6.1}  {:<24} {:<3} {}",
            t.x, t.y, t.width, t.height, t.font_name, eol, t.text
        )?;
    }
    writeln!(w, "{} tokens", tokens.len())?;
    Ok(())
}

/// Print grouped lines with size and weight.
pub fn print_lines(w: &mut dyn Write, lines: &[Line], color: ColorMode) -> std::io::Result<()> {
    for (i, line) in lines.iter().enumerate() {
        let weight = if line.is_bold() { "B" } else { " " };
        let prefix = format!(
            "{:>4}  y={:>7.1}  size={:>4.1}  {}",
            i,
            line.mean_y(),
            line.font_size(),
            weight
        );
        if color.enabled() {
            if line.is_bold() {
                writeln!(w, "{}  {}", prefix.dimmed(), line.text().bold())?;
            } else {
                writeln!(w, "{}  {}", prefix.dimmed(), line.text())?;
            }
        } else {
            writeln!(w, "{}  {}", prefix, line.text())?;
        }
    }
    writeln!(w, "{} lines", lines.len())?;
    Ok(())
}

/// Print sections with their kind, heading and body lines.
pub fn print_sections(
    w: &mut dyn Write,
    sections: &[Section],
    color: ColorMode,
) -> std::io::Result<()> {
    for section in sections {
        let label = format!("[{}]", section.kind);
        let title = if section.title.is_empty() {
            String::new()
        } else {
            format!(" {}", section.title)
        };
        if color.enabled() {
            writeln!(
                w,
                "{}{} ({} lines)",
                label.cyan().bold(),
                title.bold(),
                section.lines.len()
            )?;
        } else {
            writeln!(w, "{}{} ({} lines)", label, title, section.lines.len())?;
        }
        for line in section.body() {
            writeln!(w, "    {}", line.text())?;
        }
    }
    Ok(())
}

/// Print where config is read from and the effective values.
pub fn print_config(
    w: &mut dyn Write,
    config_path: Option<&Path>,
    thresholds: &Thresholds,
    timeout: Duration,
) -> std::io::Result<()> {
    let status = |p: &Path| if p.exists() { "found" } else { "not found" };
    match config_path {
        Some(p) => writeln!(w, "Config file:  {} ({})", p.display(), status(p))?,
        None => writeln!(w, "Config file:  (no platform config directory)")?,
    }
    let local = Path::new(".resumer.toml");
    writeln!(w, "Local config: {} ({})", local.display(), status(local))?;
    writeln!(w)?;

    let body = toml::to_string(thresholds).map_err(std::io::Error::other)?;
    writeln!(w, "[thresholds]")?;
    write!(w, "{}", body)?;
    writeln!(w)?;
    writeln!(w, "[extraction]")?;
    writeln!(w, "timeout_secs = {}", timeout.as_secs())?;
    Ok(())
}
