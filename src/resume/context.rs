//! Renders resume facts into the plain-text block embedded in the system prompt

use super::ResumeFacts;

/// Context used when there are no facts to render
pub const EMPTY_CONTEXT: &str = "No resume information available.";

const MISSING: &str = "N/A";

/// Render the knowledge base as a section-delimited text block
///
/// Sections appear in a fixed order and are skipped when their data is absent.
/// Items inside a section keep source order.
pub fn render_context(facts: &ResumeFacts) -> String {
    if facts.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }

    let mut out = match facts.personal_info.name.as_deref() {
        Some(name) => format!("=== {} - PORTFOLIO INFORMATION ===\n\n", name.to_uppercase()),
        None => "=== PORTFOLIO INFORMATION ===\n\n".to_string(),
    };

    personal_section(facts, &mut out);
    education_section(facts, &mut out);
    projects_section(facts, &mut out);
    internship_section(facts, &mut out);
    skills_section(facts, &mut out);
    certifications_section(facts, &mut out);

    if !facts.domain_expertise.is_empty() {
        out.push_str("DOMAIN EXPERTISE:\n");
        out.push_str(&format!("{}\n\n", facts.domain_expertise.join(", ")));
    }

    if !facts.key_strengths.is_empty() {
        out.push_str("KEY STRENGTHS:\n");
        for strength in &facts.key_strengths {
            out.push_str(&format!("- {}\n", strength));
        }
        out.push('\n');
    }

    if !facts.faq_responses.is_empty() {
        out.push_str("=== QUICK REFERENCE FOR COMMON QUESTIONS ===\n");
        for (question, answer) in &facts.faq_responses {
            out.push_str(&format!("\n{}:\n{}\n", title_case(question), answer));
        }
    }

    out
}

fn personal_section(facts: &ResumeFacts, out: &mut String) {
    let p = &facts.personal_info;
    if p.is_empty() {
        return;
    }

    out.push_str("PERSONAL INFORMATION:\n");
    out.push_str(&format!("Name: {}\n", or_missing(&p.name)));
    out.push_str(&format!("Email: {}\n", or_missing(&p.email)));
    out.push_str(&format!("Phone: {}\n", or_missing(&p.phone)));
    out.push_str(&format!("LinkedIn: {}\n", or_missing(&p.linkedin)));
    out.push_str(&format!("GitHub: {}\n", or_missing(&p.github)));
    out.push_str(&format!("Location: {}\n\n", or_missing(&p.location)));
}

fn education_section(facts: &ResumeFacts, out: &mut String) {
    let education = &facts.education;
    if education.is_empty() {
        return;
    }

    out.push_str("EDUCATION:\n");
    if let Some(current) = &education.current {
        out.push_str(&format!("Current: {}\n", or_missing(&current.degree)));
        out.push_str(&format!("  Institution: {}\n", or_missing(&current.institution)));
        out.push_str(&format!("  Location: {}\n", or_missing(&current.location)));
        out.push_str(&format!(
            "  CGPA: {} (Up to {})\n",
            or_missing(&current.cgpa),
            or_missing(&current.upto_semester)
        ));
        out.push_str(&format!(
            "  Expected Graduation: {}\n",
            or_missing(&current.expected_graduation)
        ));
    }
    if let Some(hsc) = &education.hsc {
        out.push_str(&format!(
            "HSC ({}): {} - {}\n",
            or_missing(&hsc.year),
            or_missing(&hsc.percentage),
            or_missing(&hsc.institution)
        ));
    }
    if let Some(sslc) = &education.sslc {
        out.push_str(&format!(
            "SSLC ({}): {}\n",
            or_missing(&sslc.year),
            or_missing(&sslc.institution)
        ));
    }
    out.push('\n');
}

fn projects_section(facts: &ResumeFacts, out: &mut String) {
    if facts.projects.is_empty() {
        return;
    }

    out.push_str("PROJECTS:\n");
    for (i, project) in facts.projects.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            or_missing(&project.name),
            or_missing(&project.kind)
        ));
        out.push_str(&format!("   Description: {}\n", or_missing(&project.description)));

        if !project.technologies.is_empty() {
            out.push_str(&format!("   Technologies: {}\n", project.technologies.join(", ")));
        }

        if !project.highlights.is_empty() {
            out.push_str("   Key Features:\n");
            for highlight in &project.highlights {
                out.push_str(&format!("   - {}\n", highlight));
            }
        }
        out.push('\n');
    }
}

fn internship_section(facts: &ResumeFacts, out: &mut String) {
    let Some(internship) = facts.internship.as_ref().filter(|i| !i.is_empty()) else {
        return;
    };

    out.push_str("INTERNSHIP EXPERIENCE:\n");
    out.push_str(&format!("Company: {}\n", or_missing(&internship.company)));
    out.push_str(&format!("Role: {}\n", or_missing(&internship.role)));
    out.push_str(&format!("Location: {}\n", or_missing(&internship.location)));
    out.push_str(&format!("Period: {}\n", or_missing(&internship.period)));

    if !internship.responsibilities.is_empty() {
        out.push_str("Responsibilities:\n");
        for responsibility in &internship.responsibilities {
            out.push_str(&format!("- {}\n", responsibility));
        }
    }
    out.push('\n');
}

fn skills_section(facts: &ResumeFacts, out: &mut String) {
    if facts.technical_skills.is_empty() {
        return;
    }

    out.push_str("TECHNICAL SKILLS:\n");
    for (category, skills) in &facts.technical_skills {
        out.push_str(&format!("{}: {}\n", title_case(category), skills.join(", ")));
    }
    out.push('\n');
}

fn certifications_section(facts: &ResumeFacts, out: &mut String) {
    if facts.certifications.is_empty() {
        return;
    }

    out.push_str("CERTIFICATIONS:\n");
    for cert in &facts.certifications {
        out.push_str(&format!(
            "- {} (Issuer: {})\n",
            or_missing(&cert.name),
            or_missing(&cert.issuer)
        ));
    }
    out.push('\n');
}

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

/// `programming_languages` -> `Programming Languages`
pub(crate) fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;

    for c in key.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
