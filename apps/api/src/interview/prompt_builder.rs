//! Prompt builder: renders a validated résumé plus company/role into the
//! natural-language prompt sent to the model.

use std::collections::HashSet;

use crate::llm_client::prompts::fill_placeholders;
use crate::models::resume::SkillSet;

const NOT_SPECIFIED: &str = "Not specified";

/// Interview prompt template.
/// Replace: {languages}, {frameworks}, {tools}, {role}, {company}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Creating interview guide for {role} position at {company}.

First, provide a brief overview of {company}'s typical technical environment and projects.

Then, generate a detailed interview guide for a {role} position, considering the following:

Candidate's Technical Profile:
- Programming Languages: {languages}
- Frameworks & Libraries: {frameworks}
- Tools & Technologies: {tools}

Consider {company}'s:
- Technical environment and scale
- Industry-specific challenges
- Required technical expertise for {role}

Provide practical examples and specific scenarios relevant to {company} and this role."#;

/// Builds the interview prompt. Pure; every input shape is accepted.
/// Callers pass `StructuredResume::reportable_skills()`, so sentinel skills
/// from a degraded extraction never reach the prompt.
///
/// Company, role and skills are inserted verbatim, braces included. Each
/// skill list is trimmed and deduplicated case-insensitively, keeping the
/// first spelling and the input order. An empty list renders as
/// `Not specified`.
pub fn build_prompt(skills: &SkillSet, company: &str, role: &str) -> String {
    let languages = render_list(&skills.languages);
    let frameworks = render_list(&skills.frameworks);
    let tools = render_list(&skills.tools);
    fill_placeholders(
        INTERVIEW_PROMPT_TEMPLATE,
        &[
            ("languages", languages.as_str()),
            ("frameworks", frameworks.as_str()),
            ("tools", tools.as_str()),
            ("role", role),
            ("company", company),
        ],
    )
}

fn render_list(items: &[String]) -> String {
    let unique = dedup_case_insensitive(items);
    if unique.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        unique.join(", ")
    }
}

/// Trimmed, non-empty items with case-insensitive duplicates removed.
pub fn dedup_case_insensitive(items: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(languages: &[&str], frameworks: &[&str], tools: &[&str]) -> SkillSet {
        let own = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };
        SkillSet {
            languages: own(languages),
            frameworks: own(frameworks),
            tools: own(tools),
        }
    }

    #[test]
    fn test_empty_skills_render_not_specified() {
        let prompt = build_prompt(&SkillSet::default(), "Acme", "Backend Developer");
        assert!(prompt.contains("- Programming Languages: Not specified"));
        assert!(prompt.contains("- Frameworks & Libraries: Not specified"));
        assert!(prompt.contains("- Tools & Technologies: Not specified"));
    }

    #[test]
    fn test_skill_lists_are_comma_joined() {
        let prompt = build_prompt(&skills(&["Rust", "Go"], &["Axum"], &["Docker"]), "Acme", "SRE");
        assert!(prompt.contains("- Programming Languages: Rust, Go"));
        assert!(prompt.contains("- Frameworks & Libraries: Axum"));
        assert!(prompt.contains("- Tools & Technologies: Docker"));
    }

    #[test]
    fn test_case_variant_duplicates_are_merged() {
        let prompt = build_prompt(&skills(&[], &[], &["Git", "git", " GIT ", "Docker"]), "Acme", "SRE");
        assert!(prompt.contains("- Tools & Technologies: Git, Docker"));
    }

    #[test]
    fn test_company_and_role_interpolated_verbatim() {
        let prompt = build_prompt(&SkillSet::default(), "Initech", "Data Scientist");
        assert!(prompt.starts_with("Creating interview guide for Data Scientist position at Initech."));
        assert!(prompt.contains("overview of Initech's typical technical environment"));
        assert!(prompt.contains("Required technical expertise for Data Scientist"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_placeholder_text_in_inputs_is_not_expanded() {
        let prompt = build_prompt(
            &skills(&[], &[], &["{company}"]),
            "Acme",
            "Lead {company} Engineer",
        );
        assert!(prompt.starts_with(
            "Creating interview guide for Lead {company} Engineer position at Acme."
        ));
        assert!(prompt.contains("- Tools & Technologies: {company}"));
        assert!(prompt.contains("Required technical expertise for Lead {company} Engineer"));
    }

    #[test]
    fn test_degraded_resume_prompt_lists_no_skills() {
        let resume = crate::models::resume::StructuredResume {
            sections: Default::default(),
            skills: SkillSet::sentinel(),
            extraction_degraded: true,
        };
        let prompt = build_prompt(&resume.reportable_skills(), "Acme", "SRE");
        assert!(prompt.contains("- Programming Languages: Not specified"));
        assert!(!prompt.contains("Python"));
    }

    #[test]
    fn test_dedup_drops_blank_entries() {
        let items = vec!["".to_string(), "  ".to_string(), "Rust".to_string()];
        assert_eq!(dedup_case_insensitive(&items), vec!["Rust"]);
    }
}
