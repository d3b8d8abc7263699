//! Interview guide pipeline.
//!
//! Flow: extract → normalize → build_prompt → LLM generate → clean → validate,
//! with the fallback template standing in for the model on any failure.
//! This path never fails: a guide is always produced.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::interview::prompt_builder::build_prompt;
use crate::interview::templates::get_template;
use crate::llm_client::{guide_request, LanguageModel, LlmError};
use crate::models::resume::StructuredResume;
use crate::resume::extractor::extract;
use crate::resume::validation::normalize;

/// Model answers shorter than this are treated as failures.
pub const MIN_RESPONSE_CHARS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideSource {
    Llm,
    Fallback,
}

/// One `#`-headed block of a guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineSection {
    pub heading: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewGuide {
    pub document: String,
    pub source: GuideSource,
    /// Why the model answer was not used. Set only for fallback guides.
    pub fallback_reason: Option<String>,
    pub outline: Vec<OutlineSection>,
}

impl InterviewGuide {
    fn from_model(document: String) -> Self {
        let outline = extract_outline(&document);
        Self {
            document,
            source: GuideSource::Llm,
            fallback_reason: None,
            outline,
        }
    }

    fn from_template(role: &str, reason: &LlmError) -> Self {
        let document = get_template(role);
        let outline = extract_outline(&document);
        Self {
            document,
            source: GuideSource::Fallback,
            fallback_reason: Some(reason.to_string()),
            outline,
        }
    }
}

/// Everything one analysis produced.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub resume: StructuredResume,
    pub prompt: String,
    pub guide: InterviewGuide,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full pipeline over extracted résumé text.
///
/// `llm` is `None` when model access is disabled, in which case the guide
/// comes straight from the template engine.
pub async fn analyze(
    llm: Option<&dyn LanguageModel>,
    timeout: Duration,
    resume_text: &str,
    company: &str,
    role: &str,
) -> Analysis {
    info!("Analyzing résumé for {role} at {company}");

    let resume = normalize(extract(resume_text));
    let skills = resume.reportable_skills();
    if resume.extraction_degraded {
        warn!("Skill extraction degraded; prompt will not list skills");
    } else if skills.is_empty() {
        info!("No known technologies found in résumé");
    }

    let prompt = build_prompt(&skills, company, role);
    let guide = generate_guide(llm, timeout, &prompt, role).await;

    Analysis {
        resume,
        prompt,
        guide,
    }
}

/// Asks the model for a guide and falls back to the role template when the
/// model is disabled, fails, times out or answers too briefly.
pub async fn generate_guide(
    llm: Option<&dyn LanguageModel>,
    timeout: Duration,
    prompt: &str,
    role: &str,
) -> InterviewGuide {
    match ask_model(llm, timeout, prompt, role).await {
        Ok(document) => {
            info!("Guide generated by model ({} chars)", document.len());
            InterviewGuide::from_model(document)
        }
        Err(e) => {
            warn!("Guide generation fell back to template for {role}: {e}");
            InterviewGuide::from_template(role, &e)
        }
    }
}

async fn ask_model(
    llm: Option<&dyn LanguageModel>,
    timeout: Duration,
    prompt: &str,
    role: &str,
) -> Result<String, LlmError> {
    let llm = llm.ok_or(LlmError::Disabled)?;

    let raw = tokio::time::timeout(timeout, llm.generate(prompt, role))
        .await
        .map_err(|_| LlmError::Timeout {
            secs: timeout.as_secs(),
        })??;

    let wrapped = guide_request(prompt, role);
    let cleaned = clean_response(&raw, &[wrapped.as_str(), prompt]);
    validate_response(&cleaned)?;
    Ok(cleaned)
}

// ────────────────────────────────────────────────────────────────────────────
// Response post-processing
// ────────────────────────────────────────────────────────────────────────────

/// Rejects answers too short to be a guide.
pub fn validate_response(response: &str) -> Result<(), LlmError> {
    let len = response.chars().count();
    if len < MIN_RESPONSE_CHARS {
        return Err(LlmError::ResponseTooShort { len });
    }
    Ok(())
}

/// Strips an echoed prompt, trailing whitespace on every line, and runs of
/// more than one blank line.
pub fn clean_response(generated: &str, echoed_prompts: &[&str]) -> String {
    let mut text = generated.trim_start();
    for prompt in echoed_prompts {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            continue;
        }
        if let Some(rest) = text.strip_prefix(prompt) {
            text = rest;
            break;
        }
    }

    let mut out: Vec<&str> = Vec::new();
    for line in text.trim().lines().map(str::trim_end) {
        if line.is_empty() && out.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    out.join("\n")
}

/// Splits a guide into its `#`-headed sections.
///
/// Heading text drops the leading `#`s; section lines are trimmed and blank
/// lines dropped. Text before the first heading is ignored, and `#` lines
/// inside fenced code blocks are content, not headings.
pub fn extract_outline(document: &str) -> Vec<OutlineSection> {
    let mut sections: Vec<OutlineSection> = Vec::new();
    let mut in_fence = false;

    for line in document.lines().map(str::trim) {
        if line.starts_with("```") {
            in_fence = !in_fence;
        } else if !in_fence && line.starts_with('#') {
            sections.push(OutlineSection {
                heading: line.trim_start_matches('#').trim().to_string(),
                lines: Vec::new(),
            });
            continue;
        }

        if line.is_empty() {
            continue;
        }
        if let Some(current) = sections.last_mut() {
            current.lines.push(line.to_string());
        }
    }

    sections
}

// ────────────────────────────────────────────────────────────────────────────
// Download artifact
// ────────────────────────────────────────────────────────────────────────────

/// `interview_prep_<company>_<role>.txt`, with every character outside
/// `[A-Za-z0-9_-]` replaced by `_`.
pub fn download_file_name(company: &str, role: &str) -> String {
    format!(
        "interview_prep_{}_{}.txt",
        sanitize_file_component(company),
        sanitize_file_component(role)
    )
}

fn sanitize_file_component(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::models::chat::ChatTurn;

    const LONG_GUIDE: &str = "# Technical Questions\n1. Walk through a service you scaled.\n\n\n\n# Coding Challenges   \n1. Build an LRU cache.\n";

    enum Reply {
        Text(&'static str),
        Empty,
        Hang,
    }

    struct StubModel {
        reply: Reply,
    }

    #[async_trait]
    impl LanguageModel for StubModel {
        async fn generate(&self, _prompt: &str, _role: &str) -> Result<String, LlmError> {
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Empty => Err(LlmError::EmptyContent),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(LONG_GUIDE.to_string())
                }
            }
        }

        async fn converse(&self, _history: &[ChatTurn], _message: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    /// Echoes the prompt back ahead of its answer.
    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn generate(&self, prompt: &str, _role: &str) -> Result<String, LlmError> {
            Ok(format!("{prompt}\n# Technical Questions\n{}", "x".repeat(80)))
        }

        async fn converse(&self, _history: &[ChatTurn], _message: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_model_answer_is_cleaned() {
        let model = StubModel {
            reply: Reply::Text(LONG_GUIDE),
        };
        let guide = generate_guide(Some(&model), TIMEOUT, "prompt", "Backend Developer").await;

        assert_eq!(guide.source, GuideSource::Llm);
        assert!(guide.fallback_reason.is_none());
        assert_eq!(
            guide.document,
            "# Technical Questions\n1. Walk through a service you scaled.\n\n# Coding Challenges\n1. Build an LRU cache."
        );
        assert_eq!(guide.outline.len(), 2);
        assert_eq!(guide.outline[1].heading, "Coding Challenges");
    }

    #[tokio::test]
    async fn test_disabled_model_uses_template() {
        let guide = generate_guide(None, TIMEOUT, "prompt", "Backend Developer").await;
        assert_eq!(guide.source, GuideSource::Fallback);
        assert_eq!(guide.document, get_template("Backend Developer"));
        assert_eq!(guide.fallback_reason.as_deref(), Some("LLM access is disabled"));
    }

    #[tokio::test]
    async fn test_model_error_uses_template() {
        let model = StubModel { reply: Reply::Empty };
        let guide = generate_guide(Some(&model), TIMEOUT, "prompt", "Site Reliability Engineer").await;
        assert_eq!(guide.source, GuideSource::Fallback);
        assert!(guide
            .document
            .contains("Technical Questions for Site Reliability Engineer"));
    }

    #[tokio::test]
    async fn test_short_answer_uses_template() {
        let model = StubModel {
            reply: Reply::Text("# Technical Questions\nToo short."),
        };
        let guide = generate_guide(Some(&model), TIMEOUT, "prompt", "QA Engineer").await;
        assert_eq!(guide.source, GuideSource::Fallback);
        assert!(guide
            .fallback_reason
            .as_deref()
            .is_some_and(|r| r.contains("too short")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_model_times_out_to_template() {
        let model = StubModel { reply: Reply::Hang };
        let guide = generate_guide(Some(&model), TIMEOUT, "prompt", "Data Scientist").await;
        assert_eq!(guide.source, GuideSource::Fallback);
        assert_eq!(
            guide.fallback_reason.as_deref(),
            Some("request timed out after 5s")
        );
    }

    #[tokio::test]
    async fn test_echoed_prompt_is_stripped() {
        let guide = generate_guide(Some(&EchoModel), TIMEOUT, "Creating interview guide", "QA Engineer").await;
        assert_eq!(guide.source, GuideSource::Llm);
        assert!(guide.document.starts_with("# Technical Questions"));
    }

    #[tokio::test]
    async fn test_analyze_runs_full_pipeline() {
        let text = "TECHNICAL SKILLS\nLanguages: Rust, Python\nEXPERIENCE\nBuilt services with Docker.\n";
        let analysis = analyze(None, TIMEOUT, text, "Acme", "Backend Developer").await;

        assert!(analysis.resume.skills.languages.iter().any(|l| l == "Python"));
        assert!(analysis.prompt.contains("Backend Developer position at Acme"));
        assert!(analysis.prompt.contains("Python"));
        assert_eq!(analysis.guide.source, GuideSource::Fallback);
        assert_eq!(analysis.guide.outline.len(), 5);
    }

    #[test]
    fn test_validate_response_counts_chars() {
        assert!(validate_response(&"é".repeat(49)).is_err());
        assert!(validate_response(&"é".repeat(50)).is_ok());
        match validate_response("") {
            Err(LlmError::ResponseTooShort { len }) => assert_eq!(len, 0),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_clean_response_without_echo() {
        let cleaned = clean_response("  \nHello  \n\n\n\nWorld\t\n", &["not present"]);
        assert_eq!(cleaned, "Hello\n\nWorld");
    }

    #[test]
    fn test_outline_skips_preamble_and_code_comments() {
        let doc = "Intro text\n## Coding Challenges\n```python\n# a comment\nx = 1\n```\n\n### Key Concepts\n  - Caching  \n";
        let outline = extract_outline(doc);
        assert_eq!(
            outline,
            vec![
                OutlineSection {
                    heading: "Coding Challenges".into(),
                    lines: vec![
                        "```python".into(),
                        "# a comment".into(),
                        "x = 1".into(),
                        "```".into()
                    ],
                },
                OutlineSection {
                    heading: "Key Concepts".into(),
                    lines: vec!["- Caching".into()],
                },
            ]
        );
    }

    #[test]
    fn test_download_file_name_is_sanitized() {
        assert_eq!(
            download_file_name("Acme, Inc.", "Full Stack Developer"),
            "interview_prep_Acme__Inc__Full_Stack_Developer.txt"
        );
        assert_eq!(
            download_file_name("../etc", "dev/ops"),
            "interview_prep____etc_dev_ops.txt"
        );
    }
}
