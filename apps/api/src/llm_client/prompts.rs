// Prompt fragments owned by the LLM client.
// The résumé-specific prompt is built in interview::prompt_builder.

/// Wrapper sent on the guide path. Replace `{role}` and `{context}` before sending.
pub const GUIDE_REQUEST_TEMPLATE: &str = r#"As an expert technical interviewer, create a detailed interview guide for a {role} position.

Context:
{context}

Please provide a structured response with the following sections:
# Technical Questions
# Coding Challenges
# System Design Questions
# Key Concepts
# Preparation Steps

Focus on practical, real-world scenarios and provide specific examples."#;

/// Fills `{name}` placeholders from `values` in one left-to-right pass.
/// Substituted text is never scanned again, and unknown or unclosed
/// placeholders are kept as written.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_placeholders_single_pass() {
        let filled = fill_placeholders("{a} then {b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(filled, "{b} then x");
    }

    #[test]
    fn test_fill_placeholders_keeps_unknown_and_unclosed() {
        let filled = fill_placeholders("{a} {other} {a", &[("a", "1")]);
        assert_eq!(filled, "1 {other} {a");
    }
}
