//! Structured-data validator: repairs loosely shaped résumé data into a
//! `StructuredResume`. Total: every input produces a well-shaped value.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::resume::{SkillCategory, SkillSet, StructuredResume};
use crate::resume::extractor::Extraction;

/// Validates arbitrary JSON claiming `sections` and `skills` keys.
///
/// - `sections`: kept when it is an object, every key passed through. Array
///   values keep their string items, a bare string becomes a one-line
///   section, anything else becomes an empty section.
/// - `skills`: each of `languages`, `frameworks`, `tools` is copied when it is
///   an array (string items only) and is empty otherwise.
pub fn validate(raw: &Value) -> StructuredResume {
    let sections = raw
        .get("sections")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(name, lines)| (name.clone(), coerce_lines(lines)))
                .collect()
        })
        .unwrap_or_default();

    let raw_skills = raw.get("skills").and_then(Value::as_object);
    let mut skills = SkillSet::default();
    for category in SkillCategory::ALL {
        if let Some(items) = raw_skills
            .and_then(|s| s.get(category.key()))
            .and_then(Value::as_array)
        {
            *skills.get_mut(category) = string_items(items);
        }
    }

    let extraction_degraded = raw
        .get("extraction_degraded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    StructuredResume {
        sections,
        skills,
        extraction_degraded,
    }
}

/// Converts extractor output into the validated form.
pub fn normalize(extraction: Extraction) -> StructuredResume {
    let sections: BTreeMap<String, Vec<String>> = extraction
        .sections
        .into_iter()
        .map(|(section, lines)| (section.as_str().to_string(), lines))
        .collect();

    StructuredResume {
        sections,
        skills: extraction.skills,
        extraction_degraded: extraction.degraded,
    }
}

fn coerce_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => string_items(items),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}
