//! Skill/section extractor: turns raw résumé text into named sections and
//! categorized skill tags.
//!
//! Section segmentation is line based: a line containing a section marker
//! closes the running section and opens the marker's section. Skill tags come
//! from two passes whose results are merged per category:
//! 1. the `Languages:` / `Frameworks:` / ... sub-headers of the Technical
//!    Skills block, split on commas
//! 2. a scan of the whole text against the technology catalog
//!
//! Extraction never fails. If the catalog is unusable the result carries the
//! sentinel skill set and `degraded = true`.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::resume::{Section, SkillCategory, SkillSet};
use crate::resume::catalog::{
    contains_any_marker, match_section_marker, TechCatalog, SKILL_SUBHEADERS,
};

/// Best-effort extractor output, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub sections: BTreeMap<Section, Vec<String>>,
    pub skills: SkillSet,
    pub degraded: bool,
}

impl Extraction {
    fn degraded() -> Self {
        Self {
            sections: BTreeMap::new(),
            skills: SkillSet::sentinel(),
            degraded: true,
        }
    }
}

/// Extracts sections and skills using the built-in catalog.
pub fn extract(text: &str) -> Extraction {
    match TechCatalog::builtin() {
        Ok(catalog) => extract_with(catalog, text),
        Err(e) => {
            warn!("Skill catalog unavailable, returning placeholder skills: {e}");
            Extraction::degraded()
        }
    }
}

pub fn extract_with(catalog: &TechCatalog, text: &str) -> Extraction {
    let sections = extract_sections(catalog, text);
    let skills = extract_skills(catalog, text);
    debug!(
        "Extracted {} sections, {} languages, {} frameworks, {} tools",
        sections.len(),
        skills.languages.len(),
        skills.frameworks.len(),
        skills.tools.len()
    );
    Extraction {
        sections,
        skills,
        degraded: false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

pub fn extract_sections(catalog: &TechCatalog, text: &str) -> BTreeMap<Section, Vec<String>> {
    let mut raw: BTreeMap<Section, Vec<&str>> = BTreeMap::new();
    let mut current: Option<Section> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(section) = match_section_marker(line) {
            current = Some(section);
            continue;
        }
        // Lines before the first header belong to no section.
        if let Some(section) = current {
            raw.entry(section).or_default().push(line);
        }
    }

    raw.into_iter()
        .map(|(section, lines)| (section, clean_lines(catalog, &lines)))
        .collect()
}

fn clean_lines(catalog: &TechCatalog, lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !contains_any_marker(l))
        .map(|l| catalog.strip_bullet(l).trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

pub fn extract_skills(catalog: &TechCatalog, text: &str) -> SkillSet {
    let mut collected = TagCollector::default();

    for (category, tag) in structured_skill_tags(catalog, text) {
        collected.add(category, tag);
    }

    for category in SkillCategory::ALL {
        for tag in catalog.scan(category, text) {
            collected.add(category, tag);
        }
    }

    collected.into_skill_set()
}

/// Tags listed under sub-headers of the Technical Skills block.
///
/// The block runs from the first Technical Skills header to the next header of
/// another section. A sub-header's list continues onto following lines until
/// another `Label:` line appears.
fn structured_skill_tags<'t>(catalog: &TechCatalog, text: &'t str) -> Vec<(SkillCategory, &'t str)> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let Some(start) = lines
        .iter()
        .position(|l| match_section_marker(l) == Some(Section::TechnicalSkills))
    else {
        return Vec::new();
    };

    let mut tags = Vec::new();
    let mut current: Option<SkillCategory> = None;

    for &line in &lines[start..] {
        if let Some(section) = match_section_marker(line) {
            if section != Section::TechnicalSkills {
                break;
            }
        }
        let line = catalog.strip_bullet(line);
        if let Some((category, rest)) = match_subheader(line) {
            current = Some(category);
            tags.extend(split_tags(rest).map(|t| (category, t)));
        } else if catalog.is_label_line(line) {
            current = None;
        } else if let Some(category) = current {
            tags.extend(split_tags(line).map(|t| (category, t)));
        }
    }

    tags
}

fn match_subheader(line: &str) -> Option<(SkillCategory, &str)> {
    SKILL_SUBHEADERS.iter().find_map(|(header, category)| {
        line.get(..header.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(header))
            .map(|_| (*category, &line[header.len()..]))
    })
}

fn split_tags(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Per-category tag sets, deduplicated case-insensitively. The first spelling
/// seen wins; output is ordered by the lowercase form.
#[derive(Default)]
struct TagCollector {
    by_category: [BTreeMap<String, String>; 3],
}

impl TagCollector {
    fn slot(category: SkillCategory) -> usize {
        match category {
            SkillCategory::Languages => 0,
            SkillCategory::Frameworks => 1,
            SkillCategory::Tools => 2,
        }
    }

    fn add(&mut self, category: SkillCategory, tag: &str) {
        self.by_category[Self::slot(category)]
            .entry(tag.to_lowercase())
            .or_insert_with(|| tag.to_string());
    }

    fn into_skill_set(self) -> SkillSet {
        let mut skills = SkillSet::default();
        for category in SkillCategory::ALL {
            *skills.get_mut(category) = self.by_category[Self::slot(category)]
                .values()
                .cloned()
                .collect();
        }
        skills
    }
}
