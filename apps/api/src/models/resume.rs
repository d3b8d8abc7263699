use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical résumé section names. Declaration order is the order the
/// marker table is consulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    Education,
    Experience,
    Projects,
    #[serde(rename = "Technical Skills")]
    TechnicalSkills,
    Certificates,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Education => "Education",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::TechnicalSkills => "Technical Skills",
            Section::Certificates => "Certificates",
        }
    }
}

/// Skill category a tag is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Languages,
    Frameworks,
    Tools,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [
        SkillCategory::Languages,
        SkillCategory::Frameworks,
        SkillCategory::Tools,
    ];

    /// Key used for the category in structured résumé JSON.
    pub fn key(&self) -> &'static str {
        match self {
            SkillCategory::Languages => "languages",
            SkillCategory::Frameworks => "frameworks",
            SkillCategory::Tools => "tools",
        }
    }
}

/// Categorized skill tags. Always carries exactly the three categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
}

impl SkillSet {
    /// Placeholder returned when extraction could not run. Not real data.
    pub fn sentinel() -> Self {
        Self {
            languages: vec!["Python".to_string()],
            frameworks: vec!["React".to_string()],
            tools: vec!["Git".to_string()],
        }
    }

    pub fn get(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Languages => &self.languages,
            SkillCategory::Frameworks => &self.frameworks,
            SkillCategory::Tools => &self.tools,
        }
    }

    pub fn get_mut(&mut self, category: SkillCategory) -> &mut Vec<String> {
        match category {
            SkillCategory::Languages => &mut self.languages,
            SkillCategory::Frameworks => &mut self.frameworks,
            SkillCategory::Tools => &mut self.tools,
        }
    }

    pub fn is_empty(&self) -> bool {
        SkillCategory::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

/// Structured view of one résumé, built fresh per analysis request.
///
/// `sections` is keyed by section name. Keys produced by the extractor are
/// always canonical names; the validator passes foreign keys through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredResume {
    pub sections: BTreeMap<String, Vec<String>>,
    pub skills: SkillSet,
    /// Set when `skills` holds the sentinel instead of extracted tags.
    #[serde(default)]
    pub extraction_degraded: bool,
}

impl StructuredResume {
    /// Skills that may be shown to the model. Sentinel skills are withheld.
    pub fn reportable_skills(&self) -> SkillSet {
        if self.extraction_degraded {
            SkillSet::default()
        } else {
            self.skills.clone()
        }
    }
}
