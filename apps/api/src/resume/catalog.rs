//! Static tables driving résumé extraction: section markers, skill
//! sub-headers and the technology catalog.
//!
//! Every table is plain data. Extending recognition means adding a row here;
//! the extractor's control flow never changes.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::resume::{Section, SkillCategory};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid catalog pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Header synonyms per canonical section, matched case-insensitively as
/// substrings of a line.
pub const SECTION_MARKERS: &[(Section, &[&str])] = &[
    (
        Section::Education,
        &["EDUCATION", "ACADEMIC BACKGROUND", "ACADEMIC QUALIFICATIONS"],
    ),
    (
        Section::Experience,
        &[
            "EXPERIENCE",
            "WORK EXPERIENCE",
            "PROFESSIONAL EXPERIENCE",
            "EMPLOYMENT HISTORY",
        ],
    ),
    (
        Section::Projects,
        &[
            "PROJECTS",
            "PROJECT EXPERIENCE",
            "PERSONAL PROJECTS",
            "ACADEMIC PROJECTS",
        ],
    ),
    (
        Section::TechnicalSkills,
        &[
            "TECHNICAL SKILLS",
            "SKILLS",
            "TECHNOLOGIES",
            "TECHNICAL EXPERTISE",
        ],
    ),
    (
        Section::Certificates,
        &["CERTIFICATES", "CERTIFICATIONS", "COURSES", "ACHIEVEMENTS"],
    ),
];

/// Sub-headers inside a Technical Skills block. Longer labels first so
/// `Programming Languages:` is not read as `Languages:`.
pub const SKILL_SUBHEADERS: &[(&str, SkillCategory)] = &[
    ("Programming Languages:", SkillCategory::Languages),
    ("Technologies:", SkillCategory::Tools),
    ("Frameworks:", SkillCategory::Frameworks),
    ("Languages:", SkillCategory::Languages),
    ("Libraries:", SkillCategory::Frameworks),
    ("Tools:", SkillCategory::Tools),
];

pub const LANGUAGE_PATTERNS: &[&str] = &[
    // general purpose
    r"Python", r"Java(?:Script)?", r"TypeScript", r"C\+\+", r"C#", r"Ruby", r"PHP",
    r"Go(?:lang)?", r"Rust", r"Swift", r"Kotlin", r"R", r"MATLAB", r"Scala",
    r"Perl", r"Haskell", r"Lua", r"Dart", r"Julia",
    // web
    r"HTML5?", r"CSS3?", r"SQL", r"NoSQL", r"GraphQL",
    // shell
    r"Bash", r"Shell", r"PowerShell",
    // game development
    r"GDScript", r"Unity",
];

pub const FRAMEWORK_PATTERNS: &[&str] = &[
    // frontend
    r"React(?:\.js)?", r"Angular(?:JS)?", r"Vue(?:\.js)?", r"Svelte", r"Next\.js",
    r"jQuery", r"Bootstrap", r"Tailwind", r"Material-UI", r"Ember",
    // backend
    r"Django", r"Flask", r"FastAPI", r"Spring(?:Boot)?", r"Express(?:\.js)?",
    r"Laravel", r"Ruby on Rails", r"ASP\.NET", r"Node\.js",
    // mobile
    r"React Native", r"Flutter", r"Xamarin", r"SwiftUI", r"Kotlin Multiplatform",
    // data science
    r"TensorFlow", r"PyTorch", r"Keras", r"Scikit-learn", r"Pandas",
    r"NumPy", r"SciPy", r"Matplotlib", r"Seaborn", r"Plotly",
    // testing
    r"Jest", r"Mocha", r"Pytest", r"JUnit", r"Selenium",
];

pub const TOOL_PATTERNS: &[&str] = &[
    // version control
    r"Git", r"GitHub", r"GitLab", r"Bitbucket", r"SVN",
    // devops and cloud
    r"Docker", r"Kubernetes", r"Jenkins", r"Travis CI", r"CircleCI",
    r"AWS", r"Azure", r"GCP", r"Heroku", r"DigitalOcean",
    // databases
    r"MySQL", r"PostgreSQL", r"MongoDB", r"Redis", r"Cassandra",
    r"Oracle", r"SQLite", r"Firebase",
    // editors
    r"VS Code", r"Visual Studio", r"IntelliJ", r"PyCharm", r"Eclipse",
    r"Sublime", r"Atom", r"Vim", r"Emacs",
    // design
    r"Figma", r"Sketch", r"Adobe XD", r"Photoshop", r"Illustrator",
    // collaboration
    r"Jira", r"Confluence", r"Trello", r"Slack", r"Postman",
];

/// Tags that are single letters or ordinary words (`R`, `Go`, `Scala` in
/// "scalable", `Git` in "digit"). These only match as whole tokens; every
/// other tag matches anywhere, so `Python3` and `MicroPython` still count.
pub const WHOLE_WORD_TAGS: &[&str] = &[
    r"R", r"Go(?:lang)?", r"C#", r"Rust", r"Swift", r"Scala", r"Lua", r"Dart", r"Shell",
    r"Unity", r"React(?:\.js)?", r"Angular(?:JS)?", r"Vue(?:\.js)?", r"Ember",
    r"Spring(?:Boot)?", r"Express(?:\.js)?", r"Jest", r"Git", r"AWS", r"Oracle", r"Atom",
    r"Sketch", r"Slack", r"Eclipse",
];

/// Leading bullet glyphs stripped from section lines.
const BULLET_PATTERN: &str = r"^[-•●■◆○*]+\s*";

/// Compiled technology catalog plus the line-level patterns the extractor
/// needs.
#[derive(Debug)]
pub struct TechCatalog {
    languages: Vec<Regex>,
    frameworks: Vec<Regex>,
    tools: Vec<Regex>,
    bullet: Regex,
    label: Regex,
}

static BUILTIN: LazyLock<Result<TechCatalog, ExtractionError>> =
    LazyLock::new(|| TechCatalog::compile(LANGUAGE_PATTERNS, FRAMEWORK_PATTERNS, TOOL_PATTERNS));

impl TechCatalog {
    /// The built-in catalog, compiled once per process.
    pub fn builtin() -> Result<&'static TechCatalog, &'static ExtractionError> {
        BUILTIN.as_ref()
    }

    pub fn compile(
        languages: &[&str],
        frameworks: &[&str],
        tools: &[&str],
    ) -> Result<Self, ExtractionError> {
        Ok(Self {
            languages: compile_tags(languages)?,
            frameworks: compile_tags(frameworks)?,
            tools: compile_tags(tools)?,
            bullet: compile(BULLET_PATTERN)?,
            label: compile(r"^[A-Za-z][A-Za-z0-9 /&+.\-]*:")?,
        })
    }

    pub fn patterns(&self, category: SkillCategory) -> &[Regex] {
        match category {
            SkillCategory::Languages => &self.languages,
            SkillCategory::Frameworks => &self.frameworks,
            SkillCategory::Tools => &self.tools,
        }
    }

    /// Every literal match of the category's patterns in `text`, in order of
    /// pattern then position.
    pub fn scan<'t>(&self, category: SkillCategory, text: &'t str) -> Vec<&'t str> {
        let mut found = Vec::new();
        for re in self.patterns(category) {
            // resume at the tag's end: the trailing boundary char may open the next tag
            let mut start = 0;
            while let Some(tag) = re.captures_at(text, start).and_then(|caps| caps.get(1)) {
                if tag.is_empty() {
                    break;
                }
                found.push(tag.as_str());
                start = tag.end();
            }
        }
        found
    }

    pub fn strip_bullet<'l>(&self, line: &'l str) -> &'l str {
        match self.bullet.find(line) {
            Some(m) => &line[m.end()..],
            None => line,
        }
    }

    /// True when the line opens with a `Label:` of its own.
    pub fn is_label_line(&self, line: &str) -> bool {
        self.label.is_match(line)
    }
}

/// Wraps each catalog fragment in capture group 1. Fragments listed in
/// [`WHOLE_WORD_TAGS`] also need a non-word character before them and a
/// non-letter after them (`Go1.22` counts). Boundaries are spelled out
/// because several tags end in `+`, `#` or `.`.
fn compile_tags(patterns: &[&str]) -> Result<Vec<Regex>, ExtractionError> {
    patterns
        .iter()
        .map(|p| {
            if WHOLE_WORD_TAGS.contains(p) {
                compile(&format!(r"(?i)(?:^|[^\w])({p})(?:[^A-Za-z]|$)"))
            } else {
                compile(&format!(r"(?i)({p})"))
            }
        })
        .collect()
}

fn compile(pattern: &str) -> Result<Regex, ExtractionError> {
    Regex::new(pattern).map_err(|source| ExtractionError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// The section whose marker appears in `line`, if any. When markers of
/// several sections match, the longest marker decides.
pub fn match_section_marker(line: &str) -> Option<Section> {
    let upper = line.to_uppercase();
    SECTION_MARKERS
        .iter()
        .flat_map(|(section, markers)| markers.iter().map(move |m| (*section, *m)))
        .filter(|(_, marker)| upper.contains(marker))
        .max_by_key(|(_, marker)| marker.len())
        .map(|(section, _)| section)
}

pub fn contains_any_marker(line: &str) -> bool {
    match_section_marker(line).is_some()
}
