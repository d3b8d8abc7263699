//! Role patterns used to synthesize a guide for roles without a precomposed
//! document.
//!
//! Rendering reads the first three skills, tools, concepts and challenges of
//! a pattern by position. The table is checked against that arity at compile
//! time, so a short row fails the build instead of a request.

/// Minimum entries in every positional list of a pattern.
pub const MIN_ENTRIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePattern {
    pub skills: &'static [&'static str],
    pub tools: &'static [&'static str],
    pub concepts: &'static [&'static str],
    pub challenges: &'static [&'static str],
    pub code_example: &'static str,
}

pub const ROLE_PATTERNS: &[(&str, RolePattern)] = &[
    (
        "Data Scientist",
        RolePattern {
            skills: &[
                "Python",
                "R",
                "SQL",
                "Machine Learning",
                "Statistical Analysis",
            ],
            tools: &["Pandas", "Scikit-learn", "TensorFlow", "PyTorch", "Jupyter"],
            concepts: &[
                "Machine Learning",
                "Statistical Modeling",
                "Data Visualization",
                "Feature Engineering",
            ],
            challenges: &[
                "Model Implementation",
                "Data Pipeline Design",
                "Feature Selection",
            ],
            code_example: r#"```python
class ModelPipeline:
    def __init__(self):
        self.model = None
        self.scaler = StandardScaler()

    def preprocess(self, data):
        return self.scaler.fit_transform(data)

    def train(self, X, y):
        X_scaled = self.preprocess(X)
        self.model = RandomForestClassifier()
        self.model.fit(X_scaled, y)
```"#,
        },
    ),
    (
        "DevOps Engineer",
        RolePattern {
            skills: &[
                "CI/CD",
                "Docker",
                "Kubernetes",
                "Cloud Platforms",
                "Infrastructure as Code",
            ],
            tools: &["Jenkins", "AWS/Azure/GCP", "Terraform", "Ansible", "Git"],
            concepts: &[
                "Container Orchestration",
                "Infrastructure Automation",
                "Monitoring",
                "Security",
            ],
            challenges: &[
                "Pipeline Implementation",
                "Infrastructure Setup",
                "Monitoring System",
            ],
            code_example: r#"```yaml
version: '3'
services:
  app:
    build: .
    ports:
      - "8080:8080"
    environment:
      - DB_HOST=db
    depends_on:
      - db
  db:
    image: postgres:13
    volumes:
      - db_data:/var/lib/postgresql/data
```"#,
        },
    ),
    (
        "QA Engineer",
        RolePattern {
            skills: &[
                "Test Automation",
                "API Testing",
                "Performance Testing",
                "Test Planning",
            ],
            tools: &["Selenium", "JUnit/PyTest", "Postman", "JMeter"],
            concepts: &[
                "Test Methodologies",
                "CI/CD Integration",
                "Test Coverage",
                "Bug Tracking",
            ],
            challenges: &[
                "Test Framework Design",
                "Automation Script",
                "Test Strategy",
            ],
            code_example: r#"```python
class TestLoginFeature(unittest.TestCase):
    def setUp(self):
        self.driver = webdriver.Chrome()
        self.driver.get("http://example.com")

    def test_valid_login(self):
        login_page = LoginPage(self.driver)
        dashboard = login_page.login("user", "pass")
        self.assertTrue(dashboard.is_loaded())
```"#,
        },
    ),
    (
        "Mobile Developer",
        RolePattern {
            skills: &[
                "iOS/Android Development",
                "Cross-platform Development",
                "Mobile UI/UX",
                "API Integration",
            ],
            tools: &[
                "Swift/Kotlin",
                "React Native/Flutter",
                "Xcode/Android Studio",
                "Firebase",
            ],
            concepts: &[
                "Mobile Architecture",
                "State Management",
                "Native Features",
                "Performance",
            ],
            challenges: &["UI Implementation", "State Management", "Native Integration"],
            code_example: r#"```swift
class HomeViewController: UIViewController {
    private let viewModel: HomeViewModel

    private lazy var tableView: UITableView = {
        let table = UITableView()
        table.delegate = self
        table.dataSource = self
        return table
    }()

    override func viewDidLoad() {
        super.viewDidLoad()
        setupUI()
        bindViewModel()
    }
}
```"#,
        },
    ),
];

/// Pattern for roles in neither table.
pub const DEFAULT_PATTERN: RolePattern = RolePattern {
    skills: &[
        "Software Development",
        "Problem Solving",
        "System Design",
        "Testing",
    ],
    tools: &[
        "Relevant IDEs",
        "Version Control",
        "Project Management Tools",
    ],
    concepts: &["Software Architecture", "Best Practices", "Design Patterns"],
    challenges: &["Implementation", "System Design", "Problem Solving"],
    code_example: r#"```python
class Solution:
    def implement_feature(self):
        # Feature implementation
        pass

    def handle_edge_cases(self):
        # Edge case handling
        pass
```"#,
};

const fn assert_arity(pattern: &RolePattern) {
    assert!(pattern.skills.len() >= MIN_ENTRIES, "role pattern needs at least 3 skills");
    assert!(pattern.tools.len() >= MIN_ENTRIES, "role pattern needs at least 3 tools");
    assert!(pattern.concepts.len() >= MIN_ENTRIES, "role pattern needs at least 3 concepts");
    assert!(pattern.challenges.len() >= MIN_ENTRIES, "role pattern needs at least 3 challenges");
    assert!(!pattern.code_example.is_empty(), "role pattern needs a code example");
}

const _: () = {
    let mut i = 0;
    while i < ROLE_PATTERNS.len() {
        assert_arity(&ROLE_PATTERNS[i].1);
        i += 1;
    }
    assert_arity(&DEFAULT_PATTERN);
};

/// Pattern registered for exactly `role`, if any.
pub fn find_pattern(role: &str) -> Option<&'static RolePattern> {
    ROLE_PATTERNS
        .iter()
        .find(|(name, _)| *name == role)
        .map(|(_, pattern)| pattern)
}

/// Pattern for `role`, or the default pattern.
pub fn pattern_for(role: &str) -> &'static RolePattern {
    find_pattern(role).unwrap_or(&DEFAULT_PATTERN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_category_is_found() {
        let pattern = pattern_for("DevOps Engineer");
        assert_eq!(pattern.skills[0], "CI/CD");
        assert!(pattern.code_example.starts_with("```yaml"));
    }

    #[test]
    fn test_lookup_is_exact_match() {
        assert!(find_pattern("devops engineer").is_none());
        assert!(find_pattern("DevOps Engineer ").is_none());
    }

    #[test]
    fn test_unknown_role_uses_default() {
        assert_eq!(pattern_for("Site Reliability Engineer"), &DEFAULT_PATTERN);
    }

    #[test]
    fn test_every_code_example_is_fenced() {
        for (_, pattern) in ROLE_PATTERNS.iter().chain([("default", DEFAULT_PATTERN)].iter()) {
            assert!(pattern.code_example.starts_with("```"));
            assert!(pattern.code_example.ends_with("```"));
        }
    }
}
