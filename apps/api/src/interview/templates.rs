//! Deterministic interview guides used when the model path is unavailable.
//!
//! Known roles get a precomposed document; any other role is rendered from
//! its role pattern (or the default pattern) into the same five-section
//! skeleton the model is asked to produce.

use super::patterns::{pattern_for, RolePattern};

// ──────────────────────────────────────────────
// Precomposed documents
// ──────────────────────────────────────────────

const BACKEND_DEVELOPER: &str = r#"# 💻 Technical Questions for Backend Developer

1. Explain your experience with database design and optimization
2. Describe microservices architecture you've implemented
3. How do you handle API security and authentication?
4. Discuss scalability and performance optimization

# 🔧 Coding Challenges

1. Implement a Rate Limiter

```python
class RateLimiter:
    def __init__(self, capacity, time_window):
        self.capacity = capacity
        self.time_window = time_window
        self.requests = []
        self.lock = threading.Lock()

    def is_allowed(self):
        with self.lock:
            now = time.time()
            self.requests = [req for req in self.requests
                             if now - req < self.time_window]
            if len(self.requests) < self.capacity:
                self.requests.append(now)
                return True
            return False
```

2. Design a Connection Pool
3. Implement a Caching System

# 🏗️ System Design Questions

1. Design a distributed message queue
2. Implement a scalable database architecture
3. Create a microservices system
4. Design an authentication service

# 📚 Key Concepts

1. Backend Architecture
   - API Design
   - Database Optimization
   - Caching Strategies

2. System Infrastructure
   - Microservices
   - Load Balancing
   - Service Discovery

3. Security & Performance
   - Authentication/Authorization
   - Rate Limiting
   - Performance Monitoring

# ✅ Preparation Steps

1. Practice Backend Skills
   - Build RESTful APIs
   - Implement authentication
   - Design databases

2. Study Distributed Systems
   - Message queues
   - Caching systems
   - Load balancing

3. Review System Design
   - Scalability patterns
   - Database sharding
   - Microservices architecture"#;

const FRONTEND_DEVELOPER: &str = r#"# 💻 Technical Questions for Frontend Developer

1. Explain your experience with modern frontend frameworks
2. Describe state management solutions you've implemented
3. How do you optimize client-side performance?
4. Discuss responsive design and accessibility

# 🔧 Coding Challenges

1. Implement a Custom React Hook

```javascript
function useDataFetching(url) {
    const [data, setData] = useState(null);
    const [loading, setLoading] = useState(true);
    const [error, setError] = useState(null);

    useEffect(() => {
        async function fetchData() {
            try {
                const response = await fetch(url);
                const json = await response.json();
                setData(json);
                setLoading(false);
            } catch (err) {
                setError(err);
                setLoading(false);
            }
        }
        fetchData();
    }, [url]);

    return { data, loading, error };
}
```

2. Create a Responsive Grid System
3. Build a Form Validation System

# 🏗️ System Design Questions

1. Design a component library
2. Implement state management
3. Create a routing system
4. Design a real-time dashboard

# 📚 Key Concepts

1. Frontend Architecture
   - Component Design
   - State Management
   - Performance Optimization

2. Modern Web Technologies
   - ES6+ Features
   - Web APIs
   - Browser Storage

3. UI/UX Principles
   - Responsive Design
   - Accessibility
   - Cross-browser Compatibility

# ✅ Preparation Steps

1. Practice Frontend Skills
   - Build reusable components
   - Implement common patterns
   - Master CSS layouts

2. Study Modern Web Development
   - Learn latest JavaScript features
   - Understand browser APIs
   - Practice responsive design

3. Review System Design
   - Component architecture
   - State management patterns
   - Performance optimization"#;

const FULL_STACK_DEVELOPER: &str = r#"# 💻 Technical Questions for Full Stack Developer

1. Explain your full-stack development experience
2. Describe end-to-end application architecture
3. How do you handle data flow between frontend and backend?
4. Discuss deployment and DevOps practices

# 🔧 Coding Challenges

1. Implement a Full Stack Feature

```python
# Backend (FastAPI)
@app.post("/api/items")
async def create_item(item: Item):
    result = await db.items.insert_one(item.dict())
    return {"id": str(result.inserted_id)}
```

```javascript
// Frontend (React)
function ItemCreator() {
    const [item, setItem] = useState({});

    const handleSubmit = async () => {
        const response = await fetch('/api/items', {
            method: 'POST',
            body: JSON.stringify(item)
        });
        const data = await response.json();
        console.log('Created:', data);
    };

    return (
        <form onSubmit={handleSubmit}>
            {/* Form fields */}
        </form>
    );
}
```

2. Design a Database Schema
3. Create an Authentication System

# 🏗️ System Design Questions

1. Design a full-stack application
2. Implement CI/CD pipeline
3. Create a scalable architecture
4. Design a monitoring system

# 📚 Key Concepts

1. Full Stack Architecture
   - Frontend Development
   - Backend Systems
   - Database Design

2. DevOps & Deployment
   - CI/CD Pipelines
   - Container Orchestration
   - Cloud Services

3. Security & Performance
   - End-to-end Security
   - Performance Optimization
   - Monitoring & Logging

# ✅ Preparation Steps

1. Practice Full Stack Skills
   - Build complete applications
   - Implement authentication
   - Design databases

2. Study Modern Technologies
   - Frontend frameworks
   - Backend systems
   - Database management

3. Review System Design
   - Application architecture
   - Deployment strategies
   - Scaling patterns"#;

/// Roles with a precomposed guide, matched exactly.
pub const PRECOMPOSED: &[(&str, &str)] = &[
    ("Backend Developer", BACKEND_DEVELOPER),
    ("Frontend Developer", FRONTEND_DEVELOPER),
    ("Full Stack Developer", FULL_STACK_DEVELOPER),
];

// ──────────────────────────────────────────────
// Engine
// ──────────────────────────────────────────────

/// Fallback guide for `role`. Never fails and always returns the same
/// document for the same role.
pub fn get_template(role: &str) -> String {
    if let Some((_, doc)) = PRECOMPOSED.iter().find(|(name, _)| *name == role) {
        return (*doc).to_string();
    }
    render_dynamic(role, pattern_for(role))
}

/// Generic role offered last; it has no table row and renders from the
/// default pattern.
pub const GENERIC_ROLE: &str = "Software Engineer";

/// Role names the UI can offer as suggestions: precomposed roles first,
/// then the pattern categories, then the generic role.
pub fn known_roles() -> Vec<&'static str> {
    PRECOMPOSED
        .iter()
        .map(|(name, _)| *name)
        .chain(super::patterns::ROLE_PATTERNS.iter().map(|(name, _)| *name))
        .chain(std::iter::once(GENERIC_ROLE))
        .collect()
}

/// Interpolates `pattern` and the literal `role` into the guide skeleton.
/// Positional reads are safe: the pattern table is arity-checked at compile
/// time.
pub fn render_dynamic(role: &str, pattern: &RolePattern) -> String {
    let skills = pattern.skills;
    let tools = pattern.tools;
    let concepts = pattern.concepts;
    let challenges = pattern.challenges;

    format!(
        "# 💻 Technical Questions for {role}

1. Explain your experience with {lead_skills}
2. Describe {c0} solutions you've implemented
3. How do you approach {c1}?
4. Discuss {c2} principles

# 🔧 Coding Challenges

1. Implementation Challenge

{example}

2. Design a {ch1}
3. Create a {ch2} solution

# 🏗️ System Design Questions

1. Design a scalable system for {ch0}
2. Implement {c1} strategy
3. Create an efficient {ch2} system
4. Handle edge cases and optimization

# 📚 Key Concepts

1. Core Skills
   - {s0}
   - {s1}
   - {s2}

2. Tools & Technologies
   - {t0}
   - {t1}
   - {t2}

3. Best Practices
   - {c0}
   - {c1}
   - {c2}

# ✅ Preparation Steps

1. Practice Core Skills
   - Build sample projects
   - Implement common patterns
   - Master key technologies

2. Study {role} Fundamentals
   - Learn latest practices
   - Understand core concepts
   - Practice problem-solving

3. Review System Design
   - Architecture patterns
   - Best practices
   - Performance optimization",
        lead_skills = skills[..3].join(", "),
        example = pattern.code_example,
        s0 = skills[0],
        s1 = skills[1],
        s2 = skills[2],
        t0 = tools[0],
        t1 = tools[1],
        t2 = tools[2],
        c0 = concepts[0],
        c1 = concepts[1],
        c2 = concepts[2],
        ch0 = challenges[0],
        ch1 = challenges[1],
        ch2 = challenges[2],
    )
}
