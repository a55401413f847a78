//! Topic detection over extracted document text.
//!
//! A fixed inventory of subjects the platform tutors for; detection is
//! case-insensitive substring matching, reported in inventory order.

pub const MAX_TOPICS: usize = 5;

pub const TOPIC_INVENTORY: &[&str] = &[
    "artificial intelligence",
    "ai",
    "machine learning",
    "ml",
    "deep learning",
    "web development",
    "frontend",
    "backend",
    "javascript",
    "python",
    "react",
    "data science",
    "statistics",
    "database",
    "sql",
    "computer vision",
    "natural language processing",
    "nlp",
    "cybersecurity",
    "blockchain",
    "mobile development",
    "android",
    "ios",
    "cloud computing",
    "aws",
    "azure",
    "devops",
    "docker",
    "kubernetes",
    "algorithms",
    "data structures",
    "software engineering",
    "programming",
    "coding",
    "mathematics",
    "calculus",
    "linear algebra",
    "physics",
    "chemistry",
    "biology",
    "business",
    "marketing",
    "finance",
    "economics",
    "design",
    "ui",
    "ux",
    "graphics",
    "networking",
];

/// Detects up to `MAX_TOPICS` topics mentioned in `text`.
pub fn detect_topics(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut detected: Vec<String> = Vec::new();

    for topic in TOPIC_INVENTORY {
        if !text_lower.contains(topic) {
            continue;
        }
        let normalized = normalize_topic(topic);
        if detected.iter().any(|t| t.eq_ignore_ascii_case(&normalized)) {
            continue;
        }
        detected.push(normalized);
        if detected.len() == MAX_TOPICS {
            break;
        }
    }

    detected
}

/// Long and short spellings of the AI/ML subjects collapse to one label.
fn normalize_topic(topic: &str) -> String {
    match topic {
        "artificial intelligence" | "ai" => "AI".to_string(),
        "machine learning" | "ml" => "ML".to_string(),
        _ => topic.to_string(),
    }
}
