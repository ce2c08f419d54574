use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessLevel {
    Free,
    Subscriber,
    Unknown(String),
}

impl AccessLevel {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "free" | "public" => AccessLevel::Free,
            "subscriber" | "subscribers" | "premium" => AccessLevel::Subscriber,
            _ => AccessLevel::Unknown(raw.to_string()),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Free => f.write_str("free"),
            AccessLevel::Subscriber => f.write_str("subscriber"),
            AccessLevel::Unknown(raw) => write!(f, "unknown ({raw})"),
        }
    }
}

/// Catalog record of one podcast. `slug` names its feed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Podcast {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub id: u64,
    pub access_level: AccessLevel,
    pub image_url: String,
    pub description: String,
}
