use serde::{Deserialize, Serialize};

/// An inbox entry as returned by the search listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: String,

    pub title: String,

    /// Original URL of the saved page
    pub url: String,

    /// Author (if known)
    #[serde(default)]
    pub author: Option<String>,

    /// Lookup key for the full article
    pub slug: String,
}

/// A full article, including its HTML body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleContent {
    pub id: String,

    pub title: String,

    pub url: String,

    #[serde(default)]
    pub author: Option<String>,

    pub slug: String,

    /// Raw HTML body
    #[serde(default)]
    pub content: String,
}

impl ArticleContent {
    /// Author for display, "Unknown" when absent or blank
    pub fn author_or_unknown(&self) -> &str {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or("Unknown")
    }
}

/// Outcome of downloading several articles
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Files written, in download order
    pub saved: Vec<std::path::PathBuf>,

    /// Slug and error message of each failed article
    pub failed: Vec<(String, String)>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
