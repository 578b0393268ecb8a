// Re-export modules
pub mod config;
pub mod error;
pub mod graphql;
pub mod html;
pub mod progress;
pub mod results;
pub mod sync;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::SyncConfig;
pub use error::{GraphqlError, SyncError};
pub use progress::{Progress, ProgressTx};
pub use results::{ArticleContent, ArticleSummary, SyncReport};

use graphql::GraphqlClient;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Entry point for listing and downloading inbox articles
///
/// Holds the immutable session configuration and an HTTP client; every call
/// is independent of the others.
pub struct InboxSync {
    config: SyncConfig,
    client: GraphqlClient,
    progress: ProgressTx,
}

impl InboxSync {
    /// Create a new session for the given configuration
    pub fn new(config: SyncConfig) -> Result<Self, SyncError> {
        let client = GraphqlClient::new(&config)?;
        Ok(Self {
            config,
            client,
            progress: ProgressTx::none(),
        })
    }

    /// Send progress events to the given channel
    pub fn with_progress(mut self, tx: mpsc::UnboundedSender<Progress>) -> Self {
        self.progress = ProgressTx::new(tx);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// List every article in the inbox
    pub async fn list(&self) -> Result<Vec<ArticleSummary>, SyncError> {
        sync::list_inbox_articles(&self.client, &self.config, &self.progress).await
    }

    /// Download one article and return the path of the written file
    pub async fn download(&self, summary: &ArticleSummary) -> Result<PathBuf, SyncError> {
        sync::download_article(&self.client, &self.config, summary, &self.progress).await
    }

    /// Download articles one after another, continuing past failures
    pub async fn download_all(&self, summaries: &[ArticleSummary]) -> SyncReport {
        let mut report = SyncReport::default();

        for (i, summary) in summaries.iter().enumerate() {
            ::log::debug!("Downloading {}/{}: {}", i + 1, summaries.len(), summary.slug);
            match self.download(summary).await {
                Ok(path) => report.saved.push(path),
                Err(e) => {
                    ::log::warn!("Failed to download {}: {}", summary.slug, e);
                    report.failed.push((summary.slug.clone(), e.to_string()));
                }
            }
        }

        ::log::info!(
            "Downloaded {} articles, {} failed",
            report.saved.len(),
            report.failed.len()
        );
        report
    }
}
