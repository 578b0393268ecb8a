use clap::{Parser, Subcommand};
use inbox_sync::{ArticleSummary, SyncConfig, SyncError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inbox-sync")]
#[command(about = "Download a read-it-later inbox as self-contained offline HTML files")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides the configuration file and environment)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Directory for downloaded articles
    #[arg(short, long, global = true)]
    pub directory: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List the articles in the inbox
    List,
    /// Download selected articles by slug or by their number in `list`
    Download {
        #[arg(required = true)]
        articles: Vec<String>,
    },
    /// Download every article in the inbox
    Sync,
    /// Write a configuration file from the given options
    Init,
}

impl Args {
    /// Build the session configuration: file, then environment, then flags
    pub fn resolve_config(&self) -> Result<SyncConfig, SyncError> {
        let config = match (&self.config, &self.directory) {
            (Some(path), _) if path.exists() => SyncConfig::from_file(path)?,
            (_, Some(directory)) => SyncConfig::new("", directory),
            (Some(path), None) => {
                return Err(SyncError::Config(format!(
                    "{} does not exist; run `init` or pass --directory",
                    path.display()
                )));
            }
            (None, None) => {
                return Err(SyncError::Config(
                    "either --config or --directory is required".to_string(),
                ));
            }
        };

        Ok(self.apply_flags(config.with_env_overrides()))
    }

    fn apply_flags(&self, mut config: SyncConfig) -> SyncConfig {
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone();
        }
        if let Some(directory) = &self.directory {
            config.directory = directory.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config
    }
}

/// Pick articles by slug or 1-based position in the listing
pub fn select_articles(
    articles: &[ArticleSummary],
    selectors: &[String],
) -> Result<Vec<ArticleSummary>, String> {
    selectors
        .iter()
        .map(|selector| {
            let by_slug = articles.iter().find(|a| &a.slug == selector);
            let by_index = || {
                selector
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| articles.get(i))
            };

            by_slug
                .or_else(by_index)
                .cloned()
                .ok_or_else(|| format!("no inbox article matches {:?}", selector))
        })
        .collect()
}
