use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Status updates emitted while listing and downloading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A search page arrived; `total` is the number of articles accumulated so far
    ListedPage { page: usize, total: usize },
    /// Full content of an article is being requested
    FetchingArticle { slug: String },
    /// The first embeddable image of an article was found
    EmbeddingImages,
    /// An article file was written
    Saved { path: PathBuf },
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::ListedPage { total, .. } => write!(f, "Fetched {} articles...", total),
            Progress::FetchingArticle { slug } => write!(f, "Downloading {}...", slug),
            Progress::EmbeddingImages => write!(f, "Embedding images..."),
            Progress::Saved { path } => write!(f, "Saved {}", path.display()),
        }
    }
}

/// Optional sending half of the progress channel
///
/// Sends never block and a closed receiver is ignored.
#[derive(Debug, Clone, Default)]
pub struct ProgressTx(Option<mpsc::UnboundedSender<Progress>>);

impl ProgressTx {
    pub fn new(tx: mpsc::UnboundedSender<Progress>) -> Self {
        Self(Some(tx))
    }

    /// A sink that drops every event
    pub fn none() -> Self {
        Self(None)
    }

    pub fn emit(&self, event: Progress) {
        ::log::trace!("Progress: {}", event);
        if let Some(tx) = &self.0 {
            let _ = tx.send(event);
        }
    }
}

/// Create a progress channel
pub fn channel() -> (ProgressTx, mpsc::UnboundedReceiver<Progress>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressTx::new(tx), rx)
}
