use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::graphql::GraphqlClient;
use crate::graphql::queries::{self, ArticleResult};
use crate::html::{ImageInliner, render_document};
use crate::progress::{Progress, ProgressTx};
use crate::results::{ArticleContent, ArticleSummary};
use crate::utils::article_filename;
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Download one article into a standalone HTML file and return its path
///
/// Nothing is written unless the article was fetched successfully, and the
/// file only appears under its final name once it is complete.
pub async fn download_article(
    client: &GraphqlClient,
    config: &SyncConfig,
    summary: &ArticleSummary,
    progress: &ProgressTx,
) -> Result<PathBuf, SyncError> {
    if config.api_key.is_empty() {
        return Err(SyncError::Config("API key is not set".to_string()));
    }

    progress.emit(Progress::FetchingArticle {
        slug: summary.slug.clone(),
    });

    let article = fetch_article(client, &summary.slug).await?;

    let body = ImageInliner::new(client.http(), progress)
        .inline_images(&article.content)
        .await;
    let document = render_document(&article, &body);

    let path = config
        .directory
        .join(article_filename(&article.title, &article.slug));
    write_atomically(&config.directory, &path, document.as_bytes())?;

    ::log::info!("Saved \"{}\" to {}", article.title, path.display());
    progress.emit(Progress::Saved { path: path.clone() });
    Ok(path)
}

/// Fetch the full article behind `slug`
pub async fn fetch_article(client: &GraphqlClient, slug: &str) -> Result<ArticleContent, SyncError> {
    let variables = json!({
        "username": queries::USERNAME,
        "slug": slug,
    });

    let envelope = client.query(queries::GET_ARTICLE, variables).await?;

    match queries::payload::<ArticleResult>(&envelope, "article")? {
        Some(ArticleResult::Success { article }) => Ok(article),
        Some(ArticleResult::Error(errors)) => {
            ::log::error!(
                "Fetching {} failed: {}",
                slug,
                errors.error_codes.join(", ")
            );
            Err(SyncError::Remote(errors.error_codes))
        }
        None => Err(SyncError::UnexpectedResponse(format!(
            "no article payload for {}",
            slug
        ))),
    }
}

/// Write `contents` to a temporary file in `directory`, then rename it onto `path`
fn write_atomically(directory: &Path, path: &Path, contents: &[u8]) -> Result<(), SyncError> {
    std::fs::create_dir_all(directory).map_err(|e| SyncError::filesystem(directory, e))?;

    // Dropping the temp file on any error below removes it
    let mut file = tempfile::Builder::new()
        .prefix(".inbox-sync-")
        .suffix(".tmp")
        .tempfile_in(directory)
        .map_err(|e| SyncError::filesystem(directory, e))?;

    file.write_all(contents)
        .and_then(|_| set_readable_permissions(file.as_file()))
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| SyncError::filesystem(file.path(), e))?;

    file.persist(path)
        .map_err(|e| SyncError::filesystem(path, e.error))?;
    Ok(())
}

/// Temp files are created owner-only; saved articles get the usual 0644
#[cfg(unix)]
fn set_readable_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_readable_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}
