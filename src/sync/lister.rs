use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::graphql::GraphqlClient;
use crate::graphql::queries::{self, PageCursor, SearchResult};
use crate::progress::{Progress, ProgressTx};
use crate::results::ArticleSummary;
use serde_json::json;
use std::collections::HashSet;

/// List every inbox article, following the search cursor until the server
/// reports no further pages
///
/// Hard failures (transport, HTTP, decode, search error codes) discard what
/// was collected so far. A response without the expected search shape ends the
/// listing early and returns the articles already accumulated.
pub async fn list_inbox_articles(
    client: &GraphqlClient,
    config: &SyncConfig,
    progress: &ProgressTx,
) -> Result<Vec<ArticleSummary>, SyncError> {
    if config.api_key.is_empty() {
        return Err(SyncError::Config("API key is not set".to_string()));
    }

    let mut articles = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = PageCursor {
        end_cursor: None,
        has_next_page: true,
    };
    let mut page = 0;

    while cursor.has_next_page {
        if page >= config.max_pages {
            ::log::warn!(
                "Stopping after {} pages; the server still reports more results",
                page
            );
            break;
        }

        let variables = json!({
            "first": config.page_size,
            "query": config.search_query,
            "after": cursor.end_cursor,
        });

        let envelope = client.query(queries::SEARCH, variables).await.map_err(|e| {
            ::log::error!("Listing failed on page {}: {}", page + 1, e);
            SyncError::from(e)
        })?;

        match queries::payload::<SearchResult>(&envelope, "search")? {
            Some(SearchResult::Success { edges, page_info }) => {
                page += 1;
                for article in queries::edge_summaries(edges) {
                    if seen.insert(article.id.clone()) {
                        articles.push(article);
                    } else {
                        ::log::debug!("Ignoring repeated article {}", article.id);
                    }
                }
                ::log::debug!(
                    "Search page {}: {} articles so far, more: {}",
                    page,
                    articles.len(),
                    page_info.has_next_page
                );
                progress.emit(Progress::ListedPage {
                    page,
                    total: articles.len(),
                });
                cursor = page_info;
                if cursor.has_next_page && cursor.end_cursor.is_none() {
                    ::log::warn!("Server reported more results without a cursor; stopping");
                    cursor.has_next_page = false;
                }
            }
            Some(SearchResult::Error(errors)) => {
                ::log::error!("Search failed: {}", errors.error_codes.join(", "));
                return Err(SyncError::Remote(errors.error_codes));
            }
            None => {
                ::log::warn!(
                    "Search response had no usable payload; treating page {} as the last",
                    page + 1
                );
                cursor.has_next_page = false;
            }
        }
    }

    ::log::info!("Listed {} inbox articles in {} pages", articles.len(), page);
    Ok(articles)
}
