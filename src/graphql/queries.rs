use crate::error::SyncError;
use crate::results::{ArticleContent, ArticleSummary};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Paginated inbox search
pub const SEARCH: &str = r#"query Search($after: String, $first: Int, $query: String) {
  search(first: $first, after: $after, query: $query) {
    ... on SearchSuccess {
      edges {
        node {
          id
          title
          slug
          url
          author
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
    ... on SearchError {
      errorCodes
    }
  }
}"#;

/// Full article by owner and slug
pub const GET_ARTICLE: &str = r#"query GetArticle($username: String!, $slug: String!) {
  article(username: $username, slug: $slug) {
    ... on ArticleSuccess {
      article {
        id
        title
        slug
        url
        author
        content
      }
    }
    ... on ArticleError {
      errorCodes
    }
  }
}"#;

/// The only account the API key can read
pub const USERNAME: &str = "me";

/// Pagination state returned with each search page
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
    #[serde(default)]
    pub end_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchEdge {
    pub node: ArticleSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCodes {
    pub error_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchResult {
    #[serde(rename_all = "camelCase")]
    Success {
        edges: Vec<Value>,
        page_info: PageCursor,
    },
    Error(ErrorCodes),
}

/// Decode the article on each search edge, skipping edges that do not decode
pub fn edge_summaries(edges: Vec<Value>) -> Vec<ArticleSummary> {
    edges
        .into_iter()
        .filter_map(|edge| match serde_json::from_value::<SearchEdge>(edge) {
            Ok(edge) => Some(edge.node),
            Err(e) => {
                ::log::warn!("Skipping unreadable search result: {}", e);
                None
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArticleResult {
    Success { article: ArticleContent },
    Error(ErrorCodes),
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    #[serde(default)]
    message: String,
}

/// Extract `data.<field>` from a GraphQL envelope
///
/// Returns `Ok(None)` when the field is missing or has a shape that does not
/// match `T`. An envelope without data but with top-level `errors` is turned
/// into [`SyncError::Remote`].
pub fn payload<T: DeserializeOwned>(envelope: &Value, field: &str) -> Result<Option<T>, SyncError> {
    let data = envelope.get("data").filter(|d| !d.is_null());

    if data.is_none() {
        if let Some(errors) = envelope.get("errors") {
            let messages = serde_json::from_value::<Vec<EnvelopeError>>(errors.clone())
                .map(|errors| {
                    errors
                        .into_iter()
                        .map(|e| e.message)
                        .filter(|m| !m.is_empty())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            if !messages.is_empty() {
                return Err(SyncError::Remote(messages));
            }
        }
    }

    let Some(value) = data.and_then(|d| d.get(field)) else {
        return Ok(None);
    };

    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            ::log::debug!("Unrecognised `{}` payload: {}", field, e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_success() {
        let envelope = json!({"data": {"search": {
            "edges": [{"node": {"id": "1", "title": "A", "slug": "a", "url": "https://a", "author": null}}],
            "pageInfo": {"hasNextPage": true, "endCursor": "20"}
        }}});

        match payload::<SearchResult>(&envelope, "search").unwrap() {
            Some(SearchResult::Success { edges, page_info }) => {
                let articles = edge_summaries(edges);
                assert_eq!(articles.len(), 1);
                assert_eq!(articles[0].slug, "a");
                assert!(page_info.has_next_page);
                assert_eq!(page_info.end_cursor.as_deref(), Some("20"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bad_edge_skipped_and_page_kept() {
        let envelope = json!({"data": {"search": {
            "edges": [
                {"node": {"id": "1", "title": "A", "slug": "a", "url": "https://a"}},
                {"node": {"id": "2", "title": null, "slug": "b", "url": "https://b"}},
                {"node": {"id": "3", "title": "C", "slug": null, "url": "https://c"}},
                {"node": null},
                {"node": {"id": "4", "title": "D", "slug": "d", "url": "https://d"}}
            ],
            "pageInfo": {"hasNextPage": false, "endCursor": null}
        }}});

        match payload::<SearchResult>(&envelope, "search").unwrap() {
            Some(SearchResult::Success { edges, .. }) => {
                let slugs: Vec<_> = edge_summaries(edges).into_iter().map(|a| a.slug).collect();
                assert_eq!(slugs, vec!["a", "d"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_search_error_codes() {
        let envelope = json!({"data": {"search": {"errorCodes": ["UNAUTHORIZED"]}}});
        match payload::<SearchResult>(&envelope, "search").unwrap() {
            Some(SearchResult::Error(codes)) => assert_eq!(codes.error_codes, vec!["UNAUTHORIZED"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shape_is_none() {
        let envelope = json!({"data": {"search": {"unexpected": 1}}});
        assert!(payload::<SearchResult>(&envelope, "search").unwrap().is_none());

        let envelope = json!({"data": {}});
        assert!(payload::<SearchResult>(&envelope, "search").unwrap().is_none());

        let envelope = json!([1, 2, 3]);
        assert!(payload::<SearchResult>(&envelope, "search").unwrap().is_none());
    }

    #[test]
    fn test_top_level_errors_without_data() {
        let envelope = json!({"data": null, "errors": [{"message": "Cannot query field"}]});
        let err = payload::<SearchResult>(&envelope, "search").unwrap_err();
        assert!(err.to_string().contains("Cannot query field"));
    }

    #[test]
    fn test_article_success() {
        let envelope = json!({"data": {"article": {"article": {
            "id": "1", "title": "A", "slug": "a", "url": "https://a",
            "author": "Ada", "content": "<p>hi</p>"
        }}}});
        match payload::<ArticleResult>(&envelope, "article").unwrap() {
            Some(ArticleResult::Success { article }) => {
                assert_eq!(article.author.as_deref(), Some("Ada"));
                assert_eq!(article.content, "<p>hi</p>");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
