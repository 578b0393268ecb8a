use crate::html::scanner::{Edit, StartTag, TagScanner, apply_edits};
use crate::progress::{Progress, ProgressTx};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::collections::HashMap;
use url::Url;

/// Attribute carrying the image's original (unproxied) location
pub const ORIGINAL_SRC_ATTR: &str = "data-omnivore-original-src";

/// Used when the image response does not declare a type
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// An image ready to be embedded in place of a remote reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinedImage {
    pub mime_type: String,
    /// Standard base64, padded
    pub payload: String,
}

impl InlinedImage {
    pub fn from_bytes(content_type: Option<&str>, bytes: &[u8]) -> Self {
        let mime_type = content_type
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        Self {
            mime_type,
            payload: STANDARD.encode(bytes),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }
}

/// Rewrites marked `<img>` tags so their `src` is an inline data URI
pub struct ImageInliner<'a> {
    http: &'a reqwest::Client,
    progress: &'a ProgressTx,
}

impl<'a> ImageInliner<'a> {
    pub fn new(http: &'a reqwest::Client, progress: &'a ProgressTx) -> Self {
        Self { http, progress }
    }

    /// Inline every embeddable image of `html`
    ///
    /// Never fails: an image that cannot be fetched keeps its original tag.
    pub async fn inline_images(&self, html: &str) -> String {
        let mut edits = Vec::new();
        let mut fetched: HashMap<String, Option<InlinedImage>> = HashMap::new();
        let mut announced = false;

        for tag in TagScanner::new(html).filter(|t| t.is("img")) {
            let Some(original) = tag.attr(ORIGINAL_SRC_ATTR).and_then(|a| a.value) else {
                continue;
            };

            if !announced {
                self.progress.emit(Progress::EmbeddingImages);
                announced = true;
            }

            let source = decode_amp(original.trim());
            if !fetched.contains_key(&source) {
                let image = self.fetch(&source).await;
                fetched.insert(source.clone(), image);
            }

            if let Some(Some(image)) = fetched.get(&source) {
                edits.push(src_edit(&tag, &image.to_data_uri()));
            }
        }

        let inlined = fetched.values().filter(|i| i.is_some()).count();
        ::log::debug!("Inlined {} of {} distinct images", inlined, fetched.len());

        apply_edits(html, &edits)
    }

    async fn fetch(&self, source: &str) -> Option<InlinedImage> {
        let url = match Url::parse(source) {
            Ok(url) => url,
            Err(e) => {
                ::log::debug!("Skipping image with unusable URL {:?}: {}", source, e);
                return None;
            }
        };

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                ::log::warn!("Failed to fetch image {}: {}", source, e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            ::log::warn!("Image {} returned {}", source, response.status());
            return None;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match response.bytes().await {
            Ok(bytes) => Some(InlinedImage::from_bytes(content_type.as_deref(), &bytes)),
            Err(e) => {
                ::log::warn!("Failed to read image {}: {}", source, e);
                None
            }
        }
    }
}

/// Edit that points the tag's `src` at `data_uri`
fn src_edit(tag: &StartTag<'_>, data_uri: &str) -> Edit {
    let quoted = format!("\"{}\"", data_uri);
    match tag.attr("src") {
        Some(src) => match &src.value_span {
            Some(span) => Edit {
                range: span.clone(),
                replacement: quoted,
            },
            None => Edit {
                range: src.span.clone(),
                replacement: format!("src={}", quoted),
            },
        },
        None => Edit {
            range: tag.name_end..tag.name_end,
            replacement: format!(" src={}", quoted),
        },
    }
}

/// Attribute values arrive HTML-encoded; `&amp;` is the only entity URLs carry in practice
fn decode_amp(value: &str) -> String {
    value.replace("&amp;", "&")
}
