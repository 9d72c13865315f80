//! Giphy-backed GIF catalog

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{GifCatalog, ReactionGif};
use crate::util::compact_text;

const GIPHY_API_URL: &str = "https://api.giphy.com/v1/gifs";
/// Family-friendly content only
const CONTENT_RATING: &str = "g";
const FALLBACK_TITLE: &str = "GIF";

#[derive(Debug, Error)]
enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Giphy API error: {0}")]
    Api(String),
    #[error("Invalid Giphy payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// GIF search and trending lists from Giphy.
///
/// Failures are logged and reported as an empty result.
#[derive(Clone)]
pub struct GiphyClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for GiphyClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("GiphyClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GiphyClient {
    pub fn new(api_key: impl Into<String>) -> crate::Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Giphy API key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            api_key,
            base_url: GIPHY_API_URL.to_string(),
            client: Client::builder().build()?,
        })
    }

    async fn fetch(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Vec<ReactionGif>, CatalogError> {
        let response = self
            .client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Api(format!(
                "{} ({})",
                compact_text(&body),
                status.as_u16()
            )));
        }
        parse_gifs(&body)
    }
}

impl GifCatalog for GiphyClient {
    async fn search(&self, query: &str, limit: usize) -> Vec<ReactionGif> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let params = [
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("rating", CONTENT_RATING.to_string()),
            ("lang", "en".to_string()),
        ];
        match self.fetch("search", &params).await {
            Ok(gifs) => gifs,
            Err(error) => {
                tracing::warn!("GIF search for {query:?} failed: {error}");
                Vec::new()
            }
        }
    }

    async fn trending(&self, limit: usize) -> Vec<ReactionGif> {
        let params = [
            ("limit", limit.to_string()),
            ("rating", CONTENT_RATING.to_string()),
        ];
        match self.fetch("trending", &params).await {
            Ok(gifs) => gifs,
            Err(error) => {
                tracing::warn!("Trending GIFs failed: {error}");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GiphyResponse {
    #[serde(default)]
    data: Vec<GiphyGif>,
}

#[derive(Debug, Deserialize)]
struct GiphyGif {
    id: String,
    #[serde(default)]
    title: Option<String>,
    images: GiphyImages,
}

#[derive(Debug, Deserialize)]
struct GiphyImages {
    fixed_height: GiphyRendition,
}

#[derive(Debug, Deserialize)]
struct GiphyRendition {
    url: String,
}

impl From<GiphyGif> for ReactionGif {
    fn from(value: GiphyGif) -> Self {
        let title = value
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());
        Self {
            id: value.id,
            url: value.images.fixed_height.url,
            title,
        }
    }
}

fn parse_gifs(body: &str) -> Result<Vec<ReactionGif>, CatalogError> {
    let payload: GiphyResponse = serde_json::from_str(body)?;
    Ok(payload.data.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_gifs_uses_fixed_height_and_title_fallback() {
        let body = r#"{
            "data": [
                {"id": "abc", "title": "Flex", "images": {"fixed_height": {"url": "https://media.giphy.com/abc.gif"}}},
                {"id": "def", "title": "  ", "images": {"fixed_height": {"url": "https://media.giphy.com/def.gif"}}}
            ],
            "pagination": {"count": 2}
        }"#;

        let gifs = parse_gifs(body).unwrap();
        assert_eq!(
            gifs,
            vec![
                ReactionGif {
                    id: "abc".to_string(),
                    url: "https://media.giphy.com/abc.gif".to_string(),
                    title: "Flex".to_string(),
                },
                ReactionGif {
                    id: "def".to_string(),
                    url: "https://media.giphy.com/def.gif".to_string(),
                    title: "GIF".to_string(),
                },
            ]
        );
    }

    #[test]
    fn parse_gifs_rejects_garbage() {
        assert!(parse_gifs("<html>").is_err());
        assert!(parse_gifs("{}").unwrap().is_empty());
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(GiphyClient::new("   ").is_err());
        let client = GiphyClient::new("secret").unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn blank_search_returns_nothing_without_network() {
        let client = GiphyClient::new("key").unwrap();
        assert!(client.search("   ", 12).await.is_empty());
    }
}
