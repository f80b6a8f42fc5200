use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::formats::{Book, SearchResultPage};
use crate::session::SearchQuery;

pub const BASE_URL_ENV: &str = "BOOKBUDDY_BASE_URL";

/// Backend base URL from the `--base-url` flag, falling back to the
/// `BOOKBUDDY_BASE_URL` environment variable.
pub fn resolve_base_url(flag: Option<&str>) -> anyhow::Result<String> {
    if let Some(url) = flag {
        return Ok(url.trim_end_matches('/').to_owned());
    }

    match std::env::var(BASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => Ok(url.trim().trim_end_matches('/').to_owned()),
        _ => anyhow::bail!("backend base url is not set; pass --base-url or set {BASE_URL_ENV}"),
    }
}

/// HTTP access to the BookBuddy backend. Purely a consumer: one endpoint for
/// paginated remote search, one for the full local catalog.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// `GET /api/books/search` with every query field serialized, including
    /// the empty ones, matching what the backend expects.
    pub async fn search(&self, query: &SearchQuery) -> anyhow::Result<SearchResultPage> {
        let mut endpoint = Url::parse(&format!("{}/api/books/search", self.base_url))
            .context("parse search endpoint")?;
        endpoint
            .query_pairs_mut()
            .append_pair("q", &query.query)
            .append_pair("category", &query.category)
            .append_pair("language", &query.language)
            .append_pair("sort", &query.sort)
            .append_pair("printType", &query.print_type)
            .append_pair("startIndex", &query.start_index.to_string());

        let response = self
            .http
            .get(endpoint.clone())
            .send()
            .await
            .with_context(|| format!("GET {endpoint}"))?;

        let status = response.status();
        let raw = response.text().await.context("read search response body")?;
        if !status.is_success() {
            let message = parse_error_message(&raw)
                .unwrap_or_else(|| format!("search failed with status {status}"));
            anyhow::bail!("{message}");
        }

        serde_json::from_str(&raw).context("parse search response")
    }

    /// `GET /api/books`: the full catalog, fetched once per run.
    pub async fn fetch_catalog(&self) -> anyhow::Result<Vec<Book>> {
        let endpoint = format!("{}/api/books", self.base_url);

        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .with_context(|| format!("GET {endpoint}"))?;

        let status = response.status();
        let raw = response.text().await.context("read catalog response body")?;
        if !status.is_success() {
            let message = parse_error_message(&raw)
                .unwrap_or_else(|| format!("catalog fetch failed with status {status}"));
            anyhow::bail!("{message}");
        }

        serde_json::from_str(&raw).context("parse catalog response")
    }
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    Some(value.get("error")?.as_str()?.to_owned())
}
