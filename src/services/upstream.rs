// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::config::UpstreamConfig;
use crate::error::SearchError;
use crate::models::search::ContentType;
use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

/// Revalidation window hinted on global-search requests
pub const GLOBAL_SEARCH_REVALIDATE_SECS: u64 = 60;

/// HTTP client for the upstream content API
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SearchError> {
        let raw = format!("{}{}", self.config.base_url, path);
        Url::parse(&raw).map_err(|e| SearchError::Malformed(format!("invalid endpoint {raw}: {e}")))
    }

    async fn get(&self, url: Url, cache_secs: Option<u64>) -> Result<reqwest::Response, SearchError> {
        let mut request = self.http.get(url.clone()).header(ACCEPT, "application/json");
        if let Some(secs) = cache_secs {
            request = request.header(CACHE_CONTROL, format!("max-age={secs}"));
        }

        let response = request
            .send()
            .await
            .map_err(|source| SearchError::Unreachable {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::from_status(status.as_u16(), &body));
        }

        Ok(response)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, SearchError> {
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Malformed(format!("failed to read body: {e}")))?;
        serde_json::from_str(&body).map_err(|e| SearchError::Malformed(format!("invalid JSON: {e}")))
    }

    /// Query the global-search endpoint. Any error here means the caller
    /// should fall back to the per-type listings.
    pub async fn global_search(&self, query: &str) -> Result<Value, SearchError> {
        let mut url = self.endpoint(&self.config.search_path)?;
        url.query_pairs_mut().append_pair("q", query);

        let response = self.get(url, Some(GLOBAL_SEARCH_REVALIDATE_SECS)).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("json") {
            return Err(SearchError::Malformed(format!(
                "expected JSON from global search, got content-type '{content_type}'"
            )));
        }

        let payload = Self::read_json(response).await?;
        if payload.get("success") == Some(&Value::Bool(false)) {
            return Err(SearchError::Rejected(self.config.search_path.clone()));
        }

        Ok(payload)
    }

    /// Fetch up to `limit` records of one content type. Types whose endpoint
    /// filters server-side also receive the query.
    pub async fn list(
        &self,
        content_type: ContentType,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Value>, SearchError> {
        let mut url = self.endpoint(content_type.listing_path())?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &limit.to_string());
            if content_type.supports_server_search() {
                pairs.append_pair("search", query);
            }
        }

        let response = self.get(url, None).await?;
        let body = Self::read_json(response).await?;
        listing_items(body, content_type)
    }
}

/// Pull the record array out of a listing response: `{success, data: [...]}`,
/// a paginated `{data: {data: [...]}}`, or a bare array.
fn listing_items(body: Value, content_type: ContentType) -> Result<Vec<Value>, SearchError> {
    let path = content_type.listing_path();
    let mut map = match body {
        Value::Array(items) => return Ok(items),
        Value::Object(map) => map,
        _ => {
            return Err(SearchError::Malformed(format!(
                "{path} returned a non-object body"
            )))
        }
    };

    if map.get("success") == Some(&Value::Bool(false)) {
        return Err(SearchError::Rejected(path.to_string()));
    }

    match map.remove("data") {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Object(mut page)) => match page.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(SearchError::Malformed(format!(
                "{path} returned a page without a data array"
            ))),
        },
        _ => Err(SearchError::Malformed(format!(
            "{path} returned no data array"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_items_shapes() {
        let items = listing_items(json!({"success": true, "data": [{"id": 1}]}), ContentType::Blog);
        assert_eq!(items.unwrap().len(), 1);

        let items = listing_items(json!({"data": {"current_page": 1, "data": [{"id": 1}, {"id": 2}]}}), ContentType::Blog);
        assert_eq!(items.unwrap().len(), 2);

        let items = listing_items(json!([{"id": 1}]), ContentType::Blog);
        assert_eq!(items.unwrap().len(), 1);
    }

    #[test]
    fn test_listing_items_rejected() {
        let err = listing_items(json!({"success": false, "message": "nope"}), ContentType::Event)
            .unwrap_err();
        assert!(matches!(err, SearchError::Rejected(path) if path == "/events"));
    }

    #[test]
    fn test_listing_items_without_data() {
        assert!(matches!(
            listing_items(json!({"success": true}), ContentType::Book),
            Err(SearchError::Malformed(_))
        ));
        assert!(matches!(
            listing_items(json!("oops"), ContentType::Book),
            Err(SearchError::Malformed(_))
        ));
    }

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let config = UpstreamConfig::new("http://localhost:8000/api/", "/search", "ua".to_string())
            .unwrap();
        let client = UpstreamClient::new(config).unwrap();
        let url = client.endpoint(ContentType::Fatwa.listing_path()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/iftah");
    }
}
