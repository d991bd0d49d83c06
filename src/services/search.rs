// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Federated search: the global-search endpoint first, then a fan-out over every
//! content listing when that fails.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::models::search::{ContentType, SearchResponse, SearchResult};
use crate::services::logging::log_query;
use crate::services::matcher::QueryMatcher;
use crate::services::normalizer::{field_text, normalize, transform, RecordKind};
use crate::services::upstream::UpstreamClient;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Fields matched against the query for each type when searching listings
pub fn fallback_fields(content_type: ContentType) -> &'static [&'static str] {
    match content_type {
        ContentType::Blog | ContentType::Article => &["title", "description", "excerpt"],
        ContentType::Course | ContentType::Tasawwuf | ContentType::Book => {
            &["title", "description"]
        }
        ContentType::Author => &["first_name", "last_name", "name", "bio"],
        ContentType::Event => &["title", "description", "location"],
        // Fatwas have no title
        ContentType::Fatwa => &["question", "answer"],
        ContentType::Awlyaa => &["name", "title", "bio", "description"],
    }
}

/// Search aggregator over the upstream content API
pub struct SearchAggregator {
    upstream: UpstreamClient,
    config: SearchConfig,
}

impl SearchAggregator {
    pub fn new(upstream: UpstreamClient, config: SearchConfig) -> Self {
        Self { upstream, config }
    }

    /// Run a search. Failures are reported in the response, never returned.
    pub async fn search(&self, raw_query: &str) -> SearchResponse {
        let query = raw_query.trim();
        if query.is_empty() {
            return SearchResponse::empty(query);
        }

        let matcher = QueryMatcher::with_phrase_min_chars(query, self.config.phrase_min_chars);

        let primary_error = match self.search_global(query, &matcher).await {
            Ok(results) => {
                info!(
                    query = %log_query(query),
                    total = results.len(),
                    "Global search succeeded"
                );
                return SearchResponse::from_results(query, results);
            }
            Err(e) => {
                warn!(
                    query = %log_query(query),
                    error = %e,
                    "Global search failed, falling back to content listings"
                );
                e
            }
        };

        match self.search_listings(query, &matcher).await {
            Ok(results) => {
                info!(
                    query = %log_query(query),
                    total = results.len(),
                    "Fallback search succeeded"
                );
                SearchResponse::from_results(query, results)
            }
            Err(fallback_error) => {
                let message = if primary_error.is_connectivity() {
                    format!(
                        "Cannot reach the API server at {}. Check that the content API is running.",
                        self.upstream.base_url()
                    )
                } else {
                    fallback_error.to_string()
                };
                error!(
                    query = %log_query(query),
                    primary = %primary_error,
                    fallback = %fallback_error,
                    "Search failed on both paths"
                );
                SearchResponse::failure(query, message)
            }
        }
    }

    async fn search_global(
        &self,
        query: &str,
        matcher: &QueryMatcher,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let payload = self.upstream.global_search(query).await?;

        Ok(normalize(&payload, None)
            .into_iter()
            .filter(|result| matcher.matches(&result.searchable_text()))
            .collect())
    }

    fn limit_for(&self, content_type: ContentType) -> usize {
        match content_type {
            ContentType::Fatwa => self.config.fatwa_fallback_limit,
            _ => self.config.fallback_limit,
        }
    }

    /// Query every listing concurrently. A failed type contributes nothing;
    /// only when every type fails is the fallback itself an error.
    async fn search_listings(
        &self,
        query: &str,
        matcher: &QueryMatcher,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let fetches = ContentType::ALL.into_iter().map(|content_type| async move {
            let outcome = self
                .upstream
                .list(content_type, query, self.limit_for(content_type))
                .await;
            (content_type, outcome)
        });
        let settled = join_all(fetches).await;

        let mut results = Vec::new();
        let mut first_error = None;
        let mut succeeded = 0;

        for (content_type, outcome) in settled {
            match outcome {
                Ok(items) => {
                    succeeded += 1;
                    let before = results.len();
                    results.extend(matching_records(content_type, &items, matcher));
                    debug!(
                        content_type = %content_type,
                        fetched = items.len(),
                        matched = results.len() - before,
                        "Filtered listing"
                    );
                }
                Err(e) => {
                    warn!(content_type = %content_type, error = %e, "Listing fetch failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if succeeded == 0 {
            return Err(first_error.unwrap_or_else(|| {
                SearchError::TotalFailure("No content listings could be searched".to_string())
            }));
        }

        Ok(results)
    }
}

/// Relevant records of one listing, transformed into results.
pub fn matching_records(
    content_type: ContentType,
    items: &[Value],
    matcher: &QueryMatcher,
) -> Vec<SearchResult> {
    let fields = fallback_fields(content_type);

    items
        .iter()
        .filter(|item| matcher.matches(&field_text(item, fields)))
        .filter_map(|item| {
            transform(item, RecordKind::Content(content_type)).unwrap_or_else(|e| {
                warn!(content_type = %content_type, error = %e, "Skipping malformed listing record");
                None
            })
        })
        .collect()
}
