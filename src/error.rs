// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error types for talking to the upstream content API and normalizing its payloads.

use thiserror::Error;

/// Failure while querying the upstream content API.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Unable to reach the server at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upstream returned an unexpected response: {0}")]
    Malformed(String),

    #[error("Backend schema issue (a database column is missing or renamed): {0}")]
    Schema(String),

    #[error("Upstream responded with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Upstream reported failure for {0}")]
    Rejected(String),

    #[error("{0}")]
    TotalFailure(String),
}

impl SearchError {
    /// True when the upstream could not be reached at all, as opposed to
    /// answering with something unusable.
    pub fn is_connectivity(&self) -> bool {
        match self {
            SearchError::Unreachable { source, .. } => {
                source.is_connect() || source.is_timeout() || source.is_request()
            }
            _ => false,
        }
    }

    /// Build the error for a non-OK response from its status and body text.
    /// Database column errors get a clearer message.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                ["message", "error"]
                    .iter()
                    .find_map(|key| json.get(key).and_then(|v| v.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| body.trim().chars().take(200).collect());

        if message.contains("Column not found") || message.contains("Unknown column") {
            return SearchError::Schema(message);
        }

        SearchError::Status { status, message }
    }
}

/// Failure to turn one raw upstream record into a search result.
#[derive(Error, Debug, PartialEq)]
pub enum NormalizeError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("field `{0}` has an unexpected shape")]
    MalformedField(&'static str),
}
