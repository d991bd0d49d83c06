// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and helpers for keeping user input out of the logs.

use tracing_subscriber::{fmt, EnvFilter};

/// Longest query prefix written to the logs
const MAX_LOGGED_QUERY_CHARS: usize = 64;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

/// Shorten a user query for logging: "first 64 chars…"
pub fn log_query(query: &str) -> String {
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(MAX_LOGGED_QUERY_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_query_short_is_unchanged() {
        assert_eq!(log_query("زکات"), "زکات");
    }

    #[test]
    fn test_log_query_long_is_truncated() {
        let query = "a".repeat(100);
        let logged = log_query(&query);
        assert_eq!(logged.chars().count(), MAX_LOGGED_QUERY_CHARS + 1);
        assert!(logged.ends_with('…'));
    }

    #[test]
    fn test_log_query_exact_limit() {
        let query = "b".repeat(MAX_LOGGED_QUERY_CHARS);
        assert_eq!(log_query(&query), query);
    }
}
