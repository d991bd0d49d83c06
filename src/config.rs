// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Runtime configuration. Every flag can also be supplied through the
//! environment variable named next to it.

use crate::services::matcher::DEFAULT_PHRASE_MIN_CHARS;
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::net::SocketAddr;

pub const DEFAULT_FALLBACK_LIMIT: usize = 50;
pub const DEFAULT_FATWA_FALLBACK_LIMIT: usize = 100;

#[derive(Debug, Parser)]
#[command(
    name = "site-search",
    version = env!("SITE_SEARCH_VERSION"),
    about = "Federated search over the site's content API"
)]
pub struct Args {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: SocketAddr,

    /// Base URL of the upstream content API, e.g. https://cms.example.org/api
    #[arg(long, env = "CONTENT_API_URL")]
    pub api_base_url: String,

    /// Path of the upstream global-search endpoint
    #[arg(long, env = "CONTENT_API_SEARCH_PATH", default_value = "/search")]
    pub search_path: String,

    /// Items requested per content type when falling back to listings
    #[arg(long, env = "FALLBACK_LIMIT", default_value_t = DEFAULT_FALLBACK_LIMIT)]
    pub fallback_limit: usize,

    /// Items requested from the fatwa listing, which cannot filter server-side
    #[arg(long, env = "FATWA_FALLBACK_LIMIT", default_value_t = DEFAULT_FATWA_FALLBACK_LIMIT)]
    pub fatwa_fallback_limit: usize,

    /// Queries longer than this many characters may match as an exact phrase
    #[arg(long, env = "PHRASE_MIN_CHARS", default_value_t = DEFAULT_PHRASE_MIN_CHARS)]
    pub phrase_min_chars: usize,

    /// User-Agent sent to the content API
    #[arg(long, env = "USER_AGENT")]
    pub user_agent: Option<String>,
}

impl Args {
    pub fn upstream_config(&self) -> Result<UpstreamConfig> {
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("site-search/{}", env!("SITE_SEARCH_VERSION")));
        UpstreamConfig::new(&self.api_base_url, &self.search_path, user_agent)
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            fallback_limit: self.fallback_limit,
            fatwa_fallback_limit: self.fatwa_fallback_limit,
            phrase_min_chars: self.phrase_min_chars,
        }
    }
}

/// Where and how to reach the upstream content API
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Validated base URL without a trailing slash
    pub base_url: String,
    /// Global-search path, always starting with `/`
    pub search_path: String,
    pub user_agent: String,
}

impl UpstreamConfig {
    pub fn new(base_url: &str, search_path: &str, user_agent: String) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .with_context(|| format!("CONTENT_API_URL is not a valid URL: {base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("CONTENT_API_URL must be an http(s) URL, got: {base_url}");
        }

        let search_path = if search_path.starts_with('/') {
            search_path.to_string()
        } else {
            format!("/{search_path}")
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            search_path,
            user_agent,
        })
    }
}

/// Tunables of the search aggregator
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub fallback_limit: usize,
    pub fatwa_fallback_limit: usize,
    pub phrase_min_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
            fatwa_fallback_limit: DEFAULT_FATWA_FALLBACK_LIMIT,
            phrase_min_chars: DEFAULT_PHRASE_MIN_CHARS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from([
            "site-search",
            "--api-base-url",
            "https://cms.example.org/api/",
        ])
        .unwrap();

        assert_eq!(args.listen_addr.port(), 3000);
        assert_eq!(args.fallback_limit, 50);
        assert_eq!(args.fatwa_fallback_limit, 100);
        assert_eq!(args.phrase_min_chars, 5);

        let upstream = args.upstream_config().unwrap();
        assert_eq!(upstream.base_url, "https://cms.example.org/api");
        assert_eq!(upstream.search_path, "/search");
    }

    #[test]
    fn test_search_path_gets_leading_slash() {
        let config =
            UpstreamConfig::new("http://localhost:8000", "search/global", "ua".to_string())
                .unwrap();
        assert_eq!(config.search_path, "/search/global");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(UpstreamConfig::new("not a url", "/search", "ua".to_string()).is_err());
        assert!(UpstreamConfig::new("ftp://example.org", "/search", "ua".to_string()).is_err());
    }
}
