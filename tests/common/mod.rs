// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! A throwaway content API for integration tests.

#![allow(dead_code)]

use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, MethodRouter},
    Json, Router,
};
use serde_json::{json, Value};
use site_search::app::{create_router, AppState};
use site_search::config::{SearchConfig, UpstreamConfig};
use site_search::services::search::SearchAggregator;
use site_search::services::upstream::UpstreamClient;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One request the fake upstream received
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub params: HashMap<String, String>,
    pub cache_control: Option<String>,
}

/// Shared log of upstream requests
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<Recorded>>>);

impl RequestLog {
    pub fn all(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn for_path(&self, path: &str) -> Vec<Recorded> {
        self.all().into_iter().filter(|r| r.path == path).collect()
    }

    fn push(&self, recorded: Recorded) {
        self.0.lock().unwrap().push(recorded);
    }
}

/// A route that records the request and answers with `status` and a JSON body.
pub fn json_route(log: &RequestLog, path: &'static str, status: StatusCode, body: Value) -> MethodRouter {
    let log = log.clone();
    get(
        move |Query(params): Query<HashMap<String, String>>, headers: HeaderMap| {
            let log = log.clone();
            let body = body.clone();
            async move {
                log.push(Recorded {
                    path: path.to_string(),
                    params,
                    cache_control: headers
                        .get(header::CACHE_CONTROL)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                });
                (status, Json(body))
            }
        },
    )
}

/// A listing route answering `{success: true, data: items}`.
pub fn listing_route(log: &RequestLog, path: &'static str, items: Value) -> MethodRouter {
    json_route(log, path, StatusCode::OK, json!({"success": true, "data": items}))
}

/// A route that records the request and answers with an HTML page.
pub fn html_route(log: &RequestLog, path: &'static str) -> MethodRouter {
    let log = log.clone();
    get(move || {
        let log = log.clone();
        async move {
            log.push(Recorded {
                path: path.to_string(),
                params: HashMap::new(),
                cache_control: None,
            });
            (
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                "<html><body>maintenance</body></html>",
            )
                .into_response()
        }
    })
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn aggregator(base_url: &str) -> SearchAggregator {
    let config = UpstreamConfig::new(base_url, "/search", "site-search-test".to_string()).unwrap();
    SearchAggregator::new(UpstreamClient::new(config).unwrap(), SearchConfig::default())
}

pub fn app(base_url: &str) -> Router {
    create_router(AppState {
        aggregator: Arc::new(aggregator(base_url)),
    })
}

/// Sample listing records for every content type, each with a record
/// mentioning "zakat" and some that do not.
pub fn sample_listings() -> Vec<(&'static str, Value)> {
    vec![
        (
            "/blogs",
            json!([
                {"id": 1, "title": "Zakat in practice", "slug": "zakat-in-practice", "created_at": "2024-03-01"},
                {"id": 2, "title": "Ramadan timetable"}
            ]),
        ),
        (
            "/articles",
            json!([{"id": 3, "title": "Who receives zakat", "excerpt": "eight categories"}]),
        ),
        (
            "/courses",
            json!([
                {"id": 4, "title": "Fiqh of zakat", "recorded_by": {"first_name": "Abdul", "last_name": "Haq"}}
            ]),
        ),
        (
            "/authors",
            json!([{"id": 5, "first_name": "Zakatullah", "last_name": "Khan"}]),
        ),
        (
            "/books",
            json!([{"id": 6, "title": "Kitab al-zakat", "written_year": 1890}]),
        ),
        (
            "/events",
            json!([{"id": 7, "title": "Zakat seminar", "slug": "zakat-seminar"}]),
        ),
        (
            "/iftah",
            json!([
                {"id": 8, "question": "Is zakat due on gold?", "answer": "Yes, above nisab"},
                {"id": 9, "question": "Prayer times", "answer": "..."}
            ]),
        ),
        ("/awlyaa", json!([{"id": 10, "name": "Sheikh of zakat house"}])),
        (
            "/tasawwuf",
            json!([{"id": 11, "title": "Purifying wealth through zakat", "slug": "purifying-wealth"}]),
        ),
    ]
}

/// Every sample listing except the paths in `skip`.
pub fn listings_except(log: &RequestLog, skip: &[&str]) -> Router {
    sample_listings()
        .into_iter()
        .filter(|(path, _)| !skip.contains(path))
        .fold(Router::new(), |router, (path, items)| {
            router.route(path, listing_route(log, path, items))
        })
}

pub fn all_listings(log: &RequestLog) -> Router {
    listings_except(log, &[])
}
