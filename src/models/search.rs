// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use utoipa::{IntoParams, ToSchema};

/// Canonical result type exposed in every search response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Course,
    Author,
    Book,
    Event,
    Fatwa,
    Article,
    Awlyaa,
    Tasawwuf,
}

impl ContentType {
    /// Every content type, in the order the fallback fan-out emits results.
    pub const ALL: [ContentType; 9] = [
        ContentType::Blog,
        ContentType::Article,
        ContentType::Course,
        ContentType::Author,
        ContentType::Book,
        ContentType::Event,
        ContentType::Fatwa,
        ContentType::Awlyaa,
        ContentType::Tasawwuf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Blog => "blog",
            ContentType::Course => "course",
            ContentType::Author => "author",
            ContentType::Book => "book",
            ContentType::Event => "event",
            ContentType::Fatwa => "fatwa",
            ContentType::Article => "article",
            ContentType::Awlyaa => "awlyaa",
            ContentType::Tasawwuf => "tasawwuf",
        }
    }

    /// Path of the upstream listing endpoint for this type
    pub fn listing_path(&self) -> &'static str {
        match self {
            ContentType::Blog => "/blogs",
            ContentType::Course => "/courses",
            ContentType::Author => "/authors",
            ContentType::Book => "/books",
            ContentType::Event => "/events",
            ContentType::Fatwa => "/iftah",
            ContentType::Article => "/articles",
            ContentType::Awlyaa => "/awlyaa",
            ContentType::Tasawwuf => "/tasawwuf",
        }
    }

    /// Site section that hosts the detail pages of this type
    pub fn section_path(&self) -> &'static str {
        match self {
            ContentType::Blog => "/blogs",
            ContentType::Course => "/courses",
            ContentType::Author => "/authors",
            ContentType::Book => "/book",
            ContentType::Event => "/event",
            ContentType::Fatwa => "/iftah",
            ContentType::Article => "/articles",
            ContentType::Awlyaa => "/awlayaa",
            ContentType::Tasawwuf => "/tasawwuf",
        }
    }

    /// Whether detail pages are addressed by slug (falling back to id).
    /// Authors, books and awlyaa pages only accept the numeric id.
    pub fn routes_by_slug(&self) -> bool {
        !matches!(
            self,
            ContentType::Author | ContentType::Book | ContentType::Awlyaa
        )
    }

    /// Whether the listing endpoint filters by a `search` parameter server-side
    pub fn supports_server_search(&self) -> bool {
        !matches!(self, ContentType::Fatwa)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source record identifier, numeric or textual depending on the upstream table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Read an identifier out of a raw JSON value. Empty strings and
    /// non-scalar values carry no identifier.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => RecordId::Number(i),
                None => RecordId::Text(n.to_string()),
            }),
            Value::String(s) if !s.trim().is_empty() => Some(RecordId::Text(s.trim().to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// One normalized hit, regardless of which upstream shape it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Never empty: records without a derivable title are dropped
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Deep link to the canonical page for the record
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Relevance score passed through from upstream, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchResult {
    /// Text the relevance matcher runs against: title, description and author.
    pub fn searchable_text(&self) -> String {
        [
            Some(self.title.as_str()),
            self.description.as_deref(),
            self.author.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Per-type result counts. Always carries all nine keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TypeCounts {
    pub blog: usize,
    pub course: usize,
    pub author: usize,
    pub book: usize,
    pub event: usize,
    pub fatwa: usize,
    pub article: usize,
    pub awlyaa: usize,
    pub tasawwuf: usize,
}

impl TypeCounts {
    pub fn from_results(results: &[SearchResult]) -> Self {
        let mut counts = Self::default();
        for result in results {
            *counts.slot(result.content_type) += 1;
        }
        counts
    }

    pub fn get(&self, content_type: ContentType) -> usize {
        match content_type {
            ContentType::Blog => self.blog,
            ContentType::Course => self.course,
            ContentType::Author => self.author,
            ContentType::Book => self.book,
            ContentType::Event => self.event,
            ContentType::Fatwa => self.fatwa,
            ContentType::Article => self.article,
            ContentType::Awlyaa => self.awlyaa,
            ContentType::Tasawwuf => self.tasawwuf,
        }
    }

    pub fn sum(&self) -> usize {
        ContentType::ALL.iter().map(|t| self.get(*t)).sum()
    }

    fn slot(&mut self, content_type: ContentType) -> &mut usize {
        match content_type {
            ContentType::Blog => &mut self.blog,
            ContentType::Course => &mut self.course,
            ContentType::Author => &mut self.author,
            ContentType::Book => &mut self.book,
            ContentType::Event => &mut self.event,
            ContentType::Fatwa => &mut self.fatwa,
            ContentType::Article => &mut self.article,
            ContentType::Awlyaa => &mut self.awlyaa,
            ContentType::Tasawwuf => &mut self.tasawwuf,
        }
    }
}

/// Query string of `GET /api/search`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text query; missing or blank yields an empty result set
    pub q: Option<String>,
}

/// Response body of `GET /api/search`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    /// The input query, trimmed
    pub query: String,
    /// Results in source enumeration order
    pub results: Vec<SearchResult>,
    /// Always equal to `results.len()`
    pub total: usize,
    pub types: TypeCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// Successful response with no hits
    pub fn empty(query: impl Into<String>) -> Self {
        Self::from_results(query, Vec::new())
    }

    /// Successful response; counts are derived from `results`.
    pub fn from_results(query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        let types = TypeCounts::from_results(&results);
        Self {
            success: true,
            query: query.into(),
            total: results.len(),
            results,
            types,
            error: None,
        }
    }

    /// Unrecoverable failure: no results, zeroed counts, and the error message.
    pub fn failure(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            query: query.into(),
            results: Vec::new(),
            total: 0,
            types: TypeCounts::default(),
            error: Some(error.into()),
        }
    }
}
