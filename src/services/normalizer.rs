// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Turns upstream search payloads of any supported shape into [`SearchResult`]s.
//!
//! The upstream may answer with `{data: [...]}`, `{results: [...]}`, a bare array,
//! an object keyed by content type, or something else entirely. [`parse_payload`]
//! tries each shape in priority order and stops at the first that yields records.

use crate::error::NormalizeError;
use crate::models::search::{ContentType, RecordId, SearchResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};
use tracing::warn;

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const TYPE_FIELDS: [&str; 3] = ["model_type", "type", "model"];
const TITLE_FIELDS: [&str; 3] = ["title", "name", "question"];
const DESCRIPTION_FIELDS: [&str; 4] = ["description", "excerpt", "answer", "bio"];
const AUTHOR_FIELDS: [&str; 2] = ["author", "recorded_by"];
const DATE_FIELDS: [&str; 4] = ["created_at", "publishedAt", "date", "written_year"];
const IMAGE_FIELDS: [&str; 3] = ["image", "image_url", "thumbnail"];
const SCORE_FIELDS: [&str; 2] = ["score", "_score"];

/// What a raw upstream record is, and therefore how it links into the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Content(ContentType),
    /// Fatwa taxonomy tag; links to the category listing
    Tag,
    /// Fatwa sub-category; links to the sub-category listing
    SubCategory,
}

impl RecordKind {
    /// Map an upstream type name to a kind, if it is one we know.
    ///
    /// Namespaced model names (`App\Models\Blog`) resolve by their last segment;
    /// comparison ignores case, `-`, `_` and spaces.
    pub fn recognize(raw: &str) -> Option<Self> {
        let last = raw.rsplit(['\\', '/']).next().unwrap_or(raw);
        let key: String = last
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let kind = match key.as_str() {
            "blog" | "blogs" | "post" | "posts" => RecordKind::Content(ContentType::Blog),
            "course" | "courses" => RecordKind::Content(ContentType::Course),
            "author" | "authors" | "scholar" | "scholars" => {
                RecordKind::Content(ContentType::Author)
            }
            "book" | "books" => RecordKind::Content(ContentType::Book),
            "event" | "events" => RecordKind::Content(ContentType::Event),
            "fatwa" | "fatwas" | "iftah" | "iftahs" | "ifta" => {
                RecordKind::Content(ContentType::Fatwa)
            }
            "article" | "articles" => RecordKind::Content(ContentType::Article),
            "awlyaa" | "awlayaa" | "awliya" | "awlia" => RecordKind::Content(ContentType::Awlyaa),
            "tasawwuf" | "tasawwufs" => RecordKind::Content(ContentType::Tasawwuf),
            "tag" | "tags" => RecordKind::Tag,
            "iftahsubcategory" | "iftahsubcategories" => RecordKind::SubCategory,
            _ => return None,
        };
        Some(kind)
    }

    /// Like [`RecordKind::recognize`], defaulting unknown names to articles.
    pub fn resolve(raw: &str) -> Self {
        Self::recognize(raw).unwrap_or(RecordKind::Content(ContentType::Article))
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            RecordKind::Content(content_type) => *content_type,
            RecordKind::Tag | RecordKind::SubCategory => ContentType::Fatwa,
        }
    }
}

/// One raw record and the group key it was found under, if any.
#[derive(Debug, Clone, Copy)]
pub struct RawHit<'a> {
    pub item: &'a Value,
    pub group: Option<&'a str>,
}

type ShapeParser = for<'a> fn(&'a Value) -> Vec<RawHit<'a>>;

/// Shape parsers in priority order
const SHAPE_PARSERS: [ShapeParser; 5] = [
    bare_array,
    data_field,
    results_field,
    grouped_by_type,
    any_array_field,
];

fn ungrouped(items: &[Value]) -> Vec<RawHit<'_>> {
    items
        .iter()
        .map(|item| RawHit { item, group: None })
        .collect()
}

fn bare_array(payload: &Value) -> Vec<RawHit<'_>> {
    payload.as_array().map(|a| ungrouped(a)).unwrap_or_default()
}

fn data_field(payload: &Value) -> Vec<RawHit<'_>> {
    match payload.get("data") {
        Some(Value::Array(items)) => ungrouped(items),
        Some(nested @ Value::Object(_)) => grouped_by_type(nested),
        _ => Vec::new(),
    }
}

fn results_field(payload: &Value) -> Vec<RawHit<'_>> {
    match payload.get("results") {
        Some(Value::Array(items)) => ungrouped(items),
        _ => Vec::new(),
    }
}

fn array_entries<'a>(payload: &'a Value, accept_key: fn(&str) -> bool) -> Vec<RawHit<'a>> {
    let Some(map) = payload.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter(|(key, _)| accept_key(key))
        .filter_map(|(key, value)| value.as_array().map(|items| (key, items)))
        .flat_map(|(key, items)| {
            items.iter().map(move |item| RawHit {
                item,
                group: Some(key.as_str()),
            })
        })
        .collect()
}

fn grouped_by_type(payload: &Value) -> Vec<RawHit<'_>> {
    array_entries(payload, |key| RecordKind::recognize(key).is_some())
}

fn any_array_field(payload: &Value) -> Vec<RawHit<'_>> {
    array_entries(payload, |_| true)
}

/// Extract the raw records from an upstream payload of any supported shape.
pub fn parse_payload(payload: &Value) -> Vec<RawHit<'_>> {
    SHAPE_PARSERS
        .iter()
        .map(|parse| parse(payload))
        .find(|hits| !hits.is_empty())
        .unwrap_or_default()
}

/// Resolve a record's kind: its own type field first, then its group key,
/// then the caller's hint.
pub fn resolve_kind(item: &Value, group: Option<&str>, type_hint: Option<ContentType>) -> RecordKind {
    let own_type = TYPE_FIELDS
        .iter()
        .find_map(|field| item.get(*field).and_then(non_empty_str));

    match (own_type, group, type_hint) {
        (Some(raw), _, _) | (None, Some(raw), _) => RecordKind::resolve(raw),
        (None, None, Some(hint)) => RecordKind::Content(hint),
        (None, None, None) => RecordKind::Content(ContentType::Article),
    }
}

/// Normalize a whole upstream payload. Records that fail to transform are
/// logged and skipped; records without a title are dropped.
pub fn normalize(payload: &Value, type_hint: Option<ContentType>) -> Vec<SearchResult> {
    parse_payload(payload)
        .into_iter()
        .filter_map(|hit| {
            let kind = resolve_kind(hit.item, hit.group, type_hint);
            transform(hit.item, kind).unwrap_or_else(|e| {
                warn!(kind = ?kind, error = %e, "Skipping malformed search record");
                None
            })
        })
        .collect()
}

/// Transform one raw record of a known kind. `Ok(None)` means the record has
/// no usable title.
pub fn transform(item: &Value, kind: RecordKind) -> Result<Option<SearchResult>, NormalizeError> {
    let record = item.as_object().ok_or(NormalizeError::NotAnObject)?;

    let Some(title) = first_text(record, &TITLE_FIELDS).or_else(|| person_name(record)) else {
        return Ok(None);
    };

    Ok(Some(SearchResult {
        content_type: kind.content_type(),
        id: record.get("id").and_then(RecordId::from_value),
        title,
        description: first_text(record, &DESCRIPTION_FIELDS),
        slug: text(record, "slug"),
        url: record_url(kind, record),
        image: first_text(record, &IMAGE_FIELDS),
        date: first_text(record, &DATE_FIELDS),
        author: author_name(record)?,
        score: SCORE_FIELDS
            .iter()
            .find_map(|field| record.get(*field).and_then(Value::as_f64)),
    }))
}

/// Site path for a record of `kind`.
pub fn record_url(kind: RecordKind, record: &Map<String, Value>) -> String {
    let id = record.get("id").and_then(RecordId::from_value);

    match kind {
        RecordKind::Tag => match text(record, "name").or_else(|| id.map(|i| i.to_string())) {
            Some(name) => format!(
                "/iftah/category/{}",
                utf8_percent_encode(&name, URI_COMPONENT)
            ),
            None => "/iftah".to_string(),
        },
        RecordKind::SubCategory => match id {
            Some(id) => format!("/iftah/sub-category/{id}"),
            None => "/iftah".to_string(),
        },
        RecordKind::Content(content_type) => {
            let segment = if content_type.routes_by_slug() {
                text(record, "slug").or_else(|| id.map(|i| i.to_string()))
            } else {
                id.map(|i| i.to_string())
            };
            match segment {
                Some(segment) => format!("{}/{}", content_type.section_path(), segment),
                None => content_type.section_path().to_string(),
            }
        }
    }
}

/// Space-joined text of the named fields, for matching against a field list.
pub fn field_text(item: &Value, fields: &[&str]) -> String {
    fields
        .iter()
        .filter_map(|field| item.get(*field).and_then(scalar_text))
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => non_empty_str(value).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(record: &Map<String, Value>, field: &str) -> Option<String> {
    record.get(field).and_then(scalar_text)
}

fn first_text(record: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| text(record, field))
}

fn person_name(record: &Map<String, Value>) -> Option<String> {
    let full = [text(record, "first_name"), text(record, "last_name")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    (!full.is_empty()).then_some(full)
}

fn author_name(record: &Map<String, Value>) -> Result<Option<String>, NormalizeError> {
    for field in AUTHOR_FIELDS {
        match record.get(field) {
            None | Some(Value::Null) | Some(Value::Number(_)) => continue,
            Some(value @ Value::String(_)) => {
                if let Some(name) = non_empty_str(value) {
                    return Ok(Some(name.to_string()));
                }
            }
            Some(Value::Object(author)) => {
                if let Some(name) = text(author, "name").or_else(|| person_name(author)) {
                    return Ok(Some(name));
                }
            }
            Some(_) => return Err(NormalizeError::MalformedField(field)),
        }
    }
    Ok(None)
}
