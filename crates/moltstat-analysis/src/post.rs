//! Post records and field normalization
//!
//! Post data arrives from several API endpoints and dump formats whose field
//! names drift over time (`upvotes` vs `score`, `commentCount` vs
//! `comment_count`, epoch seconds vs ISO-8601 strings). [`RawPost`] keeps the
//! loosely-typed JSON object as received; [`Post::from_raw`] resolves every
//! field through a fixed fallback chain into a fixed-shape record.
//!
//! # Fallback chains
//!
//! ```text
//! upvotes    : upvotes   -> score        -> 0
//! downvotes  : downvotes                 -> 0
//! comments   : commentCount -> comment_count -> 0
//! title      : title                     -> ""
//! body       : body      -> content      -> ""
//! created_at : createdAt -> created_at   -> timestamp -> none
//! ```
//!
//! The first key that is *present* wins, even if its value is `null`; a
//! present `null` coerces to the default rather than falling through to the
//! next key.
//!
//! Normalization never fails. Malformed values degrade to their defaults and
//! unparseable timestamps become `None`, which excludes the post from
//! time-keyed aggregates only.
//!
//! # Examples
//!
//! ```
//! use moltstat_analysis::post::{Post, RawPost};
//! use serde_json::json;
//!
//! let raw = RawPost::try_from(json!({
//!     "id": "abc",
//!     "title": "Hello",
//!     "content": "first post",
//!     "score": 7,
//!     "comment_count": null,
//!     "createdAt": "2024-01-01T10:00:00Z",
//! }))
//! .unwrap();
//!
//! let post = Post::from_raw(&raw);
//! assert_eq!(post.id.as_deref(), Some("abc"));
//! assert_eq!(post.body, "first post");
//! assert_eq!(post.upvotes, 7);
//! assert_eq!(post.comments, 0);
//! assert_eq!(post.created_hour(), Some(10));
//! ```

use chrono::{DateTime, Datelike as _, NaiveDate, NaiveDateTime, Timelike as _, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::classify::{Classification, ClassifierConfig};

const UPVOTE_KEYS: &[&str] = &["upvotes", "score"];
const DOWNVOTE_KEYS: &[&str] = &["downvotes"];
const COMMENT_KEYS: &[&str] = &["commentCount", "comment_count"];
const TITLE_KEYS: &[&str] = &["title"];
const BODY_KEYS: &[&str] = &["body", "content"];
const CREATED_KEYS: &[&str] = &["createdAt", "created_at", "timestamp"];

/// A post record exactly as received from the API or a dump file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPost(pub Map<String, Value>);

impl From<Map<String, Value>> for RawPost {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for RawPost {
    type Error = Value;

    /// Accepts JSON objects; any other value is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

impl RawPost {
    /// The deduplication key of this record.
    ///
    /// String identifiers are used as-is, numeric identifiers are rendered in
    /// decimal. Missing, `null` and empty identifiers yield `None`.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn first_present(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.0.get(*key))
    }
}

/// Author of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
}

impl Author {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Self {
                id: map.get("id").map(text_of).unwrap_or_default(),
                name: ["username", "name"]
                    .iter()
                    .find_map(|key| map.get(*key))
                    .map(text_of)
                    .unwrap_or_default(),
            },
            Some(value) => Self {
                id: String::new(),
                name: text_of(value),
            },
            None => Self::default(),
        }
    }
}

/// A normalized post with every field resolved to a canonical value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<String>,
    pub title: String,
    pub body: String,
    pub author: Author,
    /// Name of the submolt (sub-forum) the post belongs to, or empty.
    pub submolt: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub comments: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Resolves every field of `raw` through its fallback chain.
    #[must_use]
    pub fn from_raw(raw: &RawPost) -> Self {
        let created_at = raw.first_present(CREATED_KEYS).and_then(parse_timestamp);
        if created_at.is_none() && raw.first_present(CREATED_KEYS).is_some_and(is_truthy) {
            tracing::debug!(id = ?raw.id(), "ignoring unparseable creation timestamp");
        }

        Self {
            id: raw.id(),
            title: raw.first_present(TITLE_KEYS).map(text_of).unwrap_or_default(),
            body: raw.first_present(BODY_KEYS).map(text_of).unwrap_or_default(),
            author: Author::from_value(raw.0.get("author")),
            submolt: submolt_of(raw.0.get("submolt")),
            upvotes: raw.first_present(UPVOTE_KEYS).map_or(0, count_of),
            downvotes: raw.first_present(DOWNVOTE_KEYS).map_or(0, count_of),
            comments: raw.first_present(COMMENT_KEYS).map_or(0, count_of),
            created_at,
        }
    }

    /// Body length in Unicode scalar values.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.chars().count()
    }

    /// Hour of day (UTC) the post was created, if known.
    #[must_use]
    pub fn created_hour(&self) -> Option<u32> {
        self.created_at.map(|t| t.hour())
    }

    /// Classifies this post from its title and body.
    #[must_use]
    pub fn classify(&self, config: &ClassifierConfig) -> Classification {
        Classification::of(&self.title, &self.body, config)
    }
}

fn submolt_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(map)) => ["name", "slug"]
            .iter()
            .find_map(|key| map.get(*key))
            .map(text_of)
            .unwrap_or_default(),
        Some(value) => text_of(value),
        None => String::new(),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[expect(clippy::cast_possible_truncation)]
pub(crate) fn count_of(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Parses a creation timestamp value.
///
/// Numbers are POSIX epoch seconds. Strings are ISO-8601; a trailing `Z` is
/// read as `+00:00`, and naive date-times or plain dates are taken as UTC.
/// Falsy values (`0`, `""`, `null`), anything unparseable and instants
/// outside years 1 to 9999 (such as millisecond epochs) yield `None`.
///
/// ```
/// # use moltstat_analysis::post::parse_timestamp;
/// # use serde_json::json;
/// let t = parse_timestamp(&json!(1_704_103_200)).unwrap();
/// assert_eq!(t.to_rfc3339(), "2024-01-01T10:00:00+00:00");
/// assert!(parse_timestamp(&json!("yesterday")).is_none());
/// assert!(parse_timestamp(&json!(0)).is_none());
/// assert!(parse_timestamp(&json!(1_704_103_200_000_i64)).is_none());
/// ```
#[must_use]
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    if !is_truthy(value) {
        return None;
    }
    let parsed = match value {
        Value::Number(n) => match n.as_i64() {
            Some(secs) => DateTime::from_timestamp(secs, 0),
            None => from_epoch_f64(n.as_f64()?),
        },
        Value::String(s) => parse_iso8601(s),
        _ => None,
    };
    parsed.filter(|t| (MIN_YEAR..=MAX_YEAR).contains(&t.year()))
}

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn from_epoch_f64(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let s = match s.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => s.to_owned(),
    };

    if let Ok(t) = DateTime::parse_from_rfc3339(&s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Some(t) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&s, fmt).ok())
    {
        return Some(t.with_timezone(&Utc));
    }
    if let Some(t) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
    {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}
