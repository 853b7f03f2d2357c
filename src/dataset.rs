use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Opaque student identifier as it appears in the dataset.
///
/// Numbers and strings are kept apart: `1` and `"1"` name different students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentId::Number(n) => write!(f, "{n}"),
            StudentId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRef {
    pub id: StudentId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub firstname: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub lastname: String,
}

/// A record date as the dataset spells it: an ISO-8601 string or epoch millis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordDate {
    Millis(i64),
    Text(String),
}

/// One dataset row.
///
/// Only `student.id` is mandatory. A missing or null grade reads as 0, a
/// missing course as the empty string, and a date of any other shape as
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub student: StudentRef,
    #[serde(default, deserialize_with = "lenient_text")]
    pub course: String,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub grade: f64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<RecordDate>,
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_grade<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RecordDate>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(RecordDate::Text(s)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(RecordDate::Millis),
        _ => None,
    })
}

/// A loaded, immutable snapshot of the grade records.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<GradeRecord>,
    pub source: String,
    pub used_fallback: bool,
    /// Hex SHA-256 of the raw document.
    pub digest: String,
    /// Rows dropped because they had no usable student.
    pub skipped: usize,
}

/// Records decoded from one document, plus how many rows were dropped.
#[derive(Debug, Clone)]
pub struct ParsedRecords {
    pub records: Vec<GradeRecord>,
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{location} responded with status {status}")]
    Status { location: String, status: u16 },
    #[error("failed to reach {location}: {source}")]
    Http {
        location: String,
        #[source]
        source: Box<reqwest::Error>,
    },
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found at {primary} or {fallback}")]
    NotFound {
        primary: String,
        fallback: String,
        reasons: Vec<String>,
    },
    #[error("malformed dataset at {location}: {reason}")]
    MalformedData { location: String, reason: String },
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "not_found",
            LoadError::MalformedData { .. } => "malformed_data",
        }
    }
}

/// Source of raw dataset bytes for a location string.
pub trait Fetch {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError>;
}

/// Reads `http(s)://` locations over HTTP and everything else from disk.
pub struct LocationFetcher {
    client: reqwest::blocking::Client,
}

impl LocationFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gradeviewd/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    #[cfg(test)]
    fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    fn fetch_http(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let http_err = |e: reqwest::Error| FetchError::Http {
            location: location.to_string(),
            source: Box::new(e),
        };
        let resp = self.client.get(location).send().map_err(http_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().map_err(http_err)?;
        Ok(body.to_vec())
    }
}

impl Fetch for LocationFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        if is_http(location) {
            self.fetch_http(location)
        } else {
            std::fs::read(location).map_err(|source| FetchError::Io {
                location: location.to_string(),
                source,
            })
        }
    }
}

fn is_http(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Fetch the primary location, falling back once, then decode the records.
pub fn load(fetcher: &dyn Fetch, primary: &str, fallback: &str) -> Result<Dataset, LoadError> {
    let (source, used_fallback, bytes) = match fetcher.fetch(primary) {
        Ok(bytes) => (primary, false, bytes),
        Err(first) => {
            tracing::warn!(location = primary, error = %first, "primary dataset location failed");
            match fetcher.fetch(fallback) {
                Ok(bytes) => (fallback, true, bytes),
                Err(second) => {
                    tracing::warn!(location = fallback, error = %second, "fallback dataset location failed");
                    return Err(LoadError::NotFound {
                        primary: primary.to_string(),
                        fallback: fallback.to_string(),
                        reasons: vec![first.to_string(), second.to_string()],
                    });
                }
            }
        }
    };

    let ParsedRecords { records, skipped } = parse_records(&bytes).map_err(|reason| LoadError::MalformedData {
        location: source.to_string(),
        reason,
    })?;

    let digest = format!("{:x}", Sha256::digest(&bytes));
    tracing::info!(
        records = records.len(),
        skipped,
        source,
        used_fallback,
        "dataset loaded"
    );
    Ok(Dataset {
        records,
        source: source.to_string(),
        used_fallback,
        digest,
        skipped,
    })
}

/// Decode a dataset document into the canonical record list.
///
/// Rows without a usable student are dropped with a warning. The document is
/// only rejected when it is not a list, is empty, or has no usable row left.
pub fn parse_records(bytes: &[u8]) -> Result<ParsedRecords, String> {
    let doc: Value = serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON: {e}"))?;
    let items = normalize(doc).ok_or_else(|| "expected an array, or an object with a data/items array".to_string())?;
    if items.is_empty() {
        return Err("dataset is empty".to_string());
    }

    let total = items.len();
    let mut records = Vec::with_capacity(total);
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<GradeRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(record = i, error = %e, "skipping unreadable dataset record"),
        }
    }

    if records.is_empty() {
        return Err(format!("none of the {total} records could be read"));
    }
    Ok(ParsedRecords {
        skipped: total - records.len(),
        records,
    })
}

/// Accept a bare array, or `{ "data": [...] }` / `{ "items": [...] }`.
fn normalize(doc: Value) -> Option<Vec<Value>> {
    match doc {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match (map.remove("data"), map.remove("items")) {
            (Some(Value::Array(items)), _) => Some(items),
            (_, Some(Value::Array(items))) => Some(items),
            _ => None,
        },
        _ => None,
    }
}
