use crate::dataset::LoadError;
use serde::Serialize;
use serde_json::{json, Value};

/// Failure kinds a reply can carry. Serialized as the `code` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    MalformedData,
    NoDataset,
    BadParams,
    BadJson,
    NotImplemented,
}

impl From<&LoadError> for ErrorCode {
    fn from(e: &LoadError) -> Self {
        match e {
            LoadError::NotFound { .. } => ErrorCode::NotFound,
            LoadError::MalformedData { .. } => ErrorCode::MalformedData,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

pub fn ok(id: &str, result: Value) -> Value {
    json!({ "id": id, "ok": true, "result": result })
}

pub fn err(id: &str, code: ErrorCode, message: impl Into<String>, details: Option<Value>) -> Value {
    let error = ErrorBody {
        code,
        message: message.into(),
        details,
    };
    json!({ "id": id, "ok": false, "error": error })
}

/// Reply for a line that is not a request. There is no id to echo back.
pub fn bad_json(e: &serde_json::Error) -> Value {
    let error = ErrorBody {
        code: ErrorCode::BadJson,
        message: e.to_string(),
        details: None,
    };
    json!({ "ok": false, "error": error })
}

pub fn load_err(id: &str, e: &LoadError) -> Value {
    let details = match e {
        LoadError::NotFound {
            primary,
            fallback,
            reasons,
        } => json!({
            "primary": primary,
            "fallback": fallback,
            "reasons": reasons,
        }),
        LoadError::MalformedData { location, .. } => json!({ "location": location }),
    };
    err(id, ErrorCode::from(e), e.to_string(), Some(details))
}
