use crate::dataset;
use crate::ipc::error::{err, load_err, ok, ErrorCode};
use crate::ipc::helpers::require_dataset;
use crate::ipc::types::{AppState, Request};
use crate::views::{derive_courses, derive_students};
use serde_json::json;

fn location_param(req: &Request, key: &str, default: &str) -> Result<String, serde_json::Value> {
    match req.params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(default.to_string()),
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(_) => Err(err(
            &req.id,
            ErrorCode::BadParams,
            format!("{key} must be a non-empty string"),
            None,
        )),
    }
}

fn handle_dataset_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let primary = match location_param(req, "primary", &state.config.primary) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let fallback = match location_param(req, "fallback", &state.config.fallback) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match dataset::load(state.fetcher.as_ref(), &primary, &fallback) {
        Ok(ds) => {
            let result = json!({
                "recordCount": ds.records.len(),
                "source": ds.source,
                "usedFallback": ds.used_fallback,
                "skippedRecords": ds.skipped,
                "digest": ds.digest,
            });
            state.dataset = Some(ds);
            state.last_load_error = None;
            ok(&req.id, result)
        }
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "dataset load failed");
            // Terminal for this activation: drop whatever was loaded before.
            state.dataset = None;
            state.last_load_error = Some(e.to_string());
            load_err(&req.id, &e)
        }
    }
}

fn handle_dataset_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match require_dataset(state, req) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!({
            "recordCount": ds.records.len(),
            "courseCount": derive_courses(&ds.records).len(),
            "studentCount": derive_students(&ds.records).len(),
            "source": ds.source,
            "digest": ds.digest,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dataset.load" => Some(handle_dataset_load(state, req)),
        "dataset.summary" => Some(handle_dataset_summary(state, req)),
        _ => None,
    }
}
