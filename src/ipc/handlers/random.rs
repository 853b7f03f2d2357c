use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_random_pick(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(ds) = state.dataset.as_ref() else {
        return err(&req.id, ErrorCode::NoDataset, "load the dataset first", None);
    };
    let item = state.sampler.pick_random(&ds.records);
    ok(
        &req.id,
        json!({
            "item": item,
            "total": ds.records.len(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "random.pick" => Some(handle_random_pick(state, req)),
        _ => None,
    }
}
