use crate::demo::DemoBoard;
use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::types::{AppState, Request};
use crate::sampler::Move;
use serde_json::json;

fn items_json(board: &DemoBoard) -> serde_json::Value {
    let items: Vec<_> = board
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            json!({
                "id": item.id,
                "label": item.label,
                "position": i + 1,
            })
        })
        .collect();
    json!(items)
}

fn moved_json(board: &DemoBoard, moved: Option<(u32, Move)>) -> serde_json::Value {
    match moved {
        Some((id, mv)) => json!({
            "moved": true,
            "itemId": id,
            "oldPosition": mv.old_index + 1,
            "newPosition": mv.new_index + 1,
            "items": items_json(board),
        }),
        None => json!({
            "moved": false,
            "items": items_json(board),
        }),
    }
}

fn handle_demo_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "items": items_json(&state.demo) }))
}

fn handle_demo_relocate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(raw) = req.params.get("itemId") else {
        return err(&req.id, ErrorCode::BadParams, "missing itemId", None);
    };
    let Some(item_id) = raw.as_u64().and_then(|v| u32::try_from(v).ok()) else {
        return err(&req.id, ErrorCode::BadParams, "itemId must be a non-negative integer", None);
    };

    let moved = state
        .demo
        .relocate(&mut state.sampler, item_id)
        .map(|mv| (item_id, mv));
    ok(&req.id, moved_json(&state.demo, moved))
}

fn handle_demo_relocate_random(state: &mut AppState, req: &Request) -> serde_json::Value {
    let moved = state.demo.relocate_any(&mut state.sampler);
    ok(&req.id, moved_json(&state.demo, moved))
}

fn handle_demo_history(state: &mut AppState, req: &Request) -> serde_json::Value {
    let history: Vec<_> = state
        .demo
        .history()
        .iter()
        .map(|e| {
            json!({
                "label": e.label,
                "oldPosition": e.old_position,
                "newPosition": e.new_position,
                "at": e.at.to_rfc3339(),
                "time": e.at.format("%H:%M:%S").to_string(),
            })
        })
        .collect();
    ok(
        &req.id,
        json!({
            "history": history,
            "count": state.demo.history().len(),
        }),
    )
}

fn handle_demo_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.demo.reset();
    ok(&req.id, json!({ "items": items_json(&state.demo) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "demo.list" => Some(handle_demo_list(state, req)),
        "demo.relocate" => Some(handle_demo_relocate(state, req)),
        "demo.relocateRandom" => Some(handle_demo_relocate_random(state, req)),
        "demo.history" => Some(handle_demo_history(state, req)),
        "demo.reset" => Some(handle_demo_reset(state, req)),
        _ => None,
    }
}
