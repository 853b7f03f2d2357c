use crate::ipc::error::ok;
use crate::ipc::helpers::{page_envelope, require_dataset, view_query};
use crate::ipc::types::{AppState, Request};
use crate::views::{grade_rows, GradeField};

fn handle_grades_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match require_dataset(state, req) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let query = match view_query(req, GradeField::Student, GradeField::parse, GradeField::ALL) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    let rows = grade_rows(&ds.records);
    ok(&req.id, page_envelope(&rows, query))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(handle_grades_list(state, req)),
        _ => None,
    }
}
