use crate::ipc::error::ok;
use crate::ipc::helpers::{grade_entry, page_envelope, require_dataset, required_str, view_query};
use crate::ipc::types::{AppState, Request};
use crate::views::{course_grades, derive_courses, CourseField};
use serde_json::json;

fn handle_courses_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match require_dataset(state, req) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let query = match view_query(req, CourseField::Name, CourseField::parse, CourseField::ALL) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    let courses = derive_courses(&ds.records);
    ok(&req.id, page_envelope(&courses, query))
}

fn handle_courses_grades(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match require_dataset(state, req) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let course_name = match required_str(req, "courseName") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let grades: Vec<_> = course_grades(&ds.records, course_name)
        .into_iter()
        .map(grade_entry)
        .collect();
    ok(
        &req.id,
        json!({
            "course": course_name,
            "found": !grades.is_empty(),
            "grades": grades,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.list" => Some(handle_courses_list(state, req)),
        "courses.grades" => Some(handle_courses_grades(state, req)),
        _ => None,
    }
}
