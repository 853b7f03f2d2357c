use crate::dataset::StudentId;
use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::helpers::{grade_entry, page_envelope, require_dataset, view_query};
use crate::ipc::types::{AppState, Request};
use crate::views::{derive_students, student_grades, StudentField};
use serde_json::json;

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match require_dataset(state, req) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let query = match view_query(req, StudentField::Name, StudentField::parse, StudentField::ALL) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    let students = derive_students(&ds.records);
    ok(&req.id, page_envelope(&students, query))
}

fn handle_students_grades(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match require_dataset(state, req) {
        Ok(ds) => ds,
        Err(resp) => return resp,
    };
    let student_id: StudentId = match req.params.get("studentId").cloned() {
        Some(v) if !v.is_null() => match serde_json::from_value(v) {
            Ok(id) => id,
            Err(_) => {
                return err(
                    &req.id,
                    ErrorCode::BadParams,
                    "studentId must be a string or an integer",
                    None,
                )
            }
        },
        _ => return err(&req.id, ErrorCode::BadParams, "missing studentId", None),
    };

    // A miss is not an error: the student comes back null with no grades.
    let student = derive_students(&ds.records)
        .into_iter()
        .find(|s| s.id == student_id);
    let grades: Vec<_> = student_grades(&ds.records, &student_id)
        .into_iter()
        .map(grade_entry)
        .collect();

    ok(
        &req.id,
        json!({
            "student": student,
            "grades": grades,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.grades" => Some(handle_students_grades(state, req)),
        _ => None,
    }
}
