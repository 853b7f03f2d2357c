use crate::dataset::{Dataset, GradeRecord};
use crate::ipc::error::{err, ErrorCode};
use crate::ipc::types::{AppState, Request};
use crate::query::{self, clamp_page, Queryable, SortOrder, ViewQuery};
use crate::views::{format_grade, full_name, GradeBand};
use serde::Serialize;
use serde_json::{json, Value};

pub fn require_dataset<'a>(state: &'a AppState, req: &Request) -> Result<&'a Dataset, Value> {
    state
        .dataset
        .as_ref()
        .ok_or_else(|| err(&req.id, ErrorCode::NoDataset, "load the dataset first", None))
}

fn optional_str<'a>(req: &'a Request, key: &str) -> Result<Option<&'a str>, Value> {
    match req.params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(err(
            &req.id,
            ErrorCode::BadParams,
            format!("{key} must be a string"),
            None,
        )),
    }
}

pub fn required_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, Value> {
    optional_str(req, key)?
        .ok_or_else(|| err(&req.id, ErrorCode::BadParams, format!("missing {key}"), None))
}

/// Build a list query from `search`, `sortField`, `sortOrder` and `page`.
pub fn view_query<F: Copy>(
    req: &Request,
    default_field: F,
    parse_field: fn(&str) -> Option<F>,
    allowed_fields: &[&str],
) -> Result<ViewQuery<F>, Value> {
    let search = optional_str(req, "search")?.unwrap_or("");

    let sort_field = match optional_str(req, "sortField")? {
        None => default_field,
        Some(s) => parse_field(s).ok_or_else(|| {
            err(
                &req.id,
                ErrorCode::BadParams,
                format!("unknown sortField: {s}"),
                Some(json!({ "allowed": allowed_fields })),
            )
        })?,
    };

    let sort_order = match optional_str(req, "sortOrder")? {
        None => SortOrder::default(),
        Some(s) => SortOrder::parse(s).ok_or_else(|| {
            err(
                &req.id,
                ErrorCode::BadParams,
                format!("unknown sortOrder: {s}"),
                Some(json!({ "allowed": ["asc", "desc"] })),
            )
        })?,
    };

    let page = match req.params.get("page") {
        None | Some(Value::Null) => 1,
        Some(v) => match v.as_u64() {
            Some(p) if p >= 1 => p as usize,
            _ => {
                return Err(err(
                    &req.id,
                    ErrorCode::BadParams,
                    "page must be a positive integer",
                    None,
                ))
            }
        },
    };

    Ok(ViewQuery::new(sort_field)
        .search(search)
        .order(sort_order)
        .page(page))
}

/// Run a list query and wrap it in the page envelope.
///
/// A page past the end (typically after the search narrowed the set) is
/// pulled back to the last page before slicing.
pub fn page_envelope<E>(entities: &[E], query: ViewQuery<E::Field>) -> Value
where
    E: Queryable + Clone + Serialize,
{
    let mut result = query::apply(entities, &query);
    let page = clamp_page(query.page, result.total_pages);
    if page != query.page && result.total_pages > 0 {
        result = query::apply(entities, &ViewQuery { page, ..query.clone() });
    }

    json!({
        "state": result.state,
        "items": result.items,
        "page": page,
        "pageSize": query.page_size,
        "totalFiltered": result.total_filtered,
        "totalPages": result.total_pages,
        "sortOrder": query.sort_order.as_str(),
    })
}

pub fn grade_entry(r: &GradeRecord) -> Value {
    json!({
        "studentId": r.student.id,
        "student": full_name(&r.student.firstname, &r.student.lastname),
        "course": r.course,
        "grade": r.grade,
        "display": format_grade(r.grade),
        "band": GradeBand::of(r.grade),
        "date": r.date,
    })
}
