//! Filter -> sort -> paginate, shared by every list view.
//!
//! Entities opt in through [`Queryable`]: which fields a search looks at and
//! what key each sortable field compares by. The pipeline order is fixed;
//! sorting only ever sees the filtered set and pagination only ever sees the
//! filtered, sorted set.

use crate::collate;
use serde::Serialize;
use std::cmp::Ordering;

pub const PAGE_SIZE: usize = 9;

/// Comparable projection of one sortable field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey<'a> {
    Text(&'a str),
    Number(f64),
    /// Epoch millis; `None` for values that do not parse and sorts first.
    Timestamp(Option<i64>),
}

pub trait Queryable {
    type Field: Copy;

    fn search_fields(&self) -> Vec<&str>;

    fn sort_key(&self, field: Self::Field) -> SortKey<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewQuery<F> {
    pub search_term: String,
    pub sort_field: F,
    pub sort_order: SortOrder,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl<F: Copy> ViewQuery<F> {
    pub fn new(sort_field: F) -> Self {
        Self {
            search_term: String::new(),
            sort_field,
            sort_order: SortOrder::Ascending,
            page: 1,
            page_size: PAGE_SIZE,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

/// What the front end should show for a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultState {
    /// The view has nothing in it at all.
    Empty,
    /// The view has entities but none match the search.
    NoResults,
    Results,
}

#[derive(Debug, Clone)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub state: ResultState,
}

pub fn matches_search<E: Queryable>(entity: &E, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    entity
        .search_fields()
        .iter()
        .any(|f| f.to_lowercase().contains(needle_lower))
}

pub fn filter<E: Queryable + Clone>(entities: &[E], term: &str) -> Vec<E> {
    let needle = term.to_lowercase();
    entities
        .iter()
        .filter(|e| matches_search(*e, &needle))
        .cloned()
        .collect()
}

pub fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
    match (a, b) {
        (SortKey::Text(a), SortKey::Text(b)) => collate::compare(a, b),
        (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
        // A field always yields one kind of key.
        _ => Ordering::Equal,
    }
}

/// No tie-break beyond the field's own key; equal keys keep their input order.
pub fn sort<E: Queryable>(entities: &mut [E], field: E::Field, order: SortOrder) {
    entities.sort_by(|a, b| {
        let ord = compare_keys(&a.sort_key(field), &b.sort_key(field));
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// The `[(page-1)*size, page*size)` window; empty for page 0 or past the end.
pub fn paginate<E>(entities: &[E], page: usize, page_size: usize) -> &[E] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= entities.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(entities.len());
    &entities[start..end]
}

/// Pull an out-of-range page back into `[1, total_pages]` (1 when there are none).
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        1
    } else {
        page.clamp(1, total_pages)
    }
}

/// Run the whole pipeline. Does not clamp `query.page`; see [`clamp_page`].
pub fn apply<E: Queryable + Clone>(entities: &[E], query: &ViewQuery<E::Field>) -> Page<E> {
    let mut filtered = filter(entities, &query.search_term);
    sort(&mut filtered, query.sort_field, query.sort_order);

    let total_filtered = filtered.len();
    let state = if entities.is_empty() {
        ResultState::Empty
    } else if total_filtered == 0 {
        ResultState::NoResults
    } else {
        ResultState::Results
    };

    Page {
        items: paginate(&filtered, query.page, query.page_size).to_vec(),
        total_filtered,
        total_pages: page_count(total_filtered, query.page_size),
        state,
    }
}
