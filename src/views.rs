use crate::dataset::{GradeRecord, RecordDate, StudentId};
use crate::query::{Queryable, SortKey};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashSet;

pub const STUDENT_STATUS: &str = "Active";
pub const EMAIL_DOMAIN: &str = "school.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub status: &'static str,
}

/// One row of the Grades view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRow {
    pub student: String,
    pub course: String,
    pub grade: f64,
    pub date: Option<RecordDate>,
}

/// Colour bucket the front end paints a grade with.
///
/// Thresholds are applied as-is: grades outside [0, 20] are not clamped and
/// land in `Low` (negative) or `Excellent` (above 20).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GradeBand {
    Low,
    Fair,
    Good,
    Excellent,
}

impl GradeBand {
    pub fn of(grade: f64) -> Self {
        if grade < 14.0 {
            GradeBand::Low
        } else if grade < 16.0 {
            GradeBand::Fair
        } else if grade < 18.0 {
            GradeBand::Good
        } else {
            GradeBand::Excellent
        }
    }
}

/// `15` -> `"15/20"`, `12.5` -> `"12.5/20"`.
pub fn format_grade(grade: f64) -> String {
    format!("{grade}/20")
}

pub fn full_name(firstname: &str, lastname: &str) -> String {
    format!("{firstname} {lastname}")
}

pub fn student_email(firstname: &str, lastname: &str) -> String {
    format!(
        "{}.{}@{}",
        firstname.to_lowercase(),
        lastname.to_lowercase(),
        EMAIL_DOMAIN
    )
}

/// Distinct course names in first-seen order. Blank names are skipped.
pub fn derive_courses(records: &[GradeRecord]) -> Vec<Course> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for r in records {
        if r.course.is_empty() {
            continue;
        }
        if seen.insert(r.course.as_str()) {
            out.push(Course {
                name: r.course.clone(),
            });
        }
    }
    out
}

/// One student per id; the first record for an id defines name and email.
pub fn derive_students(records: &[GradeRecord]) -> Vec<Student> {
    let mut seen: HashSet<&StudentId> = HashSet::new();
    let mut out = Vec::new();
    for r in records {
        let s = &r.student;
        if seen.insert(&s.id) {
            out.push(Student {
                id: s.id.clone(),
                name: full_name(&s.firstname, &s.lastname),
                email: student_email(&s.firstname, &s.lastname),
                status: STUDENT_STATUS,
            });
        }
    }
    out
}

pub fn grade_rows(records: &[GradeRecord]) -> Vec<GradeRow> {
    records
        .iter()
        .map(|r| GradeRow {
            student: full_name(&r.student.firstname, &r.student.lastname),
            course: if r.course.trim().is_empty() {
                MISSING_COURSE.to_string()
            } else {
                r.course.clone()
            },
            grade: r.grade,
            date: r.date.clone(),
        })
        .collect()
}

pub fn course_grades<'a>(records: &'a [GradeRecord], course_name: &str) -> Vec<&'a GradeRecord> {
    records.iter().filter(|r| r.course == course_name).collect()
}

pub fn student_grades<'a>(records: &'a [GradeRecord], student_id: &StudentId) -> Vec<&'a GradeRecord> {
    records.iter().filter(|r| &r.student.id == student_id).collect()
}

/// Placeholder the Grades view shows for a record without a course.
pub const MISSING_COURSE: &str = "N/A";

pub fn date_millis(date: &RecordDate) -> Option<i64> {
    match date {
        RecordDate::Millis(ms) => Some(*ms),
        RecordDate::Text(s) => parse_timestamp(s),
    }
}

/// Milliseconds since the epoch for the date formats the dataset uses.
///
/// Offsetless values are read as UTC. A bare integer is taken as epoch
/// milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if !s.is_empty() && s.trim_start_matches('-').bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    Name,
}

impl CourseField {
    pub const ALL: &'static [&'static str] = &["name"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    Name,
    Email,
}

impl StudentField {
    pub const ALL: &'static [&'static str] = &["name", "email"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeField {
    Student,
    Course,
    Grade,
    Date,
}

impl GradeField {
    pub const ALL: &'static [&'static str] = &["student", "course", "grade", "date"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Self::Student),
            "course" => Some(Self::Course),
            "grade" => Some(Self::Grade),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

impl Queryable for Course {
    type Field = CourseField;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn sort_key(&self, field: CourseField) -> SortKey<'_> {
        match field {
            CourseField::Name => SortKey::Text(&self.name),
        }
    }
}

impl Queryable for Student {
    type Field = StudentField;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn sort_key(&self, field: StudentField) -> SortKey<'_> {
        match field {
            StudentField::Name => SortKey::Text(&self.name),
            StudentField::Email => SortKey::Text(&self.email),
        }
    }
}

impl Queryable for GradeRow {
    type Field = GradeField;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.student.as_str(), self.course.as_str()]
    }

    fn sort_key(&self, field: GradeField) -> SortKey<'_> {
        match field {
            GradeField::Student => SortKey::Text(&self.student),
            GradeField::Course => SortKey::Text(&self.course),
            GradeField::Grade => SortKey::Number(self.grade),
            GradeField::Date => SortKey::Timestamp(self.date.as_ref().and_then(date_millis)),
        }
    }
}
