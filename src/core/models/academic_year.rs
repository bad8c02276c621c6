//! Year and semester grouping for registered course attempts

use std::collections::BTreeMap;

use crate::core::models::course::RegisteredAttempt;
use crate::warn;

/// Portal semester code to semester name. Codes outside the table resolve
/// to [`UNKNOWN_SEMESTER`].
const SEMESTER_NAMES: &[(&str, &str)] = &[("1", "Autumn"), ("2", "Spring"), ("3", "Summer")];

/// Semester name to ordering within an academic year. Names outside the
/// table sort last via [`UNKNOWN_SEMESTER_ORDER`].
const SEMESTER_ORDER: &[(&str, u8)] = &[("Spring", 1), ("Summer", 2), ("Autumn", 3)];

/// Label used for unrecognized semester codes
pub const UNKNOWN_SEMESTER: &str = "Unknown";

/// Sort position of the unknown-semester bucket (after Autumn)
pub const UNKNOWN_SEMESTER_ORDER: u8 = 4;

/// Resolve a portal semester code ("1"/"2"/"3") to its name.
///
/// Unrecognized codes bucket as [`UNKNOWN_SEMESTER`] with a warning rather
/// than falling through to an empty label.
#[must_use]
pub fn semester_name_from_code(code: &str) -> &'static str {
    let trimmed = code.trim();
    SEMESTER_NAMES
        .iter()
        .find(|(c, _)| *c == trimmed)
        .map_or_else(
            || {
                warn!("Unrecognized semester code '{trimmed}', bucketing as {UNKNOWN_SEMESTER}");
                UNKNOWN_SEMESTER
            },
            |(_, name)| *name,
        )
}

/// Fixed in-year ordering of a semester name (Spring=1, Summer=2, Autumn=3)
#[must_use]
pub fn semester_order(name: &str) -> u8 {
    SEMESTER_ORDER
        .iter()
        .find(|(n, _)| *n == name)
        .map_or(UNKNOWN_SEMESTER_ORDER, |(_, order)| *order)
}

/// One semester's registered attempts, in encounter order
#[derive(Debug, Clone)]
pub struct Semester {
    /// Semester name
    pub name: String,
    /// Fixed in-year sort order
    pub order: u8,
    /// Attempts recorded in this semester, in encounter order
    pub courses: Vec<RegisteredAttempt>,
}

impl Semester {
    fn new(attempt: RegisteredAttempt) -> Self {
        Self {
            name: attempt.semester.clone(),
            order: semester_order(&attempt.semester),
            courses: vec![attempt],
        }
    }
}

/// One academic year's semesters, in encounter order
#[derive(Debug, Clone, Default)]
pub struct AcademicYear {
    /// Semesters of the year; storage order is encounter order, callers
    /// sort by [`Semester::order`] when iterating for output
    pub semesters: Vec<Semester>,
}

impl AcademicYear {
    fn push(&mut self, attempt: RegisteredAttempt) {
        if let Some(semester) = self
            .semesters
            .iter_mut()
            .find(|s| s.name == attempt.semester)
        {
            semester.courses.push(attempt);
        } else {
            self.semesters.push(Semester::new(attempt));
        }
    }
}

/// Group attempts by registration year, creating year and semester groups
/// lazily on first encounter. The `BTreeMap` iterates years ascending.
#[must_use]
pub fn group_by_year(attempts: Vec<RegisteredAttempt>) -> BTreeMap<String, AcademicYear> {
    let mut years: BTreeMap<String, AcademicYear> = BTreeMap::new();
    for attempt in attempts {
        years
            .entry(attempt.year.clone())
            .or_default()
            .push(attempt);
    }
    years
}
