//! Course record models
//!
//! Three record shapes arrive from the portal: offered course sections,
//! registered course attempts and prerequisite relations. Each carries
//! exactly one non-empty course code, normalized to lower case at
//! construction time so tree lookups and dedup maps agree on the key.

use serde::Deserialize;
use std::fmt;

use crate::core::grades;
use crate::core::models::academic_year;

/// A numeric-or-text value as delivered by the portal.
///
/// Fields like `section` or `capacity` are numbers for most courses but
/// arrive as strings for a few legacy records, so the wire shape has to
/// accept both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
}

impl Scalar {
    /// Numeric view of the value, parsing text if needed
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Access to the course code a record is keyed by
pub trait CourseCoded {
    /// The normalized (lower-case) course code of this record
    fn course_code(&self) -> &str;
}

/// Whether a course code denotes a laboratory component.
///
/// Lab codes end in `L` preceded by a digit (e.g. "eng101l"); the check is
/// case-insensitive since display code paths work with upper-case codes.
#[must_use]
pub fn is_lab_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() >= 2
        && bytes[bytes.len() - 1].eq_ignore_ascii_case(&b'l')
        && bytes[bytes.len() - 2].is_ascii_digit()
}

/// One scheduled instance of a course available for registration
#[derive(Debug, Clone, PartialEq)]
pub struct OfferedSection {
    /// Normalized course code (e.g. "eng101")
    pub course_code: String,
    /// Course name
    pub course_name: String,
    /// Section identifier
    pub section: Scalar,
    /// Human-readable time slot (e.g. "Sunday 8:00AM-9:20AM")
    pub time_slot: String,
    /// Seat capacity
    pub capacity: Scalar,
    /// Enrolled count
    pub enrolled: Scalar,
    /// Vacant seat count
    pub vacancy: Scalar,
    /// Faculty name
    pub faculty: String,
}

/// Wire shape of an offered course section
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferedSectionDto {
    /// Course code as sent by the portal
    pub course_id: String,
    /// Course name
    pub course_name: String,
    /// Section identifier
    pub section: Scalar,
    /// Raw time slot (e.g. "Sunday 0800-0920")
    pub time_slot: String,
    /// Seat capacity
    pub capacity: Scalar,
    /// Enrolled count
    pub enrolled: Scalar,
    /// Vacant seat count
    pub vacancy: Scalar,
    /// Faculty name
    pub faculty_name: String,
}

impl OfferedSection {
    /// Build a section from its wire shape, normalizing the code and
    /// formatting the time slot
    #[must_use]
    pub fn from_wire(dto: OfferedSectionDto) -> Self {
        Self {
            course_code: dto.course_id.trim().to_lowercase(),
            course_name: dto.course_name.trim().to_string(),
            section: dto.section,
            time_slot: format_time_slot(dto.time_slot.trim()),
            capacity: dto.capacity,
            enrolled: dto.enrolled,
            vacancy: dto.vacancy,
            faculty: dto.faculty_name.trim().to_string(),
        }
    }

    /// Table row for report rendering (code shown upper-case)
    #[must_use]
    pub fn as_row(&self) -> Vec<String> {
        vec![
            self.course_code.to_uppercase(),
            self.course_name.clone(),
            self.section.to_string(),
            self.time_slot.clone(),
            self.capacity.to_string(),
            self.enrolled.to_string(),
            self.vacancy.to_string(),
            self.faculty.clone(),
        ]
    }
}

impl CourseCoded for OfferedSection {
    fn course_code(&self) -> &str {
        &self.course_code
    }
}

/// One historical enrollment record with an earned grade
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredAttempt {
    /// Normalized course code
    pub course_code: String,
    /// Course name
    pub course_name: String,
    /// Registration year (string, sorts lexicographically)
    pub year: String,
    /// Semester name (Spring/Summer/Autumn, or Unknown)
    pub semester: String,
    /// Letter grade code (e.g. "A-")
    pub grade_code: String,
    /// Numeric grade point for the letter grade
    pub grade_point: f32,
    /// Credit count (1 for labs, 3 otherwise)
    pub credits: u32,
}

/// Wire shape of a registered course attempt
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredAttemptDto {
    /// Course code as sent by the portal
    pub course_id: String,
    /// Course name
    pub course_name: String,
    /// Registration year
    pub reg_year: String,
    /// Registration semester code ("1"/"2"/"3")
    pub reg_semester: String,
    /// Letter grade code
    pub grade: String,
}

impl RegisteredAttempt {
    /// Build an attempt from its wire shape, deriving the semester name,
    /// grade point and credit count
    #[must_use]
    pub fn from_wire(dto: RegisteredAttemptDto) -> Self {
        let course_code = dto.course_id.trim().to_lowercase();
        let grade_code = dto.grade.trim().to_string();
        let grade_point = grades::grade_point(&grade_code);
        let credits = if is_lab_code(&course_code) { 1 } else { 3 };
        Self {
            course_code,
            course_name: dto.course_name.trim().to_string(),
            year: dto.reg_year.trim().to_string(),
            semester: academic_year::semester_name_from_code(&dto.reg_semester).to_string(),
            grade_code,
            grade_point,
            credits,
        }
    }

    /// Grade display, e.g. "A-(3.7)"
    #[must_use]
    pub fn grade_display(&self) -> String {
        format!("{}({})", self.grade_code, self.grade_point)
    }

    /// Table row for report rendering (code shown upper-case)
    #[must_use]
    pub fn as_row(&self) -> Vec<String> {
        vec![
            self.course_code.to_uppercase(),
            self.course_name.clone(),
            self.year.clone(),
            self.semester.clone(),
            self.grade_display(),
        ]
    }
}

impl CourseCoded for RegisteredAttempt {
    fn course_code(&self) -> &str {
        &self.course_code
    }
}

/// Completion status of a prerequisite course for the requesting student
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// The prerequisite has a non-zero grade point on record
    Completed,
    /// No passing grade on record
    Incomplete,
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "Completed"),
            Self::Incomplete => write!(f, "Incomplete"),
        }
    }
}

/// A dependency edge from a course to a required prior course
#[derive(Debug, Clone, PartialEq)]
pub struct PrerequisiteRelation {
    /// Normalized code of the course that has the prerequisite
    pub course_code: String,
    /// Normalized code of the prerequisite course
    pub prerequisite_code: String,
    /// Name of the prerequisite course
    pub prerequisite_name: String,
    /// Whether the student has completed the prerequisite
    pub status: CompletionStatus,
}

/// Wire shape of a prerequisite relation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteRelationDto {
    /// Code of the course that has the prerequisite
    pub course_id: String,
    /// Code of the prerequisite course
    pub pre_req_course_id: String,
    /// Name of the prerequisite course
    pub course_name: String,
    /// Grade point earned in the prerequisite (0 when not completed)
    pub grade_point: Scalar,
}

impl PrerequisiteRelation {
    /// Build a relation from its wire shape; a non-zero grade point marks
    /// the prerequisite completed
    #[must_use]
    pub fn from_wire(dto: PrerequisiteRelationDto) -> Self {
        let earned = dto.grade_point.as_f64().unwrap_or(0.0);
        Self {
            course_code: dto.course_id.trim().to_lowercase(),
            prerequisite_code: dto.pre_req_course_id.trim().to_lowercase(),
            prerequisite_name: dto.course_name.trim().to_string(),
            status: if earned == 0.0 {
                CompletionStatus::Incomplete
            } else {
                CompletionStatus::Completed
            },
        }
    }

    /// Table row for report rendering (codes shown upper-case)
    #[must_use]
    pub fn as_row(&self) -> Vec<String> {
        vec![
            self.course_code.to_uppercase(),
            self.prerequisite_code.to_uppercase(),
            self.prerequisite_name.clone(),
            self.status.to_string(),
        ]
    }
}

impl CourseCoded for PrerequisiteRelation {
    fn course_code(&self) -> &str {
        &self.course_code
    }
}

/// Reformat a raw portal time slot like "Sunday 0800-0920" into
/// "Sunday 8:00AM-9:20AM". Slots that do not match the expected shape are
/// passed through unchanged.
#[must_use]
pub fn format_time_slot(raw: &str) -> String {
    let formatted = raw.split_once(' ').and_then(|(day, span)| {
        let (start, end) = span.split_once('-')?;
        let start = format_clock(start)?;
        let end = format_clock(end)?;
        Some(format!("{day} {start}-{end}"))
    });
    formatted.unwrap_or_else(|| raw.to_string())
}

/// "0930" -> "9:30AM"; hours 12 and above get PM, above 12 wrap to 12-hour
fn format_clock(t: &str) -> Option<String> {
    if t.len() < 4 || !t.is_ascii() {
        return None;
    }
    let hour: u32 = t[..2].parse().ok()?;
    let minutes = &t[2..];
    if !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let notation = if hour >= 12 { "PM" } else { "AM" };
    let hour = if hour > 12 { hour - 12 } else { hour };
    Some(format!("{hour}:{minutes}{notation}"))
}
