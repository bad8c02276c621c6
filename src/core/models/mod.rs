//! Data models for `uniport`

pub mod academic_year;
pub mod course;
pub mod course_tree;

pub use academic_year::{AcademicYear, Semester};
pub use course::{
    CompletionStatus, CourseCoded, OfferedSection, PrerequisiteRelation, RegisteredAttempt, Scalar,
};
pub use course_tree::CourseTree;
