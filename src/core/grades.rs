//! Grade aggregation
//!
//! Computes per-semester GPA and cumulative CGPA from registered course
//! attempts. Semester GPA counts every attempt as encountered, retakes
//! included; the cumulative figure dedups by course code with the
//! last-seen attempt winning. That asymmetry matches the registrar's
//! transcript rules and is load-bearing.

use std::collections::HashMap;

use crate::core::models::academic_year;
use crate::core::models::course::RegisteredAttempt;

/// Letter grade to grade point. Codes outside the table (F, W, I, ...)
/// carry 0.0 and never count toward earned credits.
pub const GRADE_POINTS: &[(&str, f32)] = &[
    ("A", 4.0),
    ("A-", 3.7),
    ("B+", 3.3),
    ("B", 3.0),
    ("B-", 2.7),
    ("C+", 2.3),
    ("C", 2.0),
    ("C-", 1.7),
    ("D+", 1.3),
    ("D", 1.0),
];

/// Grade point for a letter grade code, 0.0 for anything not in the table
#[must_use]
pub fn grade_point(code: &str) -> f32 {
    GRADE_POINTS
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(0.0, |(_, points)| *points)
}

/// One semester block of the grade report
#[derive(Debug, Clone)]
pub struct SemesterSummary {
    /// Registration year
    pub year: String,
    /// Semester name
    pub semester: String,
    /// Attempts of the semester, in encounter order
    pub courses: Vec<RegisteredAttempt>,
    /// Semester GPA over attempts with a non-zero grade (0.0 when none)
    pub gpa: f32,
}

/// Aggregated grade history ready for tabular rendering
#[derive(Debug, Clone)]
pub struct GradeReport {
    /// Semester blocks, years ascending, semesters in fixed in-year order
    pub semesters: Vec<SemesterSummary>,
    /// Cumulative GPA over the deduplicated course history
    pub cgpa: f32,
    /// Total credits earned over the deduplicated course history
    pub credits_earned: u32,
}

/// Aggregate a flat attempt sequence into semester GPA blocks and the
/// cumulative CGPA.
///
/// Attempts are grouped by year then semester; iteration sorts years
/// ascending and semesters Spring, Summer, Autumn (unknown buckets last).
/// While walking in that order every attempt with a non-zero grade also
/// updates the dedup map keyed by course code, so a retake overwrites the
/// earlier attempt in the cumulative totals while both attempts still
/// count in their own semesters.
#[must_use]
pub fn aggregate(attempts: Vec<RegisteredAttempt>) -> GradeReport {
    let years = academic_year::group_by_year(attempts);

    let mut completed: HashMap<String, (f32, u32)> = HashMap::new();
    let mut semesters = Vec::new();

    for (year, mut academic_year) in years {
        academic_year.semesters.sort_by_key(|s| s.order);
        for semester in academic_year.semesters {
            let gpa = semester_gpa(&semester.courses);
            for course in &semester.courses {
                if course.grade_point != 0.0 {
                    completed.insert(
                        course.course_code.clone(),
                        (course.grade_point, course.credits),
                    );
                }
            }
            semesters.push(SemesterSummary {
                year: year.clone(),
                semester: semester.name,
                courses: semester.courses,
                gpa,
            });
        }
    }

    let mut total_points = 0.0_f32;
    let mut total_credits = 0_u32;
    for (grade, credits) in completed.values() {
        total_points += grade * (*credits as f32);
        total_credits += credits;
    }
    let cgpa = if total_credits == 0 {
        0.0
    } else {
        total_points / total_credits as f32
    };

    GradeReport {
        semesters,
        cgpa,
        credits_earned: total_credits,
    }
}

/// GPA over the attempts with a non-zero grade; 0.0 when no qualifying
/// credits exist
fn semester_gpa(courses: &[RegisteredAttempt]) -> f32 {
    let mut points = 0.0_f32;
    let mut credits = 0_u32;
    for course in courses {
        if course.grade_point != 0.0 {
            points += course.grade_point * course.credits as f32;
            credits += course.credits;
        }
    }
    if credits == 0 {
        0.0
    } else {
        points / credits as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(code: &str, year: &str, semester: &str, grade: &str, credits: u32) -> RegisteredAttempt {
        RegisteredAttempt {
            course_code: code.to_string(),
            course_name: String::new(),
            year: year.to_string(),
            semester: semester.to_string(),
            grade_code: grade.to_string(),
            grade_point: grade_point(grade),
            credits,
        }
    }

    #[test]
    fn test_grade_table() {
        assert!((grade_point("A") - 4.0).abs() < f32::EPSILON);
        assert!((grade_point("A-") - 3.7).abs() < f32::EPSILON);
        assert!((grade_point("D") - 1.0).abs() < f32::EPSILON);
        assert!(grade_point("F").abs() < f32::EPSILON);
        assert!(grade_point("W").abs() < f32::EPSILON);
        assert!(grade_point("").abs() < f32::EPSILON);
    }

    #[test]
    fn test_retake_counts_per_semester_but_dedups_cumulatively() {
        let report = aggregate(vec![
            attempt("mat101", "2021", "Spring", "A", 3),
            attempt("mat101", "2022", "Spring", "B", 3),
        ]);

        assert_eq!(report.semesters.len(), 2);
        assert!((report.semesters[0].gpa - 4.0).abs() < f32::EPSILON);
        assert!((report.semesters[1].gpa - 3.0).abs() < f32::EPSILON);
        // Cumulative uses only the last-seen attempt: 3.0 over 3 credits,
        // not 3.5 over 6
        assert!((report.cgpa - 3.0).abs() < f32::EPSILON);
        assert_eq!(report.credits_earned, 3);
    }

    #[test]
    fn test_zero_grade_semester_reports_zero_gpa() {
        let report = aggregate(vec![
            attempt("phy101", "2021", "Autumn", "F", 3),
            attempt("phy102", "2021", "Autumn", "W", 3),
        ]);

        assert_eq!(report.semesters.len(), 1);
        assert!(report.semesters[0].gpa.abs() < f32::EPSILON);
        assert!(report.cgpa.abs() < f32::EPSILON);
        assert_eq!(report.credits_earned, 0);
    }

    #[test]
    fn test_semesters_sorted_within_year() {
        let report = aggregate(vec![
            attempt("a101", "2021", "Autumn", "A", 3),
            attempt("b101", "2021", "Spring", "B", 3),
            attempt("c101", "2021", "Summer", "C", 3),
        ]);

        let order: Vec<&str> = report
            .semesters
            .iter()
            .map(|s| s.semester.as_str())
            .collect();
        assert_eq!(order, vec!["Spring", "Summer", "Autumn"]);
    }

    #[test]
    fn test_failed_attempt_does_not_erase_earlier_pass() {
        // A later zero-grade attempt never enters the dedup map, so the
        // earlier pass keeps contributing to the cumulative totals
        let report = aggregate(vec![
            attempt("mat101", "2021", "Spring", "B", 3),
            attempt("mat101", "2022", "Spring", "W", 3),
        ]);

        assert!((report.cgpa - 3.0).abs() < f32::EPSILON);
        assert_eq!(report.credits_earned, 3);
    }

    #[test]
    fn test_mixed_credit_weighting() {
        let report = aggregate(vec![
            attempt("cse101", "2021", "Spring", "A", 3),
            attempt("cse101l", "2021", "Spring", "B", 1),
        ]);

        // (4.0*3 + 3.0*1) / 4
        assert!((report.semesters[0].gpa - 3.75).abs() < 1e-6);
        assert!((report.cgpa - 3.75).abs() < 1e-6);
        assert_eq!(report.credits_earned, 4);
    }
}
