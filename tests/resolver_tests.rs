//! Integration tests for query resolution

use uniport::models::course::{
    OfferedSection, OfferedSectionDto, PrerequisiteRelation, PrerequisiteRelationDto,
};
use uniport::models::CourseTree;
use uniport::resolver::{resolve, QueryOutcome, QuerySelection};

fn offered(code: &str, section: u32) -> OfferedSection {
    let dto: OfferedSectionDto = serde_json::from_value(serde_json::json!({
        "courseId": code,
        "courseName": format!("Course {code}"),
        "section": section,
        "timeSlot": "Sunday 0800-0920",
        "capacity": 35,
        "enrolled": 30,
        "vacancy": 5,
        "facultyName": "TBA"
    }))
    .unwrap();
    OfferedSection::from_wire(dto)
}

fn prereq(code: &str, prereq_code: &str, grade_point: f64) -> PrerequisiteRelation {
    let dto: PrerequisiteRelationDto = serde_json::from_value(serde_json::json!({
        "courseId": code,
        "preReqCourseId": prereq_code,
        "courseName": format!("Course {prereq_code}"),
        "gradePoint": grade_point
    }))
    .unwrap();
    PrerequisiteRelation::from_wire(dto)
}

#[test]
fn test_lecture_code_surfaces_lab_prerequisites() {
    let offered_tree = CourseTree::from_records(vec![offered("CSE101", 1)]);
    // Lab family anchors its own node by arriving first
    let prereq_tree = CourseTree::from_records(vec![
        prereq("CSE101L", "CSE100L", 4.0),
        prereq("CSE101", "CSE100", 4.0),
    ]);

    let outcome = resolve(
        &offered_tree,
        &prereq_tree,
        &QuerySelection::parse("CSE101"),
    );

    let QueryOutcome::Resolved(resolution) = outcome else {
        panic!("expected a resolution");
    };
    let matched: Vec<&str> = resolution
        .prerequisites
        .iter()
        .map(|p| p.course_code.as_str())
        .collect();
    assert_eq!(matched, vec!["cse101", "cse101l"]);
    assert_eq!(resolution.prerequisite_counts, vec![2]);
}

#[test]
fn test_counts_group_output_per_requested_code() {
    let offered_tree = CourseTree::from_records(vec![
        offered("ENG101", 1),
        offered("ENG101", 2),
        offered("ENG101L", 1),
        offered("MAT212", 1),
    ]);
    let prereq_tree = CourseTree::from_records(vec![prereq("MAT212", "MAT101", 2.7)]);

    let outcome = resolve(
        &offered_tree,
        &prereq_tree,
        &QuerySelection::parse("ENG101 MAT212"),
    );

    let QueryOutcome::Resolved(resolution) = outcome else {
        panic!("expected a resolution");
    };
    // eng101 absorbs its lab: three records in the first group
    assert_eq!(resolution.offered_counts, vec![3, 1]);
    assert_eq!(resolution.offered.len(), 4);
    // eng101 has no prerequisites: only mat212 contributes a count
    assert_eq!(resolution.prerequisite_counts, vec![1]);
}

#[test]
fn test_all_query_covers_every_offered_code() {
    let offered_tree = CourseTree::from_records(vec![
        offered("MAT212", 1),
        offered("ART110", 1),
        offered("CSE101", 1),
    ]);
    let prereq_tree = CourseTree::new();

    let outcome = resolve(&offered_tree, &prereq_tree, &QuerySelection::All);

    let QueryOutcome::Resolved(resolution) = outcome else {
        panic!("expected a resolution");
    };
    let codes: Vec<&str> = resolution
        .offered
        .iter()
        .map(|s| s.course_code.as_str())
        .collect();
    assert_eq!(codes, vec!["art110", "cse101", "mat212"]);
}

#[test]
fn test_empty_and_unmatched_queries_signal_differently() {
    let offered_tree = CourseTree::from_records(vec![offered("CSE101", 1)]);
    let prereq_tree = CourseTree::new();

    // No codes at all
    assert!(matches!(
        resolve(&offered_tree, &prereq_tree, &QuerySelection::parse("   ")),
        QueryOutcome::EmptyQuery
    ));

    // Codes that match nothing
    assert!(matches!(
        resolve(
            &offered_tree,
            &prereq_tree,
            &QuerySelection::parse("BIO404 ZOO500")
        ),
        QueryOutcome::NoMatch
    ));
}

#[test]
fn test_queries_are_case_insensitive() {
    let offered_tree = CourseTree::from_records(vec![offered("CSE101", 1)]);
    let prereq_tree = CourseTree::new();

    let outcome = resolve(
        &offered_tree,
        &prereq_tree,
        &QuerySelection::parse("cSe101"),
    );
    assert!(matches!(outcome, QueryOutcome::Resolved(_)));
}
