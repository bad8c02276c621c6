//! Query resolution over the course lookup trees
//!
//! Resolves a set of requested course codes (or every known code) against
//! the offered-course tree and the prerequisite tree, keeping per-code
//! match counts so the report layer can emit separators between groups.

use crate::core::models::course::{OfferedSection, PrerequisiteRelation};
use crate::core::models::CourseTree;

/// What the user asked for: every known code, or an explicit list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySelection {
    /// Every code present in the offered-course tree
    All,
    /// Explicit course codes, normalized to lower case
    Codes(Vec<String>),
}

impl QuerySelection {
    /// Parse raw prompt input: `all` or `*` selects everything, otherwise
    /// whitespace-separated codes (lower-cased)
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed == "*" {
            return Self::All;
        }
        Self::Codes(trimmed.split_whitespace().map(str::to_lowercase).collect())
    }
}

/// Matched records plus the per-requested-code counts that drive grouped
/// rendering
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Matched offered sections, flat, in request order
    pub offered: Vec<OfferedSection>,
    /// Offered-course match count per requested code, in request order
    pub offered_counts: Vec<usize>,
    /// Matched prerequisite relations, flat, in request order
    pub prerequisites: Vec<PrerequisiteRelation>,
    /// Non-zero prerequisite match counts in request order; zero-count
    /// groups are dropped so a code without prerequisites contributes no
    /// separator
    pub prerequisite_counts: Vec<usize>,
}

/// Outcome of a query resolution pass
#[derive(Debug)]
pub enum QueryOutcome {
    /// The requested code list was empty
    EmptyQuery,
    /// Codes were requested but none matched an offered course
    NoMatch,
    /// At least one offered course matched
    Resolved(Resolution),
}

/// Resolve a query selection against the two trees.
///
/// The `All` path derives the code sequence by enumerating the offered
/// tree's keys in order; both paths then share the same per-code loop.
#[must_use]
pub fn resolve(
    offered: &CourseTree<OfferedSection>,
    prerequisites: &CourseTree<PrerequisiteRelation>,
    selection: &QuerySelection,
) -> QueryOutcome {
    let codes: Vec<String> = match selection {
        QuerySelection::All => offered.keys().map(str::to_owned).collect(),
        QuerySelection::Codes(codes) => codes.clone(),
    };
    resolve_codes(offered, prerequisites, &codes)
}

fn resolve_codes(
    offered_tree: &CourseTree<OfferedSection>,
    prereq_tree: &CourseTree<PrerequisiteRelation>,
    codes: &[String],
) -> QueryOutcome {
    if codes.is_empty() {
        return QueryOutcome::EmptyQuery;
    }

    let mut resolution = Resolution::default();
    for code in codes {
        let sections = offered_tree.get(code);
        resolution.offered_counts.push(sections.len());
        resolution.offered.extend(sections.into_iter().cloned());

        let relations = lecture_and_lab_prerequisites(prereq_tree, code);
        if !relations.is_empty() {
            resolution.prerequisite_counts.push(relations.len());
        }
        resolution.prerequisites.extend(relations.into_iter().cloned());
    }

    if resolution.offered.is_empty() {
        return QueryOutcome::NoMatch;
    }
    QueryOutcome::Resolved(resolution)
}

/// Prerequisites for a lecture code unioned with those of its paired lab
/// (lab codes append `l` to the lecture code). When the lab records were
/// absorbed into the lecture node the base lookup already yields them, so
/// the union dedups by record identity.
fn lecture_and_lab_prerequisites<'a>(
    prereq_tree: &'a CourseTree<PrerequisiteRelation>,
    code: &str,
) -> Vec<&'a PrerequisiteRelation> {
    let mut matches = prereq_tree.get(code);
    let lab_code = format!("{code}l");
    for record in prereq_tree.get(&lab_code) {
        if !matches.iter().any(|existing| std::ptr::eq(*existing, record)) {
            matches.push(record);
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::course::{CompletionStatus, Scalar};

    fn section(code: &str, section_no: i64) -> OfferedSection {
        OfferedSection {
            course_code: code.to_string(),
            course_name: format!("Course {code}"),
            section: Scalar::Int(section_no),
            time_slot: "Sunday 8:00AM-9:20AM".to_string(),
            capacity: Scalar::Int(35),
            enrolled: Scalar::Int(30),
            vacancy: Scalar::Int(5),
            faculty: "TBA".to_string(),
        }
    }

    fn prereq(code: &str, prereq_code: &str) -> PrerequisiteRelation {
        PrerequisiteRelation {
            course_code: code.to_string(),
            prerequisite_code: prereq_code.to_string(),
            prerequisite_name: format!("Course {prereq_code}"),
            status: CompletionStatus::Completed,
        }
    }

    fn offered_tree(codes: &[(&str, i64)]) -> CourseTree<OfferedSection> {
        CourseTree::from_records(codes.iter().map(|(c, n)| section(c, *n)))
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!(QuerySelection::parse("all"), QuerySelection::All);
        assert_eq!(QuerySelection::parse(" * "), QuerySelection::All);
        assert_eq!(
            QuerySelection::parse("ENG101 MAT212"),
            QuerySelection::Codes(vec!["eng101".to_string(), "mat212".to_string()])
        );
        assert_eq!(QuerySelection::parse("  "), QuerySelection::Codes(vec![]));
    }

    #[test]
    fn test_resolution_groups_and_counts() {
        let offered = offered_tree(&[("cse101", 1), ("cse101", 2), ("mat212", 1)]);
        let prereqs = CourseTree::from_records(vec![prereq("cse101", "cse100")]);

        let outcome = resolve(
            &offered,
            &prereqs,
            &QuerySelection::Codes(vec!["cse101".to_string(), "mat212".to_string()]),
        );

        let QueryOutcome::Resolved(resolution) = outcome else {
            panic!("expected a resolution");
        };
        assert_eq!(resolution.offered.len(), 3);
        assert_eq!(resolution.offered_counts, vec![2, 1]);
        assert_eq!(resolution.prerequisites.len(), 1);
        // mat212 has no prerequisites: its zero group is dropped
        assert_eq!(resolution.prerequisite_counts, vec![1]);
    }

    #[test]
    fn test_lecture_query_unions_lab_prerequisites() {
        let offered = offered_tree(&[("cse101", 1)]);
        // Lab inserted first so the two prerequisite families anchor
        // separate nodes
        let prereqs = CourseTree::from_records(vec![
            prereq("cse101l", "cse100l"),
            prereq("cse101", "cse100"),
        ]);

        let outcome = resolve(
            &offered,
            &prereqs,
            &QuerySelection::Codes(vec!["cse101".to_string()]),
        );

        let QueryOutcome::Resolved(resolution) = outcome else {
            panic!("expected a resolution");
        };
        let codes: Vec<&str> = resolution
            .prerequisites
            .iter()
            .map(|p| p.course_code.as_str())
            .collect();
        assert_eq!(codes, vec!["cse101", "cse101l"]);
        assert_eq!(resolution.prerequisite_counts, vec![2]);
    }

    #[test]
    fn test_union_does_not_duplicate_absorbed_lab_records() {
        // Lecture inserted first: the lab family absorbs into the lecture
        // node and the base lookup already returns it once
        let prereqs = CourseTree::from_records(vec![
            prereq("cse101", "cse100"),
            prereq("cse101l", "cse100l"),
        ]);

        let matches = lecture_and_lab_prerequisites(&prereqs, "cse101");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_all_selection_enumerates_tree_keys() {
        let offered = offered_tree(&[("mat212", 1), ("art102", 1), ("cse101", 1)]);
        let prereqs = CourseTree::new();

        let outcome = resolve(&offered, &prereqs, &QuerySelection::All);

        let QueryOutcome::Resolved(resolution) = outcome else {
            panic!("expected a resolution");
        };
        // Derived request order is the sorted key order
        let codes: Vec<&str> = resolution
            .offered
            .iter()
            .map(|s| s.course_code.as_str())
            .collect();
        assert_eq!(codes, vec!["art102", "cse101", "mat212"]);
        assert_eq!(resolution.offered_counts, vec![1, 1, 1]);
    }

    #[test]
    fn test_empty_query_and_no_match_are_distinct() {
        let offered = offered_tree(&[("cse101", 1)]);
        let prereqs = CourseTree::new();

        assert!(matches!(
            resolve(&offered, &prereqs, &QuerySelection::Codes(vec![])),
            QueryOutcome::EmptyQuery
        ));
        assert!(matches!(
            resolve(
                &offered,
                &prereqs,
                &QuerySelection::Codes(vec!["bio404".to_string()])
            ),
            QueryOutcome::NoMatch
        ));
    }
}
