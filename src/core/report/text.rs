//! Plain-text table rendering
//!
//! Fixed-width tables with `+---+` borders, written by hand. Offered and
//! prerequisite tables emit a separator row between groups belonging to
//! different requested codes, driven by the resolver's count lists.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::core::grades::GradeReport;
use crate::core::models::course::{OfferedSection, PrerequisiteRelation};
use crate::core::report::{OFFERED_COURSE_FIELDS, PREREQUISITE_FIELDS, REGISTERED_COURSE_FIELDS};
use crate::core::resolver::Resolution;

/// A fixed-width text table
pub struct TextTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Create a table with the given column headers
    #[must_use]
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append one row; short rows are padded with empty cells
    pub fn add_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Append a group-separator row (a `+` in every column)
    pub fn add_separator(&mut self) {
        self.add_row(vec!["+".to_string(); self.columns.len()]);
    }

    /// Render the table with borders and padded cells
    #[must_use]
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border = widths.iter().fold(String::from("+"), |mut acc, w| {
            let _ = write!(acc, "{:-<1$}+", "", w + 2);
            acc
        });

        let mut out = String::new();
        let _ = writeln!(out, "{border}");
        let _ = writeln!(out, "{}", Self::format_row(&self.columns, &widths));
        let _ = writeln!(out, "{border}");
        for row in &self.rows {
            let _ = writeln!(out, "{}", Self::format_row(row, &widths));
        }
        let _ = write!(out, "{border}");
        out
    }

    fn format_row(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("|");
        for (cell, width) in cells.iter().zip(widths.iter().copied()) {
            let _ = write!(line, " {cell:<width$} |");
        }
        line
    }
}

/// Render matched offered sections grouped by requested code
#[must_use]
pub fn render_offered_courses(sections: &[OfferedSection], counts: &[usize]) -> String {
    let mut table = TextTable::new(OFFERED_COURSE_FIELDS);
    let mut index = 0;
    let mut first = true;
    for &count in counts {
        if count == 0 {
            continue;
        }
        if !first {
            table.add_separator();
        }
        first = false;
        for section in &sections[index..index + count] {
            table.add_row(section.as_row());
        }
        index += count;
    }
    table.render()
}

/// Render matched prerequisite relations grouped by requested code
#[must_use]
pub fn render_prerequisites(relations: &[PrerequisiteRelation], counts: &[usize]) -> String {
    let mut table = TextTable::new(PREREQUISITE_FIELDS);
    let mut index = 0;
    let mut first = true;
    for &count in counts {
        if count == 0 {
            continue;
        }
        if !first {
            table.add_separator();
        }
        first = false;
        for relation in &relations[index..index + count] {
            table.add_row(relation.as_row());
        }
        index += count;
    }
    table.render()
}

/// Render the grade report: semester blocks with GPA lines, then the
/// cumulative CGPA and earned-credit footer
#[must_use]
pub fn render_grade_report(report: &GradeReport) -> String {
    let mut table = TextTable::new(REGISTERED_COURSE_FIELDS);
    for (i, semester) in report.semesters.iter().enumerate() {
        if i > 0 {
            table.add_separator();
        }
        for course in &semester.courses {
            table.add_row(course.as_row());
        }
        table.add_row(vec![
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            format!("GPA: {:.2}", semester.gpa),
        ]);
    }
    table.add_separator();
    table.add_row(vec![
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        format!("CGPA: {:.2}", report.cgpa),
    ]);
    table.add_row(vec![
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        format!("Credits earned: {}", report.credits_earned),
    ]);
    table.render()
}

/// Write the offered-course and prerequisite tables to a text file
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn write_course_details(path: &Path, resolution: &Resolution) -> Result<()> {
    let mut out = render_offered_courses(&resolution.offered, &resolution.offered_counts);
    if !resolution.prerequisites.is_empty() {
        out.push_str("\n\nPrerequisites\n");
        out.push_str(&render_prerequisites(
            &resolution.prerequisites,
            &resolution.prerequisite_counts,
        ));
    }
    out.push('\n');
    fs::write(path, out)?;
    Ok(())
}
