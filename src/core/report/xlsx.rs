//! Spreadsheet rendering
//!
//! Writes the matched offered sections (and prerequisites when present)
//! into an xlsx workbook. Numeric wire values land as spreadsheet numbers
//! so the columns stay sortable.

use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

use crate::core::error::Result;
use crate::core::models::course::Scalar;
use crate::core::report::{OFFERED_COURSE_FIELDS, PREREQUISITE_FIELDS};
use crate::core::resolver::Resolution;

/// Write course details to an xlsx workbook: a "Course Details" sheet and,
/// when prerequisites matched, a "Prerequisites" sheet
///
/// # Errors
///
/// Returns an error if a sheet cannot be written or the file cannot be
/// saved
pub fn write_course_details(path: &Path, resolution: &Resolution) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Course Details")?;
    write_header(sheet, OFFERED_COURSE_FIELDS)?;
    for (r, section) in resolution.offered.iter().enumerate() {
        let row = (r + 1) as u32;
        sheet.write_string(row, 0, section.course_code.to_uppercase())?;
        sheet.write_string(row, 1, section.course_name.as_str())?;
        write_scalar(sheet, row, 2, &section.section)?;
        sheet.write_string(row, 3, section.time_slot.as_str())?;
        write_scalar(sheet, row, 4, &section.capacity)?;
        write_scalar(sheet, row, 5, &section.enrolled)?;
        write_scalar(sheet, row, 6, &section.vacancy)?;
        sheet.write_string(row, 7, section.faculty.as_str())?;
    }

    if !resolution.prerequisites.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Prerequisites")?;
        write_header(sheet, PREREQUISITE_FIELDS)?;
        for (r, relation) in resolution.prerequisites.iter().enumerate() {
            let row = (r + 1) as u32;
            sheet.write_string(row, 0, relation.course_code.to_uppercase())?;
            sheet.write_string(row, 1, relation.prerequisite_code.to_uppercase())?;
            sheet.write_string(row, 2, relation.prerequisite_name.as_str())?;
            sheet.write_string(row, 3, relation.status.to_string())?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_header(sheet: &mut Worksheet, fields: &[&str]) -> Result<()> {
    for (c, field) in fields.iter().enumerate() {
        sheet.write_string(0, c as u16, *field)?;
    }
    Ok(())
}

/// Numbers go in as numbers, everything else as text
fn write_scalar(sheet: &mut Worksheet, row: u32, col: u16, value: &Scalar) -> Result<()> {
    match value {
        Scalar::Int(i) => sheet.write_number(row, col, *i as f64)?,
        Scalar::Float(f) => sheet.write_number(row, col, *f)?,
        Scalar::Text(s) => sheet.write_string(row, col, s.as_str())?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::course::OfferedSection;

    fn section(code: &str) -> OfferedSection {
        OfferedSection {
            course_code: code.to_string(),
            course_name: format!("Course {code}"),
            section: Scalar::Int(1),
            time_slot: "Sunday 8:00AM-9:20AM".to_string(),
            capacity: Scalar::Int(35),
            enrolled: Scalar::Text("30".to_string()),
            vacancy: Scalar::Int(5),
            faculty: "TBA".to_string(),
        }
    }

    #[test]
    fn test_workbook_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("course_details.xlsx");

        let resolution = Resolution {
            offered: vec![section("cse101"), section("mat212")],
            offered_counts: vec![1, 1],
            ..Resolution::default()
        };
        write_course_details(&path, &resolution).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
