//! # rollsheet-render
//!
//! Rendering backends for attendance sheets.
//!
//! This crate provides:
//! - Excel workbooks (the file handed to payroll)
//! - Plain-text tables (terminal previews)
//! - Atomic file output
//!
//! ## Example
//!
//! ```rust,ignore
//! use rollsheet_core::{AttendanceSheet, Renderer, SheetConfig};
//! use rollsheet_render::{write_workbook, ExcelRenderer, TextRenderer};
//!
//! let sheet = AttendanceSheet::build(&SheetConfig::default())?;
//!
//! // Terminal preview
//! println!("{}", TextRenderer::new().render(&sheet)?);
//!
//! // Excel workbook on disk
//! write_workbook("attendance_july_2025.xlsx".as_ref(), &sheet, &ExcelRenderer::new())?;
//! ```

pub mod excel;
pub mod output;

pub use excel::ExcelRenderer;
pub use output::{write_atomic, write_workbook};

use rollsheet_core::{AttendanceSheet, RenderError, Renderer};

/// Plain-text table renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Column separator
    pub separator: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            separator: " | ".into(),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column separator
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    fn column_widths(sheet: &AttendanceSheet) -> Vec<usize> {
        (0..sheet.width())
            .map(|col| {
                sheet
                    .all_rows()
                    .filter_map(|row| row.get(col))
                    .map(|value| value.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn format_row(&self, row: &[String], widths: &[usize]) -> String {
        row.iter()
            .zip(widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join(&self.separator)
            .trim_end()
            .to_string()
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, sheet: &AttendanceSheet) -> Result<String, RenderError> {
        let widths = Self::column_widths(sheet);
        let mut output = String::new();

        output.push_str(&sheet.title);
        output.push('\n');
        output.push('\n');

        output.push_str(&self.format_row(&sheet.header, &widths));
        output.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        output.push_str(&self.format_row(&rule, &widths));
        output.push('\n');

        for row in &sheet.rows {
            output.push_str(&self.format_row(row, &widths));
            output.push('\n');
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rollsheet_core::{Employee, SheetConfig};

    fn sheet() -> AttendanceSheet {
        let config = SheetConfig::new(2025, 7).employees(vec![
            Employee::new("EMP-143", "ABDUL RAHIM J"),
            Employee::new("EMP-017", "HAMZA SHAHZAD"),
        ]);
        AttendanceSheet::build(&config).unwrap()
    }

    #[test]
    fn text_has_title_header_rule_and_rows() {
        let text = TextRenderer::new().render(&sheet()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "July 2025 Attendance");
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("Employee ID | Employee Name | 2025-07-01 | 2025-07-02"));
        assert!(lines[3].starts_with("----------- | ------------- | ----------"));
        assert!(lines[4].starts_with("EMP-143     | ABDUL RAHIM J | P          | P"));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn text_custom_separator() {
        let text = TextRenderer::new().separator(",").render(&sheet()).unwrap();
        let header = text.lines().nth(2).unwrap();
        assert!(header.starts_with("Employee ID,Employee Name,2025-07-01,"));
    }

    #[test]
    fn text_columns_align() {
        let text = TextRenderer::new().render(&sheet()).unwrap();
        let lines: Vec<&str> = text.lines().skip(2).collect();
        let position = |line: &str| line.find("| P").or_else(|| line.find("| 2025-07-01"));
        assert_eq!(position(lines[0]), position(lines[2]));
    }
}
