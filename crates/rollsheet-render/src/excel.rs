//! Excel attendance sheet renderer
//!
//! Generates a single-sheet XLSX workbook:
//!
//! ```text
//! Sheet: July 2025 Attendance
//! | Employee ID | Employee Name | 2025-07-01 | 2025-07-02 | ... | 2025-07-31 |
//! |-------------|---------------|------------|------------|-----|------------|
//! | EMP-143     | ABDUL RAHIM J | P          | P          | ... | P          |
//! | EMP-017     | HAMZA SHAHZAD | P          | P          | ... | P          |
//! ```
//!
//! Every cell is written as a string, header included, so the date labels
//! stay ISO `YYYY-MM-DD` text instead of being reinterpreted as serial dates.

use rollsheet_core::{AttendanceSheet, RenderError, Renderer, IDENTITY_COLUMNS};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::debug;

const MIN_IDENTITY_WIDTH: usize = 12;
const MAX_IDENTITY_WIDTH: usize = 50;

/// Excel attendance sheet renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Bold, coloured header row
    pub header_style: bool,
    /// Keep the header row and identity columns visible while scrolling
    pub freeze_header: bool,
    /// Size the id/name columns to their content
    pub autofit: bool,
    /// Width of each date column
    pub date_column_width: f64,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            header_style: true,
            freeze_header: true,
            autofit: true,
            date_column_width: 11.0,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unformatted output: no header styling, panes or column sizing
    pub fn plain(mut self) -> Self {
        self.header_style = false;
        self.freeze_header = false;
        self.autofit = false;
        self
    }

    /// Disable frozen header panes
    pub fn no_freeze(mut self) -> Self {
        self.freeze_header = false;
        self
    }

    /// Set the date column width
    pub fn date_column_width(mut self, width: f64) -> Self {
        self.date_column_width = width;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, sheet: &AttendanceSheet) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.title).map_err(format_error)?;

        self.write_rows(worksheet, sheet).map_err(format_error)?;
        self.layout(worksheet, sheet);

        debug!(
            title = %sheet.title,
            rows = sheet.row_count(),
            columns = sheet.width(),
            "rendered workbook"
        );

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    fn write_rows(
        &self,
        worksheet: &mut Worksheet,
        sheet: &AttendanceSheet,
    ) -> Result<(), XlsxError> {
        let header_format = self.header_format();

        for (col, label) in sheet.header.iter().enumerate() {
            match &header_format {
                Some(format) => worksheet.write_string_with_format(0, col as u16, label, format)?,
                None => worksheet.write_string(0, col as u16, label)?,
            };
        }

        for (index, row) in sheet.rows.iter().enumerate() {
            let row_num = (index + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                worksheet.write_string(row_num, col as u16, value)?;
            }
        }

        Ok(())
    }

    fn layout(&self, worksheet: &mut Worksheet, sheet: &AttendanceSheet) {
        if self.autofit {
            for col in 0..IDENTITY_COLUMNS.min(sheet.width()) {
                worksheet
                    .set_column_width(col as u16, Self::identity_width(sheet, col) as f64)
                    .ok();
            }
            for col in IDENTITY_COLUMNS..sheet.width() {
                worksheet
                    .set_column_width(col as u16, self.date_column_width)
                    .ok();
            }
        }

        if self.freeze_header {
            worksheet.set_freeze_panes(1, IDENTITY_COLUMNS as u16).ok();
        }
    }

    fn header_format(&self) -> Option<Format> {
        self.header_style.then(|| {
            Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(0x4472C4)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin)
        })
    }

    /// Widest value in an identity column plus padding
    fn identity_width(sheet: &AttendanceSheet, col: usize) -> usize {
        sheet
            .all_rows()
            .filter_map(|row| row.get(col))
            .map(|value| value.chars().count() + 2)
            .max()
            .unwrap_or(MIN_IDENTITY_WIDTH)
            .clamp(MIN_IDENTITY_WIDTH, MAX_IDENTITY_WIDTH)
    }
}

fn format_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, sheet: &AttendanceSheet) -> Result<Vec<u8>, RenderError> {
        if sheet.rows.iter().any(|row| row.len() != sheet.width()) {
            return Err(RenderError::Format(
                "row width does not match header width".into(),
            ));
        }
        self.render_to_bytes(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollsheet_core::{Employee, SheetConfig};

    fn sheet_with(employees: Vec<Employee>) -> AttendanceSheet {
        AttendanceSheet::build(&SheetConfig::new(2025, 7).employees(employees)).unwrap()
    }

    #[test]
    fn excel_renderer_creation() {
        let renderer = ExcelRenderer::new();
        assert!(renderer.header_style);
        assert!(renderer.freeze_header);
        assert!(renderer.autofit);
    }

    #[test]
    fn excel_renderer_with_options() {
        let renderer = ExcelRenderer::new().no_freeze().date_column_width(14.0);
        assert!(!renderer.freeze_header);
        assert!(renderer.header_style);
        assert_eq!(renderer.date_column_width, 14.0);

        let plain = ExcelRenderer::new().plain();
        assert!(!plain.header_style && !plain.freeze_header && !plain.autofit);
    }

    #[test]
    fn excel_produces_valid_output() {
        let bytes = ExcelRenderer::new()
            .render(&sheet_with(vec![Employee::new("EMP-001", "A")]))
            .unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn excel_plain_output() {
        let bytes = ExcelRenderer::new()
            .plain()
            .render(&sheet_with(Vec::new()))
            .unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn excel_rejects_ragged_rows() {
        let mut sheet = sheet_with(vec![Employee::new("EMP-001", "A")]);
        sheet.rows[0].pop();
        let result = ExcelRenderer::new().render(&sheet);
        assert!(matches!(result, Err(RenderError::Format(_))));
    }

    #[test]
    fn identity_width_tracks_longest_value() {
        let sheet = sheet_with(vec![
            Employee::new("EMP-001", "A"),
            Employee::new("EMP-002", "A VERY LONG EMPLOYEE NAME"),
        ]);
        // "Employee ID" (11) + 2 padding
        assert_eq!(ExcelRenderer::identity_width(&sheet, 0), 13);
        assert_eq!(ExcelRenderer::identity_width(&sheet, 1), 27);
    }

    #[test]
    fn identity_width_is_clamped() {
        let long_name = "N".repeat(80);
        let sheet = sheet_with(vec![Employee::new("E1", long_name)]);
        assert_eq!(ExcelRenderer::identity_width(&sheet, 1), MAX_IDENTITY_WIDTH);
    }
}
