//! Workbook rendering with `umya-spreadsheet`.

use super::ExportError;
use crate::types::{LogRecord, HEADER};
use std::io::{Seek, Write};

pub const SHEET_NAME: &str = "Sheet1";

/// Write `records` as a single-sheet workbook: bold header row, then one row
/// per record. Every cell is stored as a string so values come back exactly
/// as logged.
pub fn write_workbook<W: Write + Seek>(records: &[LogRecord], out: W) -> Result<(), ExportError> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| ExportError::Spreadsheet("new workbook has no default sheet".into()))?;
    sheet.set_name(SHEET_NAME);

    for (col, title) in HEADER.iter().enumerate() {
        let cell = sheet.get_cell_mut((col as u32 + 1, 1));
        cell.set_value_string(*title);
        cell.get_style_mut().get_font_mut().set_bold(true);
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 2;
        for (col, value) in record.to_row().into_iter().enumerate() {
            sheet
                .get_cell_mut((col as u32 + 1, row))
                .set_value_string(value);
        }
    }

    umya_spreadsheet::writer::xlsx::write_writer(&book, out)
        .map_err(|e| ExportError::Spreadsheet(e.to_string()))
}
