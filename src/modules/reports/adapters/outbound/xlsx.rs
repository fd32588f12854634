// Writes a report Sheet into a single-worksheet xlsx workbook.
//
// Layout
// - Rows 0..=3: institution, college, report title, term line. Each merged across the table width.
// - Row HEADER_ROW: bold, shaded column labels.
// - One row per record below it.

use crate::modules::reports::core::institution::InstitutionMeta;
use crate::modules::reports::core::report::{Cell, Report, Sheet};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use thiserror::Error;

pub const HEADER_ROW: u32 = 5;
const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 60;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Builds the workbook bytes for a report. Identical inputs give identical cells.
pub fn export_report(report: &Report, institution: &InstitutionMeta) -> Result<Vec<u8>, ExportError> {
    let sheet = report.to_sheet();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.name)?;
    write_header_block(worksheet, &sheet, institution)?;
    write_table(worksheet, &sheet)?;
    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(sheet = sheet.name, rows = sheet.rows.len(), "report exported");
    Ok(bytes)
}

fn write_header_block(
    worksheet: &mut Worksheet,
    sheet: &Sheet,
    institution: &InstitutionMeta,
) -> Result<(), XlsxError> {
    let last_col = (sheet.columns.len().max(2) - 1) as u16;
    let line = Format::new().set_align(FormatAlign::Center);
    let emphasized = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center);

    let lines = [
        (institution.institution.as_str(), &emphasized),
        (institution.college.as_str(), &line),
        (sheet.title, &emphasized),
        (institution.term.as_str(), &line),
    ];
    for (row, (value, format)) in lines.into_iter().enumerate() {
        worksheet.merge_range(row as u32, 0, row as u32, last_col, value, format)?;
    }
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), XlsxError> {
    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9E1F2))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let body = Format::new().set_border(FormatBorder::Thin).set_text_wrap();
    let rating = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("0.00");

    let mut widths: Vec<usize> = sheet.columns.iter().map(|c| c.len()).collect();
    for (col, label) in sheet.columns.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col as u16, *label, &header)?;
    }

    for (offset, cells) in sheet.rows.iter().enumerate() {
        let row = HEADER_ROW + 1 + offset as u32;
        for (col, cell) in cells.iter().enumerate() {
            match cell {
                Cell::Text(value) => {
                    worksheet.write_string_with_format(row, col as u16, value.as_str(), &body)?;
                    if let Some(width) = widths.get_mut(col) {
                        *width = (*width).max(value.chars().count());
                    }
                }
                Cell::Number(value) => {
                    worksheet.write_number_with_format(row, col as u16, *value, &rating)?;
                }
            }
        }
    }

    for (col, width) in widths.into_iter().enumerate() {
        let width = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) + 2;
        worksheet.set_column_width(col as u16, width as f64)?;
    }
    worksheet.set_freeze_panes(HEADER_ROW + 1, 0)?;
    Ok(())
}
