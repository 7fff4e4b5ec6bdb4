//! Workbook output.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

use super::pivot::PivotCell;
use crate::error::ExportError;

/// A worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Blank,
    Text(String),
    Number(f64),
}

impl From<String> for SheetCell {
    fn from(text: String) -> Self {
        SheetCell::Text(text)
    }
}

impl From<&PivotCell> for SheetCell {
    fn from(cell: &PivotCell) -> Self {
        match cell {
            PivotCell::Empty => SheetCell::Blank,
            PivotCell::Number(n) => n
                .to_f64()
                .map(SheetCell::Number)
                .unwrap_or_else(|| SheetCell::Text(n.to_string())),
            PivotCell::Text(s) => SheetCell::Text(s.clone()),
        }
    }
}

/// A named worksheet: header row plus data rows.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<SheetCell>>,
}

/// Generate an XLSX workbook with one worksheet per sheet, in order.
///
/// Returns the raw bytes of the xlsx file.
pub fn generate_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name.as_str())?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header.as_str(), &header_format)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col = col_idx as u16;
                match cell {
                    SheetCell::Blank => {}
                    SheetCell::Text(text) => {
                        worksheet.write_string(excel_row, col, text.as_str())?;
                    }
                    SheetCell::Number(n) => {
                        worksheet.write_number(excel_row, col, *n)?;
                    }
                }
            }
        }

        worksheet.autofit();
    }

    Ok(workbook.save_to_buffer()?)
}
