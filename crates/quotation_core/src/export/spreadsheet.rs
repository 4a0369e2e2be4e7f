//! Spreadsheet (xlsx) quotation export.
//!
//! The sheet is first laid out as a list of [`SheetCell`]s and only then
//! written with `rust_xlsxwriter`, so the cell contract can be checked
//! without reading the workbook back.
//!
//! # Invariants
//! - Rows 0..=3 hold the header label/value pairs.
//! - Row 5 holds the item table header; items start at row 6.
//! - With `n` items: total at row `6 + n + 1`, address at `6 + n + 3`,
//!   notes at `6 + n + 4`.

use crate::export::{ExportFormat, ExportResult};
use crate::model::quotation::{Figure, Quotation};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

pub const SHEET_NAME: &str = "報價單";
pub const CURRENCY_FORMAT: &str = "$#,##0.00";

/// First row of the item table.
pub const ITEMS_FIRST_ROW: u32 = 6;
const ITEM_HEADER_ROW: u32 = 5;
const ITEM_HEADERS: [&str; 6] = ["序號", "項目描述", "數量", "單價", "金額", "備註"];

pub struct SpreadsheetExport;

impl ExportFormat for SpreadsheetExport {
    const EXTENSION: &'static str = "xlsx";
    const CONTENT_TYPE: &'static str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

    fn render(quotation: &Quotation) -> ExportResult<Vec<u8>> {
        write_workbook(&layout_sheet(quotation))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Bold,
    Currency,
}

/// One cell of the planned sheet, 0-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetCell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
    pub style: CellStyle,
}

impl SheetCell {
    fn text(row: u32, col: u16, value: impl Into<String>, style: CellStyle) -> Self {
        Self {
            row,
            col,
            value: CellValue::Text(value.into()),
            style,
        }
    }

    fn figure(row: u32, col: u16, figure: &Figure, style: CellStyle) -> Self {
        let value = match figure {
            Figure::Number(_) => CellValue::Number(figure.as_f64().unwrap_or_default()),
            Figure::Text(text) => CellValue::Text(text.clone()),
        };
        Self {
            row,
            col,
            value,
            style,
        }
    }
}

/// Plans every cell of the quotation sheet in write order.
pub fn layout_sheet(quotation: &Quotation) -> Vec<SheetCell> {
    let mut cells = Vec::new();

    let header = [
        ("報價單編號:", &quotation.quotation_number),
        ("日期:", &quotation.date),
        ("客戶名稱:", &quotation.customer),
        ("聯絡人:", &quotation.contact_person),
    ];
    for (row, (label, value)) in (0u32..).zip(header) {
        cells.push(SheetCell::text(row, 0, label, CellStyle::Bold));
        cells.push(SheetCell::text(row, 1, value.as_str(), CellStyle::Plain));
    }

    for (col, title) in (0u16..).zip(ITEM_HEADERS) {
        cells.push(SheetCell::text(ITEM_HEADER_ROW, col, title, CellStyle::Bold));
    }

    let mut row = ITEMS_FIRST_ROW;
    for (index, item) in quotation.items.iter().enumerate() {
        cells.push(SheetCell {
            row,
            col: 0,
            value: CellValue::Number((index + 1) as f64),
            style: CellStyle::Plain,
        });
        cells.push(SheetCell::text(row, 1, item.description.as_str(), CellStyle::Plain));
        cells.push(SheetCell::figure(row, 2, &item.quantity, CellStyle::Plain));
        cells.push(SheetCell::figure(row, 3, &item.unit_price, CellStyle::Currency));
        cells.push(SheetCell::figure(row, 4, &item.amount, CellStyle::Currency));
        cells.push(SheetCell::text(row, 5, item.notes.as_str(), CellStyle::Plain));
        row += 1;
    }

    cells.push(SheetCell::text(row + 1, 0, "總金額:", CellStyle::Bold));
    cells.push(SheetCell::figure(row + 1, 1, &quotation.grand_total, CellStyle::Currency));
    cells.push(SheetCell::text(row + 3, 0, "地址:", CellStyle::Bold));
    cells.push(SheetCell::text(row + 3, 1, quotation.address.as_str(), CellStyle::Plain));
    cells.push(SheetCell::text(row + 4, 0, "備註說明:", CellStyle::Bold));
    cells.push(SheetCell::text(row + 4, 1, quotation.notes.as_str(), CellStyle::Plain));

    cells
}

/// Writes planned cells into a single-sheet xlsx workbook.
///
/// Empty unformatted text cells are not written at all; empty formatted
/// ones become formatted blanks.
pub fn write_workbook(cells: &[SheetCell]) -> ExportResult<Vec<u8>> {
    let bold = Format::new().set_bold();
    let currency = Format::new().set_num_format(CURRENCY_FORMAT);

    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;
        for cell in cells {
            let format = match cell.style {
                CellStyle::Plain => None,
                CellStyle::Bold => Some(&bold),
                CellStyle::Currency => Some(&currency),
            };
            write_cell(worksheet, cell, format)?;
        }
    }
    Ok(workbook.save_to_buffer()?)
}

fn write_cell(
    worksheet: &mut Worksheet,
    cell: &SheetCell,
    format: Option<&Format>,
) -> ExportResult<()> {
    let (row, col) = (cell.row, cell.col);
    match (&cell.value, format) {
        (CellValue::Text(text), None) if text.is_empty() => {}
        (CellValue::Text(text), Some(format)) if text.is_empty() => {
            worksheet.write_blank(row, col, format)?;
        }
        (CellValue::Text(text), None) => {
            worksheet.write_string(row, col, text.as_str())?;
        }
        (CellValue::Text(text), Some(format)) => {
            worksheet.write_string_with_format(row, col, text.as_str(), format)?;
        }
        (CellValue::Number(number), None) => {
            worksheet.write_number(row, col, *number)?;
        }
        (CellValue::Number(number), Some(format)) => {
            worksheet.write_number_with_format(row, col, *number, format)?;
        }
    }
    Ok(())
}
