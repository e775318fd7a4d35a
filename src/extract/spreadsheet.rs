//! Spreadsheet text: first worksheet rendered as an aligned table.
//!
//! The first row is the header. Columns are right-aligned to their widest
//! cell and separated by one space; there is no row-index column. Empty
//! cells read `NaN` and whole numbers drop their `.0`, so a sheet of ids and
//! names reads naturally when spoken.

use crate::error::ReaderError;
use calamine::{Data, Range, Reader};
use std::io::Cursor;

const EMPTY_CELL: &str = "NaN";

pub fn extract_spreadsheet(bytes: &[u8]) -> Result<String, ReaderError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ReaderError::parse("planilha", e))?;

    let sheet_names = workbook.sheet_names().to_owned();
    let first = sheet_names
        .first()
        .ok_or_else(|| ReaderError::parse("planilha", "a pasta de trabalho não tem planilhas"))?;
    let range = workbook
        .worksheet_range(first)
        .map_err(|e| ReaderError::parse("planilha", e))?;

    let text = render_table(&range);
    log::info!(
        "[EXTRACT] Spreadsheet '{}': {}x{} cells, {} chars",
        first,
        range.height(),
        range.width(),
        text.len()
    );
    Ok(text)
}

/// Render a sheet as aligned text with the first row as header.
pub fn render_table(range: &Range<Data>) -> String {
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    let Some(header) = rows.first() else {
        return String::new();
    };
    let columns = header.len();
    if columns == 0 {
        return String::new();
    }

    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    lines.join("\n")
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => EMPTY_CELL.to_string(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}
