use rust_xlsxwriter::{Table, TableColumn, Workbook};

use crate::navis::tools::error::Result;
use crate::navis::tools::model::{COLUMNS, FlatRecord};

/// Name of the single worksheet holding the exported rows.
pub const SHEET_NAME: &str = "Comments";

/// Renders the records as `.xlsx` bytes with one autofiltered table. Cell
/// limits (string length, row count) surface here as errors.
pub fn render_workbook(records: &[FlatRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col_idx, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, *header)?;
    }

    for (row_idx, record) in records.iter().enumerate() {
        for (col_idx, cell) in record.cells().into_iter().enumerate() {
            if let Some(value) = cell {
                worksheet.write_string((row_idx + 1) as u32, col_idx as u16, value)?;
            }
        }
    }

    if !records.is_empty() {
        let columns: Vec<TableColumn> = COLUMNS
            .iter()
            .map(|header| TableColumn::new().set_header(*header))
            .collect();
        let table = Table::new().set_autofilter(true).set_columns(&columns);

        let col_end = (COLUMNS.len() as u16).saturating_sub(1);
        worksheet.add_table(0, 0, records.len() as u32, col_end, &table)?;
    }

    Ok(workbook.save_to_buffer()?)
}
