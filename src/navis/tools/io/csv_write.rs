use std::io::Write;

use csv::{Terminator, WriterBuilder};

use crate::navis::tools::error::Result;
use crate::navis::tools::model::{COLUMNS, FlatRecord};

/// Renders the records as CSV bytes with the fixed header row.
pub fn render_records(records: &[FlatRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_records_to(&mut buffer, records)?;
    Ok(buffer)
}

/// Writes the records to any writer. The header is written even when there
/// are no records; empty values become empty fields. Lines end in CRLF.
fn write_records_to<W: Write>(writer: W, records: &[FlatRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}
