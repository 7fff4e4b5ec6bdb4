//! Delimited flat-file output.

use crate::error::ExportError;

/// Generate delimited text from headers and rows.
///
/// Each field is quoted/escaped by the `csv` crate as needed.
pub fn generate_delimited(
    headers: &[String],
    rows: &[Vec<String>],
    delimiter: u8,
) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;

    String::from_utf8(bytes).map_err(|_| ExportError::Utf8)
}
