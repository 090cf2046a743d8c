//! The portable snapshot of one day: a `CashBook` serialized as JSON and
//! carried in the title of the exported document.

use chrono::NaiveDate;

use crate::{CashBook, EngineError, ResultEngine, pdf::pdf_title};

const PDF_MAGIC: &[u8] = b"%PDF";

/// JSON payload stored in the document title.
pub fn to_metadata(book: &CashBook) -> ResultEngine<String> {
    Ok(serde_json::to_string(book)?)
}

/// Parse a title payload back into a `CashBook`.
pub fn from_metadata(metadata: &str) -> ResultEngine<CashBook> {
    if metadata.trim().is_empty() {
        return Err(EngineError::MissingMetadata("metadata is empty".to_string()));
    }
    Ok(serde_json::from_str(metadata)?)
}

/// Read a restore file: a PDF carrying the snapshot in its title, or the
/// bare JSON payload.
pub fn read_snapshot(bytes: &[u8]) -> ResultEngine<CashBook> {
    if bytes.starts_with(PDF_MAGIC) {
        return from_metadata(&pdf_title(bytes)?);
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|_| EngineError::MissingMetadata("file is neither PDF nor JSON".to_string()))?;
    from_metadata(text.trim_start_matches('\u{feff}'))
}

/// `CashBook-DD-MM-YYYY.pdf`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("CashBook-{}.pdf", date.format("%d-%m-%Y"))
}

/// Name of the JSON sidecar written next to a printed sheet.
pub fn metadata_file_name(date: NaiveDate) -> String {
    format!("CashBook-{}.json", date.format("%d-%m-%Y"))
}
