use crate::error::Result;
use crate::roster::OutputRow;
pub use crate::log_info;
use std::fs;
use std::path::Path;

pub const CSV_HEADER: [&str; 8] = [
    "District",
    "Town",
    "Member",
    "Party",
    "Email",
    "Home Phone",
    "State House Phone",
    "Committees",
];

/// Writes the roster to `path`, replacing any previous file.
pub fn save_csv(rows: &[OutputRow], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    log_info!("[utils] Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
