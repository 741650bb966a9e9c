use csv::WriterBuilder;
use std::path::Path;

use crate::error::Result;
use crate::models::AnalysisBatch;

pub const CSV_HEADER: [&str; 5] = ["filename", "x", "y", "brightness", "area"];

/// Write one row per detected object, in batch order.
///
/// The header is always written, so an empty batch still produces a valid
/// table.
pub fn write_csv(batch: &AnalysisBatch, path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for object in batch {
        writer.serialize(object)?;
    }
    writer.flush()?;
    Ok(())
}
