use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::extract::EventRecord;

const HEADER: [&str; 4] = ["Title", "Date", "Location", "Source URL"];

#[derive(Serialize)]
struct OutputRow<'a> {
    title: Option<&'a str>,
    date: Option<&'a str>,
    location: Option<&'a str>,
    source_url: &'a str,
}

impl<'a> From<&'a EventRecord> for OutputRow<'a> {
    fn from(r: &'a EventRecord) -> Self {
        OutputRow {
            title: r.title.as_deref(),
            date: r.date.as_deref(),
            location: r.location.as_deref(),
            source_url: &r.source_url,
        }
    }
}

/// Write all records as one sheet with a fixed header row, in input order.
/// The data goes to a temporary sibling first and is renamed into place, so
/// the destination is either fully written or untouched.
pub fn write_csv(records: &[EventRecord], path: &Path) -> Result<()> {
    let tmp = tmp_path(path);

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&tmp)
        .with_context(|| format!("Cannot write output file {}", path.display()))?;
    wtr.write_record(HEADER)?;
    for record in records {
        wtr.serialize(OutputRow::from(record))?;
    }
    wtr.flush()
        .with_context(|| format!("Cannot write output file {}", tmp.display()))?;
    drop(wtr);

    fs::rename(&tmp, path)
        .with_context(|| format!("Cannot move output into place at {}", path.display()))?;
    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "events.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}
