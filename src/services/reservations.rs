//! Reservation source: cached CSV snapshots of the booking site, one file
//! per scrape, named `{YYYYMMDD}_query_{HHMMSS}.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use crate::models::ReservationRecord;

/// Produces the reservation snapshot for a date, or `None` when no snapshot
/// exists yet (the caller may then trigger a scrape and retry).
#[async_trait]
pub trait ReservationSource: Send + Sync {
    async fn latest_for(&self, date: &str) -> anyhow::Result<Option<Vec<ReservationRecord>>>;
}

/// Scans a cache directory for the newest snapshot of a date.
pub struct CsvCacheSource {
    dir: PathBuf,
}

impl CsvCacheSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Newest matching file by name; the timestamp suffix makes
    /// lexicographic order chronological.
    fn find_latest(&self, date: &str) -> anyhow::Result<Option<PathBuf>> {
        let prefix = format!("{date}_query_");
        let mut newest: Option<(String, PathBuf)> = None;

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read cache directory {}", self.dir.display())
                })
            }
        };

        for entry in entries {
            let entry = entry.context("failed to read cache directory entry")?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(&prefix) || !name.ends_with(".csv") {
                continue;
            }
            if newest.as_ref().map(|(n, _)| name > *n).unwrap_or(true) {
                newest = Some((name, entry.path()));
            }
        }

        Ok(newest.map(|(_, path)| path))
    }

    fn read_snapshot(path: &Path) -> anyhow::Result<Vec<ReservationRecord>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open snapshot {}", path.display()))?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: ReservationRecord =
                row.with_context(|| format!("malformed row in {}", path.display()))?;
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl ReservationSource for CsvCacheSource {
    async fn latest_for(&self, date: &str) -> anyhow::Result<Option<Vec<ReservationRecord>>> {
        match self.find_latest(date)? {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading reservation snapshot");
                Ok(Some(Self::read_snapshot(&path)?))
            }
            None => Ok(None),
        }
    }
}

/// Write the loaded snapshot next to the cache as `schedule_log_{date}.txt`
/// for later inspection.
pub fn write_schedule_log(
    dir: &Path,
    date: &str,
    records: &[ReservationRecord],
) -> anyhow::Result<PathBuf> {
    let path = dir.join(format!("schedule_log_{date}.txt"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create schedule log {}", path.display()))?;
    for record in records {
        writer
            .serialize(record)
            .context("failed to write schedule log row")?;
    }
    writer.flush().context("failed to flush schedule log")?;
    Ok(path)
}

/// The snapshot rendered back to CSV text, used as a memory context block.
pub fn render_csv(records: &[ReservationRecord]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        if writer.serialize(record).is_err() {
            break;
        }
    }
    writer
        .into_inner()
        .ok()
        .and_then(|buf| String::from_utf8(buf).ok())
        .unwrap_or_default()
}
