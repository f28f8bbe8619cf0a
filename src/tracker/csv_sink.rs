//! CSV application tracker

use crate::error::{JobHunterError, Result};
use crate::tracker::record::{ApplicationRecord, ApplicationStatus};
use crate::tracker::TrackerSink;
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub struct CsvTracker {
    path: PathBuf,
}

impl CsvTracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored record; a missing file is an empty tracker
    pub fn load(&self) -> Result<Vec<ApplicationRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        reader
            .deserialize::<ApplicationRecord>()
            .enumerate()
            .map(|(row, record)| {
                record.map_err(|e| {
                    JobHunterError::Tracker(format!(
                        "{} row {}: {}",
                        self.path.display(),
                        row + 2,
                        e
                    ))
                })
            })
            .collect()
    }

    /// Replace rows with a known job id in place, append the rest.
    /// Returns how many rows were new.
    pub fn upsert(&self, records: &[ApplicationRecord]) -> Result<usize> {
        let mut rows = self.load()?;
        let mut added = 0;

        for record in records {
            match rows.iter_mut().find(|row| row.job_id == record.job_id) {
                Some(existing) => *existing = record.clone(),
                None => {
                    rows.push(record.clone());
                    added += 1;
                }
            }
        }

        self.write_all(&rows)?;
        debug!("{}: {} rows ({} new)", self.path.display(), rows.len(), added);
        Ok(added)
    }

    fn write_all(&self, rows: &[ApplicationRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&staging)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }

    /// Row count per status, every status listed
    pub fn status_counts(&self) -> Result<BTreeMap<ApplicationStatus, usize>> {
        let mut counts: BTreeMap<ApplicationStatus, usize> =
            ApplicationStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for record in self.load()? {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

impl TrackerSink for CsvTracker {
    fn name(&self) -> &str {
        "csv"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn record(&self, records: &[ApplicationRecord]) -> Result<usize> {
        let added = self.upsert(records)?;
        info!(
            "Tracker saved: {} ({} records, {} new)",
            self.path.display(),
            records.len(),
            added
        );
        Ok(added)
    }
}
