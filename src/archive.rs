//! Per-day CSV files: `<root>/YYYY/MM/YYYY_MM_DD.csv`.

use std::{fs, io::ErrorKind, path::PathBuf};

use chrono::NaiveDate;

use crate::{
    core::{DateRange, ReadingSet},
    prelude::*,
    render::csv_fields,
};

pub struct Archive {
    root: PathBuf,
}

impl Archive {
    /// A day has at least this many hours, the one when the clocks go forward.
    const MIN_COMPLETE_LINES: usize = 23;

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(date.format("%Y").to_string())
            .join(date.format("%m").to_string())
            .join(date.format("%Y_%m_%d.csv").to_string())
    }

    pub fn is_complete(&self, date: NaiveDate) -> Result<bool> {
        let path = self.day_path(date);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents.lines().count() >= Self::MIN_COMPLETE_LINES),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error).with_context(|| format!("failed to read `{}`", path.display())),
        }
    }

    /// Days of the range that have no file or an incomplete one.
    pub fn missing_days(&self, range: DateRange) -> Result<Vec<NaiveDate>> {
        let mut missing = Vec::new();
        for date in range.days() {
            if !self.is_complete(date)? {
                missing.push(date);
            }
        }
        Ok(missing)
    }

    /// Write the day's readings, skipping those without any value.
    ///
    /// Nothing is written when no reading has a value, so the day is retried next time.
    #[instrument(skip_all, fields(date = %date))]
    pub fn write_day(&self, date: NaiveDate, readings: &ReadingSet) -> Result<usize> {
        let readings = readings.readings.iter().filter(|reading| !reading.is_empty()).collect::<Vec<_>>();
        if readings.is_empty() {
            warn!("no data");
            return Ok(0);
        }
        let path = self.day_path(date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("failed to create `{}`", path.display()))?;
        for reading in &readings {
            writer.write_record(csv_fields(reading))?;
        }
        writer.flush()?;
        info!(path = %path.display(), n_readings = readings.len(), "written");
        Ok(readings.len())
    }
}
