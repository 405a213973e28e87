use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use enumset::EnumSet;

use crate::{
    api::Source,
    archive::Archive,
    cli::{connection::ConnectionArgs, yesterday},
    core::{DateRange, Metric},
    prelude::*,
};

#[derive(Parser)]
pub struct SyncArgs {
    #[clap(flatten)]
    connection: ConnectionArgs,

    /// First day to keep in the archive.
    #[clap(long)]
    since: NaiveDate,

    /// Last day to keep in the archive, yesterday by default.
    #[clap(long)]
    until: Option<NaiveDate>,

    #[clap(long, env = "ELICZNIK_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Maximum number of days fetched at once.
    #[clap(long, default_value = "28")]
    chunk_days: usize,
}

impl SyncArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        ensure!(self.chunk_days != 0, "`--chunk-days` must be positive");
        let until = match self.until {
            Some(until) => until,
            None => yesterday()?,
        };
        let range = DateRange::try_new(self.since, until)?;
        let archive = Archive::new(&self.data_dir);

        let missing = archive.missing_days(range)?;
        if missing.is_empty() {
            info!(%range, "nothing to do");
            return Ok(());
        }
        info!(%range, n_missing_days = missing.len(), "syncing…");

        let session = self.connection.connect()?;
        let source = self.connection.source.bind(&session);
        let metrics = self.connection.metrics();
        let n_written = sync(source.as_ref(), &archive, metrics, &missing, self.chunk_days)?;
        info!(n_written, "synced");
        Ok(())
    }
}

/// Fetch the missing days in spans and write every day that has got any data.
///
/// Returns the number of the written days.
fn sync(
    source: &dyn Source,
    archive: &Archive,
    metrics: EnumSet<Metric>,
    missing: &[NaiveDate],
    chunk_days: usize,
) -> Result<usize> {
    let mut n_written = 0;
    for span in DateRange::spans(missing.iter().copied(), chunk_days) {
        let readings = source.get_readings(metrics, span)?;
        for (date, day) in readings.split_by_date() {
            if !span.contains(date) {
                warn!(%date, %span, "skipping a day outside of the requested span");
                continue;
            }
            if archive.write_day(date, &day)? != 0 {
                n_written += 1;
            }
        }
    }
    Ok(n_written)
}
