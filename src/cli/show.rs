use std::io::stdout;

use chrono::NaiveDate;
use clap::Parser;

use crate::{
    cli::{connection::ConnectionArgs, yesterday},
    core::DateRange,
    prelude::*,
    render::{Format, write_csv, write_raw},
    tables::build_readings_table,
};

#[derive(Parser)]
pub struct ShowArgs {
    #[clap(flatten)]
    connection: ConnectionArgs,

    #[clap(long, env = "ELICZNIK_FORMAT", value_enum, default_value = "table")]
    format: Format,

    /// First day, yesterday by default.
    start: Option<NaiveDate>,

    /// Last day, inclusive. Defaults to the first day.
    end: Option<NaiveDate>,
}

impl ShowArgs {
    fn range(&self) -> Result<DateRange> {
        let start = match self.start {
            Some(start) => start,
            None => yesterday()?,
        };
        DateRange::try_new(start, self.end.unwrap_or(start))
    }

    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let range = self.range()?;
        let metrics = self.connection.metrics();
        let session = self.connection.connect()?;
        let source = self.connection.source.bind(&session);

        match self.format {
            Format::Table => {
                let readings = source.get_readings(metrics, range)?;
                println!("{}", build_readings_table(&readings));
            }
            Format::Csv => {
                let readings = source.get_readings(metrics, range)?;
                write_csv(stdout().lock(), &readings)?;
            }
            Format::Raw => {
                let records = source.fetch_records(metrics, range)?;
                write_raw(stdout().lock(), &records)?;
            }
        }
        Ok(())
    }
}
