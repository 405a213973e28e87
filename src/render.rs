use std::io::Write;

use crate::{
    core::{Reading, ReadingSet, Record},
    prelude::*,
};

/// How `show` prints the readings.
#[derive(Copy, Clone, Debug, Default, clap::ValueEnum)]
pub enum Format {
    /// Human-readable table with the totals.
    #[default]
    Table,

    /// One comma-separated line per reading, an absent value is an empty field.
    Csv,

    /// Records as the source has returned them, in JSON.
    Raw,
}

/// Timestamp followed by the values, with absent values left empty.
#[must_use]
pub fn csv_fields(reading: &Reading) -> Vec<String> {
    let mut fields = Vec::with_capacity(reading.values.len() + 1);
    fields.push(reading.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string());
    fields.extend(
        reading.values.iter().map(|value| value.map_or_else(String::new, |value| value.0.to_string())),
    );
    fields
}

pub fn write_csv(writer: impl Write, readings: &ReadingSet) -> Result {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    for reading in &readings.readings {
        writer.write_record(csv_fields(reading))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_raw(mut writer: impl Write, records: &[Record]) -> Result {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    Ok(())
}
