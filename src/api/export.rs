//! Date-range CSV export.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::{
    api::{Source, Transport},
    core::{DateRange, HourIndex, Metric, Record},
    error::PortalError,
    prelude::*,
    quantity::KilowattHours,
};

pub struct Api<'a, C> {
    channel: &'a C,
    url: &'a str,
}

impl<'a, C> Api<'a, C> {
    pub const fn new(channel: &'a C, url: &'a str) -> Self {
        Self { channel, url }
    }
}

impl<C: Transport> Source for Api<'_, C> {
    /// Fetch all the metrics for the whole range at once.
    #[instrument(skip_all, fields(range = %range))]
    fn fetch_records(&self, metrics: EnumSet<Metric>, range: DateRange) -> Result<Vec<Record>> {
        let query = serde_qs::to_string(&Query::new(metrics, range))
            .context("failed to build the export query")?;
        info!("fetching…");
        let response = self.channel.get(&format!("{}?{query}", self.url))?;
        let records = parse_records(&response.body, metrics, range)?;
        info!(n_records = records.len(), "fetched");
        Ok(records)
    }
}

#[derive(Serialize)]
struct Query {
    form: Form,
}

#[derive(Serialize)]
struct Form {
    from: String,

    to: String,

    /// Hourly values, `dzien` would give the daily ones.
    #[serde(rename = "type")]
    resolution: &'static str,

    energy: BTreeMap<&'static str, u8>,

    #[serde(rename = "fileType")]
    file_type: &'static str,
}

impl Query {
    fn new(metrics: EnumSet<Metric>, range: DateRange) -> Self {
        Self {
            form: Form {
                from: range.start.format("%d.%m.%Y").to_string(),
                to: range.end.format("%d.%m.%Y").to_string(),
                resolution: "godzin",
                energy: metrics.iter().map(|metric| (metric.export_flag(), 1)).collect(),
                file_type: "CSV",
            },
        }
    }
}

#[derive(Deserialize)]
struct Row {
    /// Date and one-based hour: `2021-06-01 1:00`.
    #[serde(rename = "Data")]
    timestamp: String,

    #[serde(rename = "Rodzaj")]
    kind: String,

    #[serde(rename = "Wartość kWh")]
    value: String,
}

/// Parse the export, keeping the requested metrics within the range.
fn parse_records(
    body: &str,
    metrics: EnumSet<Metric>,
    range: DateRange,
) -> Result<Vec<Record>, PortalError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut records = Vec::new();
    for row in reader.deserialize::<Row>() {
        let row =
            row.map_err(|error| PortalError::malformed(format!("unexpected export row: {error}")))?;
        let Some(metric) = Metric::from_export_label(&row.kind) else {
            debug!(kind = %row.kind, "skipped an unknown kind");
            continue;
        };
        if !metrics.contains(metric) {
            continue;
        }
        let timestamp = parse_timestamp(&row.timestamp)?;
        let value = KilowattHours::from_decimal_comma(&row.value)?;
        if range.contains(timestamp.date()) {
            records.push(Record { timestamp, metric, value });
        } else {
            trace!(%timestamp, "skipped a record outside of the range");
        }
    }
    Ok(records)
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime, PortalError> {
    let malformed = || PortalError::malformed(format!("`{text}` is not a valid timestamp"));
    let (date, time) = text.trim().split_once(char::is_whitespace).ok_or_else(malformed)?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| malformed())?;
    let hour = time
        .trim()
        .split(':')
        .next()
        .and_then(|hour| hour.parse().ok())
        .ok_or_else(malformed)?;
    HourIndex::OneBased(hour).on(date)
}
