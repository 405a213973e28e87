use std::collections::BTreeMap;

use enumset::EnumSet;
use itertools::Itertools;

use crate::{
    api::{Session, Transport, chart, export},
    core::{DateRange, Metric, MetricSeries, ReadingSet, Record},
    prelude::*,
};

/// Anything that can fetch hourly records of the metrics for a date range.
///
/// Fetching goes through the whole range before anything gets reconciled.
pub trait Source {
    /// Fetch the raw records, with the hours already normalized.
    fn fetch_records(&self, metrics: EnumSet<Metric>, range: DateRange) -> Result<Vec<Record>>;

    fn fetch(&self, metric: Metric, range: DateRange) -> Result<MetricSeries> {
        Ok(self
            .fetch_records(EnumSet::only(metric), range)?
            .into_iter()
            .filter(|record| record.metric == metric)
            .map(|record| (record.timestamp, record.value))
            .collect())
    }

    /// Fetch a series per metric, every requested metric is present in the result.
    fn fetch_all(
        &self,
        metrics: EnumSet<Metric>,
        range: DateRange,
    ) -> Result<BTreeMap<Metric, MetricSeries>> {
        Ok(MetricSeries::group(metrics, self.fetch_records(metrics, range)?))
    }

    #[instrument(skip_all, fields(range = %range))]
    fn get_readings(&self, metrics: EnumSet<Metric>, range: DateRange) -> Result<ReadingSet> {
        let series = match metrics.iter().exactly_one() {
            Ok(metric) => BTreeMap::from([(metric, self.fetch(metric, range)?)]),
            Err(_) => self.fetch_all(metrics, range)?,
        };
        let readings = ReadingSet::reconcile(&series);
        info!(n_readings = readings.len(), "fetched");
        Ok(readings)
    }
}

/// Portal endpoint to fetch the readings from.
#[derive(Copy, Clone, Debug, Default, clap::ValueEnum)]
pub enum SourceKind {
    /// CSV export, one request for the whole range.
    #[default]
    Export,

    /// JSON chart API, one request per metric and day.
    Chart,
}

impl SourceKind {
    pub fn bind<'a, T: Transport>(self, session: &'a Session<T>) -> Box<dyn Source + 'a> {
        match self {
            Self::Export => Box::new(export::Api::new(session, session.endpoints().export)),
            Self::Chart => Box::new(chart::Api::new(session, session.endpoints().chart)),
        }
    }
}
