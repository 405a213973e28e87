use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;

use crate::{
    core::{Metric, MetricSeries},
    prelude::*,
    quantity::KilowattHours,
};

/// Values of all the metrics at one hour.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,

    /// One value per metric of the containing set, `None` means no measurement (not zero).
    pub values: Vec<Option<KilowattHours>>,
}

impl Reading {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Readings sorted by the timestamp, with no duplicate timestamps.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadingSet {
    /// Column order of [`Reading::values`].
    pub metrics: Vec<Metric>,

    pub readings: Vec<Reading>,
}

impl ReadingSet {
    /// Merge the series over the union of their timestamps.
    #[instrument(skip_all, fields(n_metrics = series.len()))]
    pub fn reconcile(series: &BTreeMap<Metric, MetricSeries>) -> Self {
        let metrics = series.keys().copied().collect_vec();
        let timestamps: BTreeSet<NaiveDateTime> =
            series.values().flat_map(|series| series.keys().copied()).collect();
        let readings = timestamps
            .into_iter()
            .map(|timestamp| Reading {
                timestamp,
                values: series.values().map(|series| series.get(&timestamp).copied()).collect(),
            })
            .collect_vec();
        debug!(n_readings = readings.len(), "reconciled");
        Self { metrics, readings }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn value(&self, reading: &Reading, metric: Metric) -> Option<KilowattHours> {
        let index = self.metrics.iter().position(|column| *column == metric)?;
        reading.values.get(index).copied().flatten()
    }

    /// Sum of the present values per metric.
    pub fn totals(&self) -> Vec<KilowattHours> {
        (0..self.metrics.len())
            .map(|index| self.readings.iter().filter_map(|reading| reading.values[index]).sum())
            .collect()
    }

    /// Split the set into one set per calendar date.
    pub fn split_by_date(self) -> Vec<(NaiveDate, Self)> {
        let metrics = self.metrics;
        let chunks = self.readings.into_iter().chunk_by(Reading::date);
        chunks
            .into_iter()
            .map(|(date, readings)| {
                (date, Self { metrics: metrics.clone(), readings: readings.collect() })
            })
            .collect()
    }
}
