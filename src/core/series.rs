use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use enumset::EnumSet;

use crate::{core::Metric, prelude::*, quantity::KilowattHours};

/// Single hourly value as a source reports it, after the hour normalization.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub metric: Metric,
    pub value: KilowattHours,
}

/// Hourly values of one metric, keyed by the local civil timestamp.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, derive_more::Deref, derive_more::IntoIterator)]
#[into_iterator(owned, ref)]
pub struct MetricSeries(BTreeMap<NaiveDateTime, KilowattHours>);

impl MetricSeries {
    /// Insert the value, the later one wins if the hour is already present.
    ///
    /// That happens on the day when the clocks go back.
    pub fn insert(&mut self, timestamp: NaiveDateTime, value: KilowattHours) {
        if let Some(previous) = self.0.insert(timestamp, value) {
            warn!(%timestamp, ?previous, ?value, "duplicate hour, keeping the later value");
        }
    }

    /// Split the records into a series per requested metric.
    ///
    /// Every requested metric gets an entry, even if the source returned nothing for it.
    pub fn group(
        metrics: EnumSet<Metric>,
        records: impl IntoIterator<Item = Record>,
    ) -> BTreeMap<Metric, Self> {
        let mut series: BTreeMap<Metric, Self> =
            metrics.iter().map(|metric| (metric, Self::default())).collect();
        for record in records {
            if let Some(series) = series.get_mut(&record.metric) {
                series.insert(record.timestamp, record.value);
            } else {
                debug!(?record.metric, "skipped a record of an unrequested metric");
            }
        }
        series
    }
}

impl FromIterator<(NaiveDateTime, KilowattHours)> for MetricSeries {
    fn from_iter<T: IntoIterator<Item = (NaiveDateTime, KilowattHours)>>(iter: T) -> Self {
        let mut series = Self::default();
        for (timestamp, value) in iter {
            series.insert(timestamp, value);
        }
        series
    }
}
