//! Per-day JSON chart API.

use chrono::NaiveDate;
use enumset::EnumSet;
use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

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

impl<'a, C: Transport> Api<'a, C> {
    pub const fn new(channel: &'a C, url: &'a str) -> Self {
        Self { channel, url }
    }

    #[instrument(skip_all, fields(metric = ?metric, on = %on))]
    fn get_daily_records(&self, metric: Metric, on: NaiveDate) -> Result<Vec<Record>> {
        let date = on.format("%d.%m.%Y").to_string();
        let response = self.channel.post_form(
            self.url,
            &[
                ("type", metric.chart_type()),
                ("from", date.as_str()),
                ("to", date.as_str()),
                ("profile", "full time"),
            ],
        )?;
        let values = parse_values(&response.body)?;
        debug!(n_values = values.len(), "fetched");
        let records = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| Some((index, value?)))
            .map(|(index, value)| -> Result<Record, PortalError> {
                let hour = u32::try_from(index)
                    .map_err(|_| PortalError::malformed(format!("hour #{index} is out of range")))?;
                Ok(Record { timestamp: HourIndex::ZeroBased(hour).on(on)?, metric, value })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl<C: Transport> Source for Api<'_, C> {
    /// Sequentially fetch every requested metric for every day of the range.
    fn fetch_records(&self, metrics: EnumSet<Metric>, range: DateRange) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        for metric in metrics {
            for date in range.days() {
                records.extend(self.get_daily_records(metric, date)?);
            }
        }
        Ok(records)
    }
}

/// Hourly values of the day, counting from midnight. `None` is a missing measurement.
fn parse_values(body: &str) -> Result<Vec<Option<KilowattHours>>, PortalError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|error| PortalError::malformed(format!("unexpected chart response: {error}")))?;
    Ok(response.data.map(|data| data.values).unwrap_or_default())
}

#[derive(Deserialize)]
struct ChartResponse {
    #[serde(default)]
    data: Option<ChartData>,
}

#[serde_as]
#[derive(Deserialize)]
struct ChartData {
    #[serde_as(as = "Vec<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    values: Vec<Option<KilowattHours>>,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDateTime;
    use itertools::Itertools;

    use super::*;
    use crate::api::{
        Endpoints,
        scripted::{Call, ScriptedTransport},
    };

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 6, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_values_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "name": {"consum": "pobór"},
                "data": {
                    "values": [0.123, "0.25", null, 0]
                }
            }
        "#;
        let values = parse_values(RESPONSE)?;
        assert_eq!(values.len(), 4);
        assert_abs_diff_eq!(values[0].unwrap().0, 0.123);
        assert_abs_diff_eq!(values[1].unwrap().0, 0.25);
        assert!(values[2].is_none());
        assert_abs_diff_eq!(values[3].unwrap().0, 0.0);
        Ok(())
    }

    #[test]
    fn test_parse_values_without_data() -> Result {
        assert!(parse_values("{}")?.is_empty());
        assert!(parse_values(r#"{"data": {}}"#)?.is_empty());
        assert!(parse_values(r#"{"data": null}"#)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_values_malformed() {
        assert!(matches!(
            parse_values(r#"{"data": {"values": ["lots"]}}"#),
            Err(PortalError::MalformedResponse(_))
        ));
        assert!(matches!(parse_values("<html>"), Err(PortalError::MalformedResponse(_))));
    }

    #[test]
    fn test_fetch_records() -> Result {
        let transport = ScriptedTransport::new([
            ScriptedTransport::ok(Endpoints::TAURON.chart, r#"{"data": {"values": [1.2, 1.5]}}"#),
            ScriptedTransport::ok(Endpoints::TAURON.chart, r#"{"data": {"values": [0.4]}}"#),
            ScriptedTransport::ok(Endpoints::TAURON.chart, r#"{"data": {"values": [null, 0.3]}}"#),
            ScriptedTransport::ok(Endpoints::TAURON.chart, r#"{"data": {"values": []}}"#),
        ]);
        let range = DateRange::try_new(at(1, 0).date(), at(2, 0).date())?;
        let records = Api::new(&transport, Endpoints::TAURON.chart)
            .fetch_records(Metric::Consumption | Metric::Production, range)?;

        assert_eq!(
            records.iter().map(|record| (record.timestamp, record.metric)).collect_vec(),
            [
                (at(1, 0), Metric::Consumption),
                (at(1, 1), Metric::Consumption),
                (at(2, 0), Metric::Consumption),
                (at(1, 1), Metric::Production),
            ]
        );
        assert_eq!(
            transport.calls()[0],
            Call::PostForm(
                Endpoints::TAURON.chart.to_owned(),
                vec![
                    ("type".to_owned(), "consum".to_owned()),
                    ("from".to_owned(), "01.06.2021".to_owned()),
                    ("to".to_owned(), "01.06.2021".to_owned()),
                    ("profile".to_owned(), "full time".to_owned()),
                ],
            )
        );
        assert_eq!(transport.calls().len(), 4);
        Ok(())
    }

    #[test]
    fn test_extra_hour_lands_on_next_midnight() -> Result {
        let day_1 = format!("{{\"data\": {{\"values\": [{}]}}}}", ["0.1"; 25].join(", "));
        let transport = ScriptedTransport::new([
            ScriptedTransport::ok(Endpoints::TAURON.chart, &day_1),
            ScriptedTransport::ok(Endpoints::TAURON.chart, r#"{"data": {"values": [0.7, 0.8]}}"#),
        ]);
        let range = DateRange::try_new(at(1, 0).date(), at(2, 0).date())?;
        let series = Api::new(&transport, Endpoints::TAURON.chart).fetch(Metric::Consumption, range)?;

        assert_eq!(series.len(), 26);
        assert_abs_diff_eq!(series[&at(1, 23)].0, 0.1);
        assert_abs_diff_eq!(series[&at(2, 0)].0, 0.7);
        assert_abs_diff_eq!(series[&at(2, 1)].0, 0.8);
        Ok(())
    }
}
