pub mod date_range;
pub mod hour;
pub mod metric;
pub mod reading;
pub mod series;

pub use self::{
    date_range::DateRange,
    hour::HourIndex,
    metric::Metric,
    reading::{Reading, ReadingSet},
    series::{MetricSeries, Record},
};
