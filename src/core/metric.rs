use enumset::{EnumSet, EnumSetType};

/// Quantity the portal reports per hour.
///
/// The declaration order is the column order of the readings.
#[derive(Debug, Hash, PartialOrd, Ord, EnumSetType, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Energy taken from the grid.
    Consumption,

    /// Energy fed into the grid.
    Production,

    /// Energy taken from the grid after the hourly balancing.
    NetConsumption,

    /// Energy fed into the grid after the hourly balancing.
    NetProduction,
}

impl Metric {
    /// Value of the `type` field of the chart API.
    #[must_use]
    pub const fn chart_type(self) -> &'static str {
        match self {
            Self::Consumption => "consum",
            Self::Production => "oze",
            Self::NetConsumption => "netto",
            Self::NetProduction => "netto_oze",
        }
    }

    /// Key of the `form[energy][…]` flag of the CSV export.
    #[must_use]
    pub const fn export_flag(self) -> &'static str {
        self.chart_type()
    }

    /// Value of the `Rodzaj` column of the CSV export.
    #[must_use]
    pub const fn export_label(self) -> &'static str {
        match self {
            Self::Consumption => "pobór",
            Self::Production => "oddanie",
            Self::NetConsumption => "pobrana po zbilansowaniu",
            Self::NetProduction => "oddana po zbilansowaniu",
        }
    }

    #[must_use]
    pub fn from_export_label(label: &str) -> Option<Self> {
        EnumSet::<Self>::all().iter().find(|metric| metric.export_label() == label)
    }

    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Consumption => "Consumption",
            Self::Production => "Production",
            Self::NetConsumption => "Net consumption",
            Self::NetProduction => "Net production",
        }
    }
}
