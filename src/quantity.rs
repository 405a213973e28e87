use std::fmt::{Debug, Display, Formatter};

use crate::error::PortalError;

#[repr(transparent)]
#[derive(
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::FromStr,
    derive_more::Sum,
    serde::Deserialize,
    serde::Serialize,
)]
#[must_use]
pub struct KilowattHours(pub f64);

impl KilowattHours {
    /// Parse the value the way the portal exports it, that is with a decimal comma: `0,123`.
    pub fn from_decimal_comma(text: &str) -> Result<Self, PortalError> {
        text.trim()
            .replace(',', ".")
            .parse()
            .map(Self)
            .map_err(|_| PortalError::malformed(format!("`{text}` is not a number")))
    }
}

impl Display for KilowattHours {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, formatter)?;
        write!(formatter, " kWh")
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, formatter)?;
        write!(formatter, "kWh")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_from_decimal_comma_ok() -> Result {
        assert_abs_diff_eq!(KilowattHours::from_decimal_comma("0,123")?.0, 0.123);
        assert_abs_diff_eq!(KilowattHours::from_decimal_comma(" 12 ")?.0, 12.0);
        assert_abs_diff_eq!(KilowattHours::from_decimal_comma("1.5")?.0, 1.5);
        Ok(())
    }

    #[test]
    fn test_from_decimal_comma_rejects_garbage() {
        let error = KilowattHours::from_decimal_comma("n/a").unwrap_err();
        assert!(matches!(error, PortalError::MalformedResponse(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(KilowattHours(1.25).to_string(), "1.25 kWh");
        assert_eq!(format!("{:.1}", KilowattHours(0.26)), "0.3 kWh");
    }

    #[test]
    fn test_sum() {
        let total: KilowattHours = [KilowattHours(1.0), KilowattHours(0.5)].into_iter().sum();
        assert_abs_diff_eq!(total.0, 1.5);
    }
}
