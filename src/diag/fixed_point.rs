//! Fixed-point display helpers for sensor channels.

use core::fmt;

/// Temperature is reported in 1/100 °C.
pub const TEMPERATURE_SCALE: i32 = 100;
/// Pressure is reported in 1/256 Pa (Q24.8).
pub const PRESSURE_SCALE: i32 = 256;
/// Relative humidity is reported in 1/1024 % (Q22.10).
pub const HUMIDITY_SCALE: i32 = 1024;

/// A fixed-point value rendered with two decimals.
///
/// The value is rescaled to hundredths, truncating toward zero. The sign is
/// written separately from the integer part, so magnitudes below one unit
/// keep it (`-50` at scale 100 renders `-0.50`, not `0.50`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Centi(i64);

impl Centi {
    pub fn from_raw(raw: i32, scale: i32) -> Self {
        Self(raw as i64 * 100 / scale.max(1) as i64)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Integer part, truncated toward zero.
    pub fn integer(self) -> i64 {
        self.0 / 100
    }

    /// Fractional hundredths, always non-negative.
    pub fn fraction(self) -> u8 {
        (self.0 % 100).unsigned_abs() as u8
    }
}

impl fmt::Display for Centi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.integer().unsigned_abs(), self.fraction())
    }
}

/// Whole units of a fixed-point value, truncated toward zero.
pub fn whole_units(raw: i32, scale: i32) -> i32 {
    raw / scale.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn splits_integer_and_fraction() {
        let t = Centi::from_raw(2550, TEMPERATURE_SCALE);
        assert_eq!(t.integer(), 25);
        assert_eq!(t.fraction(), 50);
        assert_eq!(t.to_string(), "25.50");

        assert_eq!(Centi::from_raw(51200, HUMIDITY_SCALE).to_string(), "50.00");
        assert_eq!(whole_units(2_566_400, PRESSURE_SCALE), 10025);
    }

    #[test]
    fn negative_values_keep_their_sign() {
        assert_eq!(Centi::from_raw(-1234, TEMPERATURE_SCALE).to_string(), "-12.34");
        assert_eq!(Centi::from_raw(-50, TEMPERATURE_SCALE).to_string(), "-0.50");
        assert_eq!(Centi::from_raw(-5, TEMPERATURE_SCALE).to_string(), "-0.05");
        assert_eq!(Centi::from_raw(0, TEMPERATURE_SCALE).to_string(), "0.00");
    }

    #[test]
    fn extremes_do_not_overflow() {
        assert_eq!(
            Centi::from_raw(i32::MIN, TEMPERATURE_SCALE).to_string(),
            "-21474836.48"
        );
        assert_eq!(
            Centi::from_raw(i32::MAX, HUMIDITY_SCALE).to_string(),
            "2097151.99"
        );
    }
}
