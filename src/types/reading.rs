// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsing of raw device readings.
//!
//! The plug answers every query with a bare text token. Numeric tokens that
//! fail to parse are reported as [`ParseError::InvalidValue`] and never
//! coerced to zero.

use crate::error::ParseError;

/// Token the device returns in place of a reading once the session is gone.
pub const EXPIRY_SENTINEL: &str = "ERROR";

/// Outcome of a switch-state query.
///
/// # Examples
///
/// ```
/// use w215_lib::types::SwitchReading;
///
/// assert_eq!(SwitchReading::from_token("true"), SwitchReading::State(true));
/// assert_eq!(SwitchReading::from_token("false"), SwitchReading::State(false));
/// assert_eq!(SwitchReading::from_token("TRUE"), SwitchReading::State(false));
/// assert_eq!(SwitchReading::from_token("ERROR"), SwitchReading::Expired);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchReading {
    /// The session has expired; the caller must log in again.
    Expired,
    /// The relay state.
    State(bool),
}

impl SwitchReading {
    /// Classifies a switch-state token.
    ///
    /// Only the exact lowercase token `true` means on; every other token
    /// except the expiry sentinel means off.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            EXPIRY_SENTINEL => Self::Expired,
            "true" => Self::State(true),
            _ => Self::State(false),
        }
    }
}

/// Parses the cumulative energy reading in kilowatt-hours.
///
/// # Errors
///
/// Returns [`ParseError::InvalidValue`] unless the text is a finite,
/// non-negative decimal.
pub fn parse_cumulative_energy(raw: &str) -> Result<f64, ParseError> {
    const FIELD: &str = "cumulative energy";

    let value = parse_decimal(raw, FIELD)?;
    if value < 0.0 {
        return Err(invalid(FIELD, raw));
    }
    Ok(value)
}

/// Parses the instantaneous power reading in watts.
///
/// Decimal text is truncated toward zero, as the plug reports integral watts
/// on most firmware but a fractional value on some.
///
/// # Errors
///
/// Returns [`ParseError::InvalidValue`] unless the text is a non-negative
/// number that fits in a `u32`.
pub fn parse_instantaneous_power(raw: &str) -> Result<u32, ParseError> {
    const FIELD: &str = "instantaneous power";

    let trimmed = raw.trim();
    if let Ok(watts) = trimmed.parse::<u32>() {
        return Ok(watts);
    }

    let value = parse_decimal(raw, FIELD)?;
    if value < 0.0 || value >= f64::from(u32::MAX) {
        return Err(invalid(FIELD, raw));
    }

    // Range checked above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let watts = value.trunc() as u32;
    Ok(watts)
}

/// Parses the temperature reading in degrees Celsius.
///
/// # Errors
///
/// Returns [`ParseError::InvalidValue`] unless the text is a finite decimal.
pub fn parse_temperature(raw: &str) -> Result<f64, ParseError> {
    parse_decimal(raw, "temperature")
}

fn parse_decimal(raw: &str, field: &'static str) -> Result<f64, ParseError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(field, raw))
}

fn invalid(field: &'static str, raw: &str) -> ParseError {
    ParseError::InvalidValue {
        field,
        raw: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_token_exact_true_is_on() {
        assert_eq!(SwitchReading::from_token("true"), SwitchReading::State(true));
    }

    #[test]
    fn switch_token_other_text_is_off() {
        for token in ["false", "True", "TRUE", " true", "1", "on", ""] {
            assert_eq!(
                SwitchReading::from_token(token),
                SwitchReading::State(false),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn switch_token_sentinel_is_expired() {
        assert_eq!(SwitchReading::from_token("ERROR"), SwitchReading::Expired);
        // The sentinel is case-sensitive too
        assert_eq!(SwitchReading::from_token("error"), SwitchReading::State(false));
    }

    #[test]
    fn cumulative_energy_parses_decimal() {
        assert!((parse_cumulative_energy("12.345").unwrap() - 12.345).abs() < f64::EPSILON);
        assert!((parse_cumulative_energy(" 0 ").unwrap()).abs() < f64::EPSILON);
    }

    #[test]
    fn cumulative_energy_rejects_negative_and_garbage() {
        assert!(parse_cumulative_energy("-1.5").is_err());
        assert!(parse_cumulative_energy("N/A").is_err());
        assert!(parse_cumulative_energy("NaN").is_err());
        assert!(parse_cumulative_energy("ERROR").is_err());
    }

    #[test]
    fn instantaneous_power_parses_integer() {
        assert_eq!(parse_instantaneous_power("42").unwrap(), 42);
        assert_eq!(parse_instantaneous_power("0").unwrap(), 0);
    }

    #[test]
    fn instantaneous_power_truncates_decimal() {
        assert_eq!(parse_instantaneous_power("42.9").unwrap(), 42);
    }

    #[test]
    fn instantaneous_power_malformed() {
        let err = parse_instantaneous_power("N/A").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidValue {
                field: "instantaneous power",
                raw: "N/A".to_string(),
            }
        );
        assert!(parse_instantaneous_power("-3").is_err());
        assert!(parse_instantaneous_power("").is_err());
        assert!(parse_instantaneous_power("inf").is_err());
    }

    #[test]
    fn temperature_allows_negative() {
        assert!((parse_temperature("-4.5").unwrap() + 4.5).abs() < f64::EPSILON);
        assert!((parse_temperature("21.5").unwrap() - 21.5).abs() < f64::EPSILON);
        assert!(parse_temperature("warm").is_err());
    }
}
