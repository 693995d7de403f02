//! Consensus timestamps.
//!
//! The network stamps time as whole seconds since the Unix epoch plus a
//! nanosecond offset. Two wire forms exist and both must round-trip exactly:
//!
//! - **decimal seconds**: `"1600000000.000000001"` (mirror-style JSON)
//! - **integer nanoseconds**: `1600000000000000001` (scaled integer)
//!
//! Floating point never touches either conversion.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nanoseconds in one second.
pub const NANOS_PER_SECOND: u32 = 1_000_000_000;

const NANOS_PER_SECOND_I128: i128 = NANOS_PER_SECOND as i128;

/// Errors raised by timestamp construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("nanosecond offset {0} must be below one second")]
    NanosOutOfRange(u32),

    #[error("timestamp is outside the representable range")]
    Overflow,

    #[error("malformed decimal timestamp `{0}`")]
    Malformed(String),
}

/// A point in consensus time: seconds since the epoch plus nanoseconds.
///
/// `nanos` is always in `0..1_000_000_000`, so instants before the epoch
/// carry a negative `seconds` and a positive offset (`-0.25s` is
/// `seconds = -1, nanos = 750_000_000`). With that normalization the
/// derived ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConsensusTimeStamp {
    seconds: i64,
    nanos: u32,
}

impl ConsensusTimeStamp {
    /// The Unix epoch.
    pub const EPOCH: ConsensusTimeStamp = ConsensusTimeStamp {
        seconds: 0,
        nanos: 0,
    };

    /// Creates a timestamp from seconds and a sub-second nanosecond offset.
    pub fn new(seconds: i64, nanos: u32) -> Result<Self, TimestampError> {
        if nanos >= NANOS_PER_SECOND {
            return Err(TimestampError::NanosOutOfRange(nanos));
        }
        Ok(Self { seconds, nanos })
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Whole seconds since the epoch.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanoseconds past [`seconds`](Self::seconds).
    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Total nanoseconds since the epoch, without loss.
    pub fn total_nanos(&self) -> i128 {
        self.seconds as i128 * NANOS_PER_SECOND_I128 + self.nanos as i128
    }

    /// Builds a timestamp from a total nanosecond count.
    pub fn from_total_nanos(total: i128) -> Result<Self, TimestampError> {
        let seconds = i64::try_from(total.div_euclid(NANOS_PER_SECOND_I128))
            .map_err(|_| TimestampError::Overflow)?;
        // rem_euclid of a positive modulus is always in range.
        let nanos = total.rem_euclid(NANOS_PER_SECOND_I128) as u32;
        Ok(Self { seconds, nanos })
    }

    /// Integer-nanosecond wire form. Fails for instants that do not fit in
    /// an `i64` (roughly before 1677 or after 2262).
    pub fn to_nanos(&self) -> Result<i64, TimestampError> {
        i64::try_from(self.total_nanos()).map_err(|_| TimestampError::Overflow)
    }

    /// Reads the integer-nanosecond wire form. Every `i64` is representable.
    pub fn from_nanos(nanos: i64) -> Self {
        Self {
            seconds: nanos.div_euclid(NANOS_PER_SECOND as i64),
            nanos: nanos.rem_euclid(NANOS_PER_SECOND as i64) as u32,
        }
    }

    /// Decimal-seconds wire form with exactly nine fractional digits.
    pub fn to_decimal_string(&self) -> String {
        let total = self.total_nanos();
        let sign = if total < 0 { "-" } else { "" };
        let abs = total.unsigned_abs();
        let per = NANOS_PER_SECOND as u128;
        format!("{}{}.{:09}", sign, abs / per, abs % per)
    }

    /// Parses the decimal-seconds form. Accepts an optional sign and zero
    /// to nine fractional digits.
    pub fn from_decimal_str(s: &str) -> Result<Self, TimestampError> {
        let malformed = || TimestampError::Malformed(s.to_string());
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, frac) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty()
            || unsigned.ends_with('.')
            || frac.len() > 9
            || !all_digits(whole)
            || !all_digits(frac)
        {
            return Err(malformed());
        }

        let whole: i128 = whole.parse().map_err(|_| TimestampError::Overflow)?;
        let frac: i128 = if frac.is_empty() {
            0
        } else {
            let scale = 10i128.pow(9 - frac.len() as u32);
            frac.parse::<i128>().map_err(|_| malformed())? * scale
        };
        let magnitude = whole
            .checked_mul(NANOS_PER_SECOND_I128)
            .and_then(|n| n.checked_add(frac))
            .ok_or(TimestampError::Overflow)?;
        Self::from_total_nanos(if negative { -magnitude } else { magnitude })
    }

    /// Converts to a `chrono` UTC datetime, if in chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.seconds, self.nanos)
    }
}

impl From<DateTime<Utc>> for ConsensusTimeStamp {
    fn from(dt: DateTime<Utc>) -> Self {
        // chrono reports leap seconds as nanos >= 1e9; fold them into the
        // last representable instant of that second.
        let nanos = dt.timestamp_subsec_nanos().min(NANOS_PER_SECOND - 1);
        Self {
            seconds: dt.timestamp(),
            nanos,
        }
    }
}

impl fmt::Display for ConsensusTimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl FromStr for ConsensusTimeStamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

/// Serde helper: `#[serde(with = "as_decimal")]` stores the timestamp as a
/// decimal-seconds string.
pub mod as_decimal {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::ConsensusTimeStamp;

    pub fn serialize<S: Serializer>(ts: &ConsensusTimeStamp, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_decimal_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ConsensusTimeStamp, D::Error> {
        let text = String::deserialize(d)?;
        ConsensusTimeStamp::from_decimal_str(&text).map_err(D::Error::custom)
    }
}

/// Serde helper: `#[serde(with = "as_nanos")]` stores the timestamp as an
/// integer nanosecond count.
pub mod as_nanos {
    use serde::{ser::Error as _, Deserialize, Deserializer, Serializer};

    use super::ConsensusTimeStamp;

    pub fn serialize<S: Serializer>(ts: &ConsensusTimeStamp, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(ts.to_nanos().map_err(S::Error::custom)?)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ConsensusTimeStamp, D::Error> {
        i64::deserialize(d).map(ConsensusTimeStamp::from_nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    fn ts(seconds: i64, nanos: u32) -> ConsensusTimeStamp {
        ConsensusTimeStamp::new(seconds, nanos).unwrap()
    }

    #[test]
    fn decimal_form_has_nine_fraction_digits() {
        assert_eq!(ts(1_600_000_000, 1).to_decimal_string(), "1600000000.000000001");
        assert_eq!(ts(0, 0).to_decimal_string(), "0.000000000");
        assert_eq!(ts(-1, 750_000_000).to_decimal_string(), "-0.250000000");
    }

    #[test]
    fn decimal_parse_accepts_short_fractions() {
        assert_eq!(ConsensusTimeStamp::from_decimal_str("12.5").unwrap(), ts(12, 500_000_000));
        assert_eq!(ConsensusTimeStamp::from_decimal_str("12").unwrap(), ts(12, 0));
        assert_eq!(ConsensusTimeStamp::from_decimal_str("-0.25").unwrap(), ts(-1, 750_000_000));
    }

    #[test]
    fn decimal_parse_rejects_garbage() {
        for bad in ["", ".5", "1.", "1.0000000001", "1e9", "1.-5", "--1", "1.2.3"] {
            assert!(
                ConsensusTimeStamp::from_decimal_str(bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn both_wire_forms_round_trip_at_the_edges() {
        let samples = [
            ts(0, 0),
            ts(0, 1),
            ts(0, 999_999_999),
            ts(1_600_000_000, 123_456_789),
            ts(-1, 1),
            ConsensusTimeStamp::from_nanos(i64::MIN),
            ConsensusTimeStamp::from_nanos(i64::MAX),
        ];
        for original in samples {
            let decimal = original.to_decimal_string();
            assert_eq!(ConsensusTimeStamp::from_decimal_str(&decimal).unwrap(), original);

            let nanos = original.to_nanos().unwrap();
            assert_eq!(ConsensusTimeStamp::from_nanos(nanos), original);
        }
    }

    #[test]
    fn round_trip_across_a_spread_of_values() {
        let mut seconds: i64 = -3_000_000_000;
        while seconds < 3_000_000_000 {
            for nanos in [0, 1, 10, 999, 1_000_000, 500_000_000, 999_999_999] {
                let original = ts(seconds, nanos);
                let decimal = original.to_decimal_string();
                assert_eq!(decimal.parse::<ConsensusTimeStamp>().unwrap(), original);
                assert_eq!(
                    ConsensusTimeStamp::from_nanos(original.to_nanos().unwrap()),
                    original
                );
            }
            seconds += 77_777_777;
        }
    }

    #[test]
    fn nanos_form_reports_overflow() {
        let far = ts(i64::MAX, 0);
        assert_eq!(far.to_nanos(), Err(TimestampError::Overflow));
        // The decimal form has no such limit.
        assert_eq!(
            ConsensusTimeStamp::from_decimal_str(&far.to_decimal_string()).unwrap(),
            far
        );
    }

    #[test]
    fn rejects_out_of_range_nanos() {
        assert_eq!(
            ConsensusTimeStamp::new(1, NANOS_PER_SECOND),
            Err(TimestampError::NanosOutOfRange(NANOS_PER_SECOND))
        );
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(ts(-1, 999_999_999) < ts(0, 0));
        assert!(ts(5, 1) < ts(5, 2));
        assert!(ts(5, 999_999_999) < ts(6, 0));
    }

    #[test]
    fn chrono_conversion_round_trips() {
        let original = ts(1_700_000_000, 42);
        let dt = original.to_datetime().unwrap();
        assert_eq!(ConsensusTimeStamp::from(dt), original);
    }

    #[derive(Serialize, Deserialize)]
    struct Wire {
        #[serde(with = "as_decimal")]
        decimal: ConsensusTimeStamp,
        #[serde(with = "as_nanos")]
        nanos: ConsensusTimeStamp,
    }

    #[test]
    fn serde_helpers_use_their_wire_forms() {
        let value = ts(1_600_000_000, 5);
        let json = serde_json::to_string(&Wire {
            decimal: value,
            nanos: value,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"decimal":"1600000000.000000005","nanos":1600000000000000005}"#
        );
        let back: Wire = serde_json::from_str(&json).unwrap();
        assert_eq!(back.decimal, value);
        assert_eq!(back.nanos, value);
    }
}
