//! Two-decimal rating stored as `NUMERIC(3,2)`.
//!
//! The wire form is a decimal string (`"4.50"`), which is what a `NUMERIC`
//! column renders to. Deserialization also accepts plain JSON numbers.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;

/// Rating in hundredths, always within `0..=MAX_HUNDREDTHS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u16);

impl Rating {
    pub const MAX_HUNDREDTHS: u16 = 500;

    pub fn from_hundredths(hundredths: u16) -> Result<Self, ModelError> {
        if hundredths > Self::MAX_HUNDREDTHS {
            return Err(ModelError::RatingOutOfRange(format!(
                "{}.{:02}",
                hundredths / 100,
                hundredths % 100
            )));
        }
        Ok(Self(hundredths))
    }

    /// Round to two decimals and validate the range.
    pub fn from_f64(value: f64) -> Result<Self, ModelError> {
        if !value.is_finite() {
            return Err(ModelError::RatingOutOfRange(value.to_string()));
        }
        let hundredths = (value * 100.0).round();
        if !(0.0..=f64::from(Self::MAX_HUNDREDTHS)).contains(&hundredths) {
            return Err(ModelError::RatingOutOfRange(value.to_string()));
        }
        Ok(Self(hundredths as u16))
    }

    /// Round to a single decimal (catalog averages are reported that way)
    /// and clamp into range. Non-finite input yields `None`.
    pub fn from_average(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let tenths = (value * 10.0).round().clamp(0.0, 50.0);
        Some(Self(tenths as u16 * 10))
    }

    pub fn hundredths(&self) -> u16 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Rating {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| ModelError::RatingOutOfRange(s.to_string()))?;
        Self::from_f64(value)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Rating;
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    impl Serialize for Rating {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    struct RatingVisitor;

    impl Visitor<'_> for RatingVisitor {
        type Value = Rating;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a rating between 0 and 5 as a string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Rating, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Rating, E> {
            Rating::from_f64(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rating, E> {
            Rating::from_f64(v as f64).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rating, E> {
            Rating::from_f64(v as f64).map_err(E::custom)
        }
    }

    impl<'de> Deserialize<'de> for Rating {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            deserializer.deserialize_any(RatingVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Rating::from_f64(4.5).unwrap().to_string(), "4.50");
        assert_eq!(Rating::from_f64(0.0).unwrap().to_string(), "0.00");
        assert_eq!(Rating::from_hundredths(407).unwrap().to_string(), "4.07");
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Rating::from_f64(5.01).is_err());
        assert!(Rating::from_f64(-0.5).is_err());
        assert!(Rating::from_f64(f64::NAN).is_err());
        assert!("abc".parse::<Rating>().is_err());
    }

    #[test]
    fn catalog_averages_round_to_one_decimal() {
        assert_eq!(Rating::from_average(4.27).unwrap().to_string(), "4.30");
        assert_eq!(Rating::from_average(3.949).unwrap().to_string(), "3.90");
        assert_eq!(Rating::from_average(7.2).unwrap().to_string(), "5.00");
        assert!(Rating::from_average(f64::INFINITY).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_strings_and_numbers() {
        let from_str: Rating = serde_json::from_str("\"3.75\"").unwrap();
        let from_num: Rating = serde_json::from_str("3.75").unwrap();
        let from_int: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(from_int.hundredths(), 400);
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"3.75\"");
        assert!(serde_json::from_str::<Rating>("9.5").is_err());
    }
}
