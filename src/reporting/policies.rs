//! Named threshold policies.
//!
//! The source pages each carried their own literal bounds; they stay
//! distinct named policies here instead of being merged (nutrient bands
//! treat the low boundary as inclusive, moisture does not).

use serde::{Deserialize, Serialize};

/// Categorical band produced by a threshold classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Band {
    Low,
    Medium,
    High,
}

/// A named pair of bounds mapping a numeric reading to a [`Band`].
///
/// `low_inclusive` controls whether a reading equal to `low_max` falls in
/// the Low band (nutrients) or the Medium band (moisture).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    pub name: &'static str,
    pub low_max: f64,
    pub high_min: f64,
    pub low_inclusive: bool,
}

/// N/P/K bounds from the fertilizer page: <=30 Low, >60 High.
pub const NUTRIENT_NPK: ThresholdPolicy = ThresholdPolicy {
    name: "nutrient_npk",
    low_max: 30.0,
    high_min: 60.0,
    low_inclusive: true,
};

/// Soil-moisture bounds: <30 Low, >70 High, 30-70 optimal.
pub const SOIL_MOISTURE: ThresholdPolicy = ThresholdPolicy {
    name: "soil_moisture",
    low_max: 30.0,
    high_min: 70.0,
    low_inclusive: false,
};

impl ThresholdPolicy {
    /// Total over all finite inputs: exactly one band per reading.
    pub fn classify(&self, value: f64) -> Band {
        let is_low = if self.low_inclusive {
            value <= self.low_max
        } else {
            value < self.low_max
        };
        if is_low {
            Band::Low
        } else if value > self.high_min {
            Band::High
        } else {
            Band::Medium
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(25.0, Band::Low)]
    #[case(30.0, Band::Low)]
    #[case(45.0, Band::Medium)]
    #[case(60.0, Band::Medium)]
    #[case(75.0, Band::High)]
    fn nutrient_bounds(#[case] value: f64, #[case] expected: Band) {
        assert_eq!(NUTRIENT_NPK.classify(value), expected);
    }

    #[rstest]
    #[case(29.9, Band::Low)]
    #[case(30.0, Band::Medium)]
    #[case(70.0, Band::Medium)]
    #[case(70.1, Band::High)]
    fn moisture_bounds(#[case] value: f64, #[case] expected: Band) {
        assert_eq!(SOIL_MOISTURE.classify(value), expected);
    }

    proptest! {
        #[test]
        fn classify_is_total(value in -1e9f64..1e9f64) {
            // No input may panic or fall between bands
            let _ = NUTRIENT_NPK.classify(value);
            let _ = SOIL_MOISTURE.classify(value);
        }

        #[test]
        fn classify_is_monotonic(a in -1e6f64..1e6f64, b in -1e6f64..1e6f64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let rank = |band: Band| match band {
                Band::Low => 0,
                Band::Medium => 1,
                Band::High => 2,
            };
            prop_assert!(rank(NUTRIENT_NPK.classify(lo)) <= rank(NUTRIENT_NPK.classify(hi)));
        }
    }
}
