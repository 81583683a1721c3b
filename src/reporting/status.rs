//! Per-row status derivations: schedule due dates, inventory stock
//! state, and treatment pH effectiveness.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::view_model::Tone;

/// Where a schedule stands relative to its next occurrence date.
///
/// Recomputed on every read from the calendar-day difference; there is no
/// stored state field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DueStatus {
    DueToday,
    DueInDays { days: i64 },
    Scheduled,
}

/// Calendar-day due banding: overdue or today -> DueToday, within three
/// days -> DueInDays, otherwise Scheduled. Uses whole-day arithmetic so
/// time-of-day and DST cannot shift the count.
pub fn due_status(next: NaiveDate, today: NaiveDate) -> DueStatus {
    let days = (next - today).num_days();
    if days <= 0 {
        DueStatus::DueToday
    } else if days <= 3 {
        DueStatus::DueInDays { days }
    } else {
        DueStatus::Scheduled
    }
}

impl DueStatus {
    pub fn label(&self) -> String {
        match self {
            Self::DueToday => "Due Today".to_string(),
            Self::DueInDays { days: 1 } => "Due in 1 day".to_string(),
            Self::DueInDays { days } => format!("Due in {} days", days),
            Self::Scheduled => "Scheduled".to_string(),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::DueToday => Tone::Danger,
            Self::DueInDays { .. } => Tone::Warning,
            Self::Scheduled => Tone::Muted,
        }
    }
}

/// Derived inventory stock state; low stock takes precedence over
/// impending expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    LowStock,
    ExpiringSoon,
    Ok,
}

const EXPIRY_WINDOW_DAYS: i64 = 30;

pub fn stock_status(
    quantity: Decimal,
    reorder_level: Decimal,
    expires_on: Option<NaiveDate>,
    today: NaiveDate,
) -> StockStatus {
    if quantity <= reorder_level {
        return StockStatus::LowStock;
    }
    if let Some(expiry) = expires_on {
        if (expiry - today).num_days() <= EXPIRY_WINDOW_DAYS {
            return StockStatus::ExpiringSoon;
        }
    }
    StockStatus::Ok
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LowStock => "Low Stock",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Ok => "OK",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::LowStock => Tone::Danger,
            Self::ExpiringSoon => Tone::Warning,
            Self::Ok => Tone::Success,
        }
    }
}

/// Treatment effectiveness bands over a pH delta. Bands are half-open and
/// evaluated strictly in this order; boundary values fall to the next
/// lower band (a delta of exactly 0.5 is Moderate, not Good).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum PhEffectiveness {
    Excellent,
    Good,
    Moderate,
    Ineffective,
    Minimal,
}

pub fn ph_effectiveness(delta: f64) -> PhEffectiveness {
    if delta > 1.0 {
        PhEffectiveness::Excellent
    } else if delta > 0.5 {
        PhEffectiveness::Good
    } else if delta > 0.1 {
        PhEffectiveness::Moderate
    } else if delta <= 0.0 {
        PhEffectiveness::Ineffective
    } else {
        PhEffectiveness::Minimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_bands_follow_calendar_days() {
        let today = day(2024, 6, 1);
        assert_eq!(due_status(day(2024, 6, 1), today), DueStatus::DueToday);
        assert_eq!(
            due_status(day(2024, 6, 3), today),
            DueStatus::DueInDays { days: 2 }
        );
        assert_eq!(due_status(day(2024, 6, 10), today), DueStatus::Scheduled);
    }

    #[test]
    fn overdue_schedules_read_as_due_today() {
        let today = day(2024, 6, 10);
        assert_eq!(due_status(day(2024, 5, 20), today), DueStatus::DueToday);
    }

    #[test]
    fn due_day_count_is_monotonic() {
        let today = day(2024, 6, 1);
        let mut last_days = 0i64;
        for offset in 1..=3 {
            let next = today + chrono::Duration::days(offset);
            match due_status(next, today) {
                DueStatus::DueInDays { days } => {
                    assert!(days > last_days);
                    last_days = days;
                }
                other => panic!("expected DueInDays, got {:?}", other),
            }
        }
    }

    #[test]
    fn low_stock_beats_expiry() {
        let today = day(2024, 6, 1);
        let status = stock_status(dec!(5), dec!(10), Some(day(2024, 6, 5)), today);
        assert_eq!(status, StockStatus::LowStock);
    }

    #[test]
    fn expiry_within_thirty_days_flags_item() {
        let today = day(2024, 6, 1);
        assert_eq!(
            stock_status(dec!(50), dec!(10), Some(day(2024, 7, 1)), today),
            StockStatus::ExpiringSoon
        );
        assert_eq!(
            stock_status(dec!(50), dec!(10), Some(day(2024, 7, 2)), today),
            StockStatus::Ok
        );
    }

    #[rstest]
    #[case(1.2, PhEffectiveness::Excellent)]
    #[case(1.0, PhEffectiveness::Good)]
    #[case(0.5, PhEffectiveness::Moderate)]
    #[case(0.1, PhEffectiveness::Minimal)]
    #[case(0.05, PhEffectiveness::Minimal)]
    #[case(0.0, PhEffectiveness::Ineffective)]
    #[case(-0.3, PhEffectiveness::Ineffective)]
    fn ph_bands_first_match_wins(#[case] delta: f64, #[case] expected: PhEffectiveness) {
        assert_eq!(ph_effectiveness(delta), expected);
    }
}
