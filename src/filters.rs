//! Query-filter resolution for the report pages.
//!
//! Every resolver is a pure function of an injected `today`, so preset
//! windows are deterministic under test.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        // A reversed pair is swapped rather than rejected, matching the
        // financial report's tolerant handling.
        if to < from {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of calendar days covered, inclusive.
    pub fn len_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// The window of equal length immediately before this one; used for
    /// period-over-period percentage changes.
    pub fn preceding(&self) -> Self {
        let span = self.len_days();
        Self {
            from: self.from - Duration::days(span),
            to: self.from - Duration::days(1),
        }
    }
}

/// Named preset windows offered by the report pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangePreset {
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    CurrentYear,
    Last30Days,
}

impl DateRangePreset {
    /// Resolves the preset to a concrete window. Weeks start on Monday.
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        match self {
            Self::ThisWeek => {
                let monday = start_of_week(today);
                DateRange::new(monday, monday + Duration::days(6))
            }
            Self::LastWeek => {
                let monday = start_of_week(today) - Duration::days(7);
                DateRange::new(monday, monday + Duration::days(6))
            }
            Self::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                DateRange::new(first, end_of_month(first))
            }
            Self::LastMonth => {
                let this_first = today.with_day(1).unwrap_or(today);
                let last_end = this_first - Duration::days(1);
                let last_first = last_end.with_day(1).unwrap_or(last_end);
                DateRange::new(last_first, last_end)
            }
            Self::CurrentYear => {
                let jan1 = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let dec31 = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
                DateRange::new(jan1, dec31)
            }
            Self::Last30Days => DateRange::new(today - Duration::days(29), today),
        }
    }
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(offset)
}

fn end_of_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|next_first| next_first - Duration::days(1))
        .unwrap_or(first)
}

/// Raw query parameters as they arrive from the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilterParams {
    pub field: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub range: Option<DateRangePreset>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub search: Option<String>,
}

/// Canonical filter set after defaulting and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub field_id: Option<Uuid>,
    pub range: DateRange,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub search: Option<String>,
}

impl ReportFilterParams {
    /// Resolves raw parameters against a page-specific default window.
    ///
    /// Malformed dates fall back silently to the default window; a named
    /// preset wins over explicit dates when both are present.
    pub fn resolve(&self, default_window: DateRangePreset, today: NaiveDate) -> ReportFilter {
        let range = if let Some(preset) = self.range {
            preset.resolve(today)
        } else {
            match (
                parse_iso_date(self.date_from.as_deref()),
                parse_iso_date(self.date_to.as_deref()),
            ) {
                (Some(from), Some(to)) => DateRange::new(from, to),
                _ => default_window.resolve(today),
            }
        };

        ReportFilter {
            field_id: self
                .field
                .as_deref()
                .and_then(|raw| Uuid::parse_str(raw).ok()),
            range,
            status: non_empty(self.status.as_deref()),
            severity: non_empty(self.severity.as_deref()),
            search: non_empty(self.search.as_deref()),
        }
    }
}

fn parse_iso_date(raw: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw?.trim(), "%Y-%m-%d").ok()
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn this_week_starts_monday() {
        // 2024-06-12 is a Wednesday
        let range = DateRangePreset::ThisWeek.resolve(day(2024, 6, 12));
        assert_eq!(range.from, day(2024, 6, 10));
        assert_eq!(range.to, day(2024, 6, 16));
    }

    #[test]
    fn last_month_handles_january() {
        let range = DateRangePreset::LastMonth.resolve(day(2024, 1, 15));
        assert_eq!(range.from, day(2023, 12, 1));
        assert_eq!(range.to, day(2023, 12, 31));
    }

    #[test]
    fn last_30_days_covers_thirty_calendar_days() {
        let range = DateRangePreset::Last30Days.resolve(day(2024, 6, 12));
        assert_eq!(range.len_days(), 30);
        assert_eq!(range.to, day(2024, 6, 12));
    }

    #[test]
    fn reversed_explicit_dates_are_swapped() {
        let params = ReportFilterParams {
            date_from: Some("2024-06-10".into()),
            date_to: Some("2024-06-01".into()),
            ..Default::default()
        };
        let filter = params.resolve(DateRangePreset::Last30Days, day(2024, 6, 12));
        assert_eq!(filter.range.from, day(2024, 6, 1));
        assert_eq!(filter.range.to, day(2024, 6, 10));
    }

    #[test]
    fn malformed_dates_fall_back_to_default_window() {
        let params = ReportFilterParams {
            date_from: Some("06/01/2024".into()),
            date_to: Some("2024-06-10".into()),
            ..Default::default()
        };
        let today = day(2024, 6, 12);
        let filter = params.resolve(DateRangePreset::ThisMonth, today);
        assert_eq!(filter.range, DateRangePreset::ThisMonth.resolve(today));
    }

    #[test]
    fn preset_wins_over_explicit_dates() {
        let params = ReportFilterParams {
            date_from: Some("2024-01-01".into()),
            date_to: Some("2024-01-31".into()),
            range: Some(DateRangePreset::ThisWeek),
            ..Default::default()
        };
        let today = day(2024, 6, 12);
        let filter = params.resolve(DateRangePreset::Last30Days, today);
        assert_eq!(filter.range, DateRangePreset::ThisWeek.resolve(today));
    }

    #[test]
    fn preceding_window_has_equal_length() {
        let range = DateRange::new(day(2024, 6, 1), day(2024, 6, 30));
        let prev = range.preceding();
        assert_eq!(prev.len_days(), range.len_days());
        assert_eq!(prev.to, day(2024, 5, 31));
        assert_eq!(prev.from, day(2024, 5, 2));
    }

    #[test]
    fn blank_status_is_dropped() {
        let params = ReportFilterParams {
            status: Some("  ".into()),
            ..Default::default()
        };
        let filter = params.resolve(DateRangePreset::Last30Days, day(2024, 6, 12));
        assert_eq!(filter.status, None);
    }
}
