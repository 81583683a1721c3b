//! Render-agnostic report structure consumed by HTML tables, chart
//! scripts, and the CSV exporter alike. Assembly never performs I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Visual weight of a badge or card, mapped to a CSS class by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
    Muted,
}

/// Precomputed status label carried by a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBadge {
    pub label: String,
    pub tone: Tone,
}

impl StatusBadge {
    pub fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

/// A labeled headline number, optionally with a period-over-period delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCard {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_pct: Option<f64>,
    pub tone: Tone,
}

impl SummaryCard {
    pub fn new(label: impl Into<String>, value: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta_pct: None,
            tone,
        }
    }

    pub fn with_delta(mut self, delta_pct: f64) -> Self {
        self.delta_pct = Some(delta_pct);
        self
    }
}

/// One chart line/bar series. `None` points render as gaps so missing
/// data never reads as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub labels: Vec<String>,
    pub points: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, labels: Vec<String>, points: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            labels,
            points,
        }
    }
}

/// A table row: formatted cells plus an optional precomputed badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<StatusBadge>,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells, badge: None }
    }

    pub fn with_badge(mut self, badge: StatusBadge) -> Self {
        self.badge = Some(badge);
        self
    }
}

/// Complete view-model for one report page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportViewModel {
    pub title: String,
    pub generated_on: NaiveDate,
    pub summary: Vec<SummaryCard>,
    pub series: Vec<ChartSeries>,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
    /// Set when there were no input rows; consumers render this instead
    /// of an empty table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl ReportViewModel {
    pub fn new(title: impl Into<String>, generated_on: NaiveDate) -> Self {
        Self {
            title: title.into(),
            generated_on,
            summary: Vec::new(),
            series: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            empty_message: None,
        }
    }

    pub fn card(mut self, card: SummaryCard) -> Self {
        self.summary.push(card);
        self
    }

    pub fn series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn rows(mut self, rows: Vec<TableRow>) -> Self {
        self.rows = rows;
        self
    }

    /// Applies the page's explicit empty-state message when no rows were
    /// produced.
    pub fn or_empty(mut self, message: &str) -> Self {
        if self.rows.is_empty() {
            self.empty_message = Some(message.to_string());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_carries_explicit_message() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let vm = ReportViewModel::new("Fertilizer Schedules", date)
            .columns(&["Crop", "Next Application"])
            .rows(vec![])
            .or_empty("No schedules found");
        assert_eq!(vm.empty_message.as_deref(), Some("No schedules found"));
    }

    #[test]
    fn populated_report_has_no_empty_message() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let vm = ReportViewModel::new("Fertilizer Schedules", date)
            .rows(vec![TableRow::new(vec!["Corn".into(), "2024-06-03".into()])])
            .or_empty("No schedules found");
        assert_eq!(vm.empty_message, None);
    }

    #[test]
    fn series_gaps_survive_serialization() {
        let series = ChartSeries::new(
            "Income",
            vec!["Jan".into(), "Feb".into()],
            vec![Some(100.0), None],
        );
        let json = serde_json::to_string(&series).unwrap();
        assert!(json.contains("null"));
    }
}
