//! Server-side CSV rendering of a [`ReportViewModel`].
//!
//! The export consumes the same view-model as the HTML page, replacing
//! the source system's client-side DOM scraping.

use super::view_model::ReportViewModel;

/// Renders a report as RFC 4180 CSV: summary cards first, then a blank
/// line, then the table (with a Status column when any row carries a
/// badge).
pub fn render_csv(report: &ReportViewModel) -> String {
    let mut out = String::new();

    push_row(&mut out, &[report.title.as_str(), ""]);
    push_row(
        &mut out,
        &["Generated", &report.generated_on.format("%Y-%m-%d").to_string()],
    );

    for card in &report.summary {
        push_row(&mut out, &[card.label.as_str(), card.value.as_str()]);
    }
    out.push_str("\r\n");

    let has_badges = report.rows.iter().any(|row| row.badge.is_some());

    let mut header: Vec<&str> = report.columns.iter().map(String::as_str).collect();
    if has_badges {
        header.push("Status");
    }
    push_row(&mut out, &header);

    if report.rows.is_empty() {
        if let Some(message) = &report.empty_message {
            push_row(&mut out, &[message.as_str()]);
        }
        return out;
    }

    for row in &report.rows {
        let mut cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
        if has_badges {
            cells.push(row.badge.as_ref().map(|b| b.label.as_str()).unwrap_or(""));
        }
        push_row(&mut out, &cells);
    }

    out
}

fn push_row(out: &mut String, cells: &[&str]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(cell));
    }
    out.push_str("\r\n");
}

fn escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::view_model::{StatusBadge, SummaryCard, TableRow, Tone};
    use chrono::NaiveDate;

    fn sample() -> ReportViewModel {
        ReportViewModel::new(
            "Inventory Report",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .card(SummaryCard::new("Total Items", "42", Tone::Info))
        .columns(&["Item", "Quantity"])
        .rows(vec![TableRow::new(vec![
            "Seed, hybrid \"X9\"".into(),
            "120".into(),
        ])
        .with_badge(StatusBadge::new("Low Stock", Tone::Danger))])
    }

    #[test]
    fn badge_adds_status_column() {
        let csv = render_csv(&sample());
        assert!(csv.contains("Item,Quantity,Status"));
        assert!(csv.contains("Low Stock"));
    }

    #[test]
    fn cells_with_commas_and_quotes_are_escaped() {
        let csv = render_csv(&sample());
        assert!(csv.contains("\"Seed, hybrid \"\"X9\"\"\""));
    }

    #[test]
    fn empty_report_renders_empty_message_row() {
        let vm = ReportViewModel::new(
            "Soil Tests",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .columns(&["Field", "pH"])
        .or_empty("No recent soil test results available");
        let csv = render_csv(&vm);
        assert!(csv.contains("No recent soil test results available"));
    }
}
