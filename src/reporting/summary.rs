//! Aggregate calculators shared by the report pages. All pure; zero
//! denominators yield zero instead of NaN or infinity.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::financial_record::{self, RecordType};

/// `(current - previous) / previous * 100`, with a zero previous period
/// defined as 0 change.
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Share of waste in total consumption, as a percentage.
pub fn waste_rate(waste: f64, usage: f64) -> f64 {
    let denominator = waste + usage;
    if denominator == 0.0 {
        0.0
    } else {
        waste / denominator * 100.0
    }
}

/// Income/expense totals over a set of financial records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

impl FinancialSummary {
    pub fn from_records(records: &[financial_record::Model]) -> Self {
        let mut summary = Self::default();
        for record in records {
            match record.record_type {
                RecordType::Income => summary.total_income += record.amount,
                RecordType::Expense => summary.total_expenses += record.amount,
            }
        }
        summary.net_profit = summary.total_income - summary.total_expenses;
        summary
    }

    pub fn net_as_f64(&self) -> f64 {
        self.net_profit.to_f64().unwrap_or(0.0)
    }
}

pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::entities::financial_record::RecordStatus;

    fn record(record_type: RecordType, amount: Decimal) -> financial_record::Model {
        financial_record::Model {
            id: Uuid::new_v4(),
            record_type,
            category_id: None,
            source: None,
            description: "test".into(),
            amount,
            transacted_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            notes: None,
            status: RecordStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn summary_nets_income_against_expenses() {
        let records = vec![
            record(RecordType::Income, dec!(1000)),
            record(RecordType::Expense, dec!(400)),
        ];
        let summary = FinancialSummary::from_records(&records);
        assert_eq!(summary.total_income, dec!(1000));
        assert_eq!(summary.total_expenses, dec!(400));
        assert_eq!(summary.net_profit, dec!(600));
    }

    #[test]
    fn empty_records_yield_zero_summary() {
        let summary = FinancialSummary::from_records(&[]);
        assert_eq!(summary, FinancialSummary::default());
    }

    #[test]
    fn zero_previous_period_reports_no_change() {
        assert_eq!(percentage_change(500.0, 0.0), 0.0);
    }

    #[test]
    fn zero_consumption_reports_no_waste() {
        assert_eq!(waste_rate(0.0, 0.0), 0.0);
    }

    proptest! {
        #[test]
        fn percentage_change_is_always_finite(
            current in -1e9f64..1e9f64,
            previous in -1e9f64..1e9f64,
        ) {
            prop_assert!(percentage_change(current, previous).is_finite());
        }

        #[test]
        fn waste_rate_is_always_finite(
            waste in 0f64..1e9f64,
            usage in 0f64..1e9f64,
        ) {
            let rate = waste_rate(waste, usage);
            prop_assert!(rate.is_finite());
            prop_assert!((0.0..=100.0).contains(&rate));
        }
    }
}
