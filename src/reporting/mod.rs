//! Pure derived-metrics layer: threshold policies, status banding,
//! aggregate summaries, and the view-model + CSV rendering they feed.

pub mod csv;
pub mod policies;
pub mod status;
pub mod summary;
pub mod view_model;

pub use policies::{Band, ThresholdPolicy, NUTRIENT_NPK, SOIL_MOISTURE};
pub use status::{due_status, ph_effectiveness, stock_status, DueStatus, PhEffectiveness, StockStatus};
pub use summary::{decimal_to_f64, percentage_change, waste_rate, FinancialSummary};
pub use view_model::{ChartSeries, ReportViewModel, StatusBadge, SummaryCard, TableRow, Tone};
