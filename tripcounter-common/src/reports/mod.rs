pub mod daily;
pub mod monthly;

pub use daily::{daily_summary, DailySummary};
pub use monthly::{monthly_report, MonthlyReport};
