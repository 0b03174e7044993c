pub mod summary_service;

pub use summary_service::{
    DailyProfitSeries, Dashboard, PeriodFilter, Summary, SummaryService, TodaySummary,
};
