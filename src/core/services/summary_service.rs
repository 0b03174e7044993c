//! Aggregation over the entry list: period filtering, totals, the per-day
//! profit series, and the today card.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::Entry;
use crate::errors::{LedgerError, Result};

/// Optional month/year narrowing. Each field applies independently; a month
/// without a year matches that month in every year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PeriodFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses selector values: month `"01"`..`"12"`, year `"YYYY"`. Empty
    /// strings mean "not set".
    pub fn parse(month: Option<&str>, year: Option<&str>) -> Result<Self> {
        let month = match month.map(str::trim).filter(|value| !value.is_empty()) {
            Some(raw) => Some(parse_month(raw)?),
            None => None,
        };
        let year = match year.map(str::trim).filter(|value| !value.is_empty()) {
            Some(raw) => Some(parse_year(raw)?),
            None => None,
        };
        Ok(Self { month, year })
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.year.is_none()
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        match (self.year, self.month) {
            (Some(year), Some(month)) => entry.year() == year && entry.month() == month,
            (Some(year), None) => entry.year() == year,
            (None, Some(month)) => entry.month() == month,
            (None, None) => true,
        }
    }

    pub fn label(&self) -> String {
        match (self.year, self.month) {
            (Some(year), Some(month)) => format!("{:04}-{:02}", year, month),
            (Some(year), None) => format!("{:04}", year),
            (None, Some(month)) => format!("month {:02} (all years)", month),
            (None, None) => "all entries".into(),
        }
    }
}

fn parse_month(raw: &str) -> Result<u32> {
    let valid = raw.len() == 2 && raw.chars().all(|ch| ch.is_ascii_digit());
    match raw.parse::<u32>() {
        Ok(month) if valid && (1..=12).contains(&month) => Ok(month),
        _ => Err(LedgerError::InvalidInput(format!(
            "month must be 01..12, got `{}`",
            raw
        ))),
    }
}

fn parse_year(raw: &str) -> Result<i32> {
    let valid = raw.len() == 4 && raw.chars().all(|ch| ch.is_ascii_digit());
    match raw.parse::<i32>() {
        Ok(year) if valid => Ok(year),
        _ => Err(LedgerError::InvalidInput(format!(
            "year must be four digits, got `{}`",
            raw
        ))),
    }
}

/// Totals over the filtered entries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub total_cash: f64,
    pub total_gpay: f64,
    pub total_investment: f64,
    pub total_profit: f64,
}

impl Summary {
    /// Cash plus digital income.
    pub fn total_income(&self) -> f64 {
        self.total_cash + self.total_gpay
    }
}

/// One point per distinct date, profits of same-day entries summed, dates
/// ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyProfitSeries {
    pub dates: Vec<NaiveDate>,
    pub profits: Vec<f64>,
}

impl DailyProfitSeries {
    fn from_map(map: BTreeMap<NaiveDate, f64>) -> Self {
        let (dates, profits) = map.into_iter().unzip();
        Self { dates, profits }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// `YYYY-MM-DD` labels for the x axis.
    pub fn labels(&self) -> Vec<String> {
        self.dates
            .iter()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .collect()
    }

    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.profits.iter().copied())
    }
}

/// Profit and investment booked on a single calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TodaySummary {
    pub date: NaiveDate,
    pub profit: f64,
    pub investment: f64,
}

/// Everything the presenter needs for one filtered view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub filter: PeriodFilter,
    pub entries: Vec<Entry>,
    pub summary: Summary,
    pub series: DailyProfitSeries,
}

pub struct SummaryService;

impl SummaryService {
    /// Filters `entries` and folds totals and the daily series in one pass.
    pub fn summarize(entries: &[Entry], filter: &PeriodFilter) -> Dashboard {
        let mut summary = Summary::default();
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut filtered = Vec::new();

        for entry in entries.iter().filter(|entry| filter.matches(entry)) {
            summary.total_cash += entry.cash;
            summary.total_gpay += entry.gpay;
            summary.total_investment += entry.investment;
            summary.total_profit += entry.profit;
            *by_date.entry(entry.date).or_insert(0.0) += entry.profit;
            filtered.push(entry.clone());
        }

        Dashboard {
            filter: *filter,
            entries: filtered,
            summary,
            series: DailyProfitSeries::from_map(by_date),
        }
    }

    /// Today card over the full, unfiltered list.
    pub fn today(entries: &[Entry], today: NaiveDate) -> TodaySummary {
        entries
            .iter()
            .filter(|entry| entry.date == today)
            .fold(
                TodaySummary {
                    date: today,
                    profit: 0.0,
                    investment: 0.0,
                },
                |mut acc, entry| {
                    acc.profit += entry.profit;
                    acc.investment += entry.investment;
                    acc
                },
            )
    }
}
