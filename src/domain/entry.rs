use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Creation-time derived identifier (epoch milliseconds, strictly increasing
/// within one store).
pub type EntryId = i64;

/// One ledger record: the day's investment against cash and digital income.
///
/// `profit` is captured when the entry is created and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub investment: f64,
    pub cash: f64,
    pub gpay: f64,
    pub profit: f64,
}

impl Entry {
    pub fn new(id: EntryId, date: NaiveDate, investment: f64, cash: f64, gpay: f64) -> Self {
        Self {
            id,
            date,
            investment,
            cash,
            gpay,
            profit: (cash + gpay) - investment,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Cash plus digital income.
    pub fn income(&self) -> f64 {
        self.cash + self.gpay
    }

    pub fn profit_class(&self) -> ProfitClass {
        ProfitClass::of(self.profit)
    }
}


/// Visual classification of a profit figure. Zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitClass {
    Positive,
    Negative,
}

impl ProfitClass {
    pub fn of(profit: f64) -> Self {
        if profit >= 0.0 {
            ProfitClass::Positive
        } else {
            ProfitClass::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfitClass::Positive => "positive",
            ProfitClass::Negative => "negative",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ProfitClass::Positive => "profit-positive",
            ProfitClass::Negative => "profit-negative",
        }
    }
}

/// Raw form values as typed by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryInput {
    pub date: String,
    pub investment: String,
    pub cash: String,
    pub gpay: String,
}

impl EntryInput {
    pub fn new(
        date: impl Into<String>,
        investment: impl Into<String>,
        cash: impl Into<String>,
        gpay: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            investment: investment.into(),
            cash: cash.into(),
            gpay: gpay.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn profit_is_income_minus_investment() {
        let gain = Entry::new(1, date(2024, 5, 1), 100.0, 60.0, 50.0);
        assert_eq!(gain.profit, 10.0);
        assert_eq!(gain.profit_class(), ProfitClass::Positive);

        let loss = Entry::new(2, date(2024, 5, 1), 200.0, 50.0, 50.0);
        assert_eq!(loss.profit, -100.0);
        assert_eq!(loss.profit_class(), ProfitClass::Negative);
    }

    #[test]
    fn zero_profit_is_classified_positive() {
        assert_eq!(ProfitClass::of(0.0), ProfitClass::Positive);
        assert_eq!(ProfitClass::of(0.0).css_class(), "profit-positive");
    }

    #[test]
    fn serializes_with_plain_date_string() {
        let entry = Entry::new(1714521600000, date(2024, 5, 1), 100.0, 60.0, 50.0);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["id"], 1714521600000i64);
        assert_eq!(json["profit"], 10.0);
    }

    #[test]
    fn stored_profit_is_not_recomputed_on_load() {
        let raw = r#"{"id":7,"date":"2023-01-15","investment":10,"cash":5,"gpay":5,"profit":42}"#;
        let entry: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.profit, 42.0);
        assert_eq!(entry.year(), 2023);
        assert_eq!(entry.month(), 1);
    }
}
