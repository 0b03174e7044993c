//! Owns the canonical entry list and mirrors it, whole, to the key-value
//! store after every mutation.

use chrono::NaiveDate;

use crate::{
    core::Clock,
    domain::{Entry, EntryId, EntryInput},
    errors::{LedgerError, Result},
    storage::KeyValueStore,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct EntryStore {
    backend: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    key: String,
    entries: Vec<Entry>,
    last_id: EntryId,
}

impl EntryStore {
    /// Creates an empty store; call [`EntryStore::load`] to read persisted
    /// entries.
    pub fn new(
        backend: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            clock,
            key: key.into(),
            entries: Vec::new(),
            last_id: 0,
        }
    }

    /// Replaces the in-memory list with the persisted one. Absent, unreadable,
    /// or malformed data yields an empty list.
    pub fn load(&mut self) -> &[Entry] {
        self.entries = match self.backend.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Option<Vec<Entry>>>(&raw) {
                Ok(list) => list.unwrap_or_default(),
                Err(err) => {
                    tracing::warn!(key = %self.key, error = %err, "discarding malformed entries");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "entries unreadable, starting empty");
                Vec::new()
            }
        };
        self.last_id = self.entries.iter().map(|entry| entry.id).max().unwrap_or(0);
        tracing::info!(count = self.entries.len(), "entries loaded");
        &self.entries
    }

    /// Validates the raw form values, then appends and persists the entry.
    /// Nothing is stored when any field is invalid.
    pub fn add(&mut self, input: &EntryInput) -> Result<Entry> {
        let (date, investment, cash, gpay) = validate(input)?;
        let entry = Entry::new(self.next_id(), date, investment, cash, gpay);
        self.entries.push(entry.clone());
        tracing::info!(id = entry.id, date = %entry.date, profit = entry.profit, "entry added");
        self.persist()?;
        Ok(entry)
    }

    /// Removes the entry with `id`. An unknown id leaves the list unchanged;
    /// the list is persisted either way.
    pub fn remove(&mut self, id: EntryId) -> Result<Option<Entry>> {
        let removed = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .map(|idx| self.entries.remove(idx));
        match &removed {
            Some(entry) => tracing::info!(id, date = %entry.date, "entry removed"),
            None => tracing::debug!(id, "remove requested for unknown id"),
        }
        self.persist()?;
        Ok(removed)
    }

    /// Entries in insertion order.
    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.backend.set(&self.key, &json)
    }

    /// Epoch milliseconds, bumped past the previous id so ids stay unique
    /// even when two entries land in the same millisecond.
    fn next_id(&mut self) -> EntryId {
        let candidate = self.clock.now().timestamp_millis();
        let id = candidate.max(self.last_id + 1);
        self.last_id = id;
        id
    }
}

fn validate(input: &EntryInput) -> Result<(NaiveDate, f64, f64, f64)> {
    let mut problems = Vec::new();

    let date_raw = input.date.trim();
    let date = if date_raw.is_empty() {
        problems.push("date is required".to_string());
        None
    } else {
        match NaiveDate::parse_from_str(date_raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                problems.push(format!("date `{}` is not YYYY-MM-DD", date_raw));
                None
            }
        }
    };

    let investment = parse_amount("investment", &input.investment, &mut problems);
    let cash = parse_amount("cash", &input.cash, &mut problems);
    let gpay = parse_amount("gpay", &input.gpay, &mut problems);

    match (date, investment, cash, gpay) {
        (Some(date), Some(investment), Some(cash), Some(gpay)) if problems.is_empty() => {
            Ok((date, investment, cash, gpay))
        }
        _ => Err(LedgerError::Validation(format!(
            "fill all fields correctly ({})",
            problems.join("; ")
        ))),
    }
}

fn parse_amount(field: &str, raw: &str, problems: &mut Vec<String>) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            problems.push(format!("{} `{}` is not a number", field, raw.trim()));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::storage::MemoryStore;

    const KEY: &str = "profit_entries";

    fn store_with(backend: MemoryStore) -> EntryStore {
        let clock = FixedClock::at(2024, 5, 1, 10, 0, 0).unwrap();
        let mut store = EntryStore::new(Box::new(backend), Box::new(clock), KEY);
        store.load();
        store
    }

    fn input(date: &str, investment: &str, cash: &str, gpay: &str) -> EntryInput {
        EntryInput::new(date, investment, cash, gpay)
    }

    #[test]
    fn add_computes_profit_and_persists_full_list() {
        let backend = MemoryStore::new();
        let mut store = store_with(backend.clone());

        let gain = store.add(&input("2024-05-01", "100", "60", "50")).unwrap();
        assert_eq!(gain.profit, 10.0);
        let loss = store.add(&input("2024-05-01", "200", "50", "50")).unwrap();
        assert_eq!(loss.profit, -100.0);

        assert_eq!(backend.write_count(), 2);
        let persisted: Vec<Entry> = serde_json::from_str(&backend.raw(KEY).unwrap()).unwrap();
        assert_eq!(persisted, store.all());
    }

    #[test]
    fn ids_strictly_increase_within_one_millisecond() {
        let mut store = store_with(MemoryStore::new());
        let first = store.add(&input("2024-05-01", "1", "1", "1")).unwrap();
        let second = store.add(&input("2024-05-01", "1", "1", "1")).unwrap();
        assert!(second.id > first.id);
        assert_eq!(first.id, store.clock().now().timestamp_millis());
    }

    #[test]
    fn rejects_non_numeric_amount_without_persisting() {
        let backend = MemoryStore::new();
        let mut store = store_with(backend.clone());
        let err = store
            .add(&input("2024-05-01", "100", "sixty", "50"))
            .expect_err("cash must be numeric");
        assert!(matches!(err, LedgerError::Validation(ref msg) if msg.contains("cash")));
        assert!(store.is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn rejects_missing_or_malformed_date() {
        let mut store = store_with(MemoryStore::new());
        assert!(store.add(&input("", "1", "1", "1")).is_err());
        assert!(store.add(&input("01/05/2024", "1", "1", "1")).is_err());
        assert!(store.add(&input("2024-05-01", "1", "NaN", "1")).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn accepts_negative_amounts() {
        let mut store = store_with(MemoryStore::new());
        let entry = store.add(&input("2024-05-01", "-10", "0", " 5 ")).unwrap();
        assert_eq!(entry.profit, 15.0);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut store = store_with(MemoryStore::new());
        let ids: Vec<EntryId> = ["2024-01-01", "2024-01-02", "2024-01-03"]
            .iter()
            .map(|date| store.add(&input(date, "1", "2", "3")).unwrap().id)
            .collect();

        let removed = store.remove(ids[1]).unwrap();
        assert_eq!(removed.map(|entry| entry.id), Some(ids[1]));
        let remaining: Vec<EntryId> = store.all().iter().map(|entry| entry.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[test]
    fn remove_unknown_id_is_a_silent_no_op() {
        let backend = MemoryStore::new();
        let mut store = store_with(backend.clone());
        store.add(&input("2024-01-01", "1", "2", "3")).unwrap();
        assert!(store.remove(42).unwrap().is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn malformed_persisted_data_loads_as_empty() {
        for raw in ["{not json", "null", r#"{"id":1}"#, r#"[{"id":"x"}]"#] {
            let store = store_with(MemoryStore::with_value(KEY, raw));
            assert!(store.is_empty(), "expected empty list for {raw}");
        }
    }

    #[test]
    fn load_restores_entries_and_continues_ids() {
        let raw = r#"[{"id":9999999999999,"date":"2023-01-15","investment":1,"cash":2,"gpay":3,"profit":4}]"#;
        let mut store = store_with(MemoryStore::with_value(KEY, raw));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(9999999999999).map(|entry| entry.profit), Some(4.0));
        let next = store.add(&input("2024-05-01", "1", "1", "1")).unwrap();
        assert_eq!(next.id, 10000000000000);
    }
}
