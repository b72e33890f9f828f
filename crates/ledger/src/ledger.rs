use std::collections::HashMap;

use api_types::BoxType;
use api_types::box_entry::{BoxEntry, BoxImport};
use uuid::Uuid;

use crate::client::Client;
use crate::entry::RawEntry;
use crate::error::{LedgerError, Result};

/// Aggregates for one box type.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TypeStats {
    pub total_cost: f64,
    pub total_margin: f64,
    /// Total number of boxes, not number of entries.
    pub count: i64,
}

/// In-memory cache of the stored collection plus the state a display layer
/// needs: a loading flag and the message of the most recent failure.
///
/// Mutations are pessimistic: the cache changes only once the store has
/// answered with the canonical row, and a failed operation leaves it exactly
/// as it was. Operations on one instance are serialized by `&mut self`; the
/// ledger itself does no locking, queueing, or retrying.
#[derive(Debug)]
pub struct Ledger {
    client: Client,
    entries: Vec<BoxEntry>,
    is_loading: bool,
    error: Option<String>,
}

impl Ledger {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            entries: Vec::new(),
            is_loading: false,
            error: None,
        }
    }

    /// The cached entries, newest first.
    pub fn entries(&self) -> &[BoxEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the most recent failure; cleared when the next operation
    /// starts.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        self.is_loading = false;
        if let Err(err) = &result {
            self.error = Some(err.to_string());
        }
        result
    }

    /// Replaces the cache wholesale with the stored collection.
    pub async fn fetch_all(&mut self) -> Result<()> {
        self.begin();
        let result = self.client.boxes_list().await.map_err(LedgerError::from);

        let entries = self.finish(result)?;
        self.entries = entries;
        Ok(())
    }

    /// Derives the financial fields and inserts one entry, prepending the
    /// canonical row to the cache.
    pub async fn create(&mut self, raw: RawEntry) -> Result<()> {
        self.begin();
        let result = match raw.derive() {
            Ok(payload) => self
                .client
                .boxes_create(&payload)
                .await
                .map_err(LedgerError::from),
            Err(err) => Err(err),
        };

        let entry = self.finish(result)?;
        self.entries.insert(0, entry);
        Ok(())
    }

    /// Replaces the raw fields of an existing entry, rederiving the financial
    /// fields. The identifier and creation timestamp survive.
    pub async fn update(&mut self, id: Uuid, raw: RawEntry) -> Result<()> {
        self.begin();
        let result = match raw.derive() {
            Ok(payload) => self
                .client
                .boxes_update(id, &payload)
                .await
                .map_err(LedgerError::from),
            Err(err) => Err(err),
        };

        let entry = self.finish(result)?;
        if let Some(slot) = self.entries.iter_mut().find(|cached| cached.id == id) {
            *slot = entry;
        }
        Ok(())
    }

    /// Deletes an entry by id and drops it from the cache.
    pub async fn delete(&mut self, id: Uuid) -> Result<()> {
        self.begin();
        let result = self
            .client
            .boxes_delete(id)
            .await
            .map_err(LedgerError::from);

        self.finish(result)?;
        self.entries.retain(|entry| entry.id != id);
        Ok(())
    }

    /// Derives and bulk-inserts a batch; the store applies it all-or-nothing.
    /// The canonical rows are prepended in the store's returned order.
    pub async fn import_many(&mut self, raws: Vec<RawEntry>) -> Result<()> {
        self.begin();
        let result = match raws.iter().map(RawEntry::derive).collect::<Result<Vec<_>>>() {
            Ok(entries) => self
                .client
                .boxes_import(&BoxImport { entries })
                .await
                .map_err(LedgerError::from),
            Err(err) => Err(err),
        };

        let inserted = self.finish(result)?;
        self.entries.splice(0..0, inserted);
        Ok(())
    }

    /// Aggregates the cached entries per box type. Pure read, no I/O; types
    /// with no entries are absent from the result.
    pub fn stats_by_type(&self) -> HashMap<BoxType, TypeStats> {
        let mut stats: HashMap<BoxType, TypeStats> = HashMap::new();
        for entry in &self.entries {
            let slot = stats.entry(entry.box_type).or_default();
            slot.total_cost += entry.total_cost;
            slot.total_margin += entry.total_margin;
            slot.count += entry.number_of_boxes;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::client::Credentials;

    fn cached_entry(box_type: BoxType, number_of_boxes: i64, total_cost: f64, total_margin: f64) -> BoxEntry {
        BoxEntry {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            box_type,
            number_of_boxes,
            total_cost,
            unit_cost: 640.0,
            unit_margin: 0.0,
            total_margin,
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap(),
        }
    }

    fn offline_ledger() -> Ledger {
        let client = Client::new(
            "http://127.0.0.1:9",
            Credentials {
                username: "alice".to_string(),
                password: "password".to_string(),
            },
        )
        .unwrap();
        Ledger::new(client)
    }

    #[test]
    fn stats_accumulate_per_type_and_skip_absent_types() {
        let mut ledger = offline_ledger();
        ledger.entries = vec![
            cached_entry(BoxType::DoubleBox, 5, 100.0, 20.0),
            cached_entry(BoxType::DoubleBox, 2, 50.0, 10.0),
            cached_entry(BoxType::NormalBox, 1, 30.0, 5.0),
        ];

        let stats = ledger.stats_by_type();
        assert_eq!(stats.len(), 2);

        let double = stats[&BoxType::DoubleBox];
        assert_eq!(double.total_cost, 150.0);
        assert_eq!(double.total_margin, 30.0);
        assert_eq!(double.count, 7);

        let normal = stats[&BoxType::NormalBox];
        assert_eq!(normal.total_cost, 30.0);
        assert_eq!(normal.total_margin, 5.0);
        assert_eq!(normal.count, 1);

        assert!(!stats.contains_key(&BoxType::FlushBox));
    }

    #[test]
    fn stats_on_empty_ledger_are_empty() {
        assert!(offline_ledger().stats_by_type().is_empty());
    }

    #[tokio::test]
    async fn invalid_raw_input_fails_before_any_io() {
        let mut ledger = offline_ledger();

        let raw = RawEntry {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            box_type: BoxType::NormalBox,
            number_of_boxes: 0,
            total_cost: 100.0,
        };
        let err = ledger.create(raw).await.unwrap_err();

        // An unreachable server would produce a transport error instead.
        assert!(matches!(err, LedgerError::InvalidEntry(_)));
        assert!(ledger.last_error().unwrap().contains("number of boxes"));
        assert!(!ledger.is_loading());
        assert!(ledger.entries().is_empty());
    }
}
