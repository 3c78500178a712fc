//! Field-level audit records.
//!
//! Changes are captured as before/after pairs per field, either by diffing
//! serialized snapshots (administrative updates) or by ingesting published
//! price-book events. How the records are persisted is the host
//! application's concern; this module only produces and buffers them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use std::sync::RwLock;

use signworks_events::{Event, EventEnvelope};
use signworks_pricebook::PriceBookEvent;

/// One recorded field change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entity: String,
    pub entity_id: String,
    pub field: String,
    pub before: JsonValue,
    pub after: JsonValue,
    pub occurred_at: DateTime<Utc>,
    pub actor: String,
}

/// Diff two serialized snapshots over a fixed field list.
///
/// Fields absent from a snapshot diff as `null`, which also captures
/// set/unset transitions.
pub fn diff_fields(
    entity: &str,
    entity_id: &str,
    before: &JsonValue,
    after: &JsonValue,
    fields: &[&str],
    actor: &str,
    occurred_at: DateTime<Utc>,
) -> Vec<AuditEntry> {
    let mut entries = Vec::new();
    for field in fields {
        let old = before.get(field).cloned().unwrap_or(JsonValue::Null);
        let new = after.get(field).cloned().unwrap_or(JsonValue::Null);
        if old != new {
            entries.push(AuditEntry {
                entity: entity.to_string(),
                entity_id: entity_id.to_string(),
                field: (*field).to_string(),
                before: old,
                after: new,
                occurred_at,
                actor: actor.to_string(),
            });
        }
    }
    entries
}

/// In-memory audit buffer, fed from the event bus.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: AuditEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push(entry);
        }
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Ingest one published price-book envelope.
    ///
    /// Unknown payloads are skipped: the bus is at-least-once and may carry
    /// event types this consumer does not understand yet.
    pub fn ingest_price_book(&self, envelope: &EventEnvelope<JsonValue>) {
        let Ok(event) = serde_json::from_value::<PriceBookEvent>(envelope.payload().clone())
        else {
            return;
        };

        let occurred_at = event.occurred_at();
        let mut push = |entity_id: String, field: &str, before: JsonValue, after: JsonValue| {
            self.record(AuditEntry {
                entity: "price_entry".to_string(),
                entity_id,
                field: field.to_string(),
                before,
                after,
                occurred_at,
                actor: "system".to_string(),
            });
        };

        match &event {
            PriceBookEvent::EntryRecorded { entry, .. } => {
                push(
                    entry.id.to_string(),
                    "cost_per_area",
                    JsonValue::Null,
                    json!(entry.cost_per_area),
                );
            }
            PriceBookEvent::EntryUpdated {
                entry_id, patch, ..
            } => {
                if let Some(cost) = patch.cost_per_area {
                    push(entry_id.to_string(), "cost_per_area", JsonValue::Null, json!(cost));
                }
                if let Some(date) = patch.effective_date {
                    push(entry_id.to_string(), "effective_date", JsonValue::Null, json!(date));
                }
                if let Some(currency) = &patch.currency {
                    push(entry_id.to_string(), "currency", JsonValue::Null, json!(currency));
                }
            }
            PriceBookEvent::EntryPinned { entry_id, .. } => {
                push(entry_id.to_string(), "pinned", json!(false), json!(true));
            }
            PriceBookEvent::EntryUnpinned { entry_id, .. } => {
                push(entry_id.to_string(), "pinned", json!(true), json!(false));
            }
            PriceBookEvent::EntryDeactivated { entry_id, .. } => {
                push(
                    entry_id.to_string(),
                    "lifecycle",
                    json!("active"),
                    json!("deleted"),
                );
            }
            PriceBookEvent::EntryReactivated { entry_id, .. } => {
                push(
                    entry_id.to_string(),
                    "lifecycle",
                    json!("deleted"),
                    json!("active"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_reports_only_changed_fields() {
        let before = json!({ "name": "Banner", "area": 10.0, "category": "Banners" });
        let after = json!({ "name": "Banner", "area": 12.0, "category": "Banners" });

        let entries = diff_fields(
            "product",
            "BAN-1",
            &before,
            &after,
            &["name", "area", "category"],
            "admin",
            Utc::now(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field, "area");
        assert_eq!(entries[0].before, json!(10.0));
        assert_eq!(entries[0].after, json!(12.0));
        assert_eq!(entries[0].actor, "admin");
    }

    #[test]
    fn missing_fields_diff_as_null() {
        let before = json!({});
        let after = json!({ "notes": "restocked" });

        let entries = diff_fields(
            "price_entry",
            "e1",
            &before,
            &after,
            &["notes"],
            "system",
            Utc::now(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].before, JsonValue::Null);
    }

    #[test]
    fn unknown_envelope_payloads_are_skipped() {
        let log = AuditLog::new();
        let envelope = EventEnvelope::new(
            uuid::Uuid::now_v7(),
            "SKU-1",
            "something_else",
            1,
            json!({ "bogus": true }),
        );
        log.ingest_price_book(&envelope);
        assert!(log.entries().is_empty());
    }
}
