use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use signworks_core::{Aggregate, AggregateRoot, EntryId, ExpectedVersion, LineId, Sku, SupplierId};
use signworks_events::{EventBus, EventEnvelope};
use signworks_pricebook::{
    DeactivateEntry, EntryPatch, NewPriceEntry, PinEntry, PriceBook, PriceBookCommand,
    PriceBookEvent, PriceEntry, ReactivateEntry, RecordEntry, UnpinAll, UnpinEntry, UpdateEntry,
};

use crate::event_store::{EventStore, UncommittedEvent};
use crate::repository::ProductRepository;
use crate::services::{ServiceError, ServiceResult};

const AGGREGATE_TYPE: &str = "price_book";

/// Fields for a manually created price entry. Currency is normalized
/// (trimmed, upper-cased) before it reaches the domain.
#[derive(Debug, Clone)]
pub struct CreateEntryRequest {
    pub supplier_id: Option<SupplierId>,
    pub source_line_id: Option<LineId>,
    pub effective_date: DateTime<Utc>,
    pub cost_per_area: f64,
    pub currency: String,
    pub pinned: bool,
    pub notes: Option<String>,
}

/// Price book orchestration: one stream per product SKU.
///
/// Every mutation loads the stream, rehydrates the aggregate, handles the
/// command and appends the resulting batch with an exact version
/// expectation. Two concurrent pinners therefore serialize at the store: the
/// loser fails its version check and must retry against fresh state, so no
/// committed state ever holds two pins.
pub struct PriceBookService<B> {
    store: Arc<dyn EventStore>,
    bus: B,
    products: Arc<dyn ProductRepository>,
}

impl<B> PriceBookService<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(store: Arc<dyn EventStore>, bus: B, products: Arc<dyn ProductRepository>) -> Self {
        Self {
            store,
            bus,
            products,
        }
    }

    fn require_active_product(&self, sku: &Sku) -> ServiceResult<()> {
        match self.products.get(sku) {
            Some(product) if product.is_active() => Ok(()),
            _ => Err(ServiceError::UnknownProduct(sku.clone())),
        }
    }

    /// Rehydrate a product's book from its stream.
    fn load_book(&self, sku: &Sku) -> ServiceResult<PriceBook> {
        let stored = self.store.load_stream(sku.as_str())?;
        let mut book = PriceBook::empty(sku.clone());
        for event in stored {
            let payload: PriceBookEvent = serde_json::from_value(event.payload)
                .map_err(|e| ServiceError::Decode(e.to_string()))?;
            book.apply(&payload);
        }
        Ok(book)
    }

    /// Run one command through the full cycle and return the updated book.
    fn execute(&self, sku: &Sku, command: PriceBookCommand) -> ServiceResult<PriceBook> {
        let mut book = self.load_book(sku)?;
        let events = book.handle(&command)?;
        if events.is_empty() {
            return Ok(book);
        }

        let uncommitted = events
            .iter()
            .map(|event| {
                UncommittedEvent::from_typed(sku.as_str(), AGGREGATE_TYPE, Uuid::now_v7(), event)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let stored = self
            .store
            .append(uncommitted, ExpectedVersion::Exact(book.version()))?;

        for event in &stored {
            self.bus
                .publish(event.to_envelope())
                .map_err(|e| ServiceError::Publish(format!("{e:?}")))?;
        }

        for event in &events {
            book.apply(event);
        }
        tracing::debug!(sku = %sku, events = events.len(), "price book updated");
        Ok(book)
    }

    fn normalize_currency(currency: &str) -> String {
        currency.trim().to_uppercase()
    }

    /// Record a new entry; returns the stored entry.
    pub fn create_entry(
        &self,
        sku: &Sku,
        request: CreateEntryRequest,
    ) -> ServiceResult<PriceEntry> {
        self.require_active_product(sku)?;

        let entry = NewPriceEntry {
            id: EntryId::new(),
            supplier_id: request.supplier_id,
            source_line_id: request.source_line_id,
            effective_date: request.effective_date,
            cost_per_area: request.cost_per_area,
            currency: Self::normalize_currency(&request.currency),
            pinned: request.pinned,
            notes: request.notes.map(|n| n.trim().to_string()),
        };
        let entry_id = entry.id;

        let book = self.execute(
            sku,
            PriceBookCommand::RecordEntry(RecordEntry {
                sku: sku.clone(),
                entry,
                occurred_at: Utc::now(),
            }),
        )?;

        tracing::info!(sku = %sku, entry = %entry_id, "price entry recorded");
        book.entry(entry_id)
            .cloned()
            .ok_or_else(|| ServiceError::Decode("recorded entry missing from book".to_string()))
    }

    pub fn update_entry(
        &self,
        sku: &Sku,
        entry_id: EntryId,
        mut patch: EntryPatch,
    ) -> ServiceResult<PriceEntry> {
        self.require_active_product(sku)?;

        if let Some(currency) = &patch.currency {
            patch.currency = Some(Self::normalize_currency(currency));
        }

        let book = self.execute(
            sku,
            PriceBookCommand::UpdateEntry(UpdateEntry {
                sku: sku.clone(),
                entry_id,
                patch,
                occurred_at: Utc::now(),
            }),
        )?;

        book.entry(entry_id)
            .cloned()
            .ok_or(ServiceError::Domain(signworks_core::DomainError::NotFound))
    }

    /// Pin an entry as the authoritative cost, clearing any previous pin in
    /// the same atomic batch.
    pub fn pin_entry(&self, sku: &Sku, entry_id: EntryId) -> ServiceResult<()> {
        self.require_active_product(sku)?;
        self.execute(
            sku,
            PriceBookCommand::PinEntry(PinEntry {
                sku: sku.clone(),
                entry_id,
                occurred_at: Utc::now(),
            }),
        )?;
        tracing::info!(sku = %sku, entry = %entry_id, "price entry pinned");
        Ok(())
    }

    pub fn unpin_entry(&self, sku: &Sku, entry_id: EntryId) -> ServiceResult<()> {
        self.require_active_product(sku)?;
        self.execute(
            sku,
            PriceBookCommand::UnpinEntry(UnpinEntry {
                sku: sku.clone(),
                entry_id,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(())
    }

    pub fn unpin_all(&self, sku: &Sku) -> ServiceResult<()> {
        self.require_active_product(sku)?;
        self.execute(
            sku,
            PriceBookCommand::UnpinAll(UnpinAll {
                sku: sku.clone(),
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(())
    }

    pub fn deactivate_entry(&self, sku: &Sku, entry_id: EntryId) -> ServiceResult<()> {
        self.require_active_product(sku)?;
        self.execute(
            sku,
            PriceBookCommand::DeactivateEntry(DeactivateEntry {
                sku: sku.clone(),
                entry_id,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(())
    }

    pub fn reactivate_entry(&self, sku: &Sku, entry_id: EntryId) -> ServiceResult<()> {
        self.require_active_product(sku)?;
        self.execute(
            sku,
            PriceBookCommand::ReactivateEntry(ReactivateEntry {
                sku: sku.clone(),
                entry_id,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(())
    }

    /// Active entries, newest effective date first, recording order breaking
    /// ties.
    pub fn list_by_product(&self, sku: &Sku) -> ServiceResult<Vec<PriceEntry>> {
        self.require_active_product(sku)?;
        let book = self.load_book(sku)?;
        let mut entries: Vec<(usize, PriceEntry)> = book
            .active_entries()
            .cloned()
            .enumerate()
            .collect();
        entries.sort_by(|(ia, a), (ib, b)| {
            b.effective_date
                .cmp(&a.effective_date)
                .then_with(|| ib.cmp(ia))
        });
        Ok(entries.into_iter().map(|(_, e)| e).collect())
    }

    /// The product's current entry: pinned first, else latest effective date.
    pub fn resolve_current(&self, sku: &Sku) -> ServiceResult<Option<PriceEntry>> {
        self.require_active_product(sku)?;
        Ok(self.load_book(sku)?.resolve_current().cloned())
    }

    /// The current cost per unit area, when any entry exists.
    pub fn resolve_current_cost(&self, sku: &Sku) -> ServiceResult<Option<f64>> {
        self.require_active_product(sku)?;
        Ok(self.load_book(sku)?.resolve_current_cost())
    }
}
