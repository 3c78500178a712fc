use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use signworks_core::{Aggregate, AggregateRoot, DomainError, EntryId, Lifecycle, Sku};
use signworks_events::Event;

use crate::entry::{EntryPatch, NewPriceEntry, PriceEntry};

/// Aggregate root: one product's price book.
///
/// Holds all cost entries for a single SKU and enforces the pin invariant.
/// Any multi-step transition (pin over an existing pin, deactivating the
/// pinned entry) is expressed as one event batch from `handle`, which the
/// calling layer appends atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBook {
    sku: Sku,
    entries: Vec<PriceEntry>,
    version: u64,
}

impl PriceBook {
    /// Create an empty book for rehydration.
    pub fn empty(sku: Sku) -> Self {
        Self {
            sku,
            entries: Vec::new(),
            version: 0,
        }
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// All entries in recording order, including deactivated ones.
    pub fn entries(&self) -> &[PriceEntry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&PriceEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Active entries in recording order.
    pub fn active_entries(&self) -> impl Iterator<Item = &PriceEntry> {
        self.entries.iter().filter(|e| e.is_active())
    }

    /// The pinned entry, if any. Active entries only.
    pub fn pinned_entry(&self) -> Option<&PriceEntry> {
        self.active_entries().find(|e| e.pinned)
    }

    /// Resolve the product's "current" entry.
    ///
    /// Pinned wins regardless of date. Otherwise the latest effective date
    /// wins, ties broken by most recent recording order. Future-dated
    /// entries are not filtered out here; "current" is a convention of how
    /// entries are created.
    pub fn resolve_current(&self) -> Option<&PriceEntry> {
        if let Some(pinned) = self.pinned_entry() {
            return Some(pinned);
        }
        let mut best: Option<&PriceEntry> = None;
        for entry in self.active_entries() {
            match best {
                // `>=` so a later-recorded entry wins an effective-date tie.
                Some(current) if entry.effective_date >= current.effective_date => {
                    best = Some(entry);
                }
                None => best = Some(entry),
                _ => {}
            }
        }
        best
    }

    pub fn resolve_current_cost(&self) -> Option<f64> {
        self.resolve_current().map(|e| e.cost_per_area)
    }
}

impl AggregateRoot for PriceBook {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: record a new cost entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub sku: Sku,
    pub entry: NewPriceEntry,
    pub occurred_at: DateTime<Utc>,
}

/// Command: patch an existing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntry {
    pub sku: Sku,
    pub entry_id: EntryId,
    pub patch: EntryPatch,
    pub occurred_at: DateTime<Utc>,
}

/// Command: pin an entry as the authoritative cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinEntry {
    pub sku: Sku,
    pub entry_id: EntryId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: unpin an entry (no-op when it is not the pinned one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpinEntry {
    pub sku: Sku,
    pub entry_id: EntryId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: clear any pin for the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpinAll {
    pub sku: Sku,
    pub occurred_at: DateTime<Utc>,
}

/// Command: deactivate (soft-delete) an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeactivateEntry {
    pub sku: Sku,
    pub entry_id: EntryId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: bring a deactivated entry back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactivateEntry {
    pub sku: Sku,
    pub entry_id: EntryId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PriceBookCommand {
    RecordEntry(RecordEntry),
    UpdateEntry(UpdateEntry),
    PinEntry(PinEntry),
    UnpinEntry(UnpinEntry),
    UnpinAll(UnpinAll),
    DeactivateEntry(DeactivateEntry),
    ReactivateEntry(ReactivateEntry),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PriceBookEvent {
    EntryRecorded {
        sku: Sku,
        entry: NewPriceEntry,
        occurred_at: DateTime<Utc>,
    },
    EntryUpdated {
        sku: Sku,
        entry_id: EntryId,
        patch: EntryPatch,
        occurred_at: DateTime<Utc>,
    },
    EntryPinned {
        sku: Sku,
        entry_id: EntryId,
        occurred_at: DateTime<Utc>,
    },
    EntryUnpinned {
        sku: Sku,
        entry_id: EntryId,
        occurred_at: DateTime<Utc>,
    },
    EntryDeactivated {
        sku: Sku,
        entry_id: EntryId,
        occurred_at: DateTime<Utc>,
    },
    EntryReactivated {
        sku: Sku,
        entry_id: EntryId,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for PriceBookEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PriceBookEvent::EntryRecorded { .. } => "pricebook.entry.recorded",
            PriceBookEvent::EntryUpdated { .. } => "pricebook.entry.updated",
            PriceBookEvent::EntryPinned { .. } => "pricebook.entry.pinned",
            PriceBookEvent::EntryUnpinned { .. } => "pricebook.entry.unpinned",
            PriceBookEvent::EntryDeactivated { .. } => "pricebook.entry.deactivated",
            PriceBookEvent::EntryReactivated { .. } => "pricebook.entry.reactivated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PriceBookEvent::EntryRecorded { occurred_at, .. }
            | PriceBookEvent::EntryUpdated { occurred_at, .. }
            | PriceBookEvent::EntryPinned { occurred_at, .. }
            | PriceBookEvent::EntryUnpinned { occurred_at, .. }
            | PriceBookEvent::EntryDeactivated { occurred_at, .. }
            | PriceBookEvent::EntryReactivated { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Aggregate for PriceBook {
    type Command = PriceBookCommand;
    type Event = PriceBookEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PriceBookEvent::EntryRecorded {
                entry, occurred_at, ..
            } => {
                self.entries.push(PriceEntry {
                    id: entry.id,
                    sku: self.sku.clone(),
                    supplier_id: entry.supplier_id,
                    source_line_id: entry.source_line_id,
                    effective_date: entry.effective_date,
                    cost_per_area: entry.cost_per_area,
                    currency: entry.currency.clone(),
                    // Pinning is evented separately; the request flag never
                    // lands in state directly.
                    pinned: false,
                    lifecycle: Lifecycle::Active,
                    notes: entry.notes.clone(),
                    recorded_at: *occurred_at,
                });
            }
            PriceBookEvent::EntryUpdated {
                entry_id, patch, ..
            } => {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.id == *entry_id) {
                    if let Some(supplier_id) = patch.supplier_id {
                        entry.supplier_id = supplier_id;
                    }
                    if let Some(date) = patch.effective_date {
                        entry.effective_date = date;
                    }
                    if let Some(cost) = patch.cost_per_area {
                        entry.cost_per_area = cost;
                    }
                    if let Some(currency) = &patch.currency {
                        entry.currency = currency.clone();
                    }
                    if let Some(notes) = &patch.notes {
                        entry.notes = notes.clone();
                    }
                }
            }
            PriceBookEvent::EntryPinned { entry_id, .. } => {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.id == *entry_id) {
                    entry.pinned = true;
                }
            }
            PriceBookEvent::EntryUnpinned { entry_id, .. } => {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.id == *entry_id) {
                    entry.pinned = false;
                }
            }
            PriceBookEvent::EntryDeactivated { entry_id, .. } => {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.id == *entry_id) {
                    entry.lifecycle = Lifecycle::Deleted;
                }
            }
            PriceBookEvent::EntryReactivated { entry_id, .. } => {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.id == *entry_id) {
                    entry.lifecycle = Lifecycle::Active;
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PriceBookCommand::RecordEntry(cmd) => self.handle_record(cmd),
            PriceBookCommand::UpdateEntry(cmd) => self.handle_update(cmd),
            PriceBookCommand::PinEntry(cmd) => self.handle_pin(cmd),
            PriceBookCommand::UnpinEntry(cmd) => self.handle_unpin(cmd),
            PriceBookCommand::UnpinAll(cmd) => self.handle_unpin_all(cmd),
            PriceBookCommand::DeactivateEntry(cmd) => self.handle_deactivate(cmd),
            PriceBookCommand::ReactivateEntry(cmd) => self.handle_reactivate(cmd),
        }
    }
}

impl PriceBook {
    fn ensure_sku(&self, sku: &Sku) -> Result<(), DomainError> {
        if &self.sku != sku {
            return Err(DomainError::invariant(format!(
                "entry does not belong to product {}",
                self.sku
            )));
        }
        Ok(())
    }

    /// Active entry lookup shared by the targeted commands. Unknown or
    /// deactivated targets are a not-found, never a silent no-op.
    fn active_entry(&self, id: EntryId) -> Result<&PriceEntry, DomainError> {
        self.entry(id)
            .filter(|e| e.is_active())
            .ok_or(DomainError::NotFound)
    }

    fn handle_record(&self, cmd: &RecordEntry) -> Result<Vec<PriceBookEvent>, DomainError> {
        self.ensure_sku(&cmd.sku)?;
        cmd.entry.validate(cmd.occurred_at)?;

        if self.entry(cmd.entry.id).is_some() {
            return Err(DomainError::conflict("entry already recorded"));
        }

        let mut events = vec![PriceBookEvent::EntryRecorded {
            sku: cmd.sku.clone(),
            entry: cmd.entry.clone(),
            occurred_at: cmd.occurred_at,
        }];

        if cmd.entry.pinned {
            if let Some(current) = self.pinned_entry() {
                events.push(PriceBookEvent::EntryUnpinned {
                    sku: cmd.sku.clone(),
                    entry_id: current.id,
                    occurred_at: cmd.occurred_at,
                });
            }
            events.push(PriceBookEvent::EntryPinned {
                sku: cmd.sku.clone(),
                entry_id: cmd.entry.id,
                occurred_at: cmd.occurred_at,
            });
        }

        Ok(events)
    }

    fn handle_update(&self, cmd: &UpdateEntry) -> Result<Vec<PriceBookEvent>, DomainError> {
        self.ensure_sku(&cmd.sku)?;
        self.active_entry(cmd.entry_id)?;
        cmd.patch.validate(cmd.occurred_at)?;

        if cmd.patch.is_empty() {
            return Ok(vec![]);
        }

        Ok(vec![PriceBookEvent::EntryUpdated {
            sku: cmd.sku.clone(),
            entry_id: cmd.entry_id,
            patch: cmd.patch.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_pin(&self, cmd: &PinEntry) -> Result<Vec<PriceBookEvent>, DomainError> {
        self.ensure_sku(&cmd.sku)?;
        let target = self.active_entry(cmd.entry_id)?;

        if target.pinned {
            return Ok(vec![]);
        }

        let mut events = Vec::with_capacity(2);
        if let Some(current) = self.pinned_entry() {
            events.push(PriceBookEvent::EntryUnpinned {
                sku: cmd.sku.clone(),
                entry_id: current.id,
                occurred_at: cmd.occurred_at,
            });
        }
        events.push(PriceBookEvent::EntryPinned {
            sku: cmd.sku.clone(),
            entry_id: cmd.entry_id,
            occurred_at: cmd.occurred_at,
        });
        Ok(events)
    }

    fn handle_unpin(&self, cmd: &UnpinEntry) -> Result<Vec<PriceBookEvent>, DomainError> {
        self.ensure_sku(&cmd.sku)?;
        let target = self.active_entry(cmd.entry_id)?;

        if !target.pinned {
            return Ok(vec![]);
        }

        Ok(vec![PriceBookEvent::EntryUnpinned {
            sku: cmd.sku.clone(),
            entry_id: cmd.entry_id,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_unpin_all(&self, cmd: &UnpinAll) -> Result<Vec<PriceBookEvent>, DomainError> {
        self.ensure_sku(&cmd.sku)?;

        Ok(self
            .pinned_entry()
            .map(|entry| {
                vec![PriceBookEvent::EntryUnpinned {
                    sku: cmd.sku.clone(),
                    entry_id: entry.id,
                    occurred_at: cmd.occurred_at,
                }]
            })
            .unwrap_or_default())
    }

    fn handle_deactivate(&self, cmd: &DeactivateEntry) -> Result<Vec<PriceBookEvent>, DomainError> {
        self.ensure_sku(&cmd.sku)?;
        let target = self.active_entry(cmd.entry_id)?;

        let mut events = Vec::with_capacity(2);
        // Deactivating the pinned entry clears the product's pin linkage in
        // the same batch.
        if target.pinned {
            events.push(PriceBookEvent::EntryUnpinned {
                sku: cmd.sku.clone(),
                entry_id: cmd.entry_id,
                occurred_at: cmd.occurred_at,
            });
        }
        events.push(PriceBookEvent::EntryDeactivated {
            sku: cmd.sku.clone(),
            entry_id: cmd.entry_id,
            occurred_at: cmd.occurred_at,
        });
        Ok(events)
    }

    fn handle_reactivate(&self, cmd: &ReactivateEntry) -> Result<Vec<PriceBookEvent>, DomainError> {
        self.ensure_sku(&cmd.sku)?;
        let entry = self.entry(cmd.entry_id).ok_or(DomainError::NotFound)?;

        if entry.is_active() {
            return Err(DomainError::conflict("entry is already active"));
        }

        Ok(vec![PriceBookEvent::EntryReactivated {
            sku: cmd.sku.clone(),
            entry_id: cmd.entry_id,
            occurred_at: cmd.occurred_at,
        }])
    }
}
