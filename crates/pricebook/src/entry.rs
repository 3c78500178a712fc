use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use signworks_core::{
    DomainError, DomainResult, Entity, EntryId, LineId, Lifecycle, Sku, SupplierId,
};

/// One historical cost observation for a product.
///
/// Entries are append-mostly: created from purchase lines or manual input,
/// deactivated rather than hard-deleted. `recorded_at` is the business time
/// of recording; ordering within a book is the recording order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub id: EntryId,
    pub sku: Sku,
    pub supplier_id: Option<SupplierId>,
    /// The purchase line this entry was generated from, if any. Manual
    /// entries have none.
    pub source_line_id: Option<LineId>,
    pub effective_date: DateTime<Utc>,
    pub cost_per_area: f64,
    pub currency: String,
    pub pinned: bool,
    pub lifecycle: Lifecycle,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl PriceEntry {
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }
}

impl Entity for PriceEntry {
    type Id = EntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Fields for recording a new entry. The id is assigned by the caller so
/// commands stay deterministic and replayable.
///
/// `pinned` is a request: the book translates it into explicit pin events;
/// it never lands in state directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPriceEntry {
    pub id: EntryId,
    pub supplier_id: Option<SupplierId>,
    pub source_line_id: Option<LineId>,
    pub effective_date: DateTime<Utc>,
    pub cost_per_area: f64,
    pub currency: String,
    pub pinned: bool,
    pub notes: Option<String>,
}

impl NewPriceEntry {
    /// Validate against business rules. `now` is the command's business
    /// time, so the check stays deterministic.
    pub fn validate(&self, now: DateTime<Utc>) -> DomainResult<()> {
        validate_cost(self.cost_per_area)?;
        validate_currency(&self.currency)?;
        validate_effective_date(self.effective_date, now)?;
        Ok(())
    }
}

/// Partial update of an entry. Validation covers only the present fields and
/// runs before any mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    pub supplier_id: Option<Option<SupplierId>>,
    pub effective_date: Option<DateTime<Utc>>,
    pub cost_per_area: Option<f64>,
    pub currency: Option<String>,
    pub notes: Option<Option<String>>,
}

impl EntryPatch {
    pub fn validate(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(cost) = self.cost_per_area {
            validate_cost(cost)?;
        }
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        if let Some(date) = self.effective_date {
            validate_effective_date(date, now)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.supplier_id.is_none()
            && self.effective_date.is_none()
            && self.cost_per_area.is_none()
            && self.currency.is_none()
            && self.notes.is_none()
    }
}

fn validate_cost(cost: f64) -> DomainResult<()> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(DomainError::validation(
            "cost_per_area must be non-negative",
        ));
    }
    Ok(())
}

fn validate_currency(currency: &str) -> DomainResult<()> {
    if currency.trim().is_empty() {
        return Err(DomainError::validation("currency must not be empty"));
    }
    Ok(())
}

fn validate_effective_date(date: DateTime<Utc>, now: DateTime<Utc>) -> DomainResult<()> {
    if date > now {
        return Err(DomainError::validation(
            "effective_date must not be in the future",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_entry(now: DateTime<Utc>) -> NewPriceEntry {
        NewPriceEntry {
            id: EntryId::new(),
            supplier_id: None,
            source_line_id: None,
            effective_date: now - Duration::days(1),
            cost_per_area: 0.42,
            currency: "USD".to_string(),
            pinned: false,
            notes: None,
        }
    }

    #[test]
    fn valid_entry_passes() {
        let now = Utc::now();
        assert!(new_entry(now).validate(now).is_ok());
    }

    #[test]
    fn negative_cost_is_rejected() {
        let now = Utc::now();
        let mut e = new_entry(now);
        e.cost_per_area = -0.01;
        assert!(matches!(
            e.validate(now),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn empty_currency_is_rejected() {
        let now = Utc::now();
        let mut e = new_entry(now);
        e.currency = "  ".to_string();
        assert!(e.validate(now).is_err());
    }

    #[test]
    fn future_effective_date_is_rejected() {
        let now = Utc::now();
        let mut e = new_entry(now);
        e.effective_date = now + Duration::hours(1);
        assert!(e.validate(now).is_err());
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let now = Utc::now();
        let patch = EntryPatch {
            cost_per_area: Some(1.5),
            ..EntryPatch::default()
        };
        assert!(patch.validate(now).is_ok());

        let patch = EntryPatch {
            currency: Some("".to_string()),
            ..EntryPatch::default()
        };
        assert!(patch.validate(now).is_err());

        assert!(EntryPatch::default().is_empty());
    }
}
