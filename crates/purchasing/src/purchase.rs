use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use signworks_core::{DomainError, DomainResult, Entity, Lifecycle, PurchaseId, SupplierId};

use crate::line::{NewPurchaseLine, PurchaseLine};

/// Input for recording a purchase with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub invoice_no: String,
    pub supplier_id: SupplierId,
    pub date: DateTime<Utc>,
    pub currency: String,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub notes: Option<String>,
    pub lines: Vec<NewPurchaseLine>,
}

impl NewPurchase {
    /// Validate header and every line before anything is stored. Line
    /// failures are prefixed with their 1-based position so callers can
    /// point at the offending row.
    pub fn validate(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.invoice_no.trim().is_empty() {
            return Err(DomainError::validation("invoice_no must not be empty"));
        }
        if self.date > now {
            return Err(DomainError::validation("date must not be in the future"));
        }
        if self.currency.trim().is_empty() {
            return Err(DomainError::validation("currency must not be empty"));
        }
        for (name, value) in [
            ("subtotal", self.subtotal),
            ("tax", self.tax),
            ("shipping", self.shipping),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::validation(format!(
                    "{name} must be non-negative"
                )));
            }
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation("purchase must have at least one line"));
        }
        for (idx, line) in self.lines.iter().enumerate() {
            line.validate().map_err(|e| match e {
                DomainError::Validation(msg) => {
                    DomainError::validation(format!("line {}: {msg}", idx + 1))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

/// A recorded purchase with derived lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub invoice_no: String,
    pub supplier_id: SupplierId,
    pub date: DateTime<Utc>,
    pub currency: String,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub notes: Option<String>,
    pub lifecycle: Lifecycle,
    pub lines: Vec<PurchaseLine>,
}

impl Entity for Purchase {
    type Id = PurchaseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
