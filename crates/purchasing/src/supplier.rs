use serde::{Deserialize, Serialize};

use signworks_core::{DomainError, DomainResult, Entity, Lifecycle, SupplierId};

/// A material supplier. Referenced by purchases and price-book entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub lifecycle: Lifecycle,
}

impl Supplier {
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("supplier: name must not be empty"));
        }
        Ok(())
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
