//! Application services: orchestration over the pure domain.
//!
//! Services own the load → decide → append → publish cycle for the price
//! books and the join of catalog snapshots for price computation. They
//! translate between callers and domain errors but add no business rules of
//! their own.

mod price_book;
mod pricing;
mod purchase;

pub use price_book::{CreateEntryRequest, PriceBookService};
pub use pricing::PricingService;
pub use purchase::PurchaseService;

use thiserror::Error;

use signworks_catalog::TierId;
use signworks_core::{DomainError, Sku, SupplierId};

use crate::event_store::EventStoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the application services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced product does not exist or is soft-deleted.
    #[error("product {0} not found or inactive")]
    UnknownProduct(Sku),

    /// The referenced supplier does not exist or is soft-deleted.
    #[error("supplier {0} not found or inactive")]
    UnknownSupplier(SupplierId),

    /// The product references a tier the catalog does not hold.
    #[error("tier {0} is not configured")]
    UnknownTier(TierId),

    /// Deterministic domain failure (validation, invariant, conflict).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Event store failure (concurrency, invalid append).
    #[error(transparent)]
    Store(#[from] EventStoreError),

    /// Publication failed after a successful append. The events are
    /// persisted; republishing is safe.
    #[error("event publication failed: {0}")]
    Publish(String),

    /// A stored event payload no longer decodes into the domain event type.
    #[error("failed to decode stored event: {0}")]
    Decode(String),
}
