//! Repositories for catalog entities, suppliers and purchases.
//!
//! Trait contracts plus in-memory implementations. The domain crates never
//! see these; services fetch consistent snapshots here and pass plain data
//! down into the pure computation core.

mod in_memory;

pub use in_memory::{
    InMemoryCategoryRuleRepository, InMemoryParamsRepository, InMemoryProductRepository,
    InMemoryPurchaseRepository, InMemorySupplierRepository, InMemoryTierRepository,
};

use signworks_catalog::{CategoryRule, PriceParams, Product, Tier, TierId};
use signworks_core::{DomainResult, PurchaseId, Sku, SupplierId};
use signworks_purchasing::{Purchase, Supplier};

/// Product storage, keyed by SKU.
pub trait ProductRepository: Send + Sync {
    fn get(&self, sku: &Sku) -> Option<Product>;
    /// Insert or replace, validating the product first.
    fn upsert(&self, product: Product) -> DomainResult<()>;
    fn list(&self) -> Vec<Product>;
}

/// Tier storage. The tier ladder is small and fixed (ids 1..=5).
pub trait TierRepository: Send + Sync {
    fn get(&self, id: TierId) -> Option<Tier>;
    fn upsert(&self, tier: Tier) -> DomainResult<()>;
    fn list(&self) -> Vec<Tier>;
}

/// Category rule storage. Keying by category name guarantees at most one
/// rule per category.
pub trait CategoryRuleRepository: Send + Sync {
    fn get(&self, category: &str) -> Option<CategoryRule>;
    fn upsert(&self, rule: CategoryRule) -> DomainResult<()>;
    fn remove(&self, category: &str);
}

/// The process-wide pricing parameters record.
pub trait ParamsRepository: Send + Sync {
    fn get(&self) -> PriceParams;
    fn set(&self, params: PriceParams) -> DomainResult<()>;
}

/// Supplier storage.
pub trait SupplierRepository: Send + Sync {
    fn get(&self, id: SupplierId) -> Option<Supplier>;
    fn upsert(&self, supplier: Supplier) -> DomainResult<()>;
    fn list(&self) -> Vec<Supplier>;
}

/// Recorded purchases.
pub trait PurchaseRepository: Send + Sync {
    fn get(&self, id: PurchaseId) -> Option<Purchase>;
    fn find_by_invoice(&self, invoice_no: &str) -> Option<Purchase>;
    fn insert(&self, purchase: Purchase) -> DomainResult<()>;
    fn list(&self) -> Vec<Purchase>;
}
