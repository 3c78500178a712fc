//! In-memory repository implementations for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use signworks_catalog::{CategoryRule, PriceParams, Product, Tier, TierId};
use signworks_core::{DomainError, DomainResult, PurchaseId, Sku, SupplierId};
use signworks_purchasing::{Purchase, Supplier};

use super::{
    CategoryRuleRepository, ParamsRepository, ProductRepository, PurchaseRepository,
    SupplierRepository, TierRepository,
};

fn poisoned() -> DomainError {
    DomainError::conflict("storage lock poisoned")
}

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<Sku, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn get(&self, sku: &Sku) -> Option<Product> {
        self.products.read().ok()?.get(sku).cloned()
    }

    fn upsert(&self, product: Product) -> DomainResult<()> {
        product.validate()?;
        let mut products = self.products.write().map_err(|_| poisoned())?;
        products.insert(product.sku.clone(), product);
        Ok(())
    }

    fn list(&self) -> Vec<Product> {
        let Ok(products) = self.products.read() else {
            return Vec::new();
        };
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| a.sku.cmp(&b.sku));
        all
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTierRepository {
    tiers: RwLock<HashMap<TierId, Tier>>,
}

impl InMemoryTierRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the full ladder at once.
    pub fn seeded(tiers: impl IntoIterator<Item = Tier>) -> DomainResult<Self> {
        let repo = Self::new();
        for tier in tiers {
            repo.upsert(tier)?;
        }
        Ok(repo)
    }
}

impl TierRepository for InMemoryTierRepository {
    fn get(&self, id: TierId) -> Option<Tier> {
        self.tiers.read().ok()?.get(&id).cloned()
    }

    fn upsert(&self, tier: Tier) -> DomainResult<()> {
        tier.validate()?;
        let mut tiers = self.tiers.write().map_err(|_| poisoned())?;
        tiers.insert(tier.id, tier);
        Ok(())
    }

    fn list(&self) -> Vec<Tier> {
        let Ok(tiers) = self.tiers.read() else {
            return Vec::new();
        };
        let mut all: Vec<Tier> = tiers.values().cloned().collect();
        all.sort_by_key(|t| t.id);
        all
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCategoryRuleRepository {
    rules: RwLock<HashMap<String, CategoryRule>>,
}

impl InMemoryCategoryRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CategoryRuleRepository for InMemoryCategoryRuleRepository {
    fn get(&self, category: &str) -> Option<CategoryRule> {
        self.rules.read().ok()?.get(category).cloned()
    }

    fn upsert(&self, rule: CategoryRule) -> DomainResult<()> {
        rule.validate()?;
        let mut rules = self.rules.write().map_err(|_| poisoned())?;
        rules.insert(rule.category.clone(), rule);
        Ok(())
    }

    fn remove(&self, category: &str) {
        if let Ok(mut rules) = self.rules.write() {
            rules.remove(category);
        }
    }
}

#[derive(Debug)]
pub struct InMemoryParamsRepository {
    params: RwLock<PriceParams>,
}

impl InMemoryParamsRepository {
    pub fn new(initial: PriceParams) -> DomainResult<Self> {
        initial.validate()?;
        Ok(Self {
            params: RwLock::new(initial),
        })
    }
}

impl ParamsRepository for InMemoryParamsRepository {
    fn get(&self) -> PriceParams {
        match self.params.read() {
            Ok(params) => params.clone(),
            // The write path validates, so a poisoned lock still holds a
            // valid record; fall back to it via into_inner semantics.
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set(&self, params: PriceParams) -> DomainResult<()> {
        params.validate()?;
        let mut current = self.params.write().map_err(|_| poisoned())?;
        *current = params;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemorySupplierRepository {
    suppliers: RwLock<HashMap<SupplierId, Supplier>>,
}

impl InMemorySupplierRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SupplierRepository for InMemorySupplierRepository {
    fn get(&self, id: SupplierId) -> Option<Supplier> {
        self.suppliers.read().ok()?.get(&id).cloned()
    }

    fn upsert(&self, supplier: Supplier) -> DomainResult<()> {
        supplier.validate()?;
        let mut suppliers = self.suppliers.write().map_err(|_| poisoned())?;
        suppliers.insert(supplier.id, supplier);
        Ok(())
    }

    fn list(&self) -> Vec<Supplier> {
        let Ok(suppliers) = self.suppliers.read() else {
            return Vec::new();
        };
        suppliers.values().cloned().collect()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPurchaseRepository {
    purchases: RwLock<HashMap<PurchaseId, Purchase>>,
}

impl InMemoryPurchaseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PurchaseRepository for InMemoryPurchaseRepository {
    fn get(&self, id: PurchaseId) -> Option<Purchase> {
        self.purchases.read().ok()?.get(&id).cloned()
    }

    fn find_by_invoice(&self, invoice_no: &str) -> Option<Purchase> {
        self.purchases
            .read()
            .ok()?
            .values()
            .find(|p| p.invoice_no == invoice_no)
            .cloned()
    }

    fn insert(&self, purchase: Purchase) -> DomainResult<()> {
        let mut purchases = self.purchases.write().map_err(|_| poisoned())?;
        if purchases
            .values()
            .any(|p| p.invoice_no == purchase.invoice_no)
        {
            return Err(DomainError::conflict(format!(
                "invoice {} already recorded",
                purchase.invoice_no
            )));
        }
        purchases.insert(purchase.id, purchase);
        Ok(())
    }

    fn list(&self) -> Vec<Purchase> {
        let Ok(purchases) = self.purchases.read() else {
            return Vec::new();
        };
        let mut all: Vec<Purchase> = purchases.values().cloned().collect();
        all.sort_by_key(|p| p.date);
        all
    }
}
