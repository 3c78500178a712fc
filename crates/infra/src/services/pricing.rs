use std::sync::Arc;
use std::time::Duration;

use signworks_catalog::Product;
use signworks_core::Sku;
use signworks_pricing::{
    ComputeContext, PriceBreakdown, PricedRow, Toggles, build_priced_row, compute_price,
};

use crate::cache::TtlCache;
use crate::repository::{
    CategoryRuleRepository, ParamsRepository, ProductRepository, TierRepository,
};
use crate::services::{ServiceError, ServiceResult};

/// Breakdowns go stale quickly when params or costs change, so the cache is
/// a short absorber for repeated UI lookups, not a source of truth.
const CACHE_TTL: Duration = Duration::from_secs(5);

type CacheKey = (Sku, Toggles, Option<u32>);

/// Price computation over current catalog snapshots.
pub struct PricingService {
    products: Arc<dyn ProductRepository>,
    tiers: Arc<dyn TierRepository>,
    rules: Arc<dyn CategoryRuleRepository>,
    params: Arc<dyn ParamsRepository>,
    cache: TtlCache<CacheKey, PriceBreakdown>,
}

impl PricingService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        tiers: Arc<dyn TierRepository>,
        rules: Arc<dyn CategoryRuleRepository>,
        params: Arc<dyn ParamsRepository>,
    ) -> Self {
        Self {
            products,
            tiers,
            rules,
            params,
            cache: TtlCache::new(CACHE_TTL),
        }
    }

    fn active_product(&self, sku: &Sku) -> ServiceResult<Product> {
        match self.products.get(sku) {
            Some(product) if product.is_active() => Ok(product),
            _ => Err(ServiceError::UnknownProduct(sku.clone())),
        }
    }

    /// Compute the breakdown for one SKU with the requested add-ons.
    pub fn price_by_sku(
        &self,
        sku: &Sku,
        toggles: Toggles,
        sheets_override: Option<u32>,
    ) -> ServiceResult<PriceBreakdown> {
        let key = (sku.clone(), toggles, sheets_override);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let product = self.active_product(sku)?;
        let tier = self
            .tiers
            .get(product.active_tier)
            .ok_or(ServiceError::UnknownTier(product.active_tier))?;
        let rule = self.rules.get(&product.category);
        let params = self.params.get();

        let breakdown = compute_price(ComputeContext {
            product: &product,
            tier: &tier,
            params: &params,
            category_rule: rule.as_ref(),
            toggles,
            sheets_override,
        });

        self.cache.set(key, breakdown.clone());
        Ok(breakdown)
    }

    /// Pricing summaries for every active product, for listing/export.
    ///
    /// Each row is independent; a product referencing a missing tier fails
    /// the whole call because the catalog itself is inconsistent.
    pub fn priced_rows(&self) -> ServiceResult<Vec<PricedRow>> {
        let tiers = self.tiers.list();
        let params = self.params.get();

        self.products
            .list()
            .into_iter()
            .filter(|p| p.is_active())
            .map(|product| {
                let rule = self.rules.get(&product.category);
                build_priced_row(&product, &tiers, &params, rule.as_ref())
                    .map_err(ServiceError::Domain)
            })
            .collect()
    }

    /// Drop cached breakdowns (e.g. after a params or catalog mutation).
    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }
}
