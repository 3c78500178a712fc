//! Per-product pricing summaries for listing and export collaborators.

use serde::{Deserialize, Serialize};

use signworks_catalog::{CategoryRule, PriceParams, Product, Tier, TierId};
use signworks_core::{DomainError, DomainResult};

use crate::compute::{ComputeContext, PriceBreakdown, Toggles, compute_price};
use crate::precedence::FieldSource;

/// A margin below this fraction of the final price flags the row for review.
const LOW_MARGIN_THRESHOLD: f64 = 0.15;

/// Where the row's final price ultimately came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "tier")]
pub enum FinalSource {
    Tier(TierId),
    ProductOverride,
    CategoryOverride,
}

/// Override provenance surfaced on the row when any field is overridden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverrideInfo {
    pub multiplier: f64,
    pub layer_count: u32,
    pub source: FieldSource,
}

/// Final price preview under one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPreview {
    pub tier: TierId,
    pub final_price: f64,
}

/// One product's pricing summary: the active breakdown, what the price would
/// be under each tier, and the sell margin against acquisition cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedRow {
    pub product: Product,
    pub breakdown: PriceBreakdown,
    pub override_info: Option<OverrideInfo>,
    pub tier_previews: Vec<TierPreview>,
    pub final_source: FinalSource,
    pub final_price: f64,
    pub margin: f64,
    pub low_margin: bool,
}

/// Build the pricing summary for one product.
///
/// `tiers` must contain the product's active tier; a missing tier is a
/// `NotFound` (the catalog is inconsistent, not the product invalid). The
/// add-on toggles mirror the product's own feature flags, matching what the
/// listing screens show.
pub fn build_priced_row(
    product: &Product,
    tiers: &[Tier],
    params: &PriceParams,
    category_rule: Option<&CategoryRule>,
) -> DomainResult<PricedRow> {
    let active_tier = tiers
        .iter()
        .find(|t| t.id == product.active_tier)
        .ok_or(DomainError::NotFound)?;

    let toggles = Toggles {
        ink: product.ink_enabled,
        lamination: product.lamination_enabled,
        cut: product.cut_enabled,
    };

    let breakdown = compute_price(ComputeContext {
        product,
        tier: active_tier,
        params,
        category_rule,
        toggles,
        sheets_override: None,
    });

    let override_info = match breakdown.effective.multiplier_source {
        FieldSource::Tier => None,
        source => Some(OverrideInfo {
            multiplier: breakdown.effective.multiplier,
            layer_count: breakdown.effective.layer_count,
            source,
        }),
    };

    let final_source = match breakdown.effective.multiplier_source {
        FieldSource::Product => FinalSource::ProductOverride,
        FieldSource::Category => FinalSource::CategoryOverride,
        FieldSource::Tier => FinalSource::Tier(product.active_tier),
    };

    let tier_previews = tiers
        .iter()
        .map(|t| TierPreview {
            tier: t.id,
            final_price: compute_price(ComputeContext {
                product,
                tier: t,
                params,
                category_rule,
                toggles,
                sheets_override: None,
            })
            .final_price,
        })
        .collect();

    let final_price = breakdown.final_price;
    let margin = if final_price > 0.0 {
        (final_price - product.cost_per_area * product.area) / final_price
    } else {
        0.0
    };

    Ok(PricedRow {
        product: product.clone(),
        breakdown,
        override_info,
        tier_previews,
        final_source,
        final_price,
        margin,
        low_margin: margin < LOW_MARGIN_THRESHOLD,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use signworks_catalog::{CostMethod, SellMode};
    use signworks_core::{Lifecycle, Sku};

    fn tiers() -> Vec<Tier> {
        TierId::all()
            .map(|id| Tier {
                id,
                multiplier: 1.0 + f64::from(id.get()),
                layer_count: 1,
            })
            .collect()
    }

    fn params() -> PriceParams {
        PriceParams {
            ink_price: 0.5,
            lamination_price: 0.2,
            cut_price: 1.0,
            cut_factor: 0.3,
            rounding_step: 0.05,
            default_tier: TierId::new(1).unwrap(),
            cost_method: CostMethod::Latest,
        }
    }

    fn product() -> Product {
        Product {
            sku: Sku::new("BAN-1").unwrap(),
            name: "Banner".to_string(),
            category: "Banners".to_string(),
            supplier_id: None,
            cost_per_area: 0.5,
            area: 10.0,
            active_tier: TierId::new(2).unwrap(),
            override_multiplier: None,
            override_layer_count: None,
            ink_enabled: false,
            lamination_enabled: false,
            cut_enabled: false,
            sell_mode: SellMode::Area,
            sheet_count: None,
            lifecycle: Lifecycle::Active,
        }
    }

    #[test]
    fn row_previews_every_tier() {
        let row = build_priced_row(&product(), &tiers(), &params(), None).unwrap();
        assert_eq!(row.tier_previews.len(), 5);
        // Higher tiers have higher multipliers, so previews are ascending.
        for pair in row.tier_previews.windows(2) {
            assert!(pair[1].final_price >= pair[0].final_price);
        }
    }

    #[test]
    fn missing_active_tier_is_not_found() {
        let only_tier_one: Vec<Tier> = tiers().into_iter().take(1).collect();
        let err = build_priced_row(&product(), &only_tier_one, &params(), None).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn final_source_tracks_overrides() {
        let row = build_priced_row(&product(), &tiers(), &params(), None).unwrap();
        assert_eq!(row.final_source, FinalSource::Tier(TierId::new(2).unwrap()));
        assert!(row.override_info.is_none());

        let mut overridden = product();
        overridden.override_multiplier = Some(9.0);
        let row = build_priced_row(&overridden, &tiers(), &params(), None).unwrap();
        assert_eq!(row.final_source, FinalSource::ProductOverride);
        let info = row.override_info.unwrap();
        assert_eq!(info.multiplier, 9.0);
        assert_eq!(info.source, FieldSource::Product);

        let rule = CategoryRule {
            category: "Banners".to_string(),
            override_multiplier: Some(7.0),
            override_layer_count: None,
        };
        let row = build_priced_row(&product(), &tiers(), &params(), Some(&rule)).unwrap();
        assert_eq!(row.final_source, FinalSource::CategoryOverride);
    }

    #[test]
    fn thin_margins_are_flagged() {
        // cost 0.5 × area 10 = 5.0 against a ~×3 price: healthy margin.
        let row = build_priced_row(&product(), &tiers(), &params(), None).unwrap();
        assert!(!row.low_margin);
        assert!(row.margin > LOW_MARGIN_THRESHOLD);

        // Override the multiplier down to near cost.
        let mut thin = product();
        thin.override_multiplier = Some(1.05);
        let row = build_priced_row(&thin, &tiers(), &params(), None).unwrap();
        assert!(row.low_margin);
    }
}
