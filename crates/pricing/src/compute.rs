//! The price computation engine.

use serde::{Deserialize, Serialize};

use signworks_catalog::{CategoryRule, PriceParams, Product, SellMode, Tier};
use signworks_core::ValueObject;

use crate::precedence::{Effective, resolve_effective};
use crate::rounding::round_up;

/// Floor for the area term. Upstream validation requires `area > 0`; the
/// clamp only bounds the arithmetic when a degenerate value slips through.
const MIN_AREA: f64 = 0.0001;

/// Which add-ons the caller requests. An add-on is charged only when it is
/// both requested here and enabled on the product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Toggles {
    pub ink: bool,
    pub lamination: bool,
    pub cut: bool,
}

/// Everything a single price computation needs, already resolved by the
/// caller. No lookups happen past this point.
#[derive(Debug, Clone, Copy)]
pub struct ComputeContext<'a> {
    pub product: &'a Product,
    pub tier: &'a Tier,
    pub params: &'a PriceParams,
    pub category_rule: Option<&'a CategoryRule>,
    pub toggles: Toggles,
    /// Caller-supplied sheet count for sheet-mode quoting. Accepted as part
    /// of the computation contract; the current formula does not consume it.
    pub sheets_override: Option<u32>,
}

/// Full price breakdown. Ephemeral: recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_per_area: f64,
    pub base_total: f64,
    pub ink_add: f64,
    pub lamination_add: f64,
    pub cut_add: f64,
    pub addons_total: f64,
    pub final_price: f64,
    pub final_per_area: f64,
    pub effective: Effective,
}

impl ValueObject for PriceBreakdown {}

/// Compute the full price breakdown for a product.
///
/// The formula:
/// 1. resolve the effective multiplier/layer count (product > category > tier);
/// 2. base material: `cost_per_area * multiplier * area`;
/// 3. ink: `ink_price * layer_count * area` when requested and enabled;
/// 4. lamination: `lamination_price * area` when requested and enabled;
/// 5. cut: `cut_factor * base_total`, area-sold products only; sheet-sold
///    products never accrue a cut charge here;
/// 6. round the sum upward to `rounding_step`.
///
/// There is no minimum-price floor. Callers must supply `area > 0` and a
/// resolvable tier; nothing is thrown from here.
pub fn compute_price(ctx: ComputeContext<'_>) -> PriceBreakdown {
    let ComputeContext {
        product,
        tier,
        params,
        category_rule,
        toggles,
        sheets_override: _,
    } = ctx;

    let effective = resolve_effective(product, tier, category_rule);
    let area = product.area.max(MIN_AREA);

    let base_per_area = product.cost_per_area * effective.multiplier;
    let base_total = base_per_area * area;

    let ink_add = if toggles.ink && product.ink_enabled {
        params.ink_price * f64::from(effective.layer_count) * area
    } else {
        0.0
    };

    let lamination_add = if toggles.lamination && product.lamination_enabled {
        params.lamination_price * area
    } else {
        0.0
    };

    // Cutting only applies to area-sold products; for sheet-sold products
    // the cutting cost is accounted elsewhere.
    let cut_add = if toggles.cut && product.cut_enabled && product.sell_mode == SellMode::Area {
        params.cut_factor * base_total
    } else {
        0.0
    };

    let addons_total = ink_add + lamination_add + cut_add;
    let raw_total = base_total + addons_total;
    let final_price = round_up(raw_total, params.rounding_step);

    PriceBreakdown {
        base_per_area,
        base_total,
        ink_add,
        lamination_add,
        cut_add,
        addons_total,
        final_price,
        final_per_area: final_price / area,
        effective,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signworks_catalog::{CostMethod, TierId};
    use signworks_core::{Lifecycle, Sku};

    fn tier(mult: f64, layers: u32) -> Tier {
        Tier {
            id: TierId::new(1).unwrap(),
            multiplier: mult,
            layer_count: layers,
        }
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
            sku: Sku::new("S").unwrap(),
            name: "N".to_string(),
            category: "Cat".to_string(),
            supplier_id: None,
            cost_per_area: 1.0,
            area: 1.0,
            active_tier: TierId::new(1).unwrap(),
            override_multiplier: None,
            override_layer_count: None,
            ink_enabled: true,
            lamination_enabled: true,
            cut_enabled: true,
            sell_mode: SellMode::Area,
            sheet_count: None,
            lifecycle: Lifecycle::Active,
        }
    }

    fn ctx<'a>(
        product: &'a Product,
        tier: &'a Tier,
        params: &'a PriceParams,
        toggles: Toggles,
    ) -> ComputeContext<'a> {
        ComputeContext {
            product,
            tier,
            params,
            category_rule: None,
            toggles,
            sheets_override: None,
        }
    }

    #[test]
    fn no_addons_when_toggles_off() {
        let p = product();
        let t = tier(3.5, 1);
        let params = params();
        let br = compute_price(ctx(&p, &t, &params, Toggles::default()));
        assert_eq!(br.addons_total, 0.0);
        assert_eq!(br.base_total, 3.5);
    }

    #[test]
    fn requested_addons_accrue() {
        let p = product();
        let t = tier(3.5, 1);
        let params = params();
        let br = compute_price(ctx(
            &p,
            &t,
            &params,
            Toggles {
                ink: true,
                lamination: true,
                cut: true,
            },
        ));
        assert!(br.ink_add > 0.0);
        assert!(br.lamination_add > 0.0);
        assert!(br.cut_add > 0.0);
        assert_eq!(
            br.addons_total,
            br.ink_add + br.lamination_add + br.cut_add
        );
    }

    #[test]
    fn addon_needs_both_toggle_and_product_flag() {
        let mut p = product();
        p.ink_enabled = false;
        let t = tier(3.5, 1);
        let params = params();
        let br = compute_price(ctx(
            &p,
            &t,
            &params,
            Toggles {
                ink: true,
                lamination: false,
                cut: false,
            },
        ));
        assert_eq!(br.ink_add, 0.0);
    }

    #[test]
    fn sheet_mode_forces_cut_to_zero() {
        let mut p = product();
        p.sell_mode = SellMode::Sheet;
        let t = tier(3.5, 1);
        let params = params();
        let br = compute_price(ctx(
            &p,
            &t,
            &params,
            Toggles {
                ink: false,
                lamination: false,
                cut: true,
            },
        ));
        assert_eq!(br.cut_add, 0.0);

        p.sell_mode = SellMode::Area;
        let br = compute_price(ctx(
            &p,
            &t,
            &params,
            Toggles {
                ink: false,
                lamination: false,
                cut: true,
            },
        ));
        assert_eq!(br.cut_add, params.cut_factor * br.base_total);
    }

    #[test]
    fn end_to_end_area_cut_scenario() {
        // cost 2.0, area 3, multiplier 3.5 → base 21.0; cut 0.3 × 21 = 6.3;
        // raw 27.3 rounds up at step 0.05 to 27.3.
        let mut p = product();
        p.cost_per_area = 2.0;
        p.area = 3.0;
        let t = tier(3.5, 1);
        let params = params();
        let br = compute_price(ctx(
            &p,
            &t,
            &params,
            Toggles {
                ink: false,
                lamination: false,
                cut: true,
            },
        ));
        assert!((br.base_total - 21.0).abs() < 1e-9);
        assert!((br.cut_add - 6.3).abs() < 1e-9);
        assert!((br.final_price - 27.3).abs() < 1e-9);
        assert_eq!(br.final_per_area, br.final_price / 3.0);
    }

    #[test]
    fn ink_uses_effective_layer_count() {
        let mut p = product();
        p.override_layer_count = Some(3);
        p.area = 2.0;
        let t = tier(2.0, 1);
        let params = params();
        let br = compute_price(ctx(
            &p,
            &t,
            &params,
            Toggles {
                ink: true,
                lamination: false,
                cut: false,
            },
        ));
        // 0.5 × 3 layers × 2 area
        assert!((br.ink_add - 3.0).abs() < 1e-9);
    }

    #[test]
    fn tiny_area_still_produces_positive_price() {
        let mut p = product();
        p.area = 0.01;
        let t = tier(3.5, 1);
        let params = params();
        let br = compute_price(ctx(&p, &t, &params, Toggles::default()));
        assert!(br.final_price > 0.0);
    }

    #[test]
    fn degenerate_area_is_clamped() {
        // Validation upstream rejects this; the clamp keeps the arithmetic
        // finite if it ever slips through.
        let mut p = product();
        p.area = 0.0;
        let t = tier(3.5, 1);
        let params = params();
        let br = compute_price(ctx(&p, &t, &params, Toggles::default()));
        assert!(br.final_per_area.is_finite());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Every numeric output is finite and non-negative for valid inputs.
            #[test]
            fn outputs_are_finite_and_non_negative(
                cost in 0.0f64..100.0,
                area in 0.01f64..500.0,
                mult in 0.1f64..10.0,
                layers in 0u32..6,
                ink in any::<bool>(),
                lam in any::<bool>(),
                cut in any::<bool>(),
            ) {
                let mut p = product();
                p.cost_per_area = cost;
                p.area = area;
                let t = tier(mult, layers);
                let params = params();
                let br = compute_price(ctx(&p, &t, &params, Toggles { ink, lamination: lam, cut }));

                for value in [br.base_per_area, br.base_total, br.ink_add, br.lamination_add,
                              br.cut_add, br.addons_total, br.final_price, br.final_per_area] {
                    prop_assert!(value.is_finite());
                    prop_assert!(value >= 0.0);
                }
                prop_assert!(br.final_price >= br.base_total + br.addons_total - 1e-9);
            }
        }
    }
}
