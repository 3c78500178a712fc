use criterion::{Criterion, black_box, criterion_group, criterion_main};

use signworks_catalog::{CostMethod, PriceParams, Product, SellMode, Tier, TierId};
use signworks_core::{Lifecycle, Sku};
use signworks_pricing::{ComputeContext, Toggles, compute_price};

fn bench_compute_price(c: &mut Criterion) {
    let product = Product {
        sku: Sku::new("BAN-13OZ").unwrap(),
        name: "13oz Banner".to_string(),
        category: "Banners".to_string(),
        supplier_id: None,
        cost_per_area: 0.45,
        area: 12.0,
        active_tier: TierId::new(3).unwrap(),
        override_multiplier: None,
        override_layer_count: None,
        ink_enabled: true,
        lamination_enabled: true,
        cut_enabled: true,
        sell_mode: SellMode::Area,
        sheet_count: None,
        lifecycle: Lifecycle::Active,
    };
    let tier = Tier {
        id: TierId::new(3).unwrap(),
        multiplier: 3.5,
        layer_count: 2,
    };
    let params = PriceParams {
        ink_price: 0.5,
        lamination_price: 0.2,
        cut_price: 1.0,
        cut_factor: 0.3,
        rounding_step: 0.05,
        default_tier: TierId::new(1).unwrap(),
        cost_method: CostMethod::Latest,
    };

    c.bench_function("compute_price/all_addons", |b| {
        b.iter(|| {
            compute_price(black_box(ComputeContext {
                product: &product,
                tier: &tier,
                params: &params,
                category_rule: None,
                toggles: Toggles {
                    ink: true,
                    lamination: true,
                    cut: true,
                },
                sheets_override: None,
            }))
        })
    });
}

criterion_group!(benches, bench_compute_price);
criterion_main!(benches);
