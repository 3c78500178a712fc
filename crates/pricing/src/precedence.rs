//! Override precedence resolution.
//!
//! Multiplier and layer count are resolved independently, each falling
//! through product override → category rule → active tier. The winning
//! source is recorded per field so the admin UI and audit trail can show
//! where a number came from.

use serde::{Deserialize, Serialize};

use signworks_catalog::{CategoryRule, Product, Tier};
use signworks_core::ValueObject;

/// Which level supplied an effective value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    Product,
    Category,
    Tier,
}

/// The resolved multiplier and layer count, with per-field provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effective {
    pub multiplier: f64,
    pub layer_count: u32,
    pub multiplier_source: FieldSource,
    pub layer_count_source: FieldSource,
}

impl ValueObject for Effective {}

/// Resolve the effective multiplier and layer count for a product.
///
/// Absence of a category rule is "rule not found", not a failure; the tier
/// is the fallback of last resort and is always defined.
pub fn resolve_effective(product: &Product, tier: &Tier, rule: Option<&CategoryRule>) -> Effective {
    let (multiplier, multiplier_source) = match (
        product.override_multiplier,
        rule.and_then(|r| r.override_multiplier),
    ) {
        (Some(mult), _) => (mult, FieldSource::Product),
        (None, Some(mult)) => (mult, FieldSource::Category),
        (None, None) => (tier.multiplier, FieldSource::Tier),
    };

    let (layer_count, layer_count_source) = match (
        product.override_layer_count,
        rule.and_then(|r| r.override_layer_count),
    ) {
        (Some(layers), _) => (layers, FieldSource::Product),
        (None, Some(layers)) => (layers, FieldSource::Category),
        (None, None) => (tier.layer_count, FieldSource::Tier),
    };

    Effective {
        multiplier,
        layer_count,
        multiplier_source,
        layer_count_source,
    }
}
