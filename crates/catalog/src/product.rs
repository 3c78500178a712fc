use serde::{Deserialize, Serialize};

use signworks_core::{DomainError, DomainResult, Lifecycle, Sku, SupplierId};

use crate::tier::TierId;

/// Whether a product is priced (and cut) per unit area, or sold as whole
/// sheets.
///
/// The distinction matters for the cut add-on: cutting area-sold material is
/// charged as a fraction of the base material price; cutting sheet-sold
/// products is accounted elsewhere and never added here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SellMode {
    Area,
    Sheet,
}

/// The priced entity: one physical print product (banner, vinyl, sticker...).
///
/// Identity is the SKU. `cost_per_area` is the acquisition cost the pricing
/// formula starts from; it is normally kept in sync with the product's
/// price book by the calling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    pub category: String,
    pub supplier_id: Option<SupplierId>,

    /// Acquisition cost per unit area. Non-negative.
    pub cost_per_area: f64,
    /// Sellable area of one unit. Strictly positive.
    pub area: f64,
    pub active_tier: TierId,

    /// Per-product overrides; take precedence over category rule and tier.
    pub override_multiplier: Option<f64>,
    pub override_layer_count: Option<u32>,

    pub ink_enabled: bool,
    pub lamination_enabled: bool,
    pub cut_enabled: bool,

    pub sell_mode: SellMode,
    pub sheet_count: Option<u32>,

    pub lifecycle: Lifecycle,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {}: name must not be empty",
                self.sku
            )));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {}: category must not be empty",
                self.sku
            )));
        }
        if !self.cost_per_area.is_finite() || self.cost_per_area < 0.0 {
            return Err(DomainError::validation(format!(
                "product {}: cost_per_area must be non-negative",
                self.sku
            )));
        }
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(DomainError::validation(format!(
                "product {}: area must be positive",
                self.sku
            )));
        }
        if let Some(mult) = self.override_multiplier {
            if !mult.is_finite() || mult <= 0.0 {
                return Err(DomainError::validation(format!(
                    "product {}: override multiplier must be positive",
                    self.sku
                )));
            }
        }
        Ok(())
    }
}

/// Administrative update for a product.
///
/// Validation runs on the fully patched value before anything is committed,
/// so a rejected patch leaves the product untouched (no partial writes).
/// `Some(None)` clears an optional field; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub supplier_id: Option<Option<SupplierId>>,
    pub cost_per_area: Option<f64>,
    pub area: Option<f64>,
    pub active_tier: Option<TierId>,
    pub override_multiplier: Option<Option<f64>>,
    pub override_layer_count: Option<Option<u32>>,
    pub ink_enabled: Option<bool>,
    pub lamination_enabled: Option<bool>,
    pub cut_enabled: Option<bool>,
    pub sell_mode: Option<SellMode>,
    pub sheet_count: Option<Option<u32>>,
    pub lifecycle: Option<Lifecycle>,
}

impl Product {
    pub fn apply_patch(&self, patch: &ProductPatch) -> DomainResult<Product> {
        let updated = Product {
            sku: self.sku.clone(),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            category: patch
                .category
                .clone()
                .unwrap_or_else(|| self.category.clone()),
            supplier_id: patch.supplier_id.unwrap_or(self.supplier_id),
            cost_per_area: patch.cost_per_area.unwrap_or(self.cost_per_area),
            area: patch.area.unwrap_or(self.area),
            active_tier: patch.active_tier.unwrap_or(self.active_tier),
            override_multiplier: patch
                .override_multiplier
                .unwrap_or(self.override_multiplier),
            override_layer_count: patch
                .override_layer_count
                .unwrap_or(self.override_layer_count),
            ink_enabled: patch.ink_enabled.unwrap_or(self.ink_enabled),
            lamination_enabled: patch.lamination_enabled.unwrap_or(self.lamination_enabled),
            cut_enabled: patch.cut_enabled.unwrap_or(self.cut_enabled),
            sell_mode: patch.sell_mode.unwrap_or(self.sell_mode),
            sheet_count: patch.sheet_count.unwrap_or(self.sheet_count),
            lifecycle: patch.lifecycle.unwrap_or(self.lifecycle),
        };
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            sku: Sku::new("BAN-13OZ").unwrap(),
            name: "13oz Banner".to_string(),
            category: "Banners".to_string(),
            supplier_id: None,
            cost_per_area: 0.45,
            area: 12.0,
            active_tier: TierId::new(1).unwrap(),
            override_multiplier: None,
            override_layer_count: None,
            ink_enabled: true,
            lamination_enabled: false,
            cut_enabled: true,
            sell_mode: SellMode::Area,
            sheet_count: None,
            lifecycle: Lifecycle::Active,
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(product().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_area() {
        let mut p = product();
        p.area = 0.0;
        assert!(p.validate().is_err());
        p.area = -3.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_negative_cost() {
        let mut p = product();
        p.cost_per_area = -0.01;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_override_multiplier() {
        let mut p = product();
        p.override_multiplier = Some(0.0);
        assert!(p.validate().is_err());
        p.override_multiplier = Some(2.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn patch_rejection_leaves_product_unchanged() {
        let p = product();
        let err = p
            .apply_patch(&ProductPatch {
                area: Some(-1.0),
                name: Some("renamed".to_string()),
                ..ProductPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(p.name, "13oz Banner");
        assert_eq!(p.area, 12.0);
    }

    #[test]
    fn patch_clears_and_sets_optionals() {
        let mut p = product();
        p.override_multiplier = Some(5.0);

        let updated = p
            .apply_patch(&ProductPatch {
                override_multiplier: Some(None),
                sheet_count: Some(Some(25)),
                sell_mode: Some(SellMode::Sheet),
                ..ProductPatch::default()
            })
            .unwrap();
        assert_eq!(updated.override_multiplier, None);
        assert_eq!(updated.sheet_count, Some(25));
        assert_eq!(updated.sell_mode, SellMode::Sheet);
    }

    #[test]
    fn soft_delete_is_a_lifecycle_transition() {
        let p = product();
        let deleted = p
            .apply_patch(&ProductPatch {
                lifecycle: Some(Lifecycle::Deleted),
                ..ProductPatch::default()
            })
            .unwrap();
        assert!(!deleted.is_active());
    }
}
