use serde::{Deserialize, Serialize};

use signworks_core::{DomainError, DomainResult};

/// Tier identifier. Tiers form a fixed ladder of pricing levels, 1..=5.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(u8);

impl TierId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(id: u8) -> DomainResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&id) {
            return Err(DomainError::invalid_id(format!(
                "TierId: {id} outside {}..={}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(id))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All valid tier ids in ascending order.
    pub fn all() -> impl Iterator<Item = TierId> {
        (Self::MIN..=Self::MAX).map(TierId)
    }
}

impl core::fmt::Display for TierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A named pricing level: base multiplier applied to material cost, plus the
/// layer count used by the ink add-on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
    pub multiplier: f64,
    pub layer_count: u32,
}

impl Tier {
    pub fn new(id: TierId, multiplier: f64, layer_count: u32) -> DomainResult<Self> {
        let tier = Self {
            id,
            multiplier,
            layer_count,
        };
        tier.validate()?;
        Ok(tier)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(DomainError::validation(format!(
                "tier {}: multiplier must be positive",
                self.id
            )));
        }
        Ok(())
    }
}

/// Administrative update for a tier. Applied atomically after validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierPatch {
    pub multiplier: Option<f64>,
    pub layer_count: Option<u32>,
}

impl Tier {
    /// Returns the patched tier, validating before any field is committed.
    pub fn apply_patch(&self, patch: &TierPatch) -> DomainResult<Tier> {
        let updated = Tier {
            id: self.id,
            multiplier: patch.multiplier.unwrap_or(self.multiplier),
            layer_count: patch.layer_count.unwrap_or(self.layer_count),
        };
        updated.validate()?;
        Ok(updated)
    }
}

/// Optional per-category override of the tier defaults.
///
/// Keyed by category name; the repository layer guarantees at most one rule
/// per category. Either field may be left unset to fall through to the tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub override_multiplier: Option<f64>,
    pub override_layer_count: Option<u32>,
}

impl CategoryRule {
    pub fn validate(&self) -> DomainResult<()> {
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("category rule: category must not be empty"));
        }
        if let Some(mult) = self.override_multiplier {
            if !mult.is_finite() || mult <= 0.0 {
                return Err(DomainError::validation(format!(
                    "category rule '{}': override multiplier must be positive",
                    self.category
                )));
            }
        }
        Ok(())
    }
}

/// Administrative update for a category rule.
///
/// `Some(None)` clears an override; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRulePatch {
    pub override_multiplier: Option<Option<f64>>,
    pub override_layer_count: Option<Option<u32>>,
}

impl CategoryRule {
    pub fn apply_patch(&self, patch: &CategoryRulePatch) -> DomainResult<CategoryRule> {
        let updated = CategoryRule {
            category: self.category.clone(),
            override_multiplier: patch
                .override_multiplier
                .unwrap_or(self.override_multiplier),
            override_layer_count: patch
                .override_layer_count
                .unwrap_or(self.override_layer_count),
        };
        updated.validate()?;
        Ok(updated)
    }
}
