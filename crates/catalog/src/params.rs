use serde::{Deserialize, Serialize};

use signworks_core::{DomainError, DomainResult};

use crate::tier::TierId;

/// How a product's current cost is chosen from its price-book history.
///
/// Only `Latest` (pinned-first, else most recent effective date) is defined
/// today; the parameter is kept as an enum so the knob survives in the data
/// model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostMethod {
    Latest,
}

impl Default for CostMethod {
    fn default() -> Self {
        CostMethod::Latest
    }
}

/// Global pricing parameters.
///
/// Modeled as an explicitly passed record: every computation takes it as an
/// argument, nothing reads it from ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceParams {
    /// Unit price per layer per unit area for the ink add-on.
    pub ink_price: f64,
    /// Unit price per unit area for the lamination add-on.
    pub lamination_price: f64,
    /// Flat cut unit price. Not used by the current formula (the cut add-on
    /// is a fraction of base material cost) but carried for collaborators.
    pub cut_price: f64,
    /// Fraction of the base material total charged when cutting area-sold
    /// products.
    pub cut_factor: f64,
    /// Step for upward rounding of final prices. Must be positive.
    pub rounding_step: f64,
    /// Tier assigned to newly created products.
    pub default_tier: TierId,
    pub cost_method: CostMethod,
}

impl PriceParams {
    pub fn validate(&self) -> DomainResult<()> {
        for (name, value) in [
            ("ink_price", self.ink_price),
            ("lamination_price", self.lamination_price),
            ("cut_price", self.cut_price),
            ("cut_factor", self.cut_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::validation(format!(
                    "params: {name} must be non-negative"
                )));
            }
        }
        if !self.rounding_step.is_finite() || self.rounding_step <= 0.0 {
            return Err(DomainError::validation("params: rounding_step must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PriceParams {
        PriceParams {
            ink_price: 0.5,
            lamination_price: 0.2,
            cut_price: 1.0,
            cut_factor: 0.3,
            rounding_step: 0.05,
            default_tier: TierId::new(1).unwrap(),
            cost_method: CostMethod::default(),
        }
    }

    #[test]
    fn valid_params_pass() {
        assert!(params().validate().is_ok());
    }

    #[test]
    fn negative_prices_are_rejected() {
        let mut p = params();
        p.ink_price = -0.1;
        assert!(p.validate().is_err());
    }

    #[test]
    fn non_positive_rounding_step_is_rejected() {
        let mut p = params();
        p.rounding_step = 0.0;
        assert!(p.validate().is_err());
    }
}
