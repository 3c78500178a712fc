use serde::{Deserialize, Serialize};

use signworks_core::{DomainError, DomainResult, Entity, LineId, Lifecycle, PurchaseId, Sku};

use crate::derive::LineFigures;
use crate::units::{UnitType, Uom};

/// Input for one purchase line, before derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchaseLine {
    /// Linked product, if this line is for a cataloged SKU.
    pub product: Option<Sku>,
    pub unit_type: UnitType,
    /// Quantity in `unit_type` units. Strictly positive.
    pub units: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub uom: Uom,
    /// Cost of one unit. Non-negative.
    pub unit_cost: f64,
    /// Whether saving this line should generate a price-book entry for the
    /// linked product.
    pub generate_price: bool,
}

impl NewPurchaseLine {
    pub fn validate(&self) -> DomainResult<()> {
        if !self.units.is_finite() || self.units <= 0.0 {
            return Err(DomainError::validation("units must be positive"));
        }
        if !self.unit_cost.is_finite() || self.unit_cost < 0.0 {
            return Err(DomainError::validation("unit_cost must be non-negative"));
        }
        if self.unit_type == UnitType::Sheet {
            // Missing dimensions on a sheet line are an input error, never a
            // silent zero area.
            match self.width {
                Some(w) if w.is_finite() && w > 0.0 => {}
                _ => {
                    return Err(DomainError::validation(
                        "width is required and must be positive for sheet lines",
                    ));
                }
            }
            match self.height {
                Some(h) if h.is_finite() && h > 0.0 => {}
                _ => {
                    return Err(DomainError::validation(
                        "height is required and must be positive for sheet lines",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A stored purchase line with its derived figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub id: LineId,
    pub purchase_id: PurchaseId,
    pub product: Option<Sku>,
    pub unit_type: UnitType,
    pub units: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub uom: Uom,
    pub unit_cost: f64,
    pub generate_price: bool,
    pub figures: LineFigures,
    pub lifecycle: Lifecycle,
}

impl Entity for PurchaseLine {
    type Id = LineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_line() -> NewPurchaseLine {
        NewPurchaseLine {
            product: None,
            unit_type: UnitType::Sheet,
            units: 10.0,
            width: Some(24.0),
            height: Some(36.0),
            uom: Uom::In,
            unit_cost: 5.5,
            generate_price: false,
        }
    }

    #[test]
    fn valid_sheet_line_passes() {
        assert!(sheet_line().validate().is_ok());
    }

    #[test]
    fn non_positive_units_are_rejected() {
        let mut line = sheet_line();
        line.units = 0.0;
        assert!(line.validate().is_err());
        line.units = -2.0;
        assert!(line.validate().is_err());
    }

    #[test]
    fn negative_unit_cost_is_rejected() {
        let mut line = sheet_line();
        line.unit_cost = -0.5;
        assert!(line.validate().is_err());
    }

    #[test]
    fn sheet_lines_require_both_dimensions() {
        let mut line = sheet_line();
        line.width = None;
        assert!(line.validate().is_err());

        let mut line = sheet_line();
        line.height = Some(0.0);
        assert!(line.validate().is_err());
    }

    #[test]
    fn dimensions_are_optional_for_flat_area() {
        let line = NewPurchaseLine {
            product: None,
            unit_type: UnitType::FlatArea,
            units: 50.0,
            width: None,
            height: None,
            uom: Uom::Ft,
            unit_cost: 1.2,
            generate_price: false,
        };
        assert!(line.validate().is_ok());
    }
}
