//! Area and cost derivation for purchase lines.

use serde::{Deserialize, Serialize};

use signworks_core::{DomainResult, ValueObject};

use crate::line::NewPurchaseLine;
use crate::units::UnitType;

/// Figures derived from a purchase line.
///
/// `None` in the area fields means **undetermined**, not zero: downstream
/// logic must never treat an unknown cost as free. `cost_per_area` is set
/// only when a positive total area was derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFigures {
    pub area_per_unit: Option<f64>,
    pub area_total: Option<f64>,
    pub total_cost: f64,
    pub cost_per_area: Option<f64>,
}

impl ValueObject for LineFigures {}

/// Derive the normalized area/cost figures for a line.
///
/// - `flat_area`: quantity already is area, so one area unit per quantity unit;
/// - `sheet`: area from width × height, converted to feet first;
/// - `roll`: no business rule exists for converting rolls to area, so the
///   area fields stay undetermined rather than guessed.
///
/// Validation errors (non-positive quantity, negative cost, missing sheet
/// dimensions) fail the whole derivation; an undetermined roll area does not.
pub fn derive_line_figures(line: &NewPurchaseLine) -> DomainResult<LineFigures> {
    line.validate()?;

    let area_per_unit = match line.unit_type {
        UnitType::FlatArea => Some(1.0),
        UnitType::Sheet => {
            // Presence is guaranteed by validation above.
            match (line.width, line.height) {
                (Some(width), Some(height)) => {
                    Some(line.uom.to_feet(width) * line.uom.to_feet(height))
                }
                _ => None,
            }
        }
        UnitType::Roll => None,
    };

    let area_total = area_per_unit.map(|per_unit| per_unit * line.units);
    let total_cost = line.units * line.unit_cost;
    let cost_per_area = area_total
        .filter(|total| *total > 0.0)
        .map(|total| total_cost / total);

    Ok(LineFigures {
        area_per_unit,
        area_total,
        total_cost,
        cost_per_area,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Uom;
    use signworks_core::DomainError;

    fn line(unit_type: UnitType) -> NewPurchaseLine {
        NewPurchaseLine {
            product: None,
            unit_type,
            units: 10.0,
            width: Some(24.0),
            height: Some(36.0),
            uom: Uom::In,
            unit_cost: 5.5,
            generate_price: false,
        }
    }

    #[test]
    fn sheet_line_round_trip() {
        // 24in × 36in = 2ft × 3ft = 6 sq ft per sheet.
        let figures = derive_line_figures(&line(UnitType::Sheet)).unwrap();
        assert!((figures.area_per_unit.unwrap() - 6.0).abs() < 1e-9);
        assert!((figures.area_total.unwrap() - 60.0).abs() < 1e-9);
        assert!((figures.total_cost - 55.0).abs() < 1e-9);
        assert!((figures.cost_per_area.unwrap() - 55.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn sheet_dimensions_in_meters() {
        let mut metric = line(UnitType::Sheet);
        metric.width = Some(1.0);
        metric.height = Some(2.0);
        metric.uom = Uom::M;
        let figures = derive_line_figures(&metric).unwrap();
        assert!((figures.area_per_unit.unwrap() - 2.0 * 3.28084 * 3.28084).abs() < 1e-6);
    }

    #[test]
    fn flat_area_counts_quantity_as_area() {
        let mut flat = line(UnitType::FlatArea);
        flat.width = None;
        flat.height = None;
        let figures = derive_line_figures(&flat).unwrap();
        assert_eq!(figures.area_per_unit, Some(1.0));
        assert_eq!(figures.area_total, Some(10.0));
        assert!((figures.cost_per_area.unwrap() - 0.55).abs() < 1e-9);
    }

    #[test]
    fn roll_area_is_undetermined_not_zero() {
        let mut roll = line(UnitType::Roll);
        roll.width = None;
        roll.height = None;
        let figures = derive_line_figures(&roll).unwrap();
        assert_eq!(figures.area_per_unit, None);
        assert_eq!(figures.area_total, None);
        assert_eq!(figures.cost_per_area, None);
        // Total cost is still known.
        assert!((figures.total_cost - 55.0).abs() < 1e-9);
    }

    #[test]
    fn missing_sheet_dimensions_fail_derivation() {
        let mut incomplete = line(UnitType::Sheet);
        incomplete.width = None;
        let err = derive_line_figures(&incomplete).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// cost_per_area × area_total reconstructs total cost whenever the
            /// area is determinate.
            #[test]
            fn cost_reconstructs(
                units in 0.1f64..1_000.0,
                width in 0.1f64..100.0,
                height in 0.1f64..100.0,
                unit_cost in 0.0f64..1_000.0,
            ) {
                let input = NewPurchaseLine {
                    product: None,
                    unit_type: UnitType::Sheet,
                    units,
                    width: Some(width),
                    height: Some(height),
                    uom: Uom::In,
                    unit_cost,
                    generate_price: false,
                };
                let figures = derive_line_figures(&input).unwrap();
                let total = figures.area_total.unwrap();
                prop_assert!(total > 0.0);
                let reconstructed = figures.cost_per_area.unwrap() * total;
                prop_assert!((reconstructed - figures.total_cost).abs() <= figures.total_cost.abs() * 1e-9 + 1e-9);
            }
        }
    }
}
