//! Physical units on purchase lines.

use serde::{Deserialize, Serialize};

/// How a purchased quantity is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Rectangular sheets; width and height are required.
    Sheet,
    /// Rolls; no area derivation rule is defined for these.
    Roll,
    /// Quantity is already expressed in area units.
    FlatArea,
}

/// Unit of measure for linear dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Uom {
    Ft,
    In,
    M,
    Cm,
}

impl Uom {
    /// Convert a linear dimension in this unit to feet.
    pub fn to_feet(self, value: f64) -> f64 {
        match self {
            Uom::Ft => value,
            Uom::In => value / 12.0,
            Uom::M => value * 3.28084,
            Uom::Cm => value * 0.032_808_4,
        }
    }
}
