//! Normalized bulk-import records.
//!
//! Spreadsheet/CSV importers parse however they like; what they must hand
//! this core is one `ImportedLineRecord` per row. Validation produces
//! structured issues (keeping the row and field) instead of failing fast, so
//! an import preview can show everything wrong with a file at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use signworks_core::Sku;

use crate::derive::{LineFigures, derive_line_figures};
use crate::line::NewPurchaseLine;
use crate::units::{UnitType, Uom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// One problem found in an imported row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportIssue {
    pub row_number: u32,
    pub field: Option<String>,
    pub message: String,
    pub severity: IssueSeverity,
}

impl ImportIssue {
    fn error(row: u32, field: &str, message: impl Into<String>) -> Self {
        Self {
            row_number: row,
            field: Some(field.to_string()),
            message: message.into(),
            severity: IssueSeverity::Error,
        }
    }

    fn warning(row: u32, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            row_number: row,
            field: field.map(str::to_string),
            message: message.into(),
            severity: IssueSeverity::Warning,
        }
    }
}

/// The normalized shape a bulk-import collaborator must produce per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedLineRecord {
    pub row_number: u32,
    pub product_sku: Option<Sku>,
    pub supplier_name: String,
    pub date: DateTime<Utc>,
    pub unit_type: UnitType,
    pub units: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub uom: Uom,
    pub unit_cost: f64,
    pub currency: String,
    pub invoice_no: Option<String>,
}

impl ImportedLineRecord {
    /// Collect every issue in this record. An empty result means the row can
    /// be committed as a purchase line.
    pub fn validate(&self, now: DateTime<Utc>) -> Vec<ImportIssue> {
        let row = self.row_number;
        let mut issues = Vec::new();

        if self.supplier_name.trim().is_empty() {
            issues.push(ImportIssue::error(row, "supplier_name", "supplier is required"));
        }
        if self.date > now {
            issues.push(ImportIssue::error(row, "date", "date must not be in the future"));
        }
        if self.currency.trim().is_empty() {
            issues.push(ImportIssue::error(row, "currency", "currency is required"));
        }
        if !self.units.is_finite() || self.units <= 0.0 {
            issues.push(ImportIssue::error(row, "units", "units must be positive"));
        }
        if !self.unit_cost.is_finite() || self.unit_cost < 0.0 {
            issues.push(ImportIssue::error(
                row,
                "unit_cost",
                "unit cost must be non-negative",
            ));
        }
        if self.unit_type == UnitType::Sheet {
            if !matches!(self.width, Some(w) if w.is_finite() && w > 0.0) {
                issues.push(ImportIssue::error(
                    row,
                    "width",
                    "width is required and must be positive for sheet rows",
                ));
            }
            if !matches!(self.height, Some(h) if h.is_finite() && h > 0.0) {
                issues.push(ImportIssue::error(
                    row,
                    "height",
                    "height is required and must be positive for sheet rows",
                ));
            }
        }

        if self.unit_type == UnitType::Roll {
            issues.push(ImportIssue::warning(
                row,
                Some("unit_type"),
                "roll rows have no area derivation; no price entry will be generated",
            ));
        }
        if self.product_sku.is_none() {
            issues.push(ImportIssue::warning(
                row,
                Some("product_sku"),
                "row is not linked to a product; no price entry will be generated",
            ));
        }

        issues
    }

    /// Whether the record has blocking errors (warnings do not block).
    pub fn has_errors(&self, now: DateTime<Utc>) -> bool {
        self.validate(now)
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }

    /// Convert to a purchase-line input. A record that generates a price
    /// entry needs a linked product; lines without one are recorded only.
    pub fn to_new_line(&self) -> NewPurchaseLine {
        NewPurchaseLine {
            product: self.product_sku.clone(),
            unit_type: self.unit_type,
            units: self.units,
            width: self.width,
            height: self.height,
            uom: self.uom,
            unit_cost: self.unit_cost,
            generate_price: self.product_sku.is_some(),
        }
    }

    /// Derived preview figures for dry-run display, when derivable.
    pub fn preview(&self) -> Option<LineFigures> {
        derive_line_figures(&self.to_new_line()).ok()
    }
}
