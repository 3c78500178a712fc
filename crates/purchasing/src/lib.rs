//! Purchasing domain module.
//!
//! Purchases, their line items and the derivation that normalizes
//! heterogeneous physical units (sheets, rolls, flat area) into
//! cost-per-unit-area figures feeding the price book. Also defines the
//! normalized record shape bulk-import collaborators must produce.

pub mod derive;
pub mod import;
pub mod line;
pub mod purchase;
pub mod supplier;
pub mod units;

pub use derive::{LineFigures, derive_line_figures};
pub use import::{ImportIssue, ImportedLineRecord, IssueSeverity};
pub use line::{NewPurchaseLine, PurchaseLine};
pub use purchase::{NewPurchase, Purchase};
pub use supplier::Supplier;
pub use units::{UnitType, Uom};
