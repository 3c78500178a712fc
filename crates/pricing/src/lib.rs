//! Pricing computation module.
//!
//! Pure, deterministic price computation for print products: upward rounding,
//! override precedence resolution, the breakdown formula and the per-product
//! row summaries used by listing/export collaborators. No IO, no storage;
//! callers supply already-resolved snapshots of the catalog.

pub mod compute;
pub mod precedence;
pub mod rounding;
pub mod row;

pub use compute::{ComputeContext, PriceBreakdown, Toggles, compute_price};
pub use precedence::{Effective, FieldSource, resolve_effective};
pub use rounding::round_up;
pub use row::{FinalSource, OverrideInfo, PricedRow, TierPreview, build_priced_row};
