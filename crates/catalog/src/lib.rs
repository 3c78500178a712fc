//! Catalog domain module.
//!
//! This crate contains the priced entities and their business rules
//! (products, pricing tiers, per-category overrides and the global pricing
//! parameters), implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod params;
pub mod product;
pub mod tier;

pub use params::{CostMethod, PriceParams};
pub use product::{Product, ProductPatch, SellMode};
pub use tier::{CategoryRule, CategoryRulePatch, Tier, TierId, TierPatch};
