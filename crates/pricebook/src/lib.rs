//! Price book domain module (event-sourced).
//!
//! One `PriceBook` aggregate per product holds that product's dated cost
//! observations and owns the pin invariant: at most one entry is pinned at
//! any time. Pinning emits the unpin of the previous entry and the pin of
//! the target as one event batch, so no intermediate state with two pins is
//! ever committed.

pub mod book;
pub mod entry;

pub use book::{
    DeactivateEntry, PinEntry, PriceBook, PriceBookCommand, PriceBookEvent, ReactivateEntry,
    RecordEntry, UnpinAll, UnpinEntry, UpdateEntry,
};
pub use entry::{EntryPatch, NewPriceEntry, PriceEntry};
