//! In-memory state shared by all handlers.
//!
//! - `FilterStore` - trigger → reply mapping
//! - `SetupTracker` - per-user button setup state

mod filter;
mod filter_store;
mod setup;

pub use filter::{Filter, InlineButton};
pub use filter_store::{FilterStore, FilterSummary};
pub use setup::{SetupState, SetupTracker};
