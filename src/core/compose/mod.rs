//! Fragment Composition Engine
//!
//! Orders independently-generated fragments into a single composite
//! layout: standalone sections interleaved with list/item pairs for
//! repeating sections, each pair carrying its default-visibility
//! directive.
//!
//! ```text
//! fragments -> match_pairs -> order_areas (keys, stable sort, visibility) -> Area list
//! ```

mod order;
mod visibility;


// Re-export public API
pub use order::{match_pairs, order_areas, Area, FragmentPair, PairMatch};
pub use visibility::{hidden_members, member_order};
