//! Default-visibility directives for composite members.
//!
//! A top-level repeating section shows its item fragment as the visible
//! surface and keeps the list fragment as hidden backing data. A nested
//! section is never visible by default at all; runtime drill-down logic
//! (owned by an external collaborator) reveals it.

use indexmap::IndexSet;

use crate::core::compose::order::FragmentPair;

/// Display order of a composite's members.
pub fn member_order(pair: &FragmentPair) -> [String; 2] {
    if pair.is_top_level {
        [pair.item_id.clone(), pair.list_id.clone()]
    } else {
        [pair.list_id.clone(), pair.item_id.clone()]
    }
}

/// Members hidden by default: always the list, and for nested sections
/// the item as well.
pub fn hidden_members(pair: &FragmentPair) -> IndexSet<String> {
    let mut hidden = IndexSet::new();
    hidden.insert(pair.list_id.clone());
    if !pair.is_top_level {
        hidden.insert(pair.item_id.clone());
    }
    hidden
}
