//! # formlift
//!
//! Grid layout compaction and fragment composition engine for migrating
//! legacy electronic forms to a structured layout model.
//!
//! ## Features
//!
//! - **Dense Tables**: sparse, gap-ridden row/column tokens become a
//!   dense cell matrix with correct column merges for wide controls
//! - **Title Extraction**: a lone row-1 caption becomes the fragment
//!   title instead of a table row
//! - **Fragment Composition**: standalone sections and list/item pairs
//!   for repeating sections sort into one deterministic display order
//! - **Visibility Directives**: composite members carry default-hidden
//!   sets derived from the top-level/nested classification
//! - **Structured Diagnostics**: malformed tokens, orphaned controls and
//!   unmatched pairs surface as events, never as aborts
//! - **Stateless**: one-shot, copy-on-write transforms; re-invocation on
//!   the same input is idempotent
//!
//! ## Usage Examples
//!
//! ### Laying out one fragment
//!
//! ```rust
//! use formlift::{layout_fragment, Control, ControlKind};
//!
//! let controls = vec![
//!     Control::new("title", ControlKind::Label, "Invoice", "1A").with_label("Invoice"),
//!     Control::new("amount", ControlKind::TextBox, "Amount", "3B"),
//! ];
//!
//! let layout = layout_fragment(&controls, &[]);
//! assert_eq!(layout.title.as_deref(), Some("Invoice"));
//! assert_eq!(layout.table.row_count(), 1);
//! ```
//!
//! ### Composing a whole form
//!
//! ```rust
//! use formlift::{compose_areas, FormFragment, FragmentRole};
//!
//! let fragments = vec![
//!     FormFragment::new("Items_list", FragmentRole::List).with_section_name("Items"),
//!     FormFragment::new("Items_item", FragmentRole::Item).with_section_name("Items"),
//! ];
//!
//! let composition = compose_areas(&fragments);
//! assert_eq!(composition.areas.len(), 1);
//! // the list half is hidden backing data
//! assert!(composition.areas[0].is_hidden("Items_list"));
//! ```

/// Core migration engine
pub mod core;

/// Data layer - static mappings and constants
pub mod data;

/// Utility modules
pub mod utils;

// Re-export the engine API
pub use core::{
    compose_areas, layout_fragment, layout_fragment_with_options, Area, CompactedFragment,
    Composition, Control, ControlIndex, FormFragment, FragmentLayout, FragmentPair, FragmentRole,
    GridPosition, MigrationOptions, PairMatch, PlacedControl, RowMap, SectionKind, SectionMarker,
    SpanPlan, Table, TableCell, TableRow,
};

// Re-export the codec and stage functions for callers that drive the
// stages themselves
pub use core::{
    assemble_table, column_count_for, compact_rows, decode_position, encode_position,
    extract_title, match_pairs, order_areas, resolve_positions, resolve_spans,
};

// Re-export data and utility layers
pub use data::constants;
pub use data::ControlKind;
pub use utils::diagnostics;
pub use utils::diagnostics::{format_diagnostics, Diagnostics};
pub use utils::error::{MigrationError, MigrationResult};

/// A whole form, migrated: every fragment's table plus the composed
/// area order.
#[derive(Debug, Clone)]
pub struct FormLayout {
    /// Per-fragment layouts, keyed by fragment id, in input order
    pub fragments: Vec<(String, FragmentLayout)>,
    /// The composed, display-ordered area list
    pub composition: Composition,
}

/// Migrate a whole form with default options.
pub fn migrate_form(fragments: &[FormFragment]) -> FormLayout {
    match migrate_form_with_options(fragments, &MigrationOptions::lenient()) {
        Ok(layout) => layout,
        Err(err) => unreachable!("lenient migration failed: {}", err),
    }
}

/// Migrate a whole form: run the grid pipeline for every fragment and
/// compose the final area order.
pub fn migrate_form_with_options(
    fragments: &[FormFragment],
    options: &MigrationOptions,
) -> MigrationResult<FormLayout> {
    let mut layouts = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let layout =
            layout_fragment_with_options(&fragment.controls, &fragment.markers, options)?;
        layouts.push((fragment.id.clone(), layout));
    }

    Ok(FormLayout {
        fragments: layouts,
        composition: compose_areas(fragments),
    })
}
