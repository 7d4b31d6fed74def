//! Core migration engine
//!
//! This module contains the two engines and their shared records:
//! - `grid`: sparse coordinates to dense table matrix (per fragment)
//! - `compose`: fragment ordering and composite grouping (per form)
//! - `model`: input records handed over by the form-definition parser
//! - `context`: options and per-invocation lookup tables
//!
//! The whole pipeline is a one-shot, stateless transform: re-running it
//! on the same input produces the same output, and nothing is cached
//! across invocations.

pub mod compose;
pub mod context;
pub mod grid;
pub mod model;

// Re-export main types for convenience
pub use compose::{match_pairs, order_areas, Area, FragmentPair, PairMatch};
pub use context::{ControlIndex, MigrationOptions};
pub use grid::{
    assemble_table, column_count_for, compact_rows, decode_position, encode_position,
    extract_title, resolve_positions, resolve_spans, CompactedFragment, GridPosition,
    PlacedControl, RowMap, SpanPlan, Table, TableCell, TableRow,
};
pub use model::{Control, FormFragment, FragmentRole, SectionKind, SectionMarker};

use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::MigrationResult;

/// Everything the grid engine produces for one fragment.
#[derive(Debug, Clone)]
pub struct FragmentLayout {
    /// Title extracted from a lone row-1 caption, if any
    pub title: Option<String>,
    /// The assembled dense table
    pub table: Table,
    /// Original-to-dense row mapping used during compaction
    pub row_map: RowMap,
    /// Markers renumbered alongside the controls
    pub markers: Vec<SectionMarker>,
    /// Events collected along the way
    pub diagnostics: Diagnostics,
}

/// The composed, display-ordered layout of a whole form.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Areas in final display order
    pub areas: Vec<Area>,
    /// Ids of list/item halves excluded for lack of a counterpart
    pub unmatched: Vec<String>,
    /// Events collected along the way
    pub diagnostics: Diagnostics,
}

/// Run the full grid pipeline for one fragment with default options.
pub fn layout_fragment(controls: &[Control], markers: &[SectionMarker]) -> FragmentLayout {
    // lenient options never produce an error
    match layout_fragment_with_options(controls, markers, &MigrationOptions::lenient()) {
        Ok(layout) => layout,
        Err(err) => unreachable!("lenient layout failed: {}", err),
    }
}

/// Run the full grid pipeline for one fragment.
///
/// Decode positions, compact rows, optionally extract the title, resolve
/// spans, assemble the table. Only the strict options can fail.
pub fn layout_fragment_with_options(
    controls: &[Control],
    markers: &[SectionMarker],
    options: &MigrationOptions,
) -> MigrationResult<FragmentLayout> {
    let mut diagnostics = Diagnostics::new();

    let placed = grid::resolve_positions(controls, options, &mut diagnostics)?;
    let compacted = grid::compact_rows(&placed, markers, &mut diagnostics);

    let (title, controls, markers) = if options.extract_title {
        grid::extract_title(&compacted.controls, &compacted.markers)
    } else {
        (None, compacted.controls, compacted.markers)
    };

    let column_count = grid::column_count_for(&controls, options.min_columns);
    let index = context::ControlIndex::build(&controls);
    let plan = grid::resolve_spans(&index, column_count);
    let table = grid::assemble_table(&controls, &plan, column_count, options, &mut diagnostics)?;

    Ok(FragmentLayout {
        title,
        table,
        row_map: compacted.row_map,
        markers,
        diagnostics,
    })
}

/// Compose a whole form's fragments into the final area list.
///
/// Matches list/item halves into pairs, derives order keys, sorts, and
/// attaches visibility directives. Never fails; everything recoverable
/// lands in the diagnostics.
pub fn compose_areas(fragments: &[FormFragment]) -> Composition {
    let mut diagnostics = Diagnostics::new();

    let matched = compose::match_pairs(fragments, &mut diagnostics);
    let areas = compose::order_areas(fragments, &matched.pairs, &mut diagnostics);

    Composition {
        areas,
        unmatched: matched.unmatched,
        diagnostics,
    }
}
