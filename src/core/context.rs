//! Options and per-invocation lookup tables.
//!
//! Nothing in the engine is process-wide: options travel with the call,
//! and the lookup tables the span and assembly stages need are built once
//! per fragment invocation and passed by reference.

use fxhash::FxHashMap;

use crate::core::grid::position::PlacedControl;

// =============================================================================
// Migration options
// =============================================================================

/// Options for the layout migration
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Fail on position tokens with no usable row instead of substituting
    /// the fallback row.
    /// Default: false
    pub strict_tokens: bool,

    /// Fail on controls whose row falls outside the assembled matrix
    /// instead of dropping them with a warning.
    /// Default: false
    pub strict_orphans: bool,

    /// Extract a lone row-1 label as the fragment title and shift the
    /// remaining rows up.
    /// Default: true
    pub extract_title: bool,

    /// Minimum number of table columns to emit.
    /// Default: 4
    pub min_columns: usize,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            strict_tokens: false,
            strict_orphans: false,
            extract_title: true,
            min_columns: crate::data::constants::MIN_COLUMN_COUNT,
        }
    }
}

impl MigrationOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient policy: substitute sentinels, drop orphans with a warning,
    /// keep going. This is the behavior of the legacy migrator.
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Strict policy: promote the lenient fallbacks to hard errors.
    pub fn strict() -> Self {
        Self {
            strict_tokens: true,
            strict_orphans: true,
            ..Self::default()
        }
    }
}

// =============================================================================
// Per-invocation control index
// =============================================================================

/// Immutable lookup tables over one fragment's placed controls.
///
/// Built once per invocation, then shared by reference across the span
/// resolution and assembly stages. Indices refer into the slice the table
/// was built from.
#[derive(Debug)]
pub struct ControlIndex<'a> {
    controls: &'a [PlacedControl],
    by_id: FxHashMap<&'a str, usize>,
    by_cell: FxHashMap<(usize, usize), Vec<usize>>,
}

impl<'a> ControlIndex<'a> {
    /// Build the index for a fragment's controls
    pub fn build(controls: &'a [PlacedControl]) -> Self {
        let mut by_id = FxHashMap::default();
        let mut by_cell: FxHashMap<(usize, usize), Vec<usize>> = FxHashMap::default();

        for (idx, placed) in controls.iter().enumerate() {
            by_id.entry(placed.id()).or_insert(idx);
            by_cell
                .entry((placed.row(), placed.column()))
                .or_default()
                .push(idx);
        }

        Self {
            controls,
            by_id,
            by_cell,
        }
    }

    /// All indexed controls, in input order
    pub fn controls(&self) -> &'a [PlacedControl] {
        self.controls
    }

    /// Control by slice index
    pub fn control(&self, idx: usize) -> &'a PlacedControl {
        &self.controls[idx]
    }

    /// Control by id
    pub fn by_id(&self, id: &str) -> Option<&'a PlacedControl> {
        self.by_id.get(id).map(|&idx| &self.controls[idx])
    }

    /// Indices of the controls occupying a cell
    pub fn at_cell(&self, row: usize, column: usize) -> &[usize] {
        self.by_cell
            .get(&(row, column))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any control strictly before `(row, column)` in row-major
    /// order carries the given field name. Used by span resolution to
    /// tell attached captions from independent labels.
    pub fn has_earlier_with_name(&self, name: &str, row: usize, column: usize) -> bool {
        self.controls.iter().any(|c| {
            (c.row(), c.column()) < (row, column) && c.name() == name
        })
    }
}
