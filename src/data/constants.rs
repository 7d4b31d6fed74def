//! Layout constants shared across the migration engine.

/// Row assigned to controls whose position token carries no usable row.
///
/// 999 sorts after every realistically authored row, so a control with a
/// broken token lands at the end of its fragment instead of vanishing.
pub const FALLBACK_ROW: usize = 999;

/// Target tables are never narrower than this many columns.
pub const MIN_COLUMN_COUNT: usize = 4;

/// Stride between order keys synthesized from sequence positions.
///
/// Must exceed [`FALLBACK_ROW`]: any entry with a real row position has to
/// sort ahead of the first synthesized key.
pub const ORDER_STRIDE: u64 = 10_000;

/// Order key for entries with no derivable position at all: always last.
pub const TERMINAL_ORDER_KEY: u64 = u64::MAX;
