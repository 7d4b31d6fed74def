//! Grid Layout Compaction Engine
//!
//! Turns the sparse, gap-ridden coordinates of a legacy fragment into a
//! dense table matrix with correct column merges.
//!
//! # Architecture
//!
//! The stages run strictly left to right, each producing a new derived
//! collection:
//!
//! ```text
//! Raw controls -> PositionCodec -> RowCompactor -> SpanResolver -> TableAssembler
//! ```
//!
//! # Example
//!
//! ```ignore
//! let placed = resolve_positions(&controls, &options, &mut diag)?;
//! let compacted = compact_rows(&placed, &markers, &mut diag);
//! let index = ControlIndex::build(&compacted.controls);
//! let plan = resolve_spans(&index, column_count);
//! let table = assemble_table(&compacted.controls, &plan, column_count, &options, &mut diag)?;
//! ```

mod assemble;
mod compact;
pub(crate) mod position;
mod span;


// Re-export public API
pub use assemble::{assemble_table, column_count_for, Table, TableCell, TableRow};
pub use compact::{compact_rows, extract_title, CompactedFragment, RowMap};
pub use position::{
    decode_position, encode_position, resolve_positions, GridPosition, PlacedControl,
};
pub use span::{resolve_spans, SpanPlan};
