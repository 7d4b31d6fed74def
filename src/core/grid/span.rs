//! Column span resolution for wide controls.
//!
//! Wide controls (rich text, memos, images, embedded grids) occupy every
//! free column to their right until something blocks them. The resolver
//! scans each wide control's row and records which columns its cell
//! absorbs; the assembler later skips those suppressed slots.

use fxhash::FxHashMap;

use crate::core::context::ControlIndex;

/// Resolved merges for one fragment: spans per owning cell, plus the
/// suppressed coordinates each merge absorbs.
#[derive(Debug, Clone, Default)]
pub struct SpanPlan {
    spans: FxHashMap<(usize, usize), usize>,
    suppressed: FxHashMap<(usize, usize), (usize, usize)>,
}

impl SpanPlan {
    /// Column span of the cell at `(row, column)`; 1 unless a merge owns
    /// the slot.
    pub fn span_at(&self, row: usize, column: usize) -> usize {
        self.spans.get(&(row, column)).copied().unwrap_or(1)
    }

    /// Whether the slot is absorbed by a neighboring merge
    pub fn is_suppressed(&self, row: usize, column: usize) -> bool {
        self.suppressed.contains_key(&(row, column))
    }

    /// Owning cell of a suppressed slot
    pub fn owner_of(&self, row: usize, column: usize) -> Option<(usize, usize)> {
        self.suppressed.get(&(row, column)).copied()
    }

    /// Number of merged cells
    pub fn merge_count(&self) -> usize {
        self.spans.len()
    }
}

/// Compute spans for every wide control in the fragment.
///
/// For a wide control at `(row, col)`, columns `col+1..` are scanned for
/// the first blocking column; the span runs up to it, or to
/// `column_count` when the row stays clear. Every resolved span satisfies
/// `span >= 1` and `col + span <= column_count`.
pub fn resolve_spans(index: &ControlIndex<'_>, column_count: usize) -> SpanPlan {
    let mut plan = SpanPlan::default();

    for control in index.controls() {
        if !control.kind().is_wide() {
            continue;
        }
        let (row, col) = (control.row(), control.column());
        if col >= column_count {
            // nothing to the right inside the table
            continue;
        }

        let mut blocking = column_count;
        for candidate in (col + 1)..column_count {
            if blocks_at(index, row, candidate) {
                blocking = candidate;
                break;
            }
        }

        let span = blocking.saturating_sub(col).max(1);
        if span > 1 {
            plan.spans.insert((row, col), span);
            for absorbed in (col + 1)..(col + span) {
                plan.suppressed.insert((row, absorbed), (row, col));
            }
        }
    }

    plan
}

/// A column blocks the scan when it holds a control that is not a label,
/// or a label that does not caption an already-started field. A label
/// sharing its name with an earlier control (usually the wide control
/// itself) is an attached caption and gets absorbed instead.
fn blocks_at(index: &ControlIndex<'_>, row: usize, column: usize) -> bool {
    index.at_cell(row, column).iter().any(|&idx| {
        let occupant = index.control(idx);
        if !occupant.kind().is_label() {
            return true;
        }
        !index.has_earlier_with_name(occupant.name(), row, column)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::position::{GridPosition, PlacedControl};
    use crate::core::model::Control;
    use crate::data::kinds::ControlKind;
    use pretty_assertions::assert_eq;

    fn placed(id: &str, kind: ControlKind, name: &str, row: usize, column: usize) -> PlacedControl {
        PlacedControl {
            control: Control::new(id, kind, name, ""),
            position: GridPosition::new(row, column),
        }
    }

    #[test]
    fn test_wide_control_spans_to_attached_caption() {
        // rich text at col 0, its caption at col 1, next field at col 2
        let controls = vec![
            placed("rt", ControlKind::RichText, "Comments", 3, 0),
            placed("cap", ControlKind::Label, "Comments", 3, 1),
            placed("next", ControlKind::TextBox, "Status", 3, 2),
        ];
        let index = ControlIndex::build(&controls);
        let plan = resolve_spans(&index, 4);

        assert_eq!(plan.span_at(3, 0), 2);
        assert!(plan.is_suppressed(3, 1));
        assert_eq!(plan.owner_of(3, 1), Some((3, 0)));
        assert!(!plan.is_suppressed(3, 2));
    }

    #[test]
    fn test_independent_label_blocks() {
        // the label at col 1 captions the upcoming field, not the memo
        let controls = vec![
            placed("memo", ControlKind::Memo, "Notes", 1, 0),
            placed("cap", ControlKind::Label, "Status", 1, 1),
            placed("status", ControlKind::TextBox, "Status", 1, 2),
        ];
        let index = ControlIndex::build(&controls);
        let plan = resolve_spans(&index, 4);

        assert_eq!(plan.span_at(1, 0), 1);
        assert!(!plan.is_suppressed(1, 1));
        assert_eq!(plan.merge_count(), 0);
    }

    #[test]
    fn test_clear_row_spans_to_table_edge() {
        let controls = vec![placed("rt", ControlKind::RichText, "Body", 2, 1)];
        let index = ControlIndex::build(&controls);
        let plan = resolve_spans(&index, 5);

        assert_eq!(plan.span_at(2, 1), 4);
        assert!(plan.is_suppressed(2, 2));
        assert!(plan.is_suppressed(2, 3));
        assert!(plan.is_suppressed(2, 4));
    }

    #[test]
    fn test_non_label_blocks_immediately() {
        let controls = vec![
            placed("rt", ControlKind::RichText, "Body", 2, 0),
            placed("cb", ControlKind::CheckBox, "Done", 2, 1),
        ];
        let index = ControlIndex::build(&controls);
        let plan = resolve_spans(&index, 4);

        assert_eq!(plan.span_at(2, 0), 1);
        assert_eq!(plan.merge_count(), 0);
    }

    #[test]
    fn test_span_bounds() {
        let controls = vec![
            placed("rt", ControlKind::RichText, "Body", 1, 2),
            placed("img", ControlKind::Image, "Logo", 2, 3),
        ];
        let index = ControlIndex::build(&controls);
        let column_count = 4;
        let plan = resolve_spans(&index, column_count);

        for control in &controls {
            let span = plan.span_at(control.row(), control.column());
            assert!(span >= 1);
            assert!(control.column() + span <= column_count);
        }
    }

    #[test]
    fn test_narrow_controls_never_merge() {
        let controls = vec![
            placed("a", ControlKind::TextBox, "A", 1, 0),
            placed("b", ControlKind::TextBox, "B", 1, 2),
        ];
        let index = ControlIndex::build(&controls);
        let plan = resolve_spans(&index, 4);
        assert_eq!(plan.merge_count(), 0);
    }
}
