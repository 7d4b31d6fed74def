//! Dense table assembly.
//!
//! The final grid stage: lay out one cell per surviving slot of the
//! `(1..=row_count) x (0..column_count)` matrix, apply the merges the
//! span resolver planned, and drop every control into the cell that owns
//! its coordinate.

use fxhash::FxHashMap;

use crate::core::context::MigrationOptions;
use crate::core::grid::position::PlacedControl;
use crate::core::grid::span::SpanPlan;
use crate::utils::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel, Diagnostics};
use crate::utils::error::{MigrationError, MigrationResult};

/// A single cell of the assembled table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableCell {
    /// Number of columns this cell occupies
    pub col_span: usize,
    /// Always 1; the target model has no row merges
    pub row_span: usize,
    /// Ids of the controls placed in this cell
    pub controls: Vec<String>,
}

impl TableCell {
    fn with_span(col_span: usize) -> Self {
        Self {
            col_span,
            row_span: 1,
            controls: Vec::new(),
        }
    }
}

/// One row of cells, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// The assembled dense matrix for one fragment, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub column_count: usize,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Number of columns the fragment's table needs: one past the rightmost
/// occupied column, never below the configured minimum.
pub fn column_count_for(controls: &[PlacedControl], min_columns: usize) -> usize {
    let rightmost = controls.iter().map(|c| c.column()).max();
    match rightmost {
        Some(column) => min_columns.max(column + 1),
        None => min_columns,
    }
}

/// Build the dense cell matrix and place every control.
///
/// Suppressed slots are skipped, so each remaining cell carries the span
/// the resolver planned for it. A control sitting in a suppressed column
/// is attached to the owning merged cell; that is the expected outcome
/// for the absorbed caption label, and a data inconsistency for anything
/// else. A control whose row is off the matrix entirely follows the
/// orphan policy: warn and drop, or fail under
/// [`MigrationOptions::strict`].
pub fn assemble_table(
    controls: &[PlacedControl],
    plan: &SpanPlan,
    column_count: usize,
    options: &MigrationOptions,
    diag: &mut Diagnostics,
) -> MigrationResult<Table> {
    let row_count = controls.iter().map(|c| c.row()).max().unwrap_or(0);

    let mut rows = Vec::with_capacity(row_count);
    let mut slots: FxHashMap<(usize, usize), (usize, usize)> = FxHashMap::default();

    for row in 1..=row_count {
        let mut cells = Vec::new();
        for column in 0..column_count {
            if plan.is_suppressed(row, column) {
                continue;
            }
            slots.insert((row, column), (row - 1, cells.len()));
            cells.push(TableCell::with_span(plan.span_at(row, column)));
        }
        rows.push(TableRow { cells });
    }

    let mut table = Table { column_count, rows };

    for control in controls {
        let coordinate = (control.row(), control.column());

        if let Some(&(row_idx, cell_idx)) = slots.get(&coordinate) {
            table.rows[row_idx].cells[cell_idx]
                .controls
                .push(control.id().to_string());
            continue;
        }

        if let Some(owner) = plan.owner_of(coordinate.0, coordinate.1) {
            if let Some(&(row_idx, cell_idx)) = slots.get(&owner) {
                table.rows[row_idx].cells[cell_idx]
                    .controls
                    .push(control.id().to_string());
                if !control.kind().is_label() {
                    diag.add(
                        Diagnostic::new(
                            DiagnosticLevel::Warning,
                            DiagnosticKind::DataInconsistency,
                            format!(
                                "control '{}' sits in a column merged into the cell at row {}, column {}",
                                control.id(),
                                owner.0,
                                owner.1
                            ),
                        )
                        .with_control(control.id())
                        .with_suggestion("control attached to the merged cell"),
                    );
                }
                continue;
            }
        }

        // row off the matrix; cannot occur after compaction
        if options.strict_orphans {
            return Err(MigrationError::orphaned(control.id(), control.row()));
        }
        diag.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                DiagnosticKind::OrphanedControl,
                format!(
                    "control '{}' at row {}, column {} has no slot in the {}x{} table",
                    control.id(),
                    control.row(),
                    control.column(),
                    row_count,
                    column_count
                ),
            )
            .with_control(control.id())
            .with_suggestion("control dropped from placement"),
        );
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ControlIndex;
    use crate::core::grid::position::GridPosition;
    use crate::core::grid::span::resolve_spans;
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
    fn test_minimum_column_count() {
        let controls = vec![placed("a", ControlKind::TextBox, "A", 1, 1)];
        assert_eq!(column_count_for(&controls, 4), 4);
        assert_eq!(column_count_for(&[], 4), 4);
    }

    #[test]
    fn test_column_count_follows_rightmost_control() {
        let controls = vec![placed("a", ControlKind::TextBox, "A", 1, 6)];
        assert_eq!(column_count_for(&controls, 4), 7);
    }

    #[test]
    fn test_assemble_plain_matrix() {
        let controls = vec![
            placed("a", ControlKind::TextBox, "A", 1, 0),
            placed("b", ControlKind::TextBox, "B", 2, 3),
        ];
        let plan = SpanPlan::default();
        let mut diag = Diagnostics::new();
        let table = assemble_table(
            &controls,
            &plan,
            4,
            &MigrationOptions::lenient(),
            &mut diag,
        )
        .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].cells.len(), 4);
        assert_eq!(table.rows[0].cells[0].controls, vec!["a"]);
        assert_eq!(table.rows[1].cells[3].controls, vec!["b"]);
        assert!(table.rows[0].cells.iter().all(|c| c.col_span == 1));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_assemble_applies_merges() {
        let controls = vec![
            placed("rt", ControlKind::RichText, "Comments", 1, 0),
            placed("cap", ControlKind::Label, "Comments", 1, 1),
            placed("next", ControlKind::TextBox, "Status", 1, 2),
        ];
        let index = ControlIndex::build(&controls);
        let plan = resolve_spans(&index, 4);
        let mut diag = Diagnostics::new();
        let table = assemble_table(
            &controls,
            &plan,
            4,
            &MigrationOptions::lenient(),
            &mut diag,
        )
        .unwrap();

        // 4 columns, one suppressed: 3 surviving cells
        assert_eq!(table.rows[0].cells.len(), 3);
        assert_eq!(table.rows[0].cells[0].col_span, 2);
        // the absorbed caption joins the merged cell without complaint
        assert_eq!(table.rows[0].cells[0].controls, vec!["rt", "cap"]);
        assert_eq!(table.rows[0].cells[1].controls, vec!["next"]);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_empty_fragment_yields_empty_table() {
        let plan = SpanPlan::default();
        let mut diag = Diagnostics::new();
        let table =
            assemble_table(&[], &plan, 4, &MigrationOptions::lenient(), &mut diag).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_count, 4);
    }

    #[test]
    fn test_orphan_dropped_with_warning() {
        // a column past the table edge has no slot
        let controls = vec![
            placed("a", ControlKind::TextBox, "A", 1, 0),
            placed("ghost", ControlKind::TextBox, "G", 1, 7),
        ];
        let plan = SpanPlan::default();
        let mut diag = Diagnostics::new();
        let table = assemble_table(
            &controls,
            &plan,
            4,
            &MigrationOptions::lenient(),
            &mut diag,
        )
        .unwrap();

        assert_eq!(table.rows[0].cells[0].controls, vec!["a"]);
        assert_eq!(diag.count_of(DiagnosticKind::OrphanedControl), 1);
    }

    #[test]
    fn test_orphan_fails_in_strict_mode() {
        let controls = vec![placed("ghost", ControlKind::TextBox, "G", 1, 7)];
        let plan = SpanPlan::default();
        let mut diag = Diagnostics::new();
        let result = assemble_table(
            &controls,
            &plan,
            4,
            &MigrationOptions::strict(),
            &mut diag,
        );
        assert!(matches!(result, Err(MigrationError::OrphanedControl { .. })));
    }
}
