//! Row compaction: dense renumbering and title extraction.
//!
//! Hand-authored layouts skip row numbers freely (a form with controls on
//! rows 1, 3 and 5 is the norm, not the exception). Compaction maps the
//! occupied rows onto a gap-free numbering starting at 1 so the assembled
//! table has no empty bands. Title extraction is a related, single-shift
//! renumbering: a lone caption on the first row becomes the fragment
//! title instead of a table row.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::core::grid::position::PlacedControl;
use crate::core::model::SectionMarker;
use crate::utils::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel, Diagnostics};

/// Mapping from original row numbers to the dense renumbering. Iteration
/// order is ascending original row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMap {
    map: IndexMap<usize, usize>,
}

impl RowMap {
    /// Build the map for the distinct rows in the input, renumbered
    /// consecutively from 1 in ascending order.
    pub fn from_rows(rows: impl IntoIterator<Item = usize>) -> Self {
        let distinct: BTreeSet<usize> = rows.into_iter().collect();
        let map = distinct
            .into_iter()
            .enumerate()
            .map(|(i, row)| (row, i + 1))
            .collect();
        Self { map }
    }

    /// Dense row for an original row
    pub fn get(&self, row: usize) -> Option<usize> {
        self.map.get(&row).copied()
    }

    /// Whether every row maps to itself
    pub fn is_identity(&self) -> bool {
        self.map.iter().all(|(from, to)| from == to)
    }

    /// Number of occupied rows; also the highest dense row number
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate `(original, dense)` pairs in ascending original order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.map.iter().map(|(&from, &to)| (from, to))
    }
}

/// A fragment's controls and markers after dense renumbering.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactedFragment {
    pub controls: Vec<PlacedControl>,
    pub markers: Vec<SectionMarker>,
    pub row_map: RowMap,
}

impl CompactedFragment {
    /// Highest row in the compacted fragment
    pub fn row_count(&self) -> usize {
        self.row_map.len()
    }
}

/// Remove unused row numbers from a fragment.
///
/// Every control row is rewritten through the freshly built [`RowMap`].
/// Marker rows are rewritten too; a marker row that does not correspond
/// to any occupied row is kept at its original value and flagged as a
/// data inconsistency, never silently adjusted. With zero controls, or a
/// map that is already the identity, the output equals the input.
pub fn compact_rows(
    controls: &[PlacedControl],
    markers: &[SectionMarker],
    diag: &mut Diagnostics,
) -> CompactedFragment {
    let row_map = RowMap::from_rows(controls.iter().map(|c| c.row()));

    let controls = controls
        .iter()
        .map(|placed| {
            let mut placed = placed.clone();
            // every control row is in the map by construction
            if let Some(dense) = row_map.get(placed.row()) {
                placed.position.row = dense;
            }
            placed
        })
        .collect();

    let markers = markers
        .iter()
        .map(|marker| remap_marker(marker, &row_map, diag))
        .collect();

    CompactedFragment {
        controls,
        markers,
        row_map,
    }
}

fn remap_marker(marker: &SectionMarker, row_map: &RowMap, diag: &mut Diagnostics) -> SectionMarker {
    let mut out = marker.clone();

    match row_map.get(marker.start_row) {
        Some(dense) => out.start_row = dense,
        None => diag.add(marker_row_warning(marker, "start", marker.start_row)),
    }
    match row_map.get(marker.end_row) {
        Some(dense) => out.end_row = dense,
        None => diag.add(marker_row_warning(marker, "end", marker.end_row)),
    }

    out
}

fn marker_row_warning(marker: &SectionMarker, which: &str, row: usize) -> Diagnostic {
    Diagnostic::new(
        DiagnosticLevel::Warning,
        DiagnosticKind::DataInconsistency,
        format!(
            "{} row {} of section '{}' does not correspond to any occupied row",
            which, row, marker.name
        ),
    )
    .with_suggestion("row kept as-is; verify the section bounds in the source form")
}

/// Extract a lone row-1 caption as the fragment title.
///
/// Applies only when row 1 holds exactly one control, that control is a
/// label, and at least one non-label control exists at row 2 or below.
/// The label is removed and every remaining row at 2 or below shifts up
/// by one (marker rows likewise). A single deterministic shift, meant to
/// run once, after [`compact_rows`].
pub fn extract_title(
    controls: &[PlacedControl],
    markers: &[SectionMarker],
) -> (Option<String>, Vec<PlacedControl>, Vec<SectionMarker>) {
    let row_one: Vec<&PlacedControl> = controls.iter().filter(|c| c.row() == 1).collect();
    let has_data_below = controls
        .iter()
        .any(|c| c.row() >= 2 && !c.kind().is_label());

    let title_control = match row_one.as_slice() {
        [only] if only.kind().is_label() && has_data_below => *only,
        _ => return (None, controls.to_vec(), markers.to_vec()),
    };

    let title = title_control.control.display_text().to_string();

    let remaining = controls
        .iter()
        .filter(|c| c.id() != title_control.id())
        .map(|placed| {
            let mut placed = placed.clone();
            if placed.position.row >= 2 {
                placed.position.row -= 1;
            }
            placed
        })
        .collect();

    let markers = markers
        .iter()
        .map(|marker| {
            let mut marker = marker.clone();
            if marker.start_row >= 2 {
                marker.start_row -= 1;
            }
            if marker.end_row >= 2 {
                marker.end_row -= 1;
            }
            marker
        })
        .collect();

    (Some(title), remaining, markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::position::GridPosition;
    use crate::core::model::Control;
    use crate::data::kinds::ControlKind;
    use pretty_assertions::assert_eq;

    fn placed(id: &str, kind: ControlKind, row: usize, column: usize) -> PlacedControl {
        PlacedControl {
            control: Control::new(id, kind, id, ""),
            position: GridPosition::new(row, column),
        }
    }

    #[test]
    fn test_compact_removes_gaps() {
        let controls = vec![
            placed("a", ControlKind::TextBox, 1, 0),
            placed("b", ControlKind::TextBox, 3, 0),
            placed("c", ControlKind::TextBox, 5, 1),
        ];
        let mut diag = Diagnostics::new();
        let compacted = compact_rows(&controls, &[], &mut diag);

        let rows: Vec<usize> = compacted.controls.iter().map(|c| c.row()).collect();
        assert_eq!(rows, vec![1, 2, 3]);
        assert_eq!(compacted.row_count(), 3);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_compact_identity_is_noop() {
        let controls = vec![
            placed("a", ControlKind::TextBox, 1, 0),
            placed("b", ControlKind::TextBox, 2, 0),
        ];
        let mut diag = Diagnostics::new();
        let compacted = compact_rows(&controls, &[], &mut diag);

        assert!(compacted.row_map.is_identity());
        assert_eq!(compacted.controls, controls);
    }

    #[test]
    fn test_compact_empty_input() {
        let mut diag = Diagnostics::new();
        let compacted = compact_rows(&[], &[], &mut diag);
        assert!(compacted.controls.is_empty());
        assert!(compacted.row_map.is_empty());
        assert_eq!(compacted.row_count(), 0);
    }

    #[test]
    fn test_compact_remaps_markers() {
        let controls = vec![
            placed("a", ControlKind::TextBox, 2, 0),
            placed("b", ControlKind::TextBox, 6, 0),
        ];
        let markers = vec![SectionMarker::repeating("Items", 2, 6)];
        let mut diag = Diagnostics::new();
        let compacted = compact_rows(&controls, &markers, &mut diag);

        assert_eq!(compacted.markers[0].start_row, 1);
        assert_eq!(compacted.markers[0].end_row, 2);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_compact_flags_unmapped_marker_row() {
        let controls = vec![placed("a", ControlKind::TextBox, 2, 0)];
        let markers = vec![SectionMarker::repeating("Items", 2, 9)];
        let mut diag = Diagnostics::new();
        let compacted = compact_rows(&controls, &markers, &mut diag);

        // start row mapped, end row kept and flagged
        assert_eq!(compacted.markers[0].start_row, 1);
        assert_eq!(compacted.markers[0].end_row, 9);
        assert_eq!(diag.count_of(DiagnosticKind::DataInconsistency), 1);
    }

    #[test]
    fn test_extract_title_shift() {
        let controls = vec![
            placed("title", ControlKind::Label, 1, 0),
            placed("f1", ControlKind::TextBox, 2, 0),
            placed("f2", ControlKind::TextBox, 3, 1),
        ];
        let markers = vec![SectionMarker::repeating("Items", 2, 3)];
        let (title, remaining, markers) = extract_title(&controls, &markers);

        assert_eq!(title.as_deref(), Some("title"));
        let rows: Vec<usize> = remaining.iter().map(|c| c.row()).collect();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(markers[0].start_row, 1);
        assert_eq!(markers[0].end_row, 2);
    }

    #[test]
    fn test_extract_title_requires_lone_label() {
        // second control on row 1 makes it a layout row, not a title
        let controls = vec![
            placed("cap", ControlKind::Label, 1, 0),
            placed("f0", ControlKind::TextBox, 1, 1),
            placed("f1", ControlKind::TextBox, 2, 0),
        ];
        let (title, remaining, _) = extract_title(&controls, &[]);
        assert_eq!(title, None);
        assert_eq!(remaining, controls);
    }

    #[test]
    fn test_extract_title_requires_data_below() {
        let controls = vec![
            placed("cap", ControlKind::Label, 1, 0),
            placed("cap2", ControlKind::Label, 2, 0),
        ];
        let (title, _, _) = extract_title(&controls, &[]);
        assert_eq!(title, None);
    }

    #[test]
    fn test_extract_title_requires_label_kind() {
        let controls = vec![
            placed("f0", ControlKind::TextBox, 1, 0),
            placed("f1", ControlKind::TextBox, 2, 0),
        ];
        let (title, _, _) = extract_title(&controls, &[]);
        assert_eq!(title, None);
    }
}
