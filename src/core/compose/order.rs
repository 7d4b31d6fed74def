//! Fragment ordering and composite grouping.
//!
//! Fragments arrive from the upstream splitter in no particular order:
//! standalone sections carry their own controls, repeating sections
//! arrive as separate list and item halves. This stage matches the
//! halves into pairs, derives an order key for every entry, and emits
//! the final display-ordered area list.

use fxhash::FxHashMap;
use indexmap::IndexMap;

use crate::core::compose::visibility::{hidden_members, member_order};
use crate::core::grid::position::decode_position;
use crate::core::model::{FormFragment, FragmentRole, SectionKind};
use crate::data::constants::{ORDER_STRIDE, TERMINAL_ORDER_KEY};
use crate::utils::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel, Diagnostics};

/// A matched list/item pair rendering one repeating section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FragmentPair {
    pub list_id: String,
    pub item_id: String,
    pub section_name: String,
    /// True iff the section has no enclosing parent repeating section.
    /// Read from source metadata, not derived.
    pub is_top_level: bool,
}

/// One entry of the final, display-ordered layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Area {
    /// A standalone fragment
    Single { fragment: String },
    /// A composite of a list/item pair, members in display order
    Pair {
        members: [String; 2],
        hidden: indexmap::IndexSet<String>,
        section: String,
    },
}

impl Area {
    /// Fragment ids contained in this area
    pub fn fragment_ids(&self) -> Vec<&str> {
        match self {
            Area::Single { fragment } => vec![fragment.as_str()],
            Area::Pair { members, .. } => members.iter().map(String::as_str).collect(),
        }
    }

    /// Whether the given member is hidden by default
    pub fn is_hidden(&self, fragment: &str) -> bool {
        match self {
            Area::Single { .. } => false,
            Area::Pair { hidden, .. } => hidden.contains(fragment),
        }
    }
}

/// Result of matching list/item halves by section name.
#[derive(Debug, Default)]
pub struct PairMatch {
    pub pairs: Vec<FragmentPair>,
    /// Ids of halves with no counterpart, excluded from grouping
    pub unmatched: Vec<String>,
}

/// Match list and item fragments into pairs by section name.
///
/// A half without a counterpart is reported as an UnmatchedPair warning
/// and excluded; whether its solitary half still renders standalone is
/// the caller's policy decision, nothing is synthesized here.
pub fn match_pairs(fragments: &[FormFragment], diag: &mut Diagnostics) -> PairMatch {
    let mut lists: IndexMap<&str, &FormFragment> = IndexMap::new();
    let mut items: IndexMap<&str, &FormFragment> = IndexMap::new();
    let mut result = PairMatch::default();

    for fragment in fragments {
        let bucket = match fragment.role {
            FragmentRole::List => &mut lists,
            FragmentRole::Item => &mut items,
            FragmentRole::Standalone => continue,
        };
        match fragment.section_name.as_deref() {
            Some(section) => {
                if bucket.insert(section, fragment).is_some() {
                    diag.add(
                        Diagnostic::new(
                            DiagnosticLevel::Warning,
                            DiagnosticKind::DataInconsistency,
                            format!(
                                "section '{}' has more than one {:?} fragment; keeping the last",
                                section, fragment.role
                            ),
                        )
                        .with_fragment(&fragment.id),
                    );
                }
            }
            None => {
                report_unmatched(fragment, "it names no section", diag);
                result.unmatched.push(fragment.id.clone());
            }
        }
    }

    for (section, list) in &lists {
        match items.shift_remove(section) {
            Some(item) => {
                let parent = list
                    .parent_section_name
                    .as_deref()
                    .or(item.parent_section_name.as_deref());
                result.pairs.push(FragmentPair {
                    list_id: list.id.clone(),
                    item_id: item.id.clone(),
                    section_name: (*section).to_string(),
                    is_top_level: parent.is_none(),
                });
            }
            None => {
                report_unmatched(list, "no item fragment shares its section", diag);
                result.unmatched.push(list.id.clone());
            }
        }
    }

    for item in items.values() {
        report_unmatched(item, "no list fragment shares its section", diag);
        result.unmatched.push(item.id.clone());
    }

    result
}

fn report_unmatched(fragment: &FormFragment, reason: &str, diag: &mut Diagnostics) {
    diag.add(
        Diagnostic::new(
            DiagnosticLevel::Warning,
            DiagnosticKind::UnmatchedPair,
            format!(
                "{:?} fragment '{}' excluded from grouping: {}",
                fragment.role, fragment.id, reason
            ),
        )
        .with_fragment(&fragment.id),
    );
}

/// Internal sort entry
struct PositionedEntry {
    order_key: u64,
    content: EntryContent,
}

enum EntryContent {
    Single(String),
    Pair(FragmentPair),
}

/// Derive order keys, sort, and build the final area list.
///
/// Key derivation, in priority order: an independently known position
/// (minimum control row for a standalone fragment, declared start row of
/// the matching repeating marker for a pair); else the sequence position
/// scaled by [`ORDER_STRIDE`]; else the terminal sentinel, reported as an
/// UnresolvedOrderKey. The sort is stable, so ties keep first-seen
/// order.
pub fn order_areas(
    fragments: &[FormFragment],
    pairs: &[FragmentPair],
    diag: &mut Diagnostics,
) -> Vec<Area> {
    // declared start rows of repeating sections, first declaration wins
    let mut section_rows: FxHashMap<&str, usize> = FxHashMap::default();
    for fragment in fragments {
        for marker in &fragment.markers {
            if marker.kind == SectionKind::Repeating {
                section_rows.entry(&marker.name).or_insert(marker.start_row);
            }
        }
    }

    let mut entries = Vec::new();

    for (sequence, fragment) in fragments
        .iter()
        .filter(|f| f.role == FragmentRole::Standalone)
        .enumerate()
    {
        let order_key = match min_control_row(fragment) {
            Some(row) => row as u64,
            None => (sequence as u64 + 1) * ORDER_STRIDE,
        };
        entries.push(PositionedEntry {
            order_key,
            content: EntryContent::Single(fragment.id.clone()),
        });
    }

    for pair in pairs {
        let order_key = match section_rows.get(pair.section_name.as_str()) {
            Some(&row) => row as u64,
            None => {
                diag.add(
                    Diagnostic::new(
                        DiagnosticLevel::Info,
                        DiagnosticKind::UnresolvedOrderKey,
                        format!(
                            "no declared start row for section '{}'; pair appended last",
                            pair.section_name
                        ),
                    )
                    .with_fragment(&pair.list_id),
                );
                TERMINAL_ORDER_KEY
            }
        };
        entries.push(PositionedEntry {
            order_key,
            content: EntryContent::Pair(pair.clone()),
        });
    }

    entries.sort_by_key(|entry| entry.order_key);

    entries
        .into_iter()
        .map(|entry| match entry.content {
            EntryContent::Single(fragment) => Area::Single { fragment },
            EntryContent::Pair(pair) => Area::Pair {
                members: member_order(&pair),
                hidden: hidden_members(&pair),
                section: pair.section_name,
            },
        })
        .collect()
}

/// Minimum decoded control row of a fragment, if it has any controls.
/// Malformed tokens contribute their fallback row here; the grid stage
/// owns reporting them.
fn min_control_row(fragment: &FormFragment) -> Option<usize> {
    fragment
        .controls
        .iter()
        .map(|control| decode_position(&control.position_token).0.row)
        .min()
}
