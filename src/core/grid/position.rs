//! Grid position codec for legacy placement tokens.
//!
//! The legacy designer stores a control's slot as a single token: leading
//! digits are the 1-based row, trailing letters are the column in base-26
//! with `A` = 0 (`"3B"` is row 3, column 1; `"12BA"` is row 12, column
//! 26). Tokens are hand-authored and frequently broken; decoding never
//! fails, it substitutes the place-last fallback row and reports whether
//! the token was well formed.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::context::MigrationOptions;
use crate::core::model::Control;
use crate::data::constants::FALLBACK_ROW;
use crate::utils::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel, Diagnostics};
use crate::utils::error::{MigrationError, MigrationResult};

lazy_static! {
    /// Token grammar: optional digit run, optional letter run
    static ref TOKEN_RE: Regex = Regex::new(r"^\s*([0-9]+)?\s*([A-Za-z]+)?\s*$").unwrap();
}

/// A resolved grid coordinate: 1-based row, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    pub row: usize,
    pub column: usize,
}

impl GridPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// A control joined with its decoded position. The derived working form
/// the grid stages pass along; the input [`Control`] stays untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedControl {
    pub control: Control,
    pub position: GridPosition,
}

impl PlacedControl {
    pub fn id(&self) -> &str {
        &self.control.id
    }

    pub fn name(&self) -> &str {
        &self.control.name
    }

    pub fn kind(&self) -> crate::data::kinds::ControlKind {
        self.control.kind
    }

    pub fn row(&self) -> usize {
        self.position.row
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}

/// Decode a position token. Returns the position and whether the token
/// was well formed; a missing, zero, or overflowing row yields the
/// fallback row, a missing or overflowing letter run yields column 0.
pub fn decode_position(token: &str) -> (GridPosition, bool) {
    let caps = match TOKEN_RE.captures(token) {
        Some(caps) => caps,
        None => return (GridPosition::new(FALLBACK_ROW, 0), false),
    };

    let (row, row_ok) = match caps.get(1) {
        Some(digits) => match digits.as_str().parse::<usize>() {
            Ok(row) if row >= 1 => (row, true),
            _ => (FALLBACK_ROW, false),
        },
        None => (FALLBACK_ROW, false),
    };

    let (column, column_ok) = match caps.get(2) {
        Some(letters) => match decode_column(letters.as_str()) {
            Some(column) => (column, true),
            None => (0, false),
        },
        None => (0, true),
    };

    (GridPosition::new(row, column), row_ok && column_ok)
}

/// Encode a canonical position back into a token. Inverse of
/// [`decode_position`] for well-formed positions.
pub fn encode_position(position: &GridPosition) -> String {
    format!("{}{}", position.row, encode_column(position.column))
}

fn decode_column(letters: &str) -> Option<usize> {
    let mut column: usize = 0;
    for c in letters.chars() {
        let digit = (c.to_ascii_uppercase() as usize) - ('A' as usize);
        column = column.checked_mul(26)?.checked_add(digit)?;
    }
    Some(column)
}

fn encode_column(mut column: usize) -> String {
    if column == 0 {
        return "A".to_string();
    }
    let mut letters = Vec::new();
    while column > 0 {
        letters.push((b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    letters.iter().rev().collect()
}

/// Decode every control's token, producing the placed working set.
///
/// Malformed tokens substitute the fallback position and emit a
/// MalformedPositionToken warning, or fail outright under
/// [`MigrationOptions::strict`].
pub fn resolve_positions(
    controls: &[Control],
    options: &MigrationOptions,
    diag: &mut Diagnostics,
) -> MigrationResult<Vec<PlacedControl>> {
    let mut placed = Vec::with_capacity(controls.len());

    for control in controls {
        let (position, well_formed) = decode_position(&control.position_token);
        if !well_formed {
            if options.strict_tokens {
                return Err(MigrationError::malformed_token(
                    &control.position_token,
                    &control.id,
                ));
            }
            diag.add(
                Diagnostic::new(
                    DiagnosticLevel::Warning,
                    DiagnosticKind::MalformedPositionToken,
                    format!(
                        "position token '{}' has no usable grid position",
                        control.position_token
                    ),
                )
                .with_control(&control.id)
                .with_suggestion(format!("control placed at fallback row {}", FALLBACK_ROW)),
            );
        }
        placed.push(PlacedControl {
            control: control.clone(),
            position,
        });
    }

    Ok(placed)
}
