//! Structured diagnostics for the migration pipeline
//!
//! Legacy form layouts are imperfect by nature, and the engine prefers
//! best-effort placement over aborting. Every recoverable oddity is
//! recorded as a structured [`Diagnostic`] in an explicitly passed
//! [`Diagnostics`] sink, so the pure transforms can be tested by asserting
//! on events instead of scraping text output. The surrounding
//! orchestration decides whether accumulated warnings block deployment.
//!
//! ## Example
//!
//! ```rust
//! use formlift::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel, Diagnostics};
//!
//! let mut diag = Diagnostics::new();
//! diag.add(Diagnostic::new(
//!     DiagnosticLevel::Warning,
//!     DiagnosticKind::UnmatchedPair,
//!     "list fragment 'Items_list' has no item counterpart",
//! ));
//! assert!(diag.has_warnings());
//! assert_eq!(diag.count_of(DiagnosticKind::UnmatchedPair), 1);
//! ```

use std::fmt;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - layout was produced but the input looks inconsistent
    Warning,
    /// Error - something was dropped or substituted
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// What went sideways. Mirrors the recoverable conditions of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Position token had no usable row or column; sentinel substituted
    MalformedPositionToken,
    /// Control row missing from the assembled matrix; control dropped
    OrphanedControl,
    /// List or item fragment without its counterpart; excluded from grouping
    UnmatchedPair,
    /// No derivable position for an entry; appended last
    UnresolvedOrderKey,
    /// Input contradicts itself (marker rows off the grid, controls inside
    /// merged cells); value kept or re-attached, never silently fixed
    DataInconsistency,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MalformedPositionToken => write!(f, "malformed-position-token"),
            DiagnosticKind::OrphanedControl => write!(f, "orphaned-control"),
            DiagnosticKind::UnmatchedPair => write!(f, "unmatched-pair"),
            DiagnosticKind::UnresolvedOrderKey => write!(f, "unresolved-order-key"),
            DiagnosticKind::DataInconsistency => write!(f, "data-inconsistency"),
        }
    }
}

/// A single diagnostic record
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Condition category
    pub kind: DiagnosticKind,
    /// Human-readable message
    pub message: String,
    /// Fragment the condition was observed in
    pub fragment: Option<String>,
    /// Control involved, if any
    pub control: Option<String>,
    /// Suggested followup for the migration operator
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            level,
            kind,
            message: message.into(),
            fragment: None,
            control: None,
            suggestion: None,
        }
    }

    /// Attach the owning fragment
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Attach the control involved
    pub fn with_control(mut self, control: impl Into<String>) -> Self {
        self.control = Some(control.into());
        self
    }

    /// Attach a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.level, self.kind, self.message)?;

        if let Some(ref fragment) = self.fragment {
            write!(f, "\n  --> fragment '{}'", fragment)?;
            if let Some(ref control) = self.control {
                write!(f, ", control '{}'", control)?;
            }
        } else if let Some(ref control) = self.control {
            write!(f, "\n  --> control '{}'", control)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Diagnostic sink with per-level counts
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// All records, in emission order
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.warnings > 0
    }

    /// Check if there are any records at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate records of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Count records of one kind
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Format diagnostics for terminal output
pub fn format_diagnostics(diagnostics: &Diagnostics, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &diagnostics.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if diagnostics.has_errors() {
            output.push_str("\x1b[31m");
        } else if diagnostics.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", diagnostics.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}
