//! Input records for the migration engine.
//!
//! These are the in-memory records the (external) form-definition parser
//! hands over. They are created once per fragment and never mutated by the
//! engine; every transform returns new derived collections, so a failed
//! downstream step can always retry from pristine source data.

use crate::data::kinds::ControlKind;

/// A single legacy form control.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Control {
    /// Stable identifier, unique within the form
    pub id: String,
    /// Classified legacy type
    pub kind: ControlKind,
    /// Field name the control belongs to; captions share the name of
    /// their field
    pub name: String,
    /// Caption text, where the designer stored one
    pub label: Option<String>,
    /// Raw grid position token, e.g. `"3B"` (row 3, column B)
    pub position_token: String,
    /// Static section the control sits in, if any
    pub section: Option<String>,
    /// Repeating section the control sits in, if any
    pub repeating_section: Option<String>,
}

impl Control {
    /// Create a control record
    pub fn new(
        id: impl Into<String>,
        kind: ControlKind,
        name: impl Into<String>,
        position_token: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            label: None,
            position_token: position_token.into(),
            section: None,
            repeating_section: None,
        }
    }

    /// Attach caption text
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach the owning static section
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Attach the owning repeating section
    pub fn with_repeating_section(mut self, section: impl Into<String>) -> Self {
        self.repeating_section = Some(section.into());
        self
    }

    /// Text shown for this control: the label when present, the field
    /// name otherwise.
    pub fn display_text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Section boundary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionKind {
    /// Repeats per data record; becomes a list/item composite
    Repeating,
    /// Plain grouping of rows
    Static,
}

/// Boundary metadata for a section within a fragment. Row values follow
/// any renumbering applied to the owning fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionMarker {
    pub name: String,
    pub start_row: usize,
    pub end_row: usize,
    pub kind: SectionKind,
}

impl SectionMarker {
    /// Boundary of a repeating region
    pub fn repeating(name: impl Into<String>, start_row: usize, end_row: usize) -> Self {
        Self {
            name: name.into(),
            start_row,
            end_row,
            kind: SectionKind::Repeating,
        }
    }

    /// Boundary of a static region
    pub fn fixed(name: impl Into<String>, start_row: usize, end_row: usize) -> Self {
        Self {
            name: name.into(),
            start_row,
            end_row,
            kind: SectionKind::Static,
        }
    }
}

/// Role a fragment plays in the composed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FragmentRole {
    /// Renders on its own
    Standalone,
    /// Master half of a repeating section
    List,
    /// Detail half of a repeating section
    Item,
}

/// One renderable unit of layout content: a named collection of controls
/// plus optional section boundaries, generated independently by the
/// upstream splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormFragment {
    pub id: String,
    pub role: FragmentRole,
    /// Repeating section this fragment renders, for list/item roles
    pub section_name: Option<String>,
    /// Enclosing parent repeating section, if any. Read from source
    /// metadata; its absence marks a top-level section.
    pub parent_section_name: Option<String>,
    pub controls: Vec<Control>,
    pub markers: Vec<SectionMarker>,
}

impl FormFragment {
    /// Create an empty fragment
    pub fn new(id: impl Into<String>, role: FragmentRole) -> Self {
        Self {
            id: id.into(),
            role,
            section_name: None,
            parent_section_name: None,
            controls: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Set the repeating section this fragment renders
    pub fn with_section_name(mut self, name: impl Into<String>) -> Self {
        self.section_name = Some(name.into());
        self
    }

    /// Set the enclosing parent repeating section
    pub fn with_parent_section(mut self, name: impl Into<String>) -> Self {
        self.parent_section_name = Some(name.into());
        self
    }

    /// Set the fragment's controls
    pub fn with_controls(mut self, controls: Vec<Control>) -> Self {
        self.controls = controls;
        self
    }

    /// Set the fragment's section markers
    pub fn with_markers(mut self, markers: Vec<SectionMarker>) -> Self {
        self.markers = markers;
        self
    }
}
