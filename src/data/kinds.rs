//! Legacy control-type classification.
//!
//! The legacy form designer stores a free-text type name on every control.
//! The layout engine only cares about two traits of that type: whether the
//! control is a caption label, and whether it stretches across neighboring
//! columns when nothing blocks it. Everything else about the type (which
//! target widget it becomes, how it binds to data) belongs to the mapping
//! layer outside this crate.

use phf::phf_map;

/// Classified control type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlKind {
    /// Static caption text
    Label,
    /// Single-line text input
    TextBox,
    /// Formatted multi-line text
    RichText,
    /// Plain multi-line text
    Memo,
    CheckBox,
    ComboBox,
    ListBox,
    DateTime,
    Number,
    Image,
    /// Embedded data grid
    EmbeddedGrid,
    Button,
    /// Type name not present in the legacy table
    Unknown,
}

/// Legacy designer type names, lowercase. Aliases observed across form
/// versions map to the same kind.
static LEGACY_KINDS: phf::Map<&'static str, ControlKind> = phf_map! {
    "label" => ControlKind::Label,
    "statictext" => ControlKind::Label,
    "caption" => ControlKind::Label,
    "textbox" => ControlKind::TextBox,
    "edit" => ControlKind::TextBox,
    "text" => ControlKind::TextBox,
    "richtext" => ControlKind::RichText,
    "richedit" => ControlKind::RichText,
    "memo" => ControlKind::Memo,
    "textarea" => ControlKind::Memo,
    "checkbox" => ControlKind::CheckBox,
    "combobox" => ControlKind::ComboBox,
    "dropdown" => ControlKind::ComboBox,
    "listbox" => ControlKind::ListBox,
    "datetime" => ControlKind::DateTime,
    "date" => ControlKind::DateTime,
    "number" => ControlKind::Number,
    "numeric" => ControlKind::Number,
    "image" => ControlKind::Image,
    "picture" => ControlKind::Image,
    "grid" => ControlKind::EmbeddedGrid,
    "table" => ControlKind::EmbeddedGrid,
    "button" => ControlKind::Button,
};

impl ControlKind {
    /// Classify a legacy type name. Lookup is case-insensitive; unknown
    /// names classify as [`ControlKind::Unknown`] rather than failing.
    pub fn from_legacy(type_name: &str) -> ControlKind {
        LEGACY_KINDS
            .get(type_name.trim().to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(ControlKind::Unknown)
    }

    /// Caption label, subject to the caption-attachment rule during span
    /// resolution and the title-extraction shift.
    pub fn is_label(self) -> bool {
        matches!(self, ControlKind::Label)
    }

    /// Kinds that occupy every free column up to the next blocking control.
    pub fn is_wide(self) -> bool {
        matches!(
            self,
            ControlKind::RichText
                | ControlKind::Memo
                | ControlKind::Image
                | ControlKind::EmbeddedGrid
        )
    }
}
