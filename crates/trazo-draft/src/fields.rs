//! Numeric override fields for the drafting HUD.

use trazo_units::{format_value, parse_value, FieldKind, UnitError, UnitSystem};

/// One HUD field: its raw text, last valid parsed value, and whether
/// the user is currently typing into it.
#[derive(Debug, Clone)]
pub struct InputField {
    kind: FieldKind,
    text: String,
    value: f64,
    editing: bool,
}

impl InputField {
    /// A cleared field for the given kind.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            text: String::new(),
            value: 0.0,
            editing: false,
        }
    }

    /// The field's kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Current display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last valid parsed SI value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether the user is typing into this field.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Replace the field's text, parsing it in the given system.
    ///
    /// On parse failure the edit is rejected: text and value keep
    /// their previous state and the error is returned for the HUD to
    /// signal (no modal dialog, no partial value).
    pub fn set_text(&mut self, text: &str, system: UnitSystem) -> Result<(), UnitError> {
        let parsed = parse_value(text, self.kind, system)?;
        self.text = text.to_string();
        self.value = parsed;
        Ok(())
    }

    /// Overwrite the field from a computed value, reformatting the
    /// text.
    pub fn set_value(&mut self, value: f64, system: UnitSystem) {
        self.value = value;
        self.text = format_value(value, self.kind, system);
    }

    /// Clear text, value, and editing flag.
    pub fn clear(&mut self) {
        self.text.clear();
        self.value = 0.0;
        self.editing = false;
    }
}

/// The full set of HUD fields, enforcing that at most one is being
/// edited at a time.
#[derive(Debug, Clone)]
pub struct FieldSet {
    fields: [InputField; 6],
}

const FIELD_KINDS: [FieldKind; 6] = [
    FieldKind::Distance,
    FieldKind::Angle,
    FieldKind::CoordX,
    FieldKind::CoordY,
    FieldKind::CoordZ,
    FieldKind::Area,
];

impl FieldSet {
    /// All-cleared field set.
    pub fn new() -> Self {
        Self {
            fields: FIELD_KINDS.map(InputField::new),
        }
    }

    fn index(kind: FieldKind) -> usize {
        FIELD_KINDS
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default()
    }

    /// Read a field.
    pub fn field(&self, kind: FieldKind) -> &InputField {
        &self.fields[Self::index(kind)]
    }

    /// The field currently being edited, if any.
    pub fn editing(&self) -> Option<&InputField> {
        self.fields.iter().find(|f| f.is_editing())
    }

    /// Begin editing one field, ending any other edit.
    pub fn begin_edit(&mut self, kind: FieldKind) {
        for field in &mut self.fields {
            field.editing = field.kind == kind;
        }
    }

    /// Type into a field: begins the edit and parses the text.
    ///
    /// A parse failure leaves the field's previous value in place and
    /// keeps it in the editing state, so the user can fix the text.
    pub fn input(
        &mut self,
        kind: FieldKind,
        text: &str,
        system: UnitSystem,
    ) -> Result<(), UnitError> {
        self.begin_edit(kind);
        self.fields[Self::index(kind)].set_text(text, system)
    }

    /// Finish the active edit, keeping the parsed value readable.
    pub fn end_edit(&mut self) {
        for field in &mut self.fields {
            field.editing = false;
        }
    }

    /// Clear every field.
    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::new()
    }
}
