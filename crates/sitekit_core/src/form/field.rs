//! Form field model and per-field display state.

/// Value submitted by a checked checkbox without an explicit value.
pub const DEFAULT_CHECKBOX_VALUE: &str = "on";

/// Input control kind of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    TextArea,
    Select,
    Checkbox,
}

/// Error display state owned by a field.
///
/// `invalid` mirrors the `is-invalid` marker; `error` is the message shown
/// next to the field, absent when nothing is displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub invalid: bool,
    pub error: Option<String>,
}

/// One named control inside a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Field name as submitted (`firstName`, `email`, ...).
    pub name: String,
    pub kind: FieldKind,
    /// Raw, untrimmed value.
    pub value: String,
    pub required: bool,
    /// Meaningful only for `FieldKind::Checkbox`.
    pub checked: bool,
    /// Rendered off-screen; never part of the visible layout.
    pub off_screen: bool,
    pub tab_index: Option<i32>,
    pub aria_hidden: bool,
    state: FieldState,
}

impl FormField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let value = if kind == FieldKind::Checkbox {
            DEFAULT_CHECKBOX_VALUE.to_string()
        } else {
            String::new()
        };
        Self {
            name: name.into(),
            kind,
            value,
            required: false,
            checked: false,
            off_screen: false,
            tab_index: None,
            aria_hidden: false,
            state: FieldState::default(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub fn tel(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Tel)
    }

    pub fn text_area(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::TextArea)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Checkbox)
    }

    /// Marks the field as `required`.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn is_checkbox(&self) -> bool {
        self.kind == FieldKind::Checkbox
    }

    /// Whether the field would be included in submitted form data.
    ///
    /// Unchecked checkboxes are omitted, like browser `FormData`.
    pub fn is_submittable(&self) -> bool {
        !self.is_checkbox() || self.checked
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn is_invalid(&self) -> bool {
        self.state.invalid
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub(crate) fn mark_invalid(&mut self, message: impl Into<String>) {
        self.state.invalid = true;
        self.state.error = Some(message.into());
    }

    pub(crate) fn clear_error(&mut self) {
        self.state = FieldState::default();
    }
}
