//! Page, form and submit-control containers.

use crate::form::field::FormField;

/// Submit button state: enabled flag and visible label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    label: String,
    disabled: bool,
}

impl SubmitControl {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disables the control and swaps in `busy_label`.
    ///
    /// Returns the label that was displayed before.
    pub(crate) fn enter_busy(&mut self, busy_label: &str) -> String {
        self.disabled = true;
        std::mem::replace(&mut self.label, busy_label.to_string())
    }

    pub(crate) fn restore(&mut self, label: String) {
        self.disabled = false;
        self.label = label;
    }
}

/// One form element with its fields and optional submit control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    /// Class-like markers; the pipeline attaches to forms carrying its marker.
    pub markers: Vec<String>,
    fields: Vec<FormField>,
    submit: Option<SubmitControl>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_submit(mut self, label: impl Into<String>) -> Self {
        self.submit = Some(SubmitControl::new(label));
        self
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|value| value == marker)
    }

    pub fn push_field(&mut self, field: FormField) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> impl Iterator<Item = &mut FormField> {
        self.fields.iter_mut()
    }

    /// Returns the first field with `name`.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    pub fn submit_control(&self) -> Option<&SubmitControl> {
        self.submit.as_ref()
    }

    pub(crate) fn submit_control_mut(&mut self) -> Option<&mut SubmitControl> {
        self.submit.as_mut()
    }

    /// Names of fields currently marked invalid, in document order.
    pub fn invalid_field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.is_invalid())
            .map(|field| field.name.as_str())
            .collect()
    }
}

/// Server-rendered page content the host hands to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub forms: Vec<Form>,
}

impl Page {
    pub fn new(forms: Vec<Form>) -> Self {
        Self { forms }
    }
}
