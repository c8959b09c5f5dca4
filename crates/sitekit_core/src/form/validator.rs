//! Field and whole-form validation.
//!
//! # Responsibility
//! - Decide validity of one field against the rule set.
//! - Maintain the field's displayed error state.
//! - Gate live revalidation so errors do not flash while typing.
//!
//! # Invariants
//! - Any previous error is cleared before a field is re-evaluated.
//! - Whole-form validation never short-circuits.
//! - The decoy field is skipped by whole-form validation.

use crate::form::document::Form;
use crate::form::field::FormField;
use crate::form::rules::ValidationRuleSet;
use log::debug;
use std::sync::Arc;

pub const REQUIRED_MESSAGE: &str = "Dieses Feld ist erforderlich";
pub const CONSENT_MESSAGE: &str = "Bitte akzeptieren Sie die Datenschutzerklärung";

/// Validator bound to one immutable rule set.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    rules: Arc<ValidationRuleSet>,
}

impl FieldValidator {
    pub fn new(rules: Arc<ValidationRuleSet>) -> Self {
        Self { rules }
    }

    /// Validator over the process-wide standard rules.
    pub fn standard() -> Self {
        Self::new(ValidationRuleSet::shared_standard())
    }

    pub fn rules(&self) -> &ValidationRuleSet {
        &self.rules
    }

    /// Returns the message a field would fail with, without touching its state.
    pub fn failure_for(&self, field: &FormField) -> Option<&str> {
        let value = field.value.trim();
        let mut failure = None;

        if field.required && value.is_empty() {
            failure = Some(REQUIRED_MESSAGE);
        } else if !value.is_empty() {
            if let Some(rule) = self.rules.rule_for(&field.name) {
                if !rule.check(value) {
                    failure = Some(rule.message());
                }
            }
        }

        // Consent wins over any earlier outcome.
        if field.is_checkbox() && field.required && !field.checked {
            failure = Some(CONSENT_MESSAGE);
        }
        failure
    }

    /// Validates one field and updates its error display.
    pub fn validate_field(&self, field: &mut FormField) -> bool {
        field.clear_error();
        match self.failure_for(field) {
            Some(message) => {
                let message = message.to_string();
                field.mark_invalid(message);
                debug!(
                    "event=field_validate module=validator status=invalid field={}",
                    field.name
                );
                false
            }
            None => true,
        }
    }

    /// Validates every field except `decoy_name`; all errors are shown at once.
    pub fn validate_form(&self, form: &mut Form, decoy_name: &str) -> bool {
        let mut valid = true;
        for field in form.fields_mut() {
            if field.name == decoy_name {
                continue;
            }
            valid = self.validate_field(field) && valid;
        }
        valid
    }

    /// Focus left the field: always validate.
    pub fn on_blur(&self, field: &mut FormField) -> bool {
        self.validate_field(field)
    }

    /// Value changed: revalidate only fields already marked invalid.
    ///
    /// Returns `None` when the field was left untouched.
    pub fn on_input(&self, field: &mut FormField) -> Option<bool> {
        if field.is_invalid() {
            Some(self.validate_field(field))
        } else {
            None
        }
    }
}
