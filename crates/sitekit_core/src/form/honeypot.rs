//! Anti-spam decoy field.
//!
//! The decoy is appended to the form at setup, kept off-screen and out of
//! the tab order. Humans never fill it; a non-empty value means a bot.

use crate::form::document::Form;
use crate::form::field::FormField;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default name of the decoy input.
pub const DEFAULT_DECOY_NAME: &str = "website";

/// Installed decoy on one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiSpamGate {
    field_name: String,
}

impl AntiSpamGate {
    /// Appends the hidden decoy field to `form`.
    ///
    /// # Errors
    /// - `GateError::EmptyName` when `field_name` is blank.
    /// - `GateError::NameCollision` when the form already has a field with that name.
    pub fn install(form: &mut Form, field_name: &str) -> Result<Self, GateError> {
        let field_name = field_name.trim();
        if field_name.is_empty() {
            return Err(GateError::EmptyName);
        }
        if form.field(field_name).is_some() {
            return Err(GateError::NameCollision(field_name.to_string()));
        }

        let mut decoy = FormField::text(field_name);
        decoy.off_screen = true;
        decoy.tab_index = Some(-1);
        decoy.aria_hidden = true;
        form.push_field(decoy);

        Ok(Self {
            field_name: field_name.to_string(),
        })
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Any value at all, whitespace included, counts as a bot signal.
    pub fn is_tripped(&self, form: &Form) -> bool {
        form.field(&self.field_name)
            .is_some_and(|field| !field.value.is_empty())
    }
}

/// Decoy installation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    EmptyName,
    NameCollision(String),
}

impl Display for GateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "decoy field name must not be empty"),
            Self::NameCollision(name) => {
                write!(f, "decoy field name collides with a real field: {name}")
            }
        }
    }
}

impl Error for GateError {}

#[cfg(test)]
mod tests {
    use super::{AntiSpamGate, GateError, DEFAULT_DECOY_NAME};
    use crate::form::document::Form;
    use crate::form::field::FormField;

    #[test]
    fn installs_hidden_untabbable_decoy() {
        let mut form = Form::new().with_field(FormField::text("firstName"));
        let gate = AntiSpamGate::install(&mut form, DEFAULT_DECOY_NAME).expect("install decoy");

        let decoy = form.field(DEFAULT_DECOY_NAME).expect("decoy field");
        assert!(decoy.off_screen);
        assert!(decoy.aria_hidden);
        assert_eq!(decoy.tab_index, Some(-1));
        assert!(!gate.is_tripped(&form));
    }

    #[test]
    fn whitespace_value_trips_gate() {
        let mut form = Form::new();
        let gate = AntiSpamGate::install(&mut form, "website").expect("install decoy");
        form.field_mut("website").expect("decoy").value = " ".to_string();
        assert!(gate.is_tripped(&form));
    }

    #[test]
    fn refuses_colliding_name() {
        let mut form = Form::new().with_field(FormField::text("website"));
        let err = AntiSpamGate::install(&mut form, "website").unwrap_err();
        assert_eq!(err, GateError::NameCollision("website".to_string()));
        assert_eq!(form.fields().len(), 1);
    }

    #[test]
    fn refuses_blank_name() {
        let mut form = Form::new();
        assert_eq!(
            AntiSpamGate::install(&mut form, "  ").unwrap_err(),
            GateError::EmptyName
        );
    }
}
