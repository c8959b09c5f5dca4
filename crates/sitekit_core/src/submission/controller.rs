//! Per-form submission state machine.
//!
//! # Responsibility
//! - Route field events to the validator.
//! - Drive `Idle -> Validating -> Submitting -> Succeeded | Failed -> Idle`.
//! - Own the submit control's busy state and restore it on every failure.
//!
//! # Invariants
//! - Validation of all fields completes before a payload is dispatched.
//! - A disabled submit control ignores further submit intents.
//! - `Succeeded` is terminal for the form instance.
//! - Spam submissions leave no trace: no validation, call, notice or navigation.

use crate::form::document::Form;
use crate::form::honeypot::{AntiSpamGate, GateError};
use crate::form::validator::FieldValidator;
use crate::notify::channel::{NotificationSink, Severity};
use crate::submission::navigator::Navigator;
use crate::submission::transport::{SubmissionPayload, TransportError};
use log::{info, warn};

pub const INVALID_FORM_MESSAGE: &str = "Bitte korrigieren Sie die Fehler im Formular";
pub const SUBMIT_FAILED_MESSAGE: &str =
    "Fehler beim Senden. Bitte versuchen Sie es später erneut.";
pub const BUSY_LABEL: &str = "Wird gesendet...";

/// Lifecycle state of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl FormSubmissionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Browser submit event; the pipeline always suppresses the default reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// What one submit intent led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// Control disabled or form already done.
    Ignored,
    /// Decoy filled; dropped silently.
    SpamDropped,
    /// Validation failed for the listed fields.
    Rejected { invalid_fields: Vec<String> },
    /// Valid, but the form has no submit control to drive.
    NoSubmitControl,
    /// Valid and busy; the caller must deliver this payload.
    Dispatched(SubmissionPayload),
}

/// Scheduled work owned by submission controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionTask {
    /// Sends `payload` for the form at `form_index` and applies the outcome.
    Resolve {
        form_index: usize,
        payload: SubmissionPayload,
    },
}

/// Controller attached to one validated form.
#[derive(Debug, Clone)]
pub struct SubmissionController {
    form: Form,
    validator: FieldValidator,
    gate: AntiSpamGate,
    state: FormSubmissionState,
    confirmation_target: String,
    original_label: Option<String>,
}

impl SubmissionController {
    /// Installs the decoy on `form` and takes ownership of it.
    pub fn attach(
        mut form: Form,
        validator: FieldValidator,
        decoy_name: &str,
        confirmation_target: impl Into<String>,
    ) -> Result<Self, GateError> {
        let gate = AntiSpamGate::install(&mut form, decoy_name)?;
        Ok(Self {
            form,
            validator,
            gate,
            state: FormSubmissionState::Idle,
            confirmation_target: confirmation_target.into(),
            original_label: None,
        })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn state(&self) -> FormSubmissionState {
        self.state
    }

    pub fn gate(&self) -> &AntiSpamGate {
        &self.gate
    }

    /// Sets a field value and revalidates it if it is currently invalid.
    ///
    /// Returns `None` for unknown fields and for fields not revalidated.
    pub fn handle_input(&mut self, name: &str, value: &str) -> Option<bool> {
        let field = self.form.field_mut(name)?;
        field.value = value.to_string();
        self.validator.on_input(field)
    }

    /// Toggles a checkbox; behaves like an input event.
    pub fn handle_checked(&mut self, name: &str, checked: bool) -> Option<bool> {
        let field = self.form.field_mut(name)?;
        field.checked = checked;
        self.validator.on_input(field)
    }

    /// Focus left `name`: validate it.
    pub fn handle_blur(&mut self, name: &str) -> Option<bool> {
        let field = self.form.field_mut(name)?;
        Some(self.validator.on_blur(field))
    }

    /// Processes one submit intent.
    pub fn handle_submit(
        &mut self,
        event: &mut SubmitEvent,
        sink: &mut dyn NotificationSink,
    ) -> SubmitDisposition {
        event.prevent_default();

        let control_disabled = self
            .form
            .submit_control()
            .is_some_and(|control| control.is_disabled());
        if control_disabled || self.state != FormSubmissionState::Idle {
            return SubmitDisposition::Ignored;
        }

        if self.gate.is_tripped(&self.form) {
            return SubmitDisposition::SpamDropped;
        }

        self.state = FormSubmissionState::Validating;
        if !self
            .validator
            .validate_form(&mut self.form, self.gate.field_name())
        {
            let invalid_fields: Vec<String> = self
                .form
                .invalid_field_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            info!(
                "event=form_submit module=submission status=rejected invalid_fields={}",
                invalid_fields.len()
            );
            self.state = FormSubmissionState::Idle;
            sink.notify(INVALID_FORM_MESSAGE, Severity::Error);
            return SubmitDisposition::Rejected { invalid_fields };
        }

        let Some(control) = self.form.submit_control_mut() else {
            warn!("event=form_submit module=submission status=skipped reason=no_submit_control");
            self.state = FormSubmissionState::Idle;
            return SubmitDisposition::NoSubmitControl;
        };
        self.original_label = Some(control.enter_busy(BUSY_LABEL));
        self.state = FormSubmissionState::Submitting;

        let payload = SubmissionPayload::from_form(&self.form, self.gate.field_name());
        info!(
            "event=form_submit module=submission status=dispatched fields={}",
            payload.len()
        );
        SubmitDisposition::Dispatched(payload)
    }

    /// Applies the transport outcome of the in-flight submission.
    ///
    /// Outcomes arriving while not `Submitting` are dropped.
    pub fn resolve(
        &mut self,
        outcome: Result<(), TransportError>,
        sink: &mut dyn NotificationSink,
        navigator: &mut dyn Navigator,
    ) {
        if self.state != FormSubmissionState::Submitting {
            warn!(
                "event=form_resolve module=submission status=dropped state={}",
                self.state.as_str()
            );
            return;
        }

        match outcome {
            Ok(()) => {
                self.state = FormSubmissionState::Succeeded;
                info!("event=form_resolve module=submission status=succeeded");
                navigator.navigate(&self.confirmation_target);
            }
            Err(err) => {
                self.state = FormSubmissionState::Failed;
                warn!("event=form_resolve module=submission status=failed error={err}");
                sink.notify(SUBMIT_FAILED_MESSAGE, Severity::Error);
                let label = self.original_label.take().unwrap_or_default();
                if let Some(control) = self.form.submit_control_mut() {
                    control.restore(label);
                }
                self.state = FormSubmissionState::Idle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FormSubmissionState, SubmissionController, SubmitDisposition, SubmitEvent, BUSY_LABEL,
        INVALID_FORM_MESSAGE, SUBMIT_FAILED_MESSAGE,
    };
    use crate::form::document::Form;
    use crate::form::field::FormField;
    use crate::form::validator::FieldValidator;
    use crate::notify::channel::{NotificationSink, Severity};
    use crate::submission::navigator::RecordingNavigator;
    use crate::submission::transport::TransportError;

    #[derive(Default)]
    struct RecordingSink {
        messages: Vec<(String, Severity)>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&mut self, message: &str, severity: Severity) {
            self.messages.push((message.to_string(), severity));
        }
    }

    fn controller() -> SubmissionController {
        let form = Form::new()
            .with_field(FormField::text("firstName").required())
            .with_field(FormField::email("email").required())
            .with_submit("Absenden");
        SubmissionController::attach(form, FieldValidator::standard(), "website", "thank_you.html")
            .expect("attach controller")
    }

    fn fill(controller: &mut SubmissionController) {
        controller.handle_input("firstName", "Ada");
        controller.handle_input("email", "ada@example.com");
    }

    #[test]
    fn submit_always_prevents_default() {
        let mut controller = controller();
        let mut sink = RecordingSink::default();
        let mut event = SubmitEvent::new();
        controller.handle_submit(&mut event, &mut sink);
        assert!(event.is_default_prevented());
    }

    #[test]
    fn invalid_form_notifies_once_and_stays_idle() {
        let mut controller = controller();
        let mut sink = RecordingSink::default();
        let disposition = controller.handle_submit(&mut SubmitEvent::new(), &mut sink);

        assert_eq!(
            disposition,
            SubmitDisposition::Rejected {
                invalid_fields: vec!["firstName".to_string(), "email".to_string()],
            }
        );
        assert_eq!(
            sink.messages,
            vec![(INVALID_FORM_MESSAGE.to_string(), Severity::Error)]
        );
        assert_eq!(controller.state(), FormSubmissionState::Idle);
    }

    #[test]
    fn dispatch_marks_control_busy() {
        let mut controller = controller();
        fill(&mut controller);
        let disposition =
            controller.handle_submit(&mut SubmitEvent::new(), &mut RecordingSink::default());

        let payload = match disposition {
            SubmitDisposition::Dispatched(payload) => payload,
            other => panic!("expected dispatch, got {other:?}"),
        };
        assert_eq!(payload.get("email"), Some("ada@example.com"));
        assert!(!payload.contains("website"));
        let control = controller.form().submit_control().expect("submit control");
        assert!(control.is_disabled());
        assert_eq!(control.label(), BUSY_LABEL);
        assert_eq!(controller.state(), FormSubmissionState::Submitting);
    }

    #[test]
    fn busy_control_ignores_second_submit() {
        let mut controller = controller();
        fill(&mut controller);
        let mut sink = RecordingSink::default();
        controller.handle_submit(&mut SubmitEvent::new(), &mut sink);

        let second = controller.handle_submit(&mut SubmitEvent::new(), &mut sink);
        assert_eq!(second, SubmitDisposition::Ignored);
        assert!(sink.messages.is_empty());
    }

    #[test]
    fn failure_restores_control_and_notifies() {
        let mut controller = controller();
        fill(&mut controller);
        let mut sink = RecordingSink::default();
        let mut navigator = RecordingNavigator::new();
        controller.handle_submit(&mut SubmitEvent::new(), &mut sink);
        controller.resolve(Err(TransportError::Offline), &mut sink, &mut navigator);

        assert_eq!(
            sink.messages,
            vec![(SUBMIT_FAILED_MESSAGE.to_string(), Severity::Error)]
        );
        let control = controller.form().submit_control().expect("submit control");
        assert!(!control.is_disabled());
        assert_eq!(control.label(), "Absenden");
        assert_eq!(controller.state(), FormSubmissionState::Idle);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn success_navigates_and_is_terminal() {
        let mut controller = controller();
        fill(&mut controller);
        let mut sink = RecordingSink::default();
        let mut navigator = RecordingNavigator::new();
        controller.handle_submit(&mut SubmitEvent::new(), &mut sink);
        controller.resolve(Ok(()), &mut sink, &mut navigator);

        assert_eq!(navigator.visits(), vec!["thank_you.html".to_string()]);
        assert_eq!(controller.state(), FormSubmissionState::Succeeded);
        assert!(sink.messages.is_empty());

        controller.resolve(Ok(()), &mut sink, &mut navigator);
        assert_eq!(navigator.visits().len(), 1);
        assert_eq!(
            controller.handle_submit(&mut SubmitEvent::new(), &mut sink),
            SubmitDisposition::Ignored
        );
    }

    #[test]
    fn filled_decoy_drops_silently() {
        let mut controller = controller();
        controller.handle_input("website", "http://spam.example");
        let mut sink = RecordingSink::default();
        let disposition = controller.handle_submit(&mut SubmitEvent::new(), &mut sink);

        assert_eq!(disposition, SubmitDisposition::SpamDropped);
        assert!(sink.messages.is_empty());
        assert!(controller.form().invalid_field_names().is_empty());
        assert_eq!(controller.state(), FormSubmissionState::Idle);
    }

    #[test]
    fn form_without_submit_control_does_not_dispatch() {
        let form = Form::new().with_field(FormField::text("firstName").with_value("Ada"));
        let mut controller =
            SubmissionController::attach(form, FieldValidator::standard(), "website", "t.html")
                .expect("attach controller");
        let disposition =
            controller.handle_submit(&mut SubmitEvent::new(), &mut RecordingSink::default());
        assert_eq!(disposition, SubmitDisposition::NoSubmitControl);
        assert_eq!(controller.state(), FormSubmissionState::Idle);
    }

    #[test]
    fn live_revalidation_follows_blur() {
        let mut controller = controller();
        assert_eq!(controller.handle_input("email", "x"), None);
        assert_eq!(controller.handle_blur("email"), Some(false));
        assert_eq!(controller.handle_input("email", "ada@example.com"), Some(true));
        assert_eq!(controller.handle_blur("unknown"), None);
    }
}
