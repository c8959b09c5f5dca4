//! Form submission and validation pipeline for server-rendered pages.
//!
//! The page is modelled headlessly; the host feeds user and timer events
//! through [`AppContext`] and observes field state, notifications and
//! navigation.

pub mod config;
pub mod context;
pub mod form;
pub mod logging;
pub mod notify;
pub mod scheduler;
pub mod submission;

pub use config::{ConfigError, PipelineConfig};
pub use context::{AppContext, AppTask, ContextError, FormId};
pub use form::document::{Form, Page, SubmitControl};
pub use form::field::{FieldKind, FieldState, FormField};
pub use form::honeypot::{AntiSpamGate, GateError, DEFAULT_DECOY_NAME};
pub use form::rules::{FieldId, FieldRule, RuleKind, RuleSetError, ValidationRuleSet};
pub use form::validator::{FieldValidator, CONSENT_MESSAGE, REQUIRED_MESSAGE};
pub use logging::{default_log_level, init_logging, logging_status};
pub use notify::channel::{
    Notification, NotificationChannel, NotificationId, NotificationPhase, NotificationSink,
    Severity,
};
pub use scheduler::{Scheduler, TimerHandle};
pub use submission::controller::{
    FormSubmissionState, SubmissionController, SubmitDisposition, SubmitEvent, BUSY_LABEL,
    INVALID_FORM_MESSAGE, SUBMIT_FAILED_MESSAGE,
};
pub use submission::navigator::{Navigator, RecordingNavigator};
pub use submission::transport::{
    Connectivity, OfflineAwareTransport, SubmissionPayload, SubmissionTransport, TransportError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
