//! Application context wiring the pipeline together.
//!
//! # Responsibility
//! - Own the scheduler, notification region, transport, navigator and the
//!   controllers of every attached form.
//! - Attach to marked forms exactly once per context.
//! - Route host events and fired timer tasks to their owners.
//!
//! # Invariants
//! - `setup` is idempotent: only the first successful call attaches forms.
//! - `setup` is all-or-nothing: a failing form leaves the context untouched.
//! - A transport call is issued only after the submit control shows busy
//!   and the configured latency has elapsed; its outcome is applied at once.

use crate::config::{ConfigError, PipelineConfig};
use crate::form::document::Page;
use crate::form::honeypot::GateError;
use crate::form::validator::FieldValidator;
use crate::notify::channel::{
    NotificationChannel, NotificationId, NotificationTask, ScheduledSink, Severity,
};
use crate::scheduler::Scheduler;
use crate::submission::controller::{
    SubmissionController, SubmissionTask, SubmitDisposition, SubmitEvent,
};
use crate::submission::navigator::Navigator;
use crate::submission::transport::SubmissionTransport;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Index of an attached form, in page order among attached forms.
pub type FormId = usize;

/// Every task kind the context schedules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppTask {
    Notification(NotificationTask),
    Submission(SubmissionTask),
}

impl From<NotificationTask> for AppTask {
    fn from(value: NotificationTask) -> Self {
        Self::Notification(value)
    }
}

impl From<SubmissionTask> for AppTask {
    fn from(value: SubmissionTask) -> Self {
        Self::Submission(value)
    }
}

/// Explicit application context created once by the host.
pub struct AppContext {
    config: PipelineConfig,
    validator: FieldValidator,
    initialized: bool,
    scheduler: Scheduler<AppTask>,
    notifications: NotificationChannel,
    controllers: Vec<SubmissionController>,
    transport: Box<dyn SubmissionTransport>,
    navigator: Box<dyn Navigator>,
}

impl AppContext {
    /// Creates an uninitialized context after validating `config`.
    pub fn new(
        config: PipelineConfig,
        transport: Box<dyn SubmissionTransport>,
        navigator: Box<dyn Navigator>,
    ) -> Result<Self, ContextError> {
        config.validate()?;
        Ok(Self {
            notifications: NotificationChannel::from_config(&config),
            validator: FieldValidator::standard(),
            config,
            initialized: false,
            scheduler: Scheduler::new(),
            controllers: Vec::new(),
            transport,
            navigator,
        })
    }

    /// Attaches controllers to every form carrying the configured marker.
    ///
    /// Returns the number of forms attached; repeated calls return `Ok(0)`.
    pub fn setup(&mut self, page: Page) -> Result<usize, ContextError> {
        if self.initialized {
            debug!("event=context_setup module=context status=skipped reason=already_initialized");
            return Ok(0);
        }

        let mut controllers = Vec::new();
        for (page_index, form) in page.forms.into_iter().enumerate() {
            if !form.has_marker(&self.config.form_marker) {
                continue;
            }
            let controller = SubmissionController::attach(
                form,
                self.validator.clone(),
                &self.config.honeypot_field,
                self.config.confirmation_target.clone(),
            )
            .map_err(|source| ContextError::Attach { page_index, source })?;
            controllers.push(controller);
        }

        let attached = controllers.len();
        self.controllers = controllers;
        self.initialized = true;
        info!("event=context_setup module=context status=ok forms={attached}");
        Ok(attached)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    pub fn form(&self, form: FormId) -> Option<&SubmissionController> {
        self.controllers.get(form)
    }

    pub fn forms(&self) -> &[SubmissionController] {
        &self.controllers
    }

    /// Shows a notification on behalf of any page component.
    pub fn notify(&mut self, message: &str, severity: Severity) -> NotificationId {
        self.notifications.show(message, severity, &mut self.scheduler)
    }

    /// User clicked a notification's close button.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.notifications.hide(id, &mut self.scheduler)
    }

    pub fn input(
        &mut self,
        form: FormId,
        field: &str,
        value: &str,
    ) -> Result<Option<bool>, ContextError> {
        Ok(self.controller_mut(form)?.handle_input(field, value))
    }

    pub fn set_checked(
        &mut self,
        form: FormId,
        field: &str,
        checked: bool,
    ) -> Result<Option<bool>, ContextError> {
        Ok(self.controller_mut(form)?.handle_checked(field, checked))
    }

    pub fn blur(&mut self, form: FormId, field: &str) -> Result<Option<bool>, ContextError> {
        Ok(self.controller_mut(form)?.handle_blur(field))
    }

    /// Delivers one submit intent to `form`.
    ///
    /// A dispatched payload is held until the configured latency has elapsed,
    /// then handed to the transport and its outcome applied.
    pub fn submit(&mut self, form: FormId) -> Result<SubmitDisposition, ContextError> {
        let controller = self
            .controllers
            .get_mut(form)
            .ok_or(ContextError::UnknownForm(form))?;
        let mut sink = ScheduledSink::new(&mut self.notifications, &mut self.scheduler);
        let disposition = controller.handle_submit(&mut SubmitEvent::new(), &mut sink);

        if let SubmitDisposition::Dispatched(payload) = &disposition {
            self.scheduler.schedule(
                self.config.submit_latency(),
                SubmissionTask::Resolve {
                    form_index: form,
                    payload: payload.clone(),
                }
                .into(),
            );
        }
        Ok(disposition)
    }

    /// Advances virtual time, running every task that falls due.
    ///
    /// Returns the number of tasks run.
    pub fn advance_by(&mut self, delta: Duration) -> usize {
        let target = self.scheduler.now().saturating_add(delta);
        let mut ran = 0;
        while let Some((_, task)) = self.scheduler.pop_due(target) {
            self.dispatch(task);
            ran += 1;
        }
        self.scheduler.advance_clock(target);
        ran
    }

    /// Runs tasks until nothing is pending.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Some(deadline) = self.scheduler.next_deadline() {
            let delta = deadline.saturating_sub(self.scheduler.now());
            ran += self.advance_by(delta);
        }
        ran
    }

    fn dispatch(&mut self, task: AppTask) {
        match task {
            AppTask::Notification(task) => self.notifications.handle(task, &mut self.scheduler),
            AppTask::Submission(SubmissionTask::Resolve {
                form_index,
                payload,
            }) => {
                let Some(controller) = self.controllers.get_mut(form_index) else {
                    debug!("event=form_resolve module=context status=skipped form={form_index}");
                    return;
                };
                let outcome = self.transport.send(&payload);
                let mut sink = ScheduledSink::new(&mut self.notifications, &mut self.scheduler);
                controller.resolve(outcome, &mut sink, self.navigator.as_mut());
            }
        }
    }

    fn controller_mut(&mut self, form: FormId) -> Result<&mut SubmissionController, ContextError> {
        self.controllers
            .get_mut(form)
            .ok_or(ContextError::UnknownForm(form))
    }
}

/// Context construction and event routing errors.
#[derive(Debug)]
pub enum ContextError {
    Config(ConfigError),
    Attach { page_index: usize, source: GateError },
    UnknownForm(FormId),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Attach { page_index, source } => {
                write!(f, "failed to attach form #{page_index}: {source}")
            }
            Self::UnknownForm(form) => write!(f, "no attached form with id {form}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Attach { source, .. } => Some(source),
            Self::UnknownForm(_) => None,
        }
    }
}

impl From<ConfigError> for ContextError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}
