//! Notification channel backed by the virtual-time scheduler.

use crate::config::PipelineConfig;
use crate::scheduler::{Scheduler, TimerHandle};
use log::debug;
use std::time::Duration;
use uuid::Uuid;

/// Accessible label of the close button.
pub const DISMISS_LABEL: &str = "Schließen";

/// Stable identifier of one displayed notification.
pub type NotificationId = Uuid;

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Alert style suffix used in markup (`alert-<class>`).
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "danger",
        }
    }
}

/// Lifecycle phase of a displayed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Fading,
}

/// One displayed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: Duration,
    /// `created_at + lifetime`; fade starts here unless dismissed earlier.
    pub expires_at: Duration,
    pub phase: NotificationPhase,
    expiry: Option<TimerHandle>,
}

impl Notification {
    /// Alert markup with the message text escaped.
    pub fn render_html(&self) -> String {
        let fade = match self.phase {
            NotificationPhase::Visible => "fade show",
            NotificationPhase::Fading => "fade",
        };
        format!(
            r#"<div class="alert alert-{} alert-dismissible {}" role="alert">{}<button type="button" class="btn-close" aria-label="{}"></button></div>"#,
            self.severity.css_class(),
            fade,
            escape_html(&self.message),
            DISMISS_LABEL
        )
    }
}

/// Scheduled work owned by the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTask {
    /// Lifetime elapsed: start fading.
    Expire(NotificationId),
    /// Fade finished: remove from the region.
    Detach(NotificationId),
}

/// The notification interface consumed by the submission pipeline.
pub trait NotificationSink {
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Stacking region of notifications.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    lifetime: Duration,
    fade: Duration,
    entries: Vec<Notification>,
}

impl NotificationChannel {
    pub fn new(lifetime: Duration, fade: Duration) -> Self {
        Self {
            lifetime,
            fade,
            entries: Vec::new(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.notification_lifetime(), config.notification_fade())
    }

    /// Appends a notification and schedules its expiry.
    pub fn show<T: From<NotificationTask>>(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        scheduler: &mut Scheduler<T>,
    ) -> NotificationId {
        let id = Uuid::new_v4();
        let created_at = scheduler.now();
        let expiry = scheduler.schedule(self.lifetime, NotificationTask::Expire(id).into());
        self.entries.push(Notification {
            id,
            message: message.into(),
            severity,
            created_at,
            expires_at: created_at.saturating_add(self.lifetime),
            phase: NotificationPhase::Visible,
            expiry: Some(expiry),
        });
        debug!(
            "event=notification_show module=notify status=ok severity={} id={}",
            severity.as_str(),
            id
        );
        id
    }

    /// Starts the fade of a visible notification and schedules its detach.
    ///
    /// Returns `false` when the notification is gone or already fading.
    pub fn hide<T: From<NotificationTask>>(
        &mut self,
        id: NotificationId,
        scheduler: &mut Scheduler<T>,
    ) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };
        if entry.phase == NotificationPhase::Fading {
            return false;
        }
        entry.phase = NotificationPhase::Fading;
        if let Some(expiry) = entry.expiry.take() {
            scheduler.cancel(expiry);
        }
        scheduler.schedule(self.fade, NotificationTask::Detach(id).into());
        true
    }

    /// Structurally removes a notification. Absent ids are ignored.
    pub fn detach(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            debug!("event=notification_detach module=notify status=ok id={id}");
        }
        removed
    }

    /// Runs one fired channel task.
    pub fn handle<T: From<NotificationTask>>(
        &mut self,
        task: NotificationTask,
        scheduler: &mut Scheduler<T>,
    ) {
        match task {
            NotificationTask::Expire(id) => {
                // The expiry handle has fired; forget it before fading.
                if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
                    entry.expiry = None;
                }
                self.hide(id, scheduler);
            }
            NotificationTask::Detach(id) => {
                self.detach(id);
            }
        }
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.get(id).is_some()
    }

    /// Notifications still attached, oldest first.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn fade(&self) -> Duration {
        self.fade
    }
}

/// Binds a channel to a scheduler so it can serve as a `NotificationSink`.
pub struct ScheduledSink<'a, T> {
    channel: &'a mut NotificationChannel,
    scheduler: &'a mut Scheduler<T>,
}

impl<'a, T> ScheduledSink<'a, T> {
    pub fn new(channel: &'a mut NotificationChannel, scheduler: &'a mut Scheduler<T>) -> Self {
        Self { channel, scheduler }
    }
}

impl<T: From<NotificationTask>> NotificationSink for ScheduledSink<'_, T> {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.channel.show(message, severity, &mut *self.scheduler);
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{
        escape_html, NotificationChannel, NotificationPhase, NotificationSink, NotificationTask,
        ScheduledSink, Severity,
    };
    use crate::scheduler::Scheduler;
    use std::time::Duration;

    fn channel() -> NotificationChannel {
        NotificationChannel::new(Duration::from_secs(5), Duration::from_millis(300))
    }

    fn run_until(
        channel: &mut NotificationChannel,
        scheduler: &mut Scheduler<NotificationTask>,
        until: Duration,
    ) {
        while let Some((_, task)) = scheduler.pop_due(until) {
            channel.handle(task, scheduler);
        }
        scheduler.advance_clock(until);
    }

    #[test]
    fn expires_in_two_phases() {
        let mut channel = channel();
        let mut scheduler = Scheduler::new();
        let id = channel.show("Gespeichert", Severity::Success, &mut scheduler);

        run_until(&mut channel, &mut scheduler, Duration::from_millis(4_999));
        assert_eq!(channel.get(id).map(|n| n.phase), Some(NotificationPhase::Visible));

        run_until(&mut channel, &mut scheduler, Duration::from_millis(5_000));
        assert_eq!(channel.get(id).map(|n| n.phase), Some(NotificationPhase::Fading));

        run_until(&mut channel, &mut scheduler, Duration::from_millis(5_299));
        assert!(channel.contains(id));

        run_until(&mut channel, &mut scheduler, Duration::from_millis(5_300));
        assert!(!channel.contains(id));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn dismissal_cancels_expiry() {
        let mut channel = channel();
        let mut scheduler = Scheduler::new();
        let id = channel.show("Hallo", Severity::Info, &mut scheduler);

        scheduler.advance_clock(Duration::from_secs(1));
        assert!(channel.hide(id, &mut scheduler));
        assert!(!channel.hide(id, &mut scheduler));
        assert_eq!(scheduler.pending(), 1);

        run_until(&mut channel, &mut scheduler, Duration::from_millis(1_300));
        assert!(channel.is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn hiding_removed_notification_is_noop() {
        let mut channel = channel();
        let mut scheduler = Scheduler::new();
        let id = channel.show("weg", Severity::Info, &mut scheduler);
        run_until(&mut channel, &mut scheduler, Duration::from_secs(6));

        assert!(!channel.hide(id, &mut scheduler));
        assert!(!channel.detach(id));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn notifications_are_independent() {
        let mut channel = channel();
        let mut scheduler = Scheduler::new();
        let first = channel.show("same", Severity::Error, &mut scheduler);
        let second = channel.show("same", Severity::Error, &mut scheduler);
        assert_ne!(first, second);
        assert_eq!(channel.len(), 2);

        channel.hide(first, &mut scheduler);
        run_until(&mut channel, &mut scheduler, Duration::from_millis(300));
        assert!(!channel.contains(first));
        assert!(channel.contains(second));
    }

    #[test]
    fn sink_shows_through_channel() {
        let mut channel = channel();
        let mut scheduler: Scheduler<NotificationTask> = Scheduler::new();
        ScheduledSink::new(&mut channel, &mut scheduler).notify("Fehler", Severity::Error);

        assert_eq!(channel.len(), 1);
        assert_eq!(channel.entries()[0].severity, Severity::Error);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn renders_escaped_alert_markup() {
        let mut channel = channel();
        let mut scheduler: Scheduler<NotificationTask> = Scheduler::new();
        let id = channel.show("<b>A & B</b>", Severity::Error, &mut scheduler);
        let html = channel.get(id).expect("notification").render_html();

        assert!(html.contains("alert-danger"));
        assert!(html.contains("&lt;b&gt;A &amp; B&lt;/b&gt;"));
        assert!(html.contains(r#"aria-label="Schließen""#));
        assert_eq!(escape_html("plain"), "plain");
    }
}
