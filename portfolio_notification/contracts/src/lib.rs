use std::time::Duration;

/// A one-way channel for transient messages shown to the user, independent of
/// the inline errors of a form.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait NotificationService: Send + Sync + 'static {
    fn notify(&self, notification: Notification);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: NotificationSeverity,
    pub duration: NotificationDuration,
}

impl Notification {
    /// A success notification that stays until dismissed.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: NotificationSeverity::Success,
            duration: NotificationDuration::Indefinite,
        }
    }

    /// An error notification that stays until dismissed.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: NotificationSeverity::Error,
            duration: NotificationDuration::Indefinite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSeverity {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationDuration {
    /// Shown until the user dismisses it.
    Indefinite,
    /// Dismissed automatically after the given time.
    Timed(Duration),
}

#[cfg(feature = "mock")]
impl MockNotificationService {
    pub fn with_notify(mut self, notification: Notification) -> Self {
        self.expect_notify()
            .once()
            .with(mockall::predicate::eq(notification))
            .return_const(());
        self
    }
}
