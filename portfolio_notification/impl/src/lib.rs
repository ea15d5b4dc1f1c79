use std::{
    io::{self, Stdout, Write},
    sync::Mutex,
};

use portfolio_notification_contracts::{
    Notification, NotificationDuration, NotificationService, NotificationSeverity,
};
use tracing::{info, warn};

/// Prints every notification as a single line. Lines are never erased, so
/// indefinite notifications stay on screen as long as the terminal keeps them.
#[derive(Debug)]
pub struct ConsoleNotificationServiceImpl<W = Stdout> {
    out: Mutex<W>,
}

impl ConsoleNotificationServiceImpl {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W> ConsoleNotificationServiceImpl<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|err| err.into_inner())
    }
}

impl<W> NotificationService for ConsoleNotificationServiceImpl<W>
where
    W: Write + Send + 'static,
{
    fn notify(&self, notification: Notification) {
        match notification.severity {
            NotificationSeverity::Success => info!(text = %notification.message, "notification"),
            NotificationSeverity::Error => warn!(text = %notification.message, "notification"),
        }

        let mut out = self.out.lock().unwrap_or_else(|err| err.into_inner());
        if let Err(err) = writeln!(out, "{}", render(&notification)).and_then(|()| out.flush()) {
            warn!("Failed to print notification: {err}");
        }
    }
}

fn render(notification: &Notification) -> String {
    let icon = match notification.severity {
        NotificationSeverity::Success => "✔",
        NotificationSeverity::Error => "✖",
    };

    match notification.duration {
        NotificationDuration::Indefinite => format!("{icon} {}", notification.message),
        NotificationDuration::Timed(duration) => {
            format!("{icon} {} ({}s)", notification.message, duration.as_secs())
        }
    }
}
