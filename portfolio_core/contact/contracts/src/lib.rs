use std::future::Future;

use portfolio_models::contact::{ContactFormErrors, ContactFormField, ContactFormInput};
use tokio::sync::watch;

/// Drives the contact form of one rendered page: collects the input, validates
/// and submits it, and keeps the displayed errors consistent.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFormService: Send + 'static {
    /// The current state of the form.
    fn state(&self) -> &ContactFormState;

    /// The status of the current or most recent submission.
    fn status(&self) -> SubmitStatus;

    /// Returns a receiver that observes every status change, e.g. to disable
    /// the submit button while a submission is in flight.
    fn subscribe(&self) -> watch::Receiver<SubmitStatus>;

    /// Replaces the value of `field` and clears the error shown for it.
    fn edit(&mut self, field: ContactFormField, value: String);

    /// Clears the error shown for `field` without touching its value.
    fn clear_error(&mut self, field: ContactFormField);

    /// Validates the current input and, if valid, submits it.
    fn submit(&mut self) -> impl Future<Output = SubmitOutcome> + Send;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormState {
    pub input: ContactFormInput,
    pub errors: ContactFormErrors,
    /// Feedback shown below the submit button after a failed submission.
    pub server_error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl SubmitStatus {
    /// Whether a new submission may start from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }

    /// The label of the submit button.
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Loading => "Invio in corso...",
            _ => "Invia messaggio",
        }
    }
}

/// How a single call to [`ContactFormService::submit`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The input failed local validation, nothing was sent.
    Invalid,
    /// The backend accepted the message.
    Sent,
    /// The backend rejected the input.
    Rejected,
    /// The backend failed to process the message.
    Failed,
    /// The backend could not be reached.
    Unreachable,
}

impl SubmitOutcome {
    pub fn status(self) -> SubmitStatus {
        match self {
            Self::Invalid => SubmitStatus::Idle,
            Self::Sent => SubmitStatus::Success,
            Self::Rejected | Self::Failed | Self::Unreachable => SubmitStatus::Error,
        }
    }
}

#[cfg(feature = "mock")]
impl MockContactFormService {
    pub fn with_edit(mut self, field: ContactFormField, value: String) -> Self {
        self.expect_edit()
            .once()
            .with(
                mockall::predicate::eq(field),
                mockall::predicate::eq(value),
            )
            .return_const(());
        self
    }

    pub fn with_submit(mut self, outcome: SubmitOutcome) -> Self {
        self.expect_submit()
            .once()
            .return_once(move || Box::pin(std::future::ready(outcome)));
        self
    }

    pub fn with_state(mut self, state: ContactFormState) -> Self {
        self.expect_state().return_const(state);
        self
    }
}
