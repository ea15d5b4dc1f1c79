use portfolio_core_contact_contracts::{
    ContactFormService, ContactFormState, SubmitOutcome, SubmitStatus,
};
use portfolio_extern_contracts::contact::{ContactApiResponse, ContactApiService};
use portfolio_models::contact::{ContactFormField, ContactFormInput};
use portfolio_notification_contracts::{Notification, NotificationService};
use tokio::sync::watch;
use tracing::{debug, error, info, trace, warn};

pub const SENT_MESSAGE: &str = "Messaggio inviato! Ti risponderò il prima possibile.";
pub const REJECTED_MESSAGE: &str = "Controlla i campi evidenziati e riprova.";
pub const FAILED_MESSAGE: &str = "Si è verificato un errore durante l'invio. Riprova più tardi.";
pub const UNREACHABLE_MESSAGE: &str =
    "Connessione al server non riuscita. Verifica la rete o riprova più tardi.";

#[derive(Debug)]
pub struct ContactFormServiceImpl<ContactApi, NotificationS> {
    contact_api: ContactApi,
    notification: NotificationS,
    state: ContactFormState,
    status: watch::Sender<SubmitStatus>,
}

impl<ContactApi, NotificationS> ContactFormServiceImpl<ContactApi, NotificationS> {
    pub fn new(contact_api: ContactApi, notification: NotificationS) -> Self {
        Self {
            contact_api,
            notification,
            state: ContactFormState::default(),
            status: watch::Sender::new(SubmitStatus::Idle),
        }
    }

    fn set_status(&self, status: SubmitStatus) {
        self.status.send_replace(status);
    }
}

impl<ContactApi, NotificationS> ContactFormService
    for ContactFormServiceImpl<ContactApi, NotificationS>
where
    ContactApi: ContactApiService,
    NotificationS: NotificationService,
{
    fn state(&self) -> &ContactFormState {
        &self.state
    }

    fn status(&self) -> SubmitStatus {
        *self.status.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<SubmitStatus> {
        self.status.subscribe()
    }

    fn edit(&mut self, field: ContactFormField, value: String) {
        self.state.input.set(field, value);
        self.clear_error(field);
    }

    fn clear_error(&mut self, field: ContactFormField) {
        if self.state.errors.remove(field).is_some() {
            trace!(%field, "cleared field error");
        }
    }

    async fn submit(&mut self) -> SubmitOutcome {
        self.set_status(SubmitStatus::Idle);
        self.state.server_error = None;

        let values = match self.state.input.validate() {
            Ok(values) => values,
            Err(violations) => {
                debug!(fields = ?violations.fields().collect::<Vec<_>>(), "contact form is invalid");
                self.state.errors = violations.into_errors();
                return SubmitOutcome::Invalid;
            }
        };

        self.state.errors.clear();
        self.set_status(SubmitStatus::Loading);
        info!("submitting contact form");

        let (outcome, notification) = match self.contact_api.submit(&values).await {
            Ok(ContactApiResponse::Accepted) => {
                info!("contact form sent");
                self.state.input = ContactFormInput::default();
                (SubmitOutcome::Sent, Notification::success(SENT_MESSAGE))
            }
            Ok(ContactApiResponse::Rejected(errors)) => {
                warn!(
                    fields = ?errors.iter().map(|(field, _)| field).collect::<Vec<_>>(),
                    "contact form rejected by backend"
                );
                if !errors.is_empty() {
                    self.state.errors = errors;
                }
                (
                    SubmitOutcome::Rejected,
                    Notification::error(REJECTED_MESSAGE),
                )
            }
            Ok(ContactApiResponse::Failed(status)) => {
                warn!(status, "contact backend failed to process the form");
                (SubmitOutcome::Failed, Notification::error(FAILED_MESSAGE))
            }
            Err(err) => {
                error!("contact backend unreachable: {err:#}");
                (
                    SubmitOutcome::Unreachable,
                    Notification::error(UNREACHABLE_MESSAGE),
                )
            }
        };

        if outcome != SubmitOutcome::Sent {
            self.state.server_error = Some(notification.message.clone());
        }
        self.set_status(outcome.status());
        self.notification.notify(notification);

        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use portfolio_extern_contracts::contact::MockContactApiService;
    use portfolio_models::contact::{
        ContactFormErrors, ContactFormValues, EMAIL_INVALID, NAME_TOO_SHORT,
    };
    use portfolio_notification_contracts::MockNotificationService;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    use super::*;

    type Sut = ContactFormServiceImpl<MockContactApiService, MockNotificationService>;

    #[tokio::test]
    async fn invalid_makes_no_request() {
        // Arrange
        let contact_api = MockContactApiService::new();
        let notification = MockNotificationService::new();

        let mut sut = ContactFormServiceImpl::new(contact_api, notification);
        fill(&mut sut, ContactFormInput {
            name: "A".into(),
            ..valid_input()
        });

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result, SubmitOutcome::Invalid);
        assert_eq!(sut.status(), SubmitStatus::Idle);
        assert_eq!(sut.state().errors, errors([(ContactFormField::Name, NAME_TOO_SHORT)]));
        assert_eq!(sut.state().server_error, None);
    }

    #[tokio::test]
    async fn invalid_reports_every_field() {
        // Arrange
        let mut sut = Sut::new(MockContactApiService::new(), MockNotificationService::new());
        sut.edit(ContactFormField::Phone, "call me".into());

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result, SubmitOutcome::Invalid);
        assert_eq!(
            sut.state().errors.iter().map(|(field, _)| field).collect::<Vec<_>>(),
            ContactFormField::ALL
        );
    }

    #[tokio::test]
    async fn sent() {
        // Arrange
        let contact_api =
            MockContactApiService::new().with_submit(valid_values(), ContactApiResponse::Accepted);
        let notification =
            MockNotificationService::new().with_notify(Notification::success(SENT_MESSAGE));

        let mut sut = ContactFormServiceImpl::new(contact_api, notification);
        fill(&mut sut, ContactFormInput {
            name: "A".into(),
            ..valid_input()
        });
        assert_eq!(sut.submit().await, SubmitOutcome::Invalid);
        sut.edit(ContactFormField::Name, valid_input().name);

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result, SubmitOutcome::Sent);
        assert_eq!(sut.status(), SubmitStatus::Success);
        assert_eq!(*sut.state(), ContactFormState::default());
    }

    #[tokio::test]
    async fn rejected() {
        // Arrange
        let mut sut = rejected_sut().await;

        // Assert
        assert_eq!(sut.status(), SubmitStatus::Error);
        assert_eq!(
            sut.state().errors,
            errors([(ContactFormField::Email, "already used")])
        );
        assert_eq!(sut.state().errors.get(ContactFormField::Name), None);
        assert_eq!(sut.state().errors.get(ContactFormField::Message), None);
        assert_eq!(sut.state().server_error.as_deref(), Some(REJECTED_MESSAGE));
        assert_eq!(sut.state().input, valid_input());

        // Act
        sut.edit(ContactFormField::Name, "Maxine Mustermann".into());

        // Assert
        assert_eq!(
            sut.state().errors,
            errors([(ContactFormField::Email, "already used")])
        );
        assert_eq!(sut.status(), SubmitStatus::Error);

        // Act
        sut.edit(ContactFormField::Email, "maxine@example.de".into());

        // Assert
        assert!(sut.state().errors.is_empty());
        assert_eq!(sut.status(), SubmitStatus::Error);
        assert_eq!(sut.state().input.email, "maxine@example.de");
    }

    #[tokio::test]
    async fn rejected_without_field_errors() {
        // Arrange
        let contact_api = MockContactApiService::new().with_submit(
            valid_values(),
            ContactApiResponse::Rejected(ContactFormErrors::default()),
        );
        let notification =
            MockNotificationService::new().with_notify(Notification::error(REJECTED_MESSAGE));

        let mut sut = ContactFormServiceImpl::new(contact_api, notification);
        fill(&mut sut, valid_input());

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result, SubmitOutcome::Rejected);
        assert_eq!(sut.status(), SubmitStatus::Error);
        assert!(sut.state().errors.is_empty());
    }

    #[tokio::test]
    async fn failed() {
        // Arrange
        let contact_api = MockContactApiService::new()
            .with_submit(valid_values(), ContactApiResponse::Failed(503));
        let notification =
            MockNotificationService::new().with_notify(Notification::error(FAILED_MESSAGE));

        let mut sut = ContactFormServiceImpl::new(contact_api, notification);
        fill(&mut sut, valid_input());

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result, SubmitOutcome::Failed);
        assert_eq!(sut.status(), SubmitStatus::Error);
        assert!(sut.state().errors.is_empty());
        assert_eq!(sut.state().server_error.as_deref(), Some(FAILED_MESSAGE));
        assert_eq!(sut.state().input, valid_input());
    }

    #[tokio::test]
    async fn unreachable() {
        // Arrange
        let contact_api = MockContactApiService::new().with_submit_unreachable(valid_values());
        let notification =
            MockNotificationService::new().with_notify(Notification::error(UNREACHABLE_MESSAGE));

        let mut sut = ContactFormServiceImpl::new(contact_api, notification);
        fill(&mut sut, valid_input());

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result, SubmitOutcome::Unreachable);
        assert_eq!(sut.status(), SubmitStatus::Error);
        assert!(sut.state().errors.is_empty());
        assert_eq!(sut.state().server_error.as_deref(), Some(UNREACHABLE_MESSAGE));
    }

    #[tokio::test]
    async fn next_attempt_starts_idle() {
        // Arrange
        let mut sut = rejected_sut().await;
        sut.edit(ContactFormField::Email, "not an email".into());

        // Act
        let result = sut.submit().await;

        // Assert
        assert_eq!(result, SubmitOutcome::Invalid);
        assert_eq!(sut.status(), SubmitStatus::Idle);
        assert_eq!(sut.state().server_error, None);
        assert_eq!(
            sut.state().errors,
            errors([(ContactFormField::Email, EMAIL_INVALID)])
        );
    }

    #[tokio::test]
    async fn clear_error_keeps_value() {
        // Arrange
        let mut sut = rejected_sut().await;

        // Act
        sut.clear_error(ContactFormField::Email);
        sut.clear_error(ContactFormField::Phone);

        // Assert
        assert!(sut.state().errors.is_empty());
        assert_eq!(sut.state().input, valid_input());
    }

    #[tokio::test]
    async fn loading_while_in_flight() {
        // Arrange
        let (response_tx, response_rx) = oneshot::channel();
        let contact_api = PendingContactApi(Mutex::new(Some(response_rx)));
        let notification =
            MockNotificationService::new().with_notify(Notification::success(SENT_MESSAGE));

        let mut sut = ContactFormServiceImpl::new(contact_api, notification);
        fill(&mut sut, valid_input());
        let mut status = sut.subscribe();

        let observe = async move {
            status.wait_for(|status| status.is_loading()).await.unwrap();
            response_tx.send(ContactApiResponse::Accepted).unwrap();
            let terminal = *status.wait_for(|status| status.is_terminal()).await.unwrap();
            terminal
        };

        // Act
        let (result, terminal) = tokio::join!(sut.submit(), observe);

        // Assert
        assert_eq!(result, SubmitOutcome::Sent);
        assert_eq!(terminal, SubmitStatus::Success);
    }

    struct PendingContactApi(Mutex<Option<oneshot::Receiver<ContactApiResponse>>>);

    impl ContactApiService for PendingContactApi {
        async fn submit(
            &self,
            _values: &ContactFormValues,
        ) -> anyhow::Result<ContactApiResponse> {
            let response = self.0.lock().unwrap().take().unwrap();
            Ok(response.await?)
        }
    }

    async fn rejected_sut() -> Sut {
        let contact_api = MockContactApiService::new().with_submit(
            valid_values(),
            ContactApiResponse::Rejected(errors([(ContactFormField::Email, "already used")])),
        );
        let notification =
            MockNotificationService::new().with_notify(Notification::error(REJECTED_MESSAGE));

        let mut sut = ContactFormServiceImpl::new(contact_api, notification);
        fill(&mut sut, valid_input());
        assert_eq!(sut.submit().await, SubmitOutcome::Rejected);
        sut
    }

    fn fill(sut: &mut impl ContactFormService, input: ContactFormInput) {
        for field in ContactFormField::ALL {
            sut.edit(field, input.get(field).into());
        }
    }

    fn errors<const N: usize>(errors: [(ContactFormField, &str); N]) -> ContactFormErrors {
        errors
            .into_iter()
            .map(|(field, message)| (field, message.to_owned()))
            .collect()
    }

    fn valid_input() -> ContactFormInput {
        ContactFormInput {
            name: "Max Mustermann".into(),
            email: "max.mustermann@example.de".into(),
            phone: String::new(),
            message: "I'd like to talk about a project.".into(),
        }
    }

    fn valid_values() -> ContactFormValues {
        valid_input().validate().unwrap()
    }
}
