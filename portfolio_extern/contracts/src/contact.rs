use std::future::Future;

use portfolio_models::contact::{ContactFormErrors, ContactFormValues};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactApiService: Send + Sync + 'static {
    /// Posts the validated form to the contact backend.
    ///
    /// Returns an error only if no response could be obtained at all.
    fn submit(
        &self,
        values: &ContactFormValues,
    ) -> impl Future<Output = anyhow::Result<ContactApiResponse>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactApiResponse {
    /// The backend accepted the message (2xx).
    Accepted,
    /// The backend rejected the input (400), with the errors it reported for
    /// known fields.
    Rejected(ContactFormErrors),
    /// Any other non-success status code.
    Failed(u16),
}

#[cfg(feature = "mock")]
impl MockContactApiService {
    pub fn with_submit(mut self, values: ContactFormValues, result: ContactApiResponse) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(values))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_submit_unreachable(mut self, values: ContactFormValues) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(values))
            .return_once(|_| {
                Box::pin(std::future::ready(Err(anyhow::anyhow!(
                    "error sending request: connection refused"
                ))))
            });
        self
    }
}
