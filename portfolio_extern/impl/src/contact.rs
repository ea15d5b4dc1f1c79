use std::{collections::HashMap, sync::Arc, time::Duration};

use portfolio_extern_contracts::contact::{ContactApiResponse, ContactApiService};
use portfolio_models::contact::{ContactFormErrors, ContactFormField, ContactFormValues};
use portfolio_utils::Apply;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct ContactApiServiceImpl {
    config: ContactApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ContactApiServiceConfig {
    pub endpoint: Arc<Url>,
    pub timeout: Option<Duration>,
}

impl ContactApiServiceImpl {
    pub fn new(config: ContactApiServiceConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            client: HttpClient::new()?,
        })
    }
}

impl ContactApiService for ContactApiServiceImpl {
    async fn submit(&self, values: &ContactFormValues) -> anyhow::Result<ContactApiResponse> {
        let response = self
            .client
            .post((*self.config.endpoint).clone())
            .json(values)
            .apply_map(self.config.timeout, RequestBuilder::timeout)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, endpoint = %self.config.endpoint, "contact backend responded");

        if status.is_success() {
            return Ok(ContactApiResponse::Accepted);
        }

        if status != StatusCode::BAD_REQUEST {
            return Ok(ContactApiResponse::Failed(status.as_u16()));
        }

        let errors = match response.bytes().await {
            Ok(body) => parse_field_errors(&body),
            Err(err) => {
                trace!("failed to read body of rejected submission: {err}");
                ContactFormErrors::default()
            }
        };

        Ok(ContactApiResponse::Rejected(errors))
    }
}

/// A single field error as reported by the backend, which may send either a
/// message or a list of messages.
#[derive(Deserialize)]
#[serde(untagged)]
enum ApiFieldError {
    Message(String),
    Messages(Vec<serde_json::Value>),
    Other(serde::de::IgnoredAny),
}

impl ApiFieldError {
    fn into_message(self) -> Option<String> {
        match self {
            Self::Message(message) => Some(message),
            Self::Messages(messages) => match messages.into_iter().next()? {
                serde_json::Value::String(message) => Some(message),
                _ => None,
            },
            Self::Other(_) => None,
        }
    }
}

/// Extracts the errors of known fields from the body of a `400 Bad Request`.
/// Bodies that are not a JSON object yield no errors.
fn parse_field_errors(body: &[u8]) -> ContactFormErrors {
    let Ok(errors) = serde_json::from_slice::<HashMap<String, ApiFieldError>>(body) else {
        trace!("rejected submission has no field errors");
        return ContactFormErrors::default();
    };

    errors
        .into_iter()
        .filter_map(|(key, error)| {
            let field = key.parse::<ContactFormField>().ok()?;
            Some((field, error.into_message()?))
        })
        .collect()
}
