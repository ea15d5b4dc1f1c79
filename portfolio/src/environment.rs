use portfolio_config::Config;
use portfolio_core_contact_impl::ContactFormServiceImpl;
use portfolio_extern_impl::contact::{ContactApiServiceConfig, ContactApiServiceImpl};
use portfolio_notification_impl::ConsoleNotificationServiceImpl;

pub type ContactForm =
    ContactFormServiceImpl<ContactApiServiceImpl, ConsoleNotificationServiceImpl>;

/// Builds a contact form that submits to the configured backend and prints
/// notifications to stdout.
pub fn contact_form(config: &Config) -> anyhow::Result<ContactForm> {
    let contact_api = ContactApiServiceImpl::new(ContactApiServiceConfig {
        endpoint: config.contact.endpoint.clone().into(),
        timeout: config.contact.timeout.map(Into::into),
    })?;

    Ok(ContactFormServiceImpl::new(
        contact_api,
        ConsoleNotificationServiceImpl::stdout(),
    ))
}
