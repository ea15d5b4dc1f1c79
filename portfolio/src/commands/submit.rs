use std::io::Write;

use anyhow::ensure;
use clap::Args;
use portfolio_config::Config;
use portfolio_core_contact_contracts::{ContactFormService, SubmitOutcome};
use portfolio_models::contact::{ContactFormField, ContactFormInput};

use super::render_errors;
use crate::environment;

#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Your name
    #[arg(long)]
    name: Option<String>,
    /// Your email address
    #[arg(long)]
    email: Option<String>,
    /// Your phone number
    #[arg(long)]
    phone: Option<String>,
    /// The message to send
    #[arg(long)]
    message: Option<String>,
}

impl SubmitCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let form = environment::contact_form(&config)?;
        self.submit(form, &mut std::io::stdout()).await
    }

    async fn submit(
        self,
        mut form: impl ContactFormService,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let input = ContactFormInput::from_form_data(
            [
                ("name", self.name),
                ("email", self.email),
                ("phone", self.phone),
                ("message", self.message),
            ]
            .into_iter()
            .filter_map(|(key, value)| Some((key, value?))),
        );
        for field in ContactFormField::ALL {
            form.edit(field, input.get(field).into());
        }

        let outcome = form.submit().await;
        render_errors(out, form.state())?;

        ensure!(
            outcome == SubmitOutcome::Sent,
            "The contact form was not sent ({outcome:?})"
        );

        Ok(())
    }
}
