use std::io::Write;

use anyhow::{anyhow, Context};
use portfolio_config::Config;
use portfolio_core_contact_contracts::{ContactFormService, SubmitOutcome};
use portfolio_models::contact::ContactFormField;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use super::{field_label, render_errors};
use crate::environment;

pub async fn invoke(config: Config) -> anyhow::Result<()> {
    let form = environment::contact_form(&config)?;

    run(
        form,
        BufReader::new(tokio::io::stdin()).lines(),
        &mut std::io::stdout(),
    )
    .await
}

/// Prompts for every field, submits, and after a failed attempt prompts again
/// for the fields that have errors until the message has been sent.
async fn run(
    mut form: impl ContactFormService,
    mut lines: Lines<impl AsyncBufRead + Unpin>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut fields = ContactFormField::ALL.to_vec();

    loop {
        for field in fields {
            let value = prompt(&mut lines, out, field_label(field)).await?;
            form.edit(field, value);
        }

        let outcome = submit(&mut form, out).await?;
        debug!(?outcome, "contact form submitted");
        render_errors(out, form.state())?;

        fields = match outcome {
            SubmitOutcome::Sent => return Ok(()),
            SubmitOutcome::Invalid | SubmitOutcome::Rejected => {
                form.state().errors.iter().map(|(field, _)| field).collect()
            }
            SubmitOutcome::Failed | SubmitOutcome::Unreachable => Vec::new(),
        };

        if fields.is_empty() {
            prompt(&mut lines, out, "Premi Invio per riprovare").await?;
        }
    }
}

/// Submits the form and prints the loading label while the request is in
/// flight.
async fn submit(
    form: &mut impl ContactFormService,
    out: &mut impl Write,
) -> anyhow::Result<SubmitOutcome> {
    let mut status = form.subscribe();
    let submit = form.submit();
    tokio::pin!(submit);

    loop {
        tokio::select! {
            biased;
            outcome = &mut submit => return Ok(outcome),
            Ok(()) = status.changed() => {
                let status = *status.borrow_and_update();
                if status.is_loading() {
                    writeln!(out, "{}", status.submit_label())?;
                }
            }
        }
    }
}

async fn prompt(
    lines: &mut Lines<impl AsyncBufRead + Unpin>,
    out: &mut impl Write,
    label: &str,
) -> anyhow::Result<String> {
    write!(out, "{label}: ")?;
    out.flush()?;

    lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
        .ok_or_else(|| anyhow!("Input ended before the message was sent"))
}
