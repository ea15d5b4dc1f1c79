use std::io::Write;

use portfolio_core_contact_contracts::ContactFormState;
use portfolio_models::contact::ContactFormField;

pub mod interactive;
pub mod submit;

fn field_label(field: ContactFormField) -> &'static str {
    match field {
        ContactFormField::Name => "Nome",
        ContactFormField::Email => "Email",
        ContactFormField::Phone => "Telefono (opzionale)",
        ContactFormField::Message => "Messaggio",
    }
}

/// Prints the inline error of every field that has one, followed by the
/// feedback of the last submission.
fn render_errors(out: &mut impl Write, state: &ContactFormState) -> std::io::Result<()> {
    for (field, message) in state.errors.iter() {
        writeln!(out, "  {}: {message}", field_label(field))?;
    }
    if let Some(server_error) = &state.server_error {
        writeln!(out, "  {server_error}")?;
    }
    Ok(())
}
