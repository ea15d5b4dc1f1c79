use std::{collections::BTreeMap, fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::macros::nutype_string;

pub const NAME_TOO_SHORT: &str = "Inserisci almeno 2 caratteri.";
pub const NAME_TOO_LONG: &str = "Il nome è troppo lungo.";
pub const EMAIL_INVALID: &str = "Inserisci un'email valida.";
pub const PHONE_INVALID: &str = "Inserisci un numero di telefono valido.";
pub const MESSAGE_TOO_SHORT: &str = "Il messaggio deve contenere almeno 10 caratteri.";
pub const MESSAGE_TOO_LONG: &str = "Il messaggio è troppo lungo.";

/// A contact message that passed validation and is ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactFormValues {
    pub name: ContactName,
    pub email: ContactEmail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<ContactPhone>,
    pub message: ContactMessage,
}

nutype_string!(ContactName(
    sanitize(trim),
    validate(len_char_min = 2, len_char_max = 80)
));

nutype_string!(ContactEmail(
    sanitize(trim),
    validate(regex = CONTACT_EMAIL_REGEX)
));

nutype_string!(ContactPhone(
    sanitize(trim),
    validate(regex = CONTACT_PHONE_REGEX)
));

nutype_string!(ContactMessage(
    sanitize(trim),
    validate(len_char_min = 10, len_char_max = 2000)
));

pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z0-9_'+\-]+\.)*[A-Za-z0-9_'+\-]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
    )
    .unwrap()
});

pub static CONTACT_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s()+\-]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactFormField {
    Name,
    Email,
    Phone,
    Message,
}

impl ContactFormField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Phone, Self::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for ContactFormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactFormField {
    type Err = ContactFormFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ContactFormFieldParseError(s.into()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown contact form field: {0:?}")]
pub struct ContactFormFieldParseError(pub String);

/// The raw state of the contact form, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactFormInput {
    /// Extracts the form fields from submitted key/value pairs. Unknown keys
    /// are ignored and missing fields are left empty, so that validation
    /// alone decides which fields are missing.
    pub fn from_form_data<K, V>(data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut input = Self::default();
        for (key, value) in data {
            if let Ok(field) = key.as_ref().parse() {
                input.set(field, value.into());
            }
        }
        input
    }

    pub fn get(&self, field: ContactFormField) -> &str {
        match field {
            ContactFormField::Name => &self.name,
            ContactFormField::Email => &self.email,
            ContactFormField::Phone => &self.phone,
            ContactFormField::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: ContactFormField, value: String) {
        let slot = match field {
            ContactFormField::Name => &mut self.name,
            ContactFormField::Email => &mut self.email,
            ContactFormField::Phone => &mut self.phone,
            ContactFormField::Message => &mut self.message,
        };
        *slot = value;
    }

    /// Checks every field and either returns the trimmed values or all
    /// violations at once.
    pub fn validate(&self) -> Result<ContactFormValues, ContactFormViolations> {
        let mut violations = ContactFormViolations::default();

        let name = ContactName::try_new(self.name.clone())
            .map_err(|err| match err {
                ContactNameError::LenCharMaxViolated => NAME_TOO_LONG,
                _ => NAME_TOO_SHORT,
            })
            .map_err(|msg| violations.push(ContactFormField::Name, msg))
            .ok();

        let email = ContactEmail::try_new(self.email.clone())
            .map_err(|_| violations.push(ContactFormField::Email, EMAIL_INVALID))
            .ok();

        let phone = match self.phone.trim() {
            "" => Some(None),
            phone => ContactPhone::try_new(phone.to_owned())
                .map(Some)
                .map_err(|_| violations.push(ContactFormField::Phone, PHONE_INVALID))
                .ok(),
        };

        let message = ContactMessage::try_new(self.message.clone())
            .map_err(|err| match err {
                ContactMessageError::LenCharMaxViolated => MESSAGE_TOO_LONG,
                _ => MESSAGE_TOO_SHORT,
            })
            .map_err(|msg| violations.push(ContactFormField::Message, msg))
            .ok();

        match (name, email, phone, message) {
            (Some(name), Some(email), Some(phone), Some(message)) => Ok(ContactFormValues {
                name,
                email,
                phone,
                message,
            }),
            _ => Err(violations),
        }
    }
}

/// Violated constraints per field, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormViolations(BTreeMap<ContactFormField, Vec<&'static str>>);

impl ContactFormViolations {
    fn push(&mut self, field: ContactFormField, message: &'static str) {
        self.0.entry(field).or_default().push(message);
    }

    pub fn get(&self, field: ContactFormField) -> &[&'static str] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = ContactFormField> + '_ {
        self.0.keys().copied()
    }

    /// Keeps only the first message of each field.
    pub fn into_errors(self) -> ContactFormErrors {
        self.0
            .into_iter()
            .filter_map(|(field, messages)| Some((field, (*messages.first()?).to_owned())))
            .collect()
    }
}

/// The error message currently displayed next to each field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactFormErrors(BTreeMap<ContactFormField, String>);

impl ContactFormErrors {
    pub fn get(&self, field: ContactFormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: ContactFormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: ContactFormField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactFormField, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl FromIterator<(ContactFormField, String)> for ContactFormErrors {
    fn from_iter<T: IntoIterator<Item = (ContactFormField, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
