//! Form submission state.
//!
//! A form posts back to the page it lives on. The handler records the result
//! in [`FormSlots`] on the request bus and the page re-renders with it: field
//! errors next to inputs, the submitted values kept, or a success message.

use std::collections::{BTreeMap, HashMap};

/// Hidden field naming which form a POST belongs to.
pub const FORM_FIELD: &str = "form";

/// Field name to validation messages, in field order.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Submitted form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded pairs. A repeated field keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn parse(body: &str) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str::<Vec<(String, String)>>(body).map(Self::from_pairs)
    }

    /// Field value, or `""` when the field was not submitted.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or_default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which form a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Newsletter,
    EventSignup,
}

impl FormKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Newsletter => "subscribe",
            FormKind::EventSignup => "event-signup",
        }
    }

    pub fn parse(raw: &str) -> Option<FormKind> {
        match raw.trim() {
            "subscribe" => Some(FormKind::Newsletter),
            "event-signup" => Some(FormKind::EventSignup),
            _ => None,
        }
    }
}

/// Result of the latest submission of one form.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Submission in flight; the submit control is disabled.
    Pending,
    /// Validation failed. No request reached the CMS.
    Invalid {
        errors: FieldErrors,
        values: FormValues,
    },
    /// The CMS refused the submission or could not be reached.
    Rejected { message: String, values: FormValues },
    Accepted { message: String },
}

impl FormState {
    pub fn is_pending(&self) -> bool {
        matches!(self, FormState::Pending)
    }

    /// First validation message for `field`, if any.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        match self {
            FormState::Invalid { errors, .. } => errors
                .get(field)
                .and_then(|messages| messages.first())
                .map(String::as_str),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FormState::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn success_message(&self) -> Option<&str> {
        match self {
            FormState::Accepted { message } => Some(message),
            _ => None,
        }
    }

    /// Value to pre-fill `field` with. Cleared after a successful submission.
    pub fn value(&self, field: &str) -> &str {
        match self {
            FormState::Invalid { values, .. } | FormState::Rejected { values, .. } => {
                values.get(field)
            }
            _ => "",
        }
    }

    pub fn phase(&self) -> &'static str {
        match self {
            FormState::Idle => "idle",
            FormState::Pending => "pending",
            FormState::Invalid { .. } => "invalid",
            FormState::Rejected { .. } => "rejected",
            FormState::Accepted { .. } => "accepted",
        }
    }
}

static IDLE: FormState = FormState::Idle;

/// Per-form submission state for one request.
#[derive(Debug, Clone, Default)]
pub struct FormSlots {
    states: HashMap<FormKind, FormState>,
}

impl FormSlots {
    pub fn set(&mut self, kind: FormKind, state: FormState) {
        self.states.insert(kind, state);
    }

    /// State of `kind`, [`FormState::Idle`] if it was never submitted.
    pub fn get(&self, kind: FormKind) -> &FormState {
        self.states.get(&kind).unwrap_or(&IDLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_keeps_last_value() {
        let values = FormValues::parse("email=a%40b.com&form=subscribe&email=c%40d.com")
            .expect("valid body");
        assert_eq!(values.get("email"), "c@d.com");
        assert_eq!(values.get("form"), "subscribe");
        assert_eq!(values.get("missing"), "");
    }

    #[test]
    fn test_form_kind_names() {
        for kind in [FormKind::Newsletter, FormKind::EventSignup] {
            assert_eq!(FormKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FormKind::parse("contact"), None);
    }

    #[test]
    fn test_invalid_state_exposes_first_error_and_values() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "email".into(),
            vec!["Email is required".into(), "Enter a valid email".into()],
        );
        let state = FormState::Invalid {
            errors,
            values: FormValues::from_pairs([("first_name", "Kai")]),
        };

        assert_eq!(state.field_error("email"), Some("Email is required"));
        assert_eq!(state.field_error("first_name"), None);
        assert_eq!(state.value("first_name"), "Kai");
        assert_eq!(state.error_message(), None);
        assert_eq!(state.phase(), "invalid");
    }

    #[test]
    fn test_accepted_state_clears_values() {
        let state = FormState::Accepted {
            message: "Successfully Subscribed!".into(),
        };
        assert_eq!(state.success_message(), Some("Successfully Subscribed!"));
        assert_eq!(state.value("email"), "");
    }
}
