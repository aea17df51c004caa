//! Form actions: validate a submission, forward it to the CMS, and describe
//! the result as a [`FormState`] for the page to render.

use crate::error::SiteError;
use crate::resources::SiteResources;
use async_trait::async_trait;
use serde_json::json;
use std::borrow::Cow;
use tideline_blocks::forms::{EMAIL, EVENT_ID, FIRST_NAME, LAST_NAME, TELEPHONE};
use tideline_cms::client::GENERIC_WRITE_ERROR;
use tideline_cms::{CmsError, ContentSource, WriteEndpoint};
use tideline_core::bus::Bus;
use tideline_core::form::{FORM_FIELD, FieldErrors, FormKind, FormSlots, FormState, FormValues};
use tideline_core::outcome::Outcome;
use tideline_core::transition::Transition;
use tideline_http::PageRequest;
use validator::{Validate, ValidationError, ValidationErrors};

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const SUBSCRIBED: &str = "Successfully Subscribed!";
pub const REGISTERED: &str = "Successfully Registered!";

/// One kind of form submission.
#[async_trait]
pub trait FormAction: Send + Sync {
    fn kind(&self) -> FormKind;

    /// Run a submission. Invalid input never reaches `source`.
    async fn submit(
        &self,
        previous: &FormState,
        values: &FormValues,
        source: &dyn ContentSource,
    ) -> FormState;
}

#[derive(Debug, Validate)]
struct NewsletterSignup {
    #[validate(email(message = "Please enter a valid email address"))]
    email: String,
}

/// Newsletter signup from a `subscribe` block.
pub struct SubscribeAction;

#[async_trait]
impl FormAction for SubscribeAction {
    fn kind(&self) -> FormKind {
        FormKind::Newsletter
    }

    async fn submit(
        &self,
        previous: &FormState,
        values: &FormValues,
        source: &dyn ContentSource,
    ) -> FormState {
        if previous.is_pending() {
            return previous.clone();
        }
        let signup = NewsletterSignup {
            email: values.get(EMAIL).trim().to_string(),
        };
        if let Err(errors) = signup.validate() {
            return invalid(errors, values);
        }

        let payload = json!({ "email": signup.email });
        let result = source.submit(WriteEndpoint::NewsletterSignups, payload).await;
        settle(result, values, SUBSCRIBED)
    }
}

#[derive(Debug, Validate)]
struct EventSignup {
    #[validate(length(min = 1, message = "First name is required"))]
    first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    last_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    email: String,
    #[validate(custom(function = "validate_phone"))]
    telephone: String,
    #[validate(length(min = 1, message = "Event is required"))]
    event_id: String,
}

fn validate_phone(telephone: &str) -> Result<(), ValidationError> {
    if telephone.is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("Phone number is required")));
    }
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.');
    let digits = telephone.chars().filter(char::is_ascii_digit).count();
    if !telephone.chars().all(allowed) || digits < 5 {
        return Err(ValidationError::new("phone")
            .with_message(Cow::Borrowed("Please enter a valid phone number")));
    }
    Ok(())
}

/// Registration for one event.
pub struct EventSignupAction;

#[async_trait]
impl FormAction for EventSignupAction {
    fn kind(&self) -> FormKind {
        FormKind::EventSignup
    }

    async fn submit(
        &self,
        previous: &FormState,
        values: &FormValues,
        source: &dyn ContentSource,
    ) -> FormState {
        if previous.is_pending() {
            return previous.clone();
        }
        let field = |name: &str| values.get(name).trim().to_string();
        let signup = EventSignup {
            first_name: field(FIRST_NAME),
            last_name: field(LAST_NAME),
            email: field(EMAIL),
            telephone: field(TELEPHONE),
            event_id: field(EVENT_ID),
        };
        if let Err(errors) = signup.validate() {
            return invalid(errors, values);
        }

        let payload = json!({
            "firstName": signup.first_name,
            "lastName": signup.last_name,
            "email": signup.email,
            "telephone": signup.telephone,
            "event": { "connect": [signup.event_id] },
        });
        let result = source.submit(WriteEndpoint::EventSignups, payload).await;
        settle(result, values, REGISTERED)
    }
}

fn invalid(errors: ValidationErrors, values: &FormValues) -> FormState {
    let mut fields = FieldErrors::new();
    for (field, failures) in errors.field_errors() {
        let messages = failures
            .iter()
            .map(|failure| match &failure.message {
                Some(message) => message.to_string(),
                None => failure.code.to_string(),
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }
    tracing::debug!(fields = ?fields.keys().collect::<Vec<_>>(), "form failed validation");
    FormState::Invalid {
        errors: fields,
        values: values.clone(),
    }
}

fn settle(result: Result<(), CmsError>, values: &FormValues, success: &str) -> FormState {
    match result {
        Ok(()) => FormState::Accepted {
            message: success.to_string(),
        },
        Err(CmsError::Rejected { status, message }) => {
            tracing::warn!(status, %message, "CMS rejected submission");
            FormState::Rejected {
                message,
                values: values.clone(),
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "submission failed");
            FormState::Rejected {
                message: GENERIC_WRITE_ERROR.to_string(),
                values: values.clone(),
            }
        }
    }
}

fn action_for(kind: FormKind) -> &'static dyn FormAction {
    match kind {
        FormKind::Newsletter => &SubscribeAction,
        FormKind::EventSignup => &EventSignupAction,
    }
}

/// A submitted form waiting for its page's content to load.
#[derive(Debug, Clone)]
pub struct PendingForm {
    pub kind: FormKind,
    pub values: FormValues,
}

/// First step of every page: on POST, parks the submitted form on the bus as
/// a [`PendingForm`]. GET passes through.
pub struct CaptureForm;

#[async_trait]
impl Transition<PageRequest, PageRequest> for CaptureForm {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(
        &self,
        req: PageRequest,
        _res: &SiteResources,
        bus: &mut Bus,
    ) -> Outcome<PageRequest, SiteError> {
        let Some(values) = req.form_values() else {
            return Outcome::next(req);
        };
        let Some(kind) = FormKind::parse(values.get(FORM_FIELD)) else {
            tracing::warn!(path = %req.path, form = %values.get(FORM_FIELD), "ignoring unknown form");
            return Outcome::next(req);
        };

        bus.insert(PendingForm {
            kind,
            values: values.clone(),
        });
        Outcome::next(req)
    }
}

/// Runs the [`PendingForm`] once the page it was posted to has loaded, and
/// leaves its [`FormState`] in the bus [`FormSlots`]. Placed after the
/// loaders so a post to a missing or failing page never reaches the CMS.
pub struct HandleFormPost;

#[async_trait]
impl<S: Send + 'static> Transition<S, S> for HandleFormPost {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, state: S, res: &SiteResources, bus: &mut Bus) -> Outcome<S, SiteError> {
        let Some(PendingForm { kind, values }) = bus.remove::<PendingForm>() else {
            return Outcome::next(state);
        };

        let previous = bus.get_or_default::<FormSlots>().get(kind).clone();
        bus.get_or_default::<FormSlots>().set(kind, FormState::Pending);

        let result = action_for(kind)
            .submit(&previous, &values, res.source.as_ref())
            .await;
        tracing::info!(form = kind.as_str(), phase = result.phase(), "form submitted");
        bus.get_or_default::<FormSlots>().set(kind, result);

        Outcome::next(state)
    }
}
