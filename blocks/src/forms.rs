//! Event signup form.

use crate::block::render_blocks;
use crate::components::{image_with_alt, submit_button};
use crate::context::RenderContext;
use crate::date::format_date;
use maud::{Markup, html};
use tideline_core::content::Entry;
use tideline_core::form::{FORM_FIELD, FormKind, FormState};

pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const EMAIL: &str = "email";
pub const TELEPHONE: &str = "telephone";
pub const EVENT_ID: &str = "event_id";

struct TextInput<'a> {
    id: &'a str,
    label: &'a str,
    name: &'a str,
    kind: &'a str,
}

fn text_input(input: TextInput<'_>, state: &FormState) -> Markup {
    let error = state.field_error(input.name);
    html! {
        div.input__container {
            label.copy for=(input.id) { (input.label) }
            input.input.input__text.input--beige type=(input.kind) name=(input.name) id=(input.id)
                value=(state.value(input.name)) aria-invalid=[error.map(|_| "true")];
            @if let Some(error) = error {
                p.input__error { (error) }
            }
        }
    }
}

/// Signup form for `event`, next to the event's own blocks.
///
/// With `details`, the start date, price and event image are shown too.
pub fn event_signup_form(event: &Entry, details: bool, ctx: &RenderContext) -> Markup {
    let state = ctx.form(FormKind::EventSignup);

    html! {
        section.signup-form {
            div.signup-form__info {
                (render_blocks(&event.blocks, ctx))
                @if details {
                    @if let Some(start) = event.start_date.as_deref() {
                        p.signup-form__date { span { "Start date:" } " " (format_date(start)) }
                    }
                    @if let Some(price) = &event.price {
                        p.signup-form__price { span { "Price:" } " " (price.to_string()) }
                    }
                }
            }
            form.signup-form__form method="post" data-form-phase=(state.phase()) {
                @if details {
                    (image_with_alt(ctx, event.image.as_ref(), Some("Event image"), "signup-form__image", 200, 200))
                }
                input type="hidden" name=(FORM_FIELD) value=(FormKind::EventSignup.as_str());
                div.signup-form__name-container {
                    (text_input(TextInput { id: "firstName", label: "First Name", name: FIRST_NAME, kind: "text" }, state))
                    (text_input(TextInput { id: "lastName", label: "Last Name", name: LAST_NAME, kind: "text" }, state))
                }
                (text_input(TextInput { id: "email", label: "Email", name: EMAIL, kind: "email" }, state))
                (text_input(TextInput { id: "phone", label: "Phone", name: TELEPHONE, kind: "text" }, state))
                input type="hidden" name=(EVENT_ID) value=(event.document_id);
                (submit_button("Sign Up", "btn btn--medium btn--turquoise", state.is_pending()))
                @if let Some(message) = state.error_message() {
                    p.signup-form__error role="alert" { (message) }
                }
                @if let Some(message) = state.success_message() {
                    p.signup-form__success role="status" { (message) }
                }
            }
        }
    }
}
