//! Contact form route handlers.
//!
//! Submissions are logged for the team and acknowledged; nothing is stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::Lang;
use crate::models::PageContext;
use crate::state::AppState;

use super::page_context;

/// Contact form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub page: PageContext,
    pub form: ContactForm,
    /// Translation key of the validation error, if any.
    pub error_key: Option<&'static str>,
    pub sent: bool,
}

/// Display the contact form.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> ContactTemplate {
    ContactTemplate {
        page: page_context(&state, &session, locale, "/contact").await,
        form: ContactForm::default(),
        error_key: None,
        sent: false,
    }
}

/// Submit the contact form.
///
/// Invalid submissions re-render the form with an error (422).
#[instrument(skip(state, session, form), fields(email = %form.email.trim()))]
pub async fn submit(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    Form(form): Form<ContactForm>,
) -> Response {
    let page = page_context(&state, &session, locale, "/contact").await;

    if let Some(error_key) = validate(&form) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            ContactTemplate {
                page,
                form,
                error_key: Some(error_key),
                sent: false,
            },
        )
            .into_response();
    }

    tracing::info!(
        name = %form.name.trim(),
        email = %form.email.trim().to_lowercase(),
        locale = %locale,
        message_len = form.message.trim().len(),
        "Contact message received"
    );

    ContactTemplate {
        page,
        form: ContactForm::default(),
        error_key: None,
        sent: true,
    }
    .into_response()
}

/// Validate a submission, returning the translation key of the first problem.
fn validate(form: &ContactForm) -> Option<&'static str> {
    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return Some("contact.error.required");
    }
    if !is_valid_email(form.email.trim()) {
        return Some("contact.error.email");
    }
    None
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let Some(local) = parts.next() else {
        return false;
    };
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && domain.contains('.') && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("aisyah@example.my"));
        assert!(!is_valid_email("aisyah@localhost"));
        assert!(!is_valid_email("@example.my"));
        assert!(!is_valid_email("aisyah"));
        assert!(!is_valid_email("a@b@c.my"));
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(&form("Wei", "wei@example.my", "Hello")), None);
        assert_eq!(
            validate(&form("  ", "wei@example.my", "Hello")),
            Some("contact.error.required")
        );
        assert_eq!(
            validate(&form("Wei", "wei@example.my", "")),
            Some("contact.error.required")
        );
        assert_eq!(
            validate(&form("Wei", "not-an-email", "Hello")),
            Some("contact.error.email")
        );
    }
}
