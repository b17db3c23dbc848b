//! Checkout route handlers.
//!
//! Three linear steps (information → shipping → payment) held in the session
//! draft. Step posts save their fields and move one step; nothing gates a
//! transition. Placing the order is simulated: no payment provider is called.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sparkcola_core::{
    CartState, CheckoutDraft, CheckoutStep, CurrencyCode, FPX_BANKS, Locale, PaymentMethod,
    PaymentSelection, ShippingMethod, card_last4,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::Lang;
use crate::models::{CartItemView, PageContext, localized_path};
use crate::services::{CartService, CheckoutError, CheckoutService};
use crate::state::AppState;

use super::page_context;

// =============================================================================
// Forms
// =============================================================================

/// Customer details and address (information step).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InformationForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
}

/// Shipping method (shipping step).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShippingForm {
    pub shipping_method: String,
}

/// Payment fields (payment step and order placement).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaymentForm {
    pub payment_method: String,
    pub fpx_bank: Option<String>,
    pub card_name: Option<String>,
    pub card_number: Option<String>,
}

impl InformationForm {
    fn apply(self, draft: &mut CheckoutDraft) {
        draft.customer.email = self.email.trim().to_string();
        draft.customer.first_name = self.first_name.trim().to_string();
        draft.customer.last_name = self.last_name.trim().to_string();
        draft.customer.phone = self.phone.trim().to_string();
        draft.shipping_address.address1 = self.address1.trim().to_string();
        draft.shipping_address.address2 = self.address2.trim().to_string();
        draft.shipping_address.city = self.city.trim().to_string();
        draft.shipping_address.state = self.state.trim().to_string();
        draft.shipping_address.postcode = self.postcode.trim().to_string();
        if !self.country.trim().is_empty() {
            draft.shipping_address.country = self.country.trim().to_string();
        }
    }
}

impl PaymentForm {
    /// Apply to the draft. Only the last four card digits are kept.
    fn apply(&self, payment: &mut PaymentSelection) {
        payment.method = PaymentMethod::from_form(&self.payment_method);
        payment.fpx_bank = match payment.method {
            PaymentMethod::Fpx => self
                .fpx_bank
                .as_deref()
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string),
            PaymentMethod::Card | PaymentMethod::CashOnDelivery => None,
        };
        if let Some(name) = &self.card_name {
            payment.card_name = name.trim().to_string();
        }
        if let Some(number) = &self.card_number {
            payment.card_last4 = card_last4(number);
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// Progress indicator entry.
#[derive(Debug, Clone)]
pub struct StepView {
    pub number: usize,
    pub label_key: String,
    pub active: bool,
    pub done: bool,
}

/// Selectable option (shipping or payment method).
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: &'static str,
    pub label_key: String,
    /// Extra text shown next to the label (e.g. the shipping fee).
    pub detail: Option<String>,
    pub selected: bool,
}

/// FPX bank option.
#[derive(Debug, Clone)]
pub struct BankView {
    pub code: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

/// Payment step state.
#[derive(Debug, Clone)]
pub struct PaymentView {
    pub methods: Vec<OptionView>,
    pub method: &'static str,
    pub banks: Vec<BankView>,
    pub card_name: String,
    /// Whether the place-order button is enabled.
    pub can_submit: bool,
}

impl PaymentView {
    fn new(draft: &CheckoutDraft) -> Self {
        let selected_bank = draft.payment.fpx_bank.as_deref();
        Self {
            methods: PaymentMethod::ALL
                .into_iter()
                .map(|method| OptionView {
                    value: method.key(),
                    label_key: format!("checkout.payment.{}", method.key()),
                    detail: None,
                    selected: method == draft.payment.method,
                })
                .collect(),
            method: draft.payment.method.key(),
            banks: FPX_BANKS
                .iter()
                .map(|&(code, name)| BankView {
                    code,
                    name,
                    selected: selected_bank == Some(code),
                })
                .collect(),
            card_name: draft.payment.card_name.clone(),
            can_submit: draft.payment.is_complete(),
        }
    }
}

/// Cart totals for the order summary column.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping_fee: String,
    pub free_shipping: bool,
    pub total: String,
}

impl SummaryView {
    fn new(cart: &CartState, shipping_method: ShippingMethod) -> Option<Self> {
        let cart = cart.cart.as_ref().filter(|c| !c.is_empty())?;
        let fee = shipping_method.fee(cart.currency);
        Some(Self {
            items: cart.lines.iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().display(),
            shipping_fee: fee.display(),
            free_shipping: fee.is_zero(),
            total: cart.total(fee).display(),
        })
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/index.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub draft: CheckoutDraft,
    pub step: &'static str,
    pub steps: Vec<StepView>,
    /// `None` when the cart is empty.
    pub summary: Option<SummaryView>,
    pub shipping_options: Vec<OptionView>,
    pub payment: PaymentView,
    /// Translation key of the error shown above the payment form.
    pub error_key: Option<&'static str>,
}

/// Payment fields fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/payment_fields.html")]
pub struct PaymentFieldsTemplate {
    pub page: PageContext,
    pub payment: PaymentView,
}

fn steps(current: CheckoutStep) -> Vec<StepView> {
    CheckoutStep::ALL
        .into_iter()
        .map(|step| StepView {
            number: step.number(),
            label_key: format!("checkout.step.{}", step.key()),
            active: step == current,
            done: step.number() < current.number(),
        })
        .collect()
}

fn shipping_options(selected: ShippingMethod, currency: CurrencyCode) -> Vec<OptionView> {
    ShippingMethod::ALL
        .into_iter()
        .map(|method| OptionView {
            value: method.key(),
            label_key: format!("checkout.shipping.{}", method.key()),
            detail: Some(method.fee(currency).display()),
            selected: method == selected,
        })
        .collect()
}

async fn checkout_page(
    state: &AppState,
    session: &Session,
    locale: Locale,
    draft: CheckoutDraft,
    error_key: Option<&'static str>,
) -> CheckoutTemplate {
    let page = page_context(state, session, locale, "/checkout").await;
    let cart = CartService::new(state.commerce(), state.cart_activity(), session)
        .state()
        .await;
    let currency = cart
        .cart
        .as_ref()
        .map_or_else(CurrencyCode::default, |c| c.currency);

    CheckoutTemplate {
        page,
        step: draft.step.key(),
        steps: steps(draft.step),
        summary: SummaryView::new(&cart, draft.shipping_method),
        shipping_options: shipping_options(draft.shipping_method, currency),
        payment: PaymentView::new(&draft),
        error_key,
        draft,
    }
}

fn checkout_redirect(locale: Locale) -> Response {
    Redirect::to(&localized_path(locale, "/checkout")).into_response()
}

fn checkout_service<'a>(state: &AppState, session: &'a Session) -> CheckoutService<'a> {
    CheckoutService::new(session, state.config().checkout.payment_delay)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the current checkout step.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> CheckoutTemplate {
    let draft = checkout_service(&state, &session).draft().await;
    checkout_page(&state, &session, locale, draft, None).await
}

/// Save customer details and move to the shipping step.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, form))]
pub async fn information(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    Form(form): Form<InformationForm>,
) -> Result<Response, AppError> {
    checkout_service(&state, &session)
        .update_draft(|draft| {
            form.apply(draft);
            draft.step = CheckoutStep::Information.forward();
        })
        .await
        .map_err(checkout_error)?;
    Ok(checkout_redirect(locale))
}

/// Save the shipping method and move to the payment step.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session))]
pub async fn shipping(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    Form(form): Form<ShippingForm>,
) -> Result<Response, AppError> {
    checkout_service(&state, &session)
        .update_draft(|draft| {
            draft.shipping_method = ShippingMethod::from_form(&form.shipping_method);
            draft.step = CheckoutStep::Shipping.forward();
        })
        .await
        .map_err(checkout_error)?;
    Ok(checkout_redirect(locale))
}

/// Go back one step.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session))]
pub async fn back(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> Result<Response, AppError> {
    checkout_service(&state, &session)
        .update_draft(CheckoutDraft::back)
        .await
        .map_err(checkout_error)?;
    Ok(checkout_redirect(locale))
}

/// Re-render the payment fields after a method or bank change (HTMX).
///
/// The place-order button is disabled while FPX has no bank.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, form), fields(method = %form.payment_method))]
pub async fn payment(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    Form(form): Form<PaymentForm>,
) -> Result<PaymentFieldsTemplate, AppError> {
    let draft = checkout_service(&state, &session)
        .update_draft(|draft| form.apply(&mut draft.payment))
        .await
        .map_err(checkout_error)?;

    Ok(PaymentFieldsTemplate {
        page: page_context(&state, &session, locale, "/checkout").await,
        payment: PaymentView::new(&draft),
    })
}

/// Place the simulated order.
///
/// Redirects to the confirmation page on success and to the shop when the
/// cart is empty. Incomplete payment details re-render the checkout with the
/// submit control disabled (422).
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, form), fields(method = %form.payment_method))]
pub async fn place(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    Form(form): Form<PaymentForm>,
) -> Result<Response, AppError> {
    let checkout = checkout_service(&state, &session);
    let draft = checkout
        .update_draft(|draft| form.apply(&mut draft.payment))
        .await
        .map_err(checkout_error)?;

    let cart = CartService::new(state.commerce(), state.cart_activity(), &session);
    match checkout.place_order(&cart, draft.clone()).await {
        Ok(_) => Ok(Redirect::to(&localized_path(locale, "/order-confirmation")).into_response()),
        Err(CheckoutError::EmptyCart) => {
            tracing::info!("Place order with an empty cart");
            Ok(Redirect::to(&localized_path(locale, "/shop")).into_response())
        }
        Err(CheckoutError::PaymentIncomplete) => {
            let page = checkout_page(
                &state,
                &session,
                locale,
                draft,
                Some("checkout.error.payment_incomplete"),
            )
            .await;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(checkout_error(e)),
    }
}

fn checkout_error(error: CheckoutError) -> AppError {
    match error {
        CheckoutError::Session(e) => AppError::Session(e),
        other => AppError::BadRequest(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_form_keeps_last_four_digits_only() {
        let form = PaymentForm {
            payment_method: "card".to_string(),
            fpx_bank: Some("maybank2u".to_string()),
            card_name: Some(" Tan Mei Ling ".to_string()),
            card_number: Some("4242 4242 4242 1234".to_string()),
        };
        let mut payment = PaymentSelection::default();
        form.apply(&mut payment);

        assert_eq!(payment.method, PaymentMethod::Card);
        assert_eq!(payment.card_last4.as_deref(), Some("1234"));
        assert_eq!(payment.card_name, "Tan Mei Ling");
        assert!(payment.fpx_bank.is_none(), "bank only kept for FPX");
    }

    #[test]
    fn test_fpx_without_bank_disables_submit() {
        let form = PaymentForm {
            payment_method: "fpx".to_string(),
            fpx_bank: Some(String::new()),
            ..PaymentForm::default()
        };
        let mut draft = CheckoutDraft::default();
        form.apply(&mut draft.payment);

        let view = PaymentView::new(&draft);
        assert_eq!(view.method, "fpx");
        assert!(!view.can_submit);
        assert!(view.banks.iter().all(|b| !b.selected));

        draft.payment.fpx_bank = Some("cimb".to_string());
        let view = PaymentView::new(&draft);
        assert!(view.can_submit);
        assert!(view.banks.iter().any(|b| b.code == "cimb" && b.selected));
    }

    #[test]
    fn test_steps_mark_progress() {
        let steps = steps(CheckoutStep::Shipping);
        assert!(steps[0].done && !steps[0].active);
        assert!(steps[1].active && !steps[1].done);
        assert!(!steps[2].active && !steps[2].done);
    }

    #[test]
    fn test_information_form_keeps_default_country() {
        let mut draft = CheckoutDraft::default();
        InformationForm {
            email: " aiman@example.my ".to_string(),
            first_name: "Aiman".to_string(),
            ..InformationForm::default()
        }
        .apply(&mut draft);

        assert_eq!(draft.customer.email, "aiman@example.my");
        assert_eq!(draft.shipping_address.country, "Malaysia");
    }
}
