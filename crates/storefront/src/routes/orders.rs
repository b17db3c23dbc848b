//! Order confirmation and status route handlers.
//!
//! Both pages read the single order stored in the session. A missing order is
//! a normal state ("no order found"), never an error.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use sparkcola_core::{Locale, Order, OrderStatus, PaymentMethod, fpx_bank_name};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::i18n::Translations;
use crate::middleware::Lang;
use crate::models::{CartItemView, PageContext, localized_path};
use crate::services::OrderStore;
use crate::state::AppState;

use super::{is_htmx, page_context};

/// One entry of the status timeline.
#[derive(Debug, Clone)]
pub struct TimelineStep {
    pub key: &'static str,
    pub label_key: String,
    pub reached: bool,
    pub current: bool,
}

/// Status timeline state.
#[derive(Debug, Clone)]
pub struct TimelineView {
    pub steps: Vec<TimelineStep>,
    pub status_key: &'static str,
    pub status_label_key: String,
    /// e.g. "Step 2 of 5"
    pub progress: String,
    /// Keep polling while the simulation runs.
    pub polling: bool,
    pub finished: bool,
}

impl TimelineView {
    fn new(order: &Order, now: DateTime<Utc>, step: std::time::Duration, t: &Translations) -> Self {
        let status = order.status_at(now, step);
        let position = status.position();
        let step_number = (position + 1).to_string();
        let total = OrderStatus::SEQUENCE.len().to_string();
        Self {
            steps: OrderStatus::SEQUENCE
                .into_iter()
                .map(|s| TimelineStep {
                    key: s.key(),
                    label_key: format!("order.status.{}", s.key()),
                    reached: s.position() <= position,
                    current: s == status,
                })
                .collect(),
            status_key: status.key(),
            status_label_key: format!("order.status.{}", status.key()),
            progress: t.format(
                "order.status_step",
                &[("step", step_number.as_str()), ("total", total.as_str())],
            ),
            polling: order.is_simulating(now, step),
            finished: status.is_final(),
        }
    }
}

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub created_at: String,
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub shipping_fee: String,
    pub free_shipping: bool,
    pub total: String,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address_lines: Vec<String>,
    pub shipping_method_key: String,
    pub payment_method_key: String,
    /// Bank name (FPX) or masked card number.
    pub payment_detail: Option<String>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        let address = &order.shipping_address;
        let address_lines = [
            address.address1.clone(),
            address.address2.clone(),
            format!("{} {}", address.postcode, address.city).trim().to_string(),
            address.state.clone(),
            address.country.clone(),
        ]
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect();

        let payment_detail = match order.payment.method {
            PaymentMethod::Fpx => order
                .payment
                .fpx_bank
                .as_deref()
                .and_then(fpx_bank_name)
                .map(str::to_string),
            PaymentMethod::Card => order
                .payment
                .card_last4
                .as_ref()
                .map(|last4| format!("•••• {last4}")),
            PaymentMethod::CashOnDelivery => None,
        };

        Self {
            id: order.id.to_string(),
            created_at: order.created_at.format("%-d %b %Y, %H:%M UTC").to_string(),
            items: order.items.iter().map(CartItemView::from).collect(),
            item_count: order.item_count(),
            subtotal: order.subtotal.display(),
            shipping_fee: order.shipping_fee.display(),
            free_shipping: order.shipping_fee.is_zero(),
            total: order.total.display(),
            customer_name: order.customer.full_name(),
            email: order.customer.email.clone(),
            phone: order.customer.phone.clone(),
            address_lines,
            shipping_method_key: format!("checkout.shipping.{}", order.shipping_method.key()),
            payment_method_key: format!("checkout.payment.{}", order.payment.method.key()),
            payment_detail,
        }
    }
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/confirmation.html")]
pub struct ConfirmationTemplate {
    pub page: PageContext,
    pub order: Option<OrderView>,
}

/// Order status page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/status.html")]
pub struct StatusTemplate {
    pub page: PageContext,
    pub order: Option<OrderView>,
    pub timeline: Option<TimelineView>,
}

/// Status timeline fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/status_timeline.html")]
pub struct TimelineTemplate {
    pub page: PageContext,
    pub timeline: Option<TimelineView>,
}

fn timeline(state: &AppState, locale: Locale, order: Option<&Order>) -> Option<TimelineView> {
    let t = state.catalogs().translations(locale);
    order.map(|order| TimelineView::new(order, Utc::now(), state.config().checkout.status_step, &t))
}

/// Display the last placed order.
#[instrument(skip(state, session))]
pub async fn confirmation(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> ConfirmationTemplate {
    let order = OrderStore::new(&session).last_order().await;
    ConfirmationTemplate {
        page: page_context(&state, &session, locale, "/order-confirmation").await,
        order: order.as_ref().map(OrderView::from),
    }
}

/// Display the order status timeline.
#[instrument(skip(state, session))]
pub async fn status(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> StatusTemplate {
    let order = OrderStore::new(&session).last_order().await;
    StatusTemplate {
        page: page_context(&state, &session, locale, "/order-status").await,
        timeline: timeline(&state, locale, order.as_ref()),
        order: order.as_ref().map(OrderView::from),
    }
}

/// Start (or restart) the status simulation.
///
/// Answers HTMX with the timeline fragment, plain posts with a redirect to
/// the status page.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, headers))]
pub async fn simulate(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let order = OrderStore::new(&session).start_simulation(Utc::now()).await?;

    if !is_htmx(&headers) {
        return Ok(Redirect::to(&localized_path(locale, "/order-status")).into_response());
    }

    Ok(TimelineTemplate {
        page: page_context(&state, &session, locale, "/order-status").await,
        timeline: timeline(&state, locale, order.as_ref()),
    }
    .into_response())
}

/// Render the timeline fragment (polled by HTMX).
#[instrument(skip(state, session))]
pub async fn timeline_fragment(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> TimelineTemplate {
    let order = OrderStore::new(&session).last_order().await;
    TimelineTemplate {
        page: page_context(&state, &session, locale, "/order-status").await,
        timeline: timeline(&state, locale, order.as_ref()),
    }
}
