//! Cart drawer, checkout and order readback tests.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use reqwest::header::REFERER;
use sparkcola_integration_tests::{TestContext, location};

/// Sparkcola Classic, 6-pack (RM 20.00).
const CLASSIC_SIX_PACK: &str = "gid://sparkcola/ProductVariant/100";

async fn add_classic(ctx: &TestContext, quantity: &str) {
    let resp = ctx
        .post_form(
            "/en/cart/add",
            &[("variant_id", CLASSIC_SIX_PACK), ("quantity", quantity)],
            true,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn fill_information(ctx: &TestContext) {
    let resp = ctx
        .post_form(
            "/en/checkout/information",
            &[
                ("email", "aisyah@example.my"),
                ("first_name", "Aisyah"),
                ("last_name", "Rahman"),
                ("phone", "+60 12-345 6789"),
                ("address1", "12 Jalan Kenari 3"),
                ("city", "Shah Alam"),
                ("state", "Selangor"),
                ("postcode", "40000"),
                ("country", ""),
            ],
            false,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/en/checkout");
}

#[tokio::test]
async fn test_add_to_cart_returns_open_drawer_fragment() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .post_form(
            "/en/cart/add",
            &[("variant_id", CLASSIC_SIX_PACK), ("quantity", "2")],
            true,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("hx-trigger").unwrap(), "cart-updated");
    let body = resp.text().await.unwrap();
    assert!(body.contains(r#"class="cart-drawer is-open""#));
    assert!(body.contains("Sparkcola Classic"));
    assert!(body.contains("RM 40.00"));

    let count = ctx.get("/en/cart/count").await.text().await.unwrap();
    assert_eq!(count.trim(), "2");

    let state = ctx.json("/api/cart").await;
    assert_eq!(state["is_open"], true);
    assert_eq!(state["cart"]["lines"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_adding_past_quantity_limit_keeps_cart() {
    let ctx = TestContext::spawn().await;
    add_classic(&ctx, "4294967295").await;
    add_classic(&ctx, "1").await;

    let count = ctx.get("/en/cart/count").await.text().await.unwrap();
    assert_eq!(count.trim(), "4294967295");
    let state = ctx.json("/api/cart").await;
    assert_eq!(state["cart"]["lines"][0]["quantity"], 4_294_967_295_u64);
}

#[tokio::test]
async fn test_cart_updates_and_drawer_state() {
    let ctx = TestContext::spawn().await;
    add_classic(&ctx, "1").await;

    let state = ctx.json("/api/cart").await;
    let line_id = state["cart"]["lines"][0]["line_id"].as_str().unwrap().to_string();

    let body = ctx
        .post_form("/en/cart/update", &[("line_id", line_id.as_str()), ("quantity", "3")], true)
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("RM 60.00"));

    let body = ctx.post_form("/en/cart/close", &[], true).await.text().await.unwrap();
    assert!(body.contains(r#"aria-hidden="true""#));

    // Quantity zero removes the line
    let body = ctx
        .post_form("/en/cart/update", &[("line_id", line_id.as_str()), ("quantity", "0")], true)
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Your cart is empty."));
    assert_eq!(ctx.get("/en/cart/count").await.text().await.unwrap().trim(), "0");
}

#[tokio::test]
async fn test_plain_cart_post_redirects_back() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .client
        .post(ctx.url("/ms/cart/add"))
        .header(REFERER, ctx.url("/ms/shop/sparkcola-classic"))
        .form(&[("variant_id", CLASSIC_SIX_PACK)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/ms/shop/sparkcola-classic");

    // The drawer renders open on the next page
    let body = ctx.get("/ms/shop/sparkcola-classic").await.text().await.unwrap();
    assert!(body.contains(r#"class="cart-drawer is-open""#));
}

#[tokio::test]
async fn test_checkout_with_empty_cart() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get("/en/checkout").await.text().await.unwrap();
    assert!(body.contains("Your cart is empty."));

    let resp = ctx
        .post_form("/en/checkout/place", &[("payment_method", "cod")], false)
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/en/shop");

    let resp = ctx.get("/api/order").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout_steps_forward_and_back() {
    let ctx = TestContext::spawn().await;
    add_classic(&ctx, "1").await;

    let body = ctx.get("/en/checkout").await.text().await.unwrap();
    assert!(body.contains(r#"action="/en/checkout/information""#));

    fill_information(&ctx).await;
    let body = ctx.get("/en/checkout").await.text().await.unwrap();
    assert!(body.contains(r#"action="/en/checkout/shipping""#));
    assert!(body.contains("RM 15.00"));

    ctx.post_form("/en/checkout/back", &[], false).await;
    let body = ctx.get("/en/checkout").await.text().await.unwrap();
    // Saved details are shown again
    assert!(body.contains(r#"value="Aisyah""#));
    assert!(body.contains(r#"value="Malaysia""#));
}

#[tokio::test]
async fn test_fpx_requires_a_bank() {
    let ctx = TestContext::spawn().await;
    add_classic(&ctx, "1").await;
    fill_information(&ctx).await;
    ctx.post_form("/en/checkout/shipping", &[("shipping_method", "standard")], false)
        .await;

    // Switching to FPX disables the submit control until a bank is chosen
    let body = ctx
        .post_form("/en/checkout/payment", &[("payment_method", "fpx")], true)
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Maybank2u"));
    assert!(body.contains(" disabled>"));

    let resp = ctx
        .post_form("/en/checkout/place", &[("payment_method", "fpx"), ("fpx_bank", "")], false)
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Please choose your bank"));

    let resp = ctx.get("/api/order").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_place_order_stores_order_and_clears_cart() {
    let ctx = TestContext::spawn().await;
    add_classic(&ctx, "2").await;
    fill_information(&ctx).await;
    ctx.post_form("/en/checkout/shipping", &[("shipping_method", "express")], false)
        .await;

    let resp = ctx
        .post_form(
            "/en/checkout/place",
            &[("payment_method", "fpx"), ("fpx_bank", "maybank2u")],
            false,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/en/order-confirmation");

    let order = ctx.json("/api/order").await;
    assert!(order["id"].as_str().unwrap().starts_with("SC-"));
    assert_eq!(order["status"], "confirmed");

    let body = ctx.get("/en/order-confirmation").await.text().await.unwrap();
    assert!(body.contains(order["id"].as_str().unwrap()));
    assert!(body.contains("RM 55.00"));
    assert!(body.contains("Maybank2u"));
    assert!(body.contains("Aisyah Rahman"));

    // Cart is empty and the checkout starts over
    let count = ctx.get("/en/cart/count").await.text().await.unwrap();
    assert_eq!(count.trim(), "0");
    let body = ctx.get("/en/checkout").await.text().await.unwrap();
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_cash_on_delivery_places_from_shipping_step() {
    let ctx = TestContext::spawn().await;
    add_classic(&ctx, "1").await;
    fill_information(&ctx).await;

    let resp = ctx
        .post_form("/en/checkout/place", &[("payment_method", "cod")], false)
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/en/order-confirmation");

    let resp = ctx.get("/api/order").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let order = ctx.json("/api/order").await;
    assert_eq!(order["payment"]["method"], "cash_on_delivery");
}

#[tokio::test]
async fn test_order_status_simulation() {
    let ctx = TestContext::spawn().await;

    // No order yet
    let body = ctx.get("/en/order-status").await.text().await.unwrap();
    assert!(body.contains("We could not find a recent order"));

    add_classic(&ctx, "1").await;
    fill_information(&ctx).await;
    ctx.post_form("/en/checkout/place", &[("payment_method", "cod")], false)
        .await;

    let body = ctx.get("/en/order-status").await.text().await.unwrap();
    assert!(body.contains("Step 1 of 5"));
    assert!(!body.contains(r#"hx-trigger="every 1s""#));

    let body = ctx
        .post_form("/en/order-status/simulate", &[], true)
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains(r#"id="status-timeline""#));
    assert!(body.contains(r#"hx-trigger="every 1s""#));

    // One step per second with the test configuration
    tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
    let body = ctx.get("/en/order-status/timeline").await.text().await.unwrap();
    assert!(body.contains("Step 3 of 5"));
}
