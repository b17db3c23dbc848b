//! Locale routing, catalog and content page tests.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use reqwest::header::ACCEPT_LANGUAGE;
use sparkcola_integration_tests::{TestContext, location};

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    // The mock catalog is always reachable
    assert_eq!(ctx.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unprefixed_paths_redirect_by_accept_language() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .client
        .get(ctx.url("/shop?sort=price-asc"))
        .header(ACCEPT_LANGUAGE, "ms-MY,ms;q=0.9,en;q=0.5")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/ms/shop?sort=price-asc");

    // No preference falls back to English
    let fresh = TestContext::spawn().await;
    let resp = fresh.get("/").await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en");
}

#[tokio::test]
async fn test_visited_locale_is_remembered() {
    let ctx = TestContext::spawn().await;

    assert_eq!(ctx.get("/zh/about").await.status(), StatusCode::OK);

    let resp = ctx
        .client
        .get(ctx.url("/checkout"))
        .header(ACCEPT_LANGUAGE, "en")
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/zh/checkout");
}

#[tokio::test]
async fn test_home_page_is_localized() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get("/ms").await.text().await.unwrap();
    assert!(body.contains(r#"<html lang="ms">"#));
    assert!(body.contains("Kedai"));
    assert!(body.contains("Sparkcola Classic"));
    // Language switcher keeps the current page
    assert!(body.contains(r#"href="/zh""#));
}

#[tokio::test]
async fn test_shop_listing_sorts_products() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get("/en/shop?sort=price-desc").await.text().await.unwrap();
    let glass_set = body.find("Sparkcola Glass Set").unwrap();
    let zero = body.find("Sparkcola Zero").unwrap();
    assert!(glass_set < zero, "RM 45.00 set should come before RM 20.00 packs");
    assert!(body.contains(r#"<option value="price-desc" selected>"#));

    // Unknown sort keys fall back to featured order
    let body = ctx.get("/en/shop?sort=bogus").await.text().await.unwrap();
    assert!(body.find("Sparkcola Classic").unwrap() < body.find("Sparkcola Zero").unwrap());
}

#[tokio::test]
async fn test_product_page() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/en/shop/sparkcola-cherry").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Sparkcola Cherry"));
    assert!(body.contains("RM 22.00"));
    assert!(body.contains("<s>RM 48.00</s>"));
    assert!(body.contains(r#"name="variant_id""#));

    let body = ctx.get("/en/shop/sparkcola-lime-limited").await.text().await.unwrap();
    assert!(body.contains("Sold out"));
    assert!(!body.contains("Add to cart"));
}

#[tokio::test]
async fn test_unknown_pages_render_localized_not_found() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/ms/shop/pepsi").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("Halaman tidak ditemui"));

    let resp = ctx.get("/fr/shop").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ctx.get("/zh/nowhere").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("页面未找到"));
}

#[tokio::test]
async fn test_content_pages_in_every_locale() {
    let ctx = TestContext::spawn().await;

    for (path, title) in [
        ("/en/about", "About Sparkcola"),
        ("/ms/programs", "Program"),
        ("/zh/join-us", "加入我们"),
    ] {
        let resp = ctx.get(path).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        let body = resp.text().await.unwrap();
        assert!(body.contains(&format!("<h1>{title}</h1>")), "{path}");
    }
}

#[tokio::test]
async fn test_security_headers_and_static_assets() {
    let ctx = TestContext::spawn().await;

    let resp = ctx.get("/en").await;
    assert!(resp.headers().contains_key("content-security-policy"));
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = ctx.get("/static/images/products/sparkcola-zero.svg").await;
    assert_eq!(resp.status(), StatusCode::OK);
}
