//! Integration tests for the cart and checkout endpoints.
//!
//! These tests require a running storefront (cargo run -p aurum-storefront)
//! and are enabled with `AURUM_INTEGRATION=1`. They exercise only the paths
//! that do not depend on specific catalog contents, so they pass against
//! any backend.

use reqwest::StatusCode;
use serde_json::{Value, json};

use aurum_integration_tests::{TestContext, integration_enabled};

#[tokio::test]
async fn test_health_endpoints() {
    if !integration_enabled() {
        return;
    }
    let ctx = TestContext::new();

    let resp = ctx.client.get(ctx.url("/health")).send().await.expect("health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = ctx
        .client
        .get(ctx.url("/health/ready"))
        .send()
        .await
        .expect("readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_fresh_session_has_empty_cart() {
    if !integration_enabled() {
        return;
    }
    let ctx = TestContext::new();

    let cart: Value = ctx
        .client
        .get(ctx.url("/cart"))
        .send()
        .await
        .expect("cart")
        .json()
        .await
        .expect("cart json");

    assert_eq!(cart["total_items"], 0);
    assert_eq!(cart["total_price"], 0);
    assert!(cart["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
async fn test_unknown_product_mutations_are_noops() {
    if !integration_enabled() {
        return;
    }
    let ctx = TestContext::new();

    let cart: Value = ctx
        .client
        .post(ctx.url("/cart/update"))
        .json(&json!({"product_id": "no-such-product", "quantity": 3}))
        .send()
        .await
        .expect("update")
        .json()
        .await
        .expect("update json");
    assert_eq!(cart["total_items"], 0);

    let cart: Value = ctx
        .client
        .post(ctx.url("/cart/remove"))
        .json(&json!({"product_id": "no-such-product"}))
        .send()
        .await
        .expect("remove")
        .json()
        .await
        .expect("remove json");
    assert_eq!(cart["total_items"], 0);
}

#[tokio::test]
async fn test_checkout_form_validation_is_per_field() {
    if !integration_enabled() {
        return;
    }
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(ctx.url("/checkout/form"))
        .json(&json!({
            "email": "not-an-email",
            "mobile": "12345",
            "first_name": "Priya",
            "last_name": ""
        }))
        .send()
        .await
        .expect("form");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("error body");
    assert!(body["fields"]["email"].is_string());
    assert!(body["fields"]["mobile"].is_string());
    assert!(body["fields"]["last_name"].is_string());
    assert!(body["fields"]["first_name"].is_null());
}

#[tokio::test]
async fn test_valid_form_makes_identity_known() {
    if !integration_enabled() {
        return;
    }
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(ctx.url("/checkout/form"))
        .json(&json!({
            "email": "priya@example.com",
            "mobile": "9876543210",
            "first_name": "Priya",
            "last_name": "Sharma"
        }))
        .send()
        .await
        .expect("form");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["identity_known"], true);

    // A later begin sees the saved form and skips the collecting step.
    let begin: Value = ctx
        .client
        .post(ctx.url("/checkout/begin"))
        .send()
        .await
        .expect("begin")
        .json()
        .await
        .expect("begin json");
    assert_eq!(begin["identity_known"], true);
    assert_eq!(begin["status"]["state"], "idle");
}

#[tokio::test]
async fn test_start_with_empty_cart_is_rejected_locally() {
    if !integration_enabled() {
        return;
    }
    let ctx = TestContext::new();

    // Identity first, so the empty cart is what trips the guard.
    ctx.client
        .post(ctx.url("/checkout/form"))
        .json(&json!({
            "email": "priya@example.com",
            "mobile": "9876543210",
            "first_name": "Priya",
            "last_name": "Sharma"
        }))
        .send()
        .await
        .expect("form");

    let resp = ctx
        .client
        .post(ctx.url("/checkout/start"))
        .send()
        .await
        .expect("start");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["error"], "cart is empty");
}

#[tokio::test]
async fn test_confirm_without_attempt_conflicts() {
    if !integration_enabled() {
        return;
    }
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(ctx.url("/checkout/confirm"))
        .json(&json!({
            "razorpay_order_id": "order_stale",
            "razorpay_payment_id": "pay_stale",
            "razorpay_signature": "deadbeef"
        }))
        .send()
        .await
        .expect("confirm");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}
