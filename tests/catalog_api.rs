//! Catalog, settings and review HTTP integration tests.

#[path = "common.rs"]
mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

async fn create_product(app: &TestApp, name: &str, category: &str) -> serde_json::Value {
    let resp = app
        .json(
            Method::POST,
            "/products",
            Some(&app.admin_token),
            &json!({
                "name": name,
                "category": category,
                "image": format!("https://cdn.example.com/products/{name}.webp"),
                "variants": [{ "length": "10 inch", "price": 100 }],
            }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.message());
    resp.json()
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let resp = app.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"], "ok");
}

#[tokio::test]
async fn test_create_product_requires_admin() {
    let app = TestApp::new().await;
    let body = json!({ "name": "x", "category": "y", "image": "z" });

    let anonymous = app.json(Method::POST, "/products", None, &body).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let customer = app
        .json(Method::POST, "/products", Some(&app.user_token), &body)
        .await;
    assert_eq!(customer.status, StatusCode::FORBIDDEN);

    assert_eq!(app.get("/products").await.json(), json!([]));
}

#[tokio::test]
async fn test_create_product_validation() {
    let app = TestApp::new().await;
    let resp = app
        .json(
            Method::POST,
            "/products",
            Some(&app.admin_token),
            &json!({ "name": "No image", "category": "Raw Hair" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "image is required");
}

#[tokio::test]
async fn test_product_defaults_and_filters() {
    let app = TestApp::new().await;
    let created = create_product(&app, "Straight Bulk", "Raw Hair").await;
    create_product(&app, "Body Wave Wig", "Wigs").await;

    assert_eq!(created["shipping"]["from"], "Beldanga, West Bengal");
    assert_eq!(created["reviewCount"], 0);

    let wigs = app.get("/products?category=Wigs").await.json();
    assert_eq!(wigs.as_array().unwrap().len(), 1);

    let search = app.get("/products?q=straight").await.json();
    assert_eq!(search.as_array().unwrap().len(), 1);
    assert_eq!(search[0]["name"], "Straight Bulk");

    let id = created["_id"].as_str().unwrap();
    let fetched = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["_id"], created["_id"]);
}

#[tokio::test]
async fn test_related_and_details() {
    let app = TestApp::new().await;
    let target = create_product(&app, "p0", "Raw Hair").await;
    for i in 1..=5 {
        create_product(&app, &format!("p{i}"), "Raw Hair").await;
    }
    create_product(&app, "wig", "Wigs").await;
    let id = target["_id"].as_str().unwrap();

    let related = app.get(&format!("/products/{id}/related")).await.json();
    let related = related.as_array().unwrap();
    assert_eq!(related.len(), 4);
    assert!(related.iter().all(|p| p["_id"] != target["_id"]));
    assert!(related.iter().all(|p| p["category"] == "Raw Hair"));

    let details = app.get(&format!("/products/{id}/details")).await;
    assert_eq!(details.status, StatusCode::OK);
    let details = details.json();
    assert_eq!(details["product"]["_id"], target["_id"]);
    assert_eq!(details["related"].as_array().unwrap().len(), 4);
    assert!(
        details["whatsappLink"]
            .as_str()
            .unwrap()
            .starts_with("https://wa.me/")
    );
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = TestApp::new().await;
    let resp = app.get("/products/missing").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "Product not found");
}

#[tokio::test]
async fn test_delete_product() {
    let app = TestApp::new().await;
    let created = create_product(&app, "Bulk", "Raw Hair").await;
    let id = created["_id"].as_str().unwrap();

    let resp = app
        .delete(&format!("/products/{id}"), Some(&app.admin_token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.get(&format!("/products/{id}")).await.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Settings
// =============================================================================

#[tokio::test]
async fn test_settings_defaults_and_update() {
    let app = TestApp::new().await;
    let defaults = app.get("/settings").await.json();
    assert_eq!(defaults["whatsapp"]["number"], "918158926581");

    let resp = app
        .json(
            Method::PUT,
            "/settings",
            Some(&app.admin_token),
            &json!({
                "phone": "+91 99999 99999",
                "telegram": { "enabled": true, "botToken": "123:secret", "chatId": "42" },
            }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.message());
    let updated = resp.json();
    assert_eq!(updated["phone"], "+91 99999 99999");
    assert_eq!(updated["telegram"]["enabled"], true);
    assert_eq!(updated["telegram"]["botToken"], "");

    let public = app.get("/settings").await.json();
    assert_eq!(public["phone"], "+91 99999 99999");
    assert_eq!(public["telegram"]["botToken"], "");
    assert_eq!(public["email"], defaults["email"]);
}

#[tokio::test]
async fn test_whatsapp_number_without_digits_keeps_details_working() {
    let app = TestApp::new().await;
    let product = create_product(&app, "Bulk", "Raw Hair").await;
    let id = product["_id"].as_str().unwrap();

    for number in ["", "call us"] {
        let resp = app
            .json(
                Method::PUT,
                "/settings",
                Some(&app.admin_token),
                &json!({ "whatsapp": { "number": number } }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{number:?}");
    }

    let details = app.get(&format!("/products/{id}/details")).await;
    assert_eq!(details.status, StatusCode::OK, "{}", details.message());
    assert_eq!(details.json()["settings"]["whatsapp"]["number"], "918158926581");
    assert!(
        details.json()["whatsappLink"]
            .as_str()
            .unwrap()
            .starts_with("https://wa.me/918158926581")
    );
}

#[tokio::test]
async fn test_settings_update_requires_admin() {
    let app = TestApp::new().await;
    let resp = app
        .json(
            Method::PUT,
            "/settings",
            Some(&app.user_token),
            &json!({ "phone": "0" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_ne!(app.get("/settings").await.json()["phone"], "0");
}

// =============================================================================
// Reviews
// =============================================================================

#[tokio::test]
async fn test_review_flow() {
    let app = TestApp::new().await;
    let product = create_product(&app, "Bulk", "Raw Hair").await;
    let product_id = product["_id"].as_str().unwrap();

    let anonymous = app
        .json(
            Method::POST,
            "/reviews",
            None,
            &json!({ "product": product_id, "rating": 5, "comment": "Lovely" }),
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let created = app
        .json(
            Method::POST,
            "/reviews",
            Some(&app.user_token),
            &json!({ "product": product_id, "rating": 4, "comment": "Soft and full" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.message());
    let review = created.json();
    assert_eq!(review["user"], app.user_id.as_str());
    assert_eq!(review["reviewType"], "product");

    let reviews = app.get(&format!("/products/{product_id}/reviews")).await.json();
    assert_eq!(reviews.as_array().unwrap().len(), 1);

    let product = app.get(&format!("/products/{product_id}")).await.json();
    assert_eq!(product["reviewCount"], 1);
    assert_eq!(product["rating"], 4.0);

    assert_eq!(app.get("/reviews/featured").await.json(), json!([]));
    let review_id = review["_id"].as_str().unwrap();
    let moderated = app
        .json(
            Method::PATCH,
            &format!("/reviews/{review_id}"),
            Some(&app.admin_token),
            &json!({ "isFeatured": true, "adminReply": "Thanks!" }),
        )
        .await;
    assert_eq!(moderated.status, StatusCode::OK);

    let featured = app.get("/reviews/featured").await.json();
    assert_eq!(featured.as_array().unwrap().len(), 1);
    assert_eq!(featured[0]["adminReply"], "Thanks!");
}

#[tokio::test]
async fn test_review_rating_out_of_range() {
    let app = TestApp::new().await;
    let resp = app
        .json(
            Method::POST,
            "/reviews",
            Some(&app.user_token),
            &json!({ "rating": 9, "comment": "Too good" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}
