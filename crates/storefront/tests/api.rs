//! End-to-end tests of the HTTP API over an in-memory store.
//!
//! Each test builds the full router (middleware included) and drives it with
//! `tower::ServiceExt::oneshot`, so no server or database is needed.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use cartline_core::Price;
use cartline_storefront::config::StorefrontConfig;
use cartline_storefront::db::{CatalogStore, MemoryStore};
use cartline_storefront::models::NewProduct;
use cartline_storefront::routes;
use cartline_storefront::services::CredentialHasher;
use cartline_storefront::state::AppState;

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
}

impl TestApp {
    fn new() -> Self {
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "STOREFRONT_DATABASE_URL").then(|| "postgres://unused/cartline".to_owned())
        })
        .unwrap();
        let store = Arc::new(MemoryStore::new());
        let state = AppState::with_hasher(
            config,
            store.clone(),
            CredentialHasher::with_cost(8, 1).unwrap(),
        );

        Self {
            router: routes::app(state),
            store,
        }
    }

    async fn seed_product(&self, name: &str, description: &str, price: &str) -> i32 {
        self.store
            .upsert_product(&NewProduct {
                name: name.to_owned(),
                description: description.to_owned(),
                price: Price::parse(price).unwrap(),
            })
            .await
            .unwrap()
            .id
            .as_i32()
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    async fn register(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/auth/register",
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": email,
                "phone_number": "0812345678",
                "address": "1 Analytical Way",
                "password": password,
            }),
        )
        .await
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Customers
// =============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();

    let (status, body) = app.register("a@x.com", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password").is_none());

    let (status, body) = app.register("a@x.com", "pw1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, body) = app
        .post("/auth/login", json!({"email": "a@x.com", "password": "wrong"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid email or password"}));

    let (status, body) = app
        .post("/auth/login", json!({"email": "a@x.com", "password": "pw1"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = TestApp::new();
    app.register("a@x.com", "pw1").await;

    let wrong_password = app
        .post("/auth/login", json!({"email": "a@x.com", "password": "nope"}))
        .await;
    let unknown_email = app
        .post("/auth/login", json!({"email": "b@x.com", "password": "pw1"}))
        .await;

    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn test_required_fields() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/auth/login", json!({"email": "a@x.com", "password": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid input"}));

    let (status, _) = app.post("/auth/login", json!({"email": "a@x.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/auth/register", json!({"email": "a@x.com", "password": "pw1"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_malformed_email() {
    let app = TestApp::new();

    let (status, body) = app.register("not-an-email", "pw1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid email address"}));
}

#[tokio::test]
async fn test_list_customers_redacts_passwords() {
    let app = TestApp::new();
    app.register("a@x.com", "pw1").await;
    app.register("b@x.com", "pw2").await;

    let (status, body) = app.get("/get/user").await;
    assert_eq!(status, StatusCode::OK);

    let customers = body["data"].as_array().unwrap();
    assert_eq!(customers.len(), 2);
    assert!(customers.iter().all(|c| c.get("password").is_none()));
}

#[tokio::test]
async fn test_update_address() {
    let app = TestApp::new();
    let (_, registered) = app.register("a@x.com", "pw1").await;
    let id = registered["user"]["customer_id"].to_string();

    let (status, body) = app
        .put("/upAdd", json!({"customer_id": id, "new_address": "2 Difference Rd"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Address updated successfully");
    assert_eq!(body["customer"]["address"], "2 Difference Rd");
    assert!(body["customer"]["password"].as_str().unwrap().starts_with("$argon2id$"));

    let (status, _) = app
        .put("/upAdd", json!({"customer_id": "999", "new_address": "x"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put("/upAdd", json!({"customer_id": "abc", "new_address": "x"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let (_, registered) = app.register("a@x.com", "pw1").await;
    let id = registered["user"]["customer_id"].to_string();

    let (status, body) = app
        .put(
            "/changePass",
            json!({"customer_id": id, "old_password": "wrong", "new_password": "pw2"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid old password"}));

    let (status, body) = app
        .put(
            "/changePass",
            json!({"customer_id": id, "old_password": "pw1", "new_password": "pw2"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully");
    assert!(body["customer"]["password"].is_string());

    let (status, _) = app
        .post("/auth/login", json!({"email": "a@x.com", "password": "pw2"}))
        .await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_products_and_search() {
    let app = TestApp::new();
    app.seed_product("Mug", "ceramic mug", "10.00").await;
    app.seed_product("Teapot", "ceramic teapot", "45.50").await;
    app.seed_product("Spoon", "steel spoon", "2.25").await;

    let (status, all) = app.get("/get/pd").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["data"].as_array().unwrap().len(), 3);
    assert_eq!(all["data"][0]["product_name"], "Mug");
    assert_eq!(all["data"][0]["price"], "10.00");

    let (_, unfiltered) = app.get("/get/searcP").await;
    assert_eq!(unfiltered, all);

    let (status, found) = app
        .get("/get/searcP?description=ceramic&max_price=20")
        .await;
    assert_eq!(status, StatusCode::OK);
    let found = found["data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["product_name"], "Mug");
}

#[tokio::test]
async fn test_search_rejects_bad_bounds() {
    let app = TestApp::new();

    let (status, body) = app.get("/get/searcP?min_price=cheap").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid min_price"}));

    let (status, body) = app.get("/get/searcP?max_price=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid max_price"}));

    let (status, body) = app.get("/get/searcP?max_price=NaN").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid max_price"}));

    let (status, body) = app.get("/get/searcP?min_price=1&min_price=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid input"}));
}

#[tokio::test]
async fn test_search_accepts_out_of_range_bounds() {
    let app = TestApp::new();
    app.seed_product("Mug", "ceramic mug", "10.00").await;
    app.seed_product("Teapot", "ceramic teapot", "45.50").await;

    for uri in [
        "/get/searcP?max_price=1e30",
        "/get/searcP?max_price=Inf",
        "/get/searcP?min_price=-Inf&max_price=%2BInf",
        "/get/searcP?min_price=-1e40",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["data"].as_array().unwrap().len(), 2, "{uri}");
    }

    let (status, body) = app.get("/get/searcP?min_price=1e30").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

// =============================================================================
// Carts
// =============================================================================

#[tokio::test]
async fn test_add_to_cart_and_show() {
    let app = TestApp::new();
    let mug = app.seed_product("Mug", "ceramic mug", "10.00").await;
    let spoon = app.seed_product("Spoon", "steel spoon", "2.25").await;

    let add = |product_id: i32, quantity: i32| {
        json!({
            "customer_id": "1",
            "cart_name": "default",
            "product_id": product_id,
            "quantity": quantity,
        })
    };

    let (status, body) = app.post("/cart", add(mug, 2)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Product added to cart successfully"}));

    let (status, body) = app.post("/cart", add(mug, 2)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Product quantity updated successfully"}));

    app.post("/cart", add(spoon, 1)).await;

    let (status, body) = app.get("/showcartbyid?customer_id=1").await;
    assert_eq!(status, StatusCode::OK);

    let carts = body["carts"].as_array().unwrap();
    assert_eq!(carts.len(), 1);
    assert_eq!(carts[0]["cart_name"], "default");

    let items = carts[0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_name"], "Mug");
    assert_eq!(items[0]["quantity"], 4);
    assert_eq!(items[0]["total_price"], "40.00");
    assert_eq!(carts[0]["subtotal"], "42.25");
}

#[tokio::test]
async fn test_add_to_cart_validation() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/cart",
            json!({"customer_id": "1", "cart_name": "default", "product_id": 1, "quantity": 0}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid input"}));

    let (status, body) = app
        .post(
            "/cart",
            json!({"customer_id": "abc", "cart_name": "default", "product_id": 1, "quantity": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid customer_id"}));
}

#[tokio::test]
async fn test_show_cart_edge_cases() {
    let app = TestApp::new();

    let (status, body) = app.get("/showcartbyid?customer_id=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "No carts found for this customer"}));

    let (status, body) = app.get("/showcartbyid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "customer_id is required"}));

    let (status, body) = app.get("/showcartbyid?customer_id=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid customer_id"}));

    let (status, body) = app.get("/showcartbyid?customer_id=1&customer_id=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid input"}));
}

#[tokio::test]
async fn test_show_cart_with_unknown_product_fails() {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            "/cart",
            json!({"customer_id": "1", "cart_name": "default", "product_id": 77, "quantity": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/showcartbyid?customer_id=1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}
