mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{verify_body, TestApp};
use storefront::store::Store;

#[tokio::test]
async fn back_office_is_admin_only() {
    let app = TestApp::new().await;
    let customer = app.customer("asha@example.in").await;

    let (status, _) = app.get("/api/admin/dashboard", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.get("/api/admin/dashboard", Some(&customer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/admin/dashboard", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn product_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.admin("admin@example.in").await;

    let form = json!({
        "name": "Tulsi Drops", "price": 120, "description": "Immunity drops", "category": "Wellness",
        "quantity": "30ml", "img": "/Tulsi.jpg", "howToUse": "Five drops in warm water",
        "benefits": "Supports immunity., Soothes throat.,  ,", "stock": 25
    });
    let (status, created) = app.post("/api/admin/products", Some(&admin), form.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["benefits"], json!(["Supports immunity.", "Soothes throat."]));
    assert_eq!(created["stock"], 25);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, listed) = app.get("/api/admin/products", Some(&admin)).await;
    assert_eq!(listed[0]["id"], id.as_str(), "newest first");

    let mut update = form.clone();
    update["price"] = json!(150);
    update["stock"] = serde_json::Value::Null;
    let (status, updated) = app.request(Method::PUT, &format!("/api/admin/products/{id}"), Some(&admin), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 150.0);
    assert_eq!(updated["stock"], 0);

    let mut bad = form.clone();
    bad["price"] = json!(-5);
    let (status, _) = app.post("/api/admin/products", Some(&admin), bad).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/admin/products/{id}");
    let (status, _) = app.request(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.request(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purchased_products_cannot_be_deleted() {
    let app = TestApp::new().await;
    let admin = app.admin("admin@example.in").await;
    let customer = app.customer("asha@example.in").await;
    let product = app.catalog().await.remove(0);
    app.post("/api/razorpay/verify", Some(&customer), verify_body("order_1", "pay_1", &product, 1)).await;

    let (status, _) = app.request(Method::DELETE, &format!("/api/admin/products/{}", product.id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn order_status_and_dashboard() {
    let app = TestApp::new().await;
    let admin = app.admin("admin@example.in").await;
    let customer = app.customer("asha@example.in").await;
    let product = app.catalog().await.remove(4);
    let (_, settled) = app.post("/api/razorpay/verify", Some(&customer), verify_body("order_1", "pay_1", &product, 1)).await;
    let order_id = settled["orderId"].as_str().unwrap().to_string();

    let (_, dash) = app.get("/api/admin/dashboard", Some(&admin)).await;
    assert_eq!(dash["totalUsers"], 2);
    assert_eq!(dash["totalOrders"], 1);
    assert_eq!(dash["totalRevenue"], json!(product.price));
    assert_eq!(dash["recentOrders"][0]["customer"]["email"], "asha@example.in");

    let uri = format!("/api/admin/orders/{order_id}/status");
    let (status, _) = app.request(Method::PUT, &uri, Some(&admin), Some(json!({ "status": "LOST" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, order) = app.request(Method::PUT, &uri, Some(&admin), Some(json!({ "status": "DELIVERED" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "DELIVERED");

    let (_, detail) = app.get(&format!("/api/admin/orders/{order_id}"), Some(&admin)).await;
    assert_eq!(detail["status"], "DELIVERED");
    assert_eq!(detail["customer"]["name"], "Asha");

    let (_, dash) = app.get("/api/admin/dashboard", Some(&admin)).await;
    assert_eq!(dash["deliveredOrders"], 1);
    assert_eq!(dash["totalRevenue"], 0.0);

    let (status, _) = app.get(&format!("/api/admin/orders/{}", uuid::Uuid::new_v4()), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_management() {
    let app = TestApp::new().await;
    let admin = app.admin("admin@example.in").await;
    app.customer("asha@example.in").await;

    let (_, users) = app.get("/api/admin/users", Some(&admin)).await;
    let users = users.as_array().unwrap().clone();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("passwordHash").is_none()));
    let asha = users.iter().find(|u| u["email"] == "asha@example.in").unwrap();
    let id = asha["id"].as_str().unwrap();

    let (status, toggled) = app.post(&format!("/api/admin/users/{id}/role"), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["role"], "ADMIN");

    let (status, _) = app.request(Method::DELETE, &format!("/api/admin/users/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let buyer = app.customer("ravi@example.in").await;
    let product = app.catalog().await.remove(0);
    let (status, _) = app.post("/api/razorpay/verify", Some(&buyer), verify_body("order_1", "pay_1", &product, 1)).await;
    assert_eq!(status, StatusCode::OK);
    let ravi = app.store.user_by_email("ravi@example.in").await.unwrap().unwrap();
    let (status, _) = app.request(Method::DELETE, &format!("/api/admin/users/{}", ravi.id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(app.store.user(ravi.id).await.unwrap().is_some());
    let (status, _) = app.request(Method::DELETE, &format!("/api/admin/users/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
