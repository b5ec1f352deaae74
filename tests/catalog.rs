mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn search_filters_compose() {
    let app = TestApp::new().await;

    let (status, all) = app.get("/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 9);

    let (_, hits) = app.get("/api/products?q=TAIL&min=100&max=200", None).await;
    let names: Vec<&str> = hits.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Jodo Ka Tail", "Rambaan Tail"]);

    let (_, hits) = app.get("/api/products?category=Wellness&min=300", None).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["name"], "Power Churan");

    let (_, hits) = app.get("/api/products?q=90", None).await;
    assert_eq!(hits[0]["name"], "Daant Manjan");
}

#[tokio::test]
async fn featured_and_categories() {
    let app = TestApp::new().await;
    let (_, featured) = app.get("/api/products/featured", None).await;
    assert_eq!(featured.as_array().unwrap().len(), 3);
    assert_eq!(featured[0]["name"], "Amashay Churn");

    let (_, categories) = app.get("/api/categories", None).await;
    assert_eq!(categories, json!(["Digestion", "First Aid", "Hair Care", "Oral Care", "Pain Relief", "Skin Care", "Wellness"]));
}

#[tokio::test]
async fn product_page() {
    let app = TestApp::new().await;
    let product = app.catalog().await.remove(2);
    let (status, detail) = app.get(&format!("/api/products/{}", product.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Face Pack");
    assert_eq!(detail["howToUse"], product.how_to_use.unwrap().as_str());
    assert_eq!(detail["averageRating"], 0.0);
    assert_eq!(detail["hasPurchased"], false);

    let (status, body) = app.get(&format!("/api/products/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn signup_and_login() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/api/auth/signup", None, json!({ "email": "", "password": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields");

    app.customer("asha@example.in").await;
    let (status, body) = app.post("/api/auth/signup", None, json!({ "email": "asha@example.in", "password": "another" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");

    let (status, _) = app.post("/api/auth/login", None, json!({ "email": "asha@example.in", "password": "wrong" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = app.post("/api/auth/login", None, json!({ "email": "asha@example.in", "password": "correct horse" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("passwordHash").is_none());
}
