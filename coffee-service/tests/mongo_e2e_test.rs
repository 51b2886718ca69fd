//! End-to-end tests against a real MongoDB (`TEST_MONGODB_URI`, default
//! `mongodb://localhost:27017`). Run with `cargo test -- --ignored`.

mod common;

use common::TestApp;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn default_route_and_health_work() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(app.url("/"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.text().await.unwrap(),
        "Coffee making server is running!"
    );

    let response = client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn create_get_delete_scenario() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.url("/coffee"))
        .json(&json!({ "name": "Latte", "chef": "Sam" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let id = body["insertedId"].as_str().unwrap().to_string();

    let response = client
        .get(app.url(&format!("/coffee/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "_id": id, "name": "Latte", "chef": "Sam" })
    );

    let response = client
        .get(app.url("/coffee"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap().as_array().unwrap().len(), 1);

    let response = client
        .delete(app.url(&format!("/coffee/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap()["result"]["deletedCount"],
        1
    );

    let response = client
        .get(app.url(&format!("/coffee/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(app.url(&format!("/coffee/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn put_upserts_then_updates() {
    let app = TestApp::spawn().await;
    let client = Client::new();
    let id = mongodb::bson::oid::ObjectId::new().to_hex();
    let url = app.url(&format!("/coffee/{id}"));

    let response = client
        .put(&url)
        .json(&json!({ "name": "Cortado", "supplier": "Local Roasters" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary: Value = response.json().await.unwrap();
    assert_eq!(summary["upsertedCount"], 1);
    assert_eq!(summary["upsertedId"], json!(id));

    let response = client
        .put(&url)
        .json(&json!({ "name": "Cortado Doble", "supplier": "Local Roasters" }))
        .send()
        .await
        .unwrap();
    let summary: Value = response.json().await.unwrap();
    assert_eq!(summary["matchedCount"], 1);
    assert_eq!(summary["modifiedCount"], 1);
    assert_eq!(summary["upsertedId"], json!(null));

    let fetched: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(fetched["_id"], json!(id));
    assert_eq!(fetched["name"], "Cortado Doble");
    assert_eq!(fetched["taste"], json!(null));

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn malformed_id_returns_400() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(app.url("/coffee/not-an-object-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "message": "Invalid Coffee ID" })
    );

    app.cleanup().await;
}
