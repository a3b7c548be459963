use std::sync::Arc;

use aviary_backend::{create_router, storage::DbConnection, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = Arc::new(DbConnection::in_memory().await.expect("Failed to create test database"));
    create_router(AppState::new(db), None)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Registers a user and returns (user id, token)
async fn register(app: &Router, national_id: &str, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users",
        None,
        Some(json!({ "nationalId": national_id, "fullName": "Test Breeder", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    (
        body["data"]["user"]["id"].as_str().unwrap().to_string(),
        body["data"]["token"].as_str().unwrap().to_string(),
    )
}

async fn create_bird(app: &Router, token: &str, identifier: &str, gender: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/birds",
        Some(token),
        Some(json!({
            "identifier": identifier,
            "species": "Canary",
            "gender": gender,
            "birthDate": "2023-05-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"].clone()
}

#[tokio::test]
async fn test_bird_cage_nest_scenario() {
    let app = test_app().await;
    let (alice_id, alice) = register(&app, "12345678", "alice@example.com").await;

    let male = create_bird(&app, &alice, "B1", "Male").await;
    let female = create_bird(&app, &alice, "B2", "female").await;
    assert_eq!(male["gender"], "male");
    assert_eq!(male["owner"], alice_id.as_str());
    assert_eq!(male["sold"], false);

    let (status, cage) = send(
        &app,
        Method::POST,
        "/api/cages",
        Some(&alice),
        Some(json!({
            "cageNumber": "C1",
            "male": { "_id": male["id"] },
            "female": female["id"],
            "species": "Canary"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", cage);
    assert_eq!(cage["data"]["male"]["identifier"], "B1");
    assert_eq!(cage["data"]["female"]["identifier"], "B2");

    let (status, nest) = send(
        &app,
        Method::POST,
        "/api/nests",
        Some(&alice),
        Some(json!({
            "cageNumber": "C1",
            "numberOfEggs": 4,
            "fertilizedEggs": 3,
            "extractedEggs": 0,
            "exclusionDate": "2024-03-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", nest);
    assert_eq!(nest["success"], true);
    assert_eq!(nest["data"]["cageNumber"], "C1");
    assert_eq!(nest["data"]["birdsExited"], 0);
    assert_eq!(nest["data"]["cage"]["male"]["identifier"], "B1");

    let nest_id = nest["data"]["id"].as_str().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/api/nests/{}", nest_id), Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["cage"]["cageNumber"], "C1");

    // The cage cannot be removed while the nest exists
    let cage_id = cage["data"]["id"].as_str().unwrap();
    let (status, body) = send(&app, Method::DELETE, &format!("/api/cages/{}", cage_id), Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/birds", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, Method::GET, "/api/cages", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "ok");
}

#[tokio::test]
async fn test_unknown_route_and_bad_bodies() {
    let app = test_app().await;
    let (_, alice) = register(&app, "12345678", "alice@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/does-not-exist", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/birds",
        Some(&alice),
        Some(json!({ "species": "Canary" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    create_bird(&app, &alice, "B1", "male").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/birds",
        Some(&alice),
        Some(json!({ "identifier": "B1", "species": "Canary", "birthDate": "2023-05-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("B1"));

    let (status, _) = send(&app, Method::GET, "/api/birds/missing", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_marketplace_purchase_and_sale() {
    let app = test_app().await;
    let (alice_id, alice) = register(&app, "12345678", "alice@example.com").await;
    let (bob_id, bob) = register(&app, "87654321", "bob@example.com").await;

    let listed = create_bird(&app, &alice, "B1", "male").await;
    let kept = create_bird(&app, &alice, "B2", "female").await;
    let listed_id = listed["id"].as_str().unwrap();
    let kept_id = kept["id"].as_str().unwrap();

    // Only the owner may list a bird
    let uri = format!("/api/birds/{}/mark-for-sale", listed_id);
    let (status, _) = send(&app, Method::PUT, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::PUT, &uri, Some(&alice), Some(json!({ "askingPrice": 75.0 }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["forSale"], true);

    let (_, market) = send(&app, Method::GET, "/api/birds/for-sale", Some(&bob), None).await;
    assert_eq!(market["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/birds/{}/purchase", listed_id);
    let (status, body) = send(&app, Method::PUT, &uri, Some(&bob), Some(json!({ "ring": "R-9" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["owner"], bob_id.as_str());
    assert_eq!(body["data"]["seller"], alice_id.as_str());
    assert_eq!(body["data"]["ring"], "R-9");
    assert_eq!(body["data"]["forSale"], false);

    let (_, available) = send(&app, Method::GET, "/api/birds/available", Some(&alice), None).await;
    let available = available["data"].as_array().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["identifier"], "B2");

    // Sell to an unregistered buyer fails, to a registered one succeeds
    let uri = format!("/api/birds/{}/sell", kept_id);
    let unknown = json!({ "price": 40.0, "buyerInfo": { "nationalId": "00000000", "fullName": "Nobody" } });
    let (status, _) = send(&app, Method::PUT, &uri, Some(&alice), Some(unknown)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let known = json!({ "price": 40.0, "buyerInfo": { "nationalId": "87654321", "fullName": "Bob" } });
    let (status, body) = send(&app, Method::PUT, &uri, Some(&alice), Some(known)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["sold"], true);
    assert_eq!(body["data"]["status"], "sold");
    assert_eq!(body["data"]["soldPrice"], 40.0);

    let uri = format!("/api/birds/{}/mark-for-sale", kept_id);
    let (status, _) = send(&app, Method::PUT, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, sold) = send(&app, Method::GET, "/api/birds/sold", Some(&alice), None).await;
    assert_eq!(sold["data"].as_array().unwrap().len(), 2);

    let (_, totals) = send(&app, Method::GET, "/api/birds/total-sold", Some(&alice), None).await;
    assert_eq!(totals["data"]["count"], 1);
    assert_eq!(totals["data"]["totalPrice"], 40.0);

    // Sale records survive: the sold bird cannot be deleted
    let (status, _) = send(&app, Method::DELETE, &format!("/api/birds/{}", kept_id), Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, totals) = send(&app, Method::GET, "/api/birds/total-sold", Some(&alice), None).await;
    assert_eq!(totals["data"]["count"], 1);

    // The buyer now owns the purchased bird outright
    let (status, body) = send(&app, Method::DELETE, &format!("/api/birds/{}", listed_id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}

#[tokio::test]
async fn test_pairs_view_groups_by_species() {
    let app = test_app().await;
    let (_, alice) = register(&app, "12345678", "alice@example.com").await;

    let male = create_bird(&app, &alice, "B1", "male").await;
    let female = create_bird(&app, &alice, "B2", "female").await;
    create_bird(&app, &alice, "B3", "unknown").await;

    let (status, body) = send(&app, Method::GET, "/api/pairs", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Canary"]["males"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["Canary"]["females"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pairs",
        Some(&alice),
        Some(json!({ "maleId": male["id"], "femaleId": female["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["species"], "Canary");

    let (status, me) = send(&app, Method::GET, "/api/users/me", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["nationalId"], "12345678");
}
