use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::Value;
use tower::ServiceExt;

const KEY: &str = "Bearer sk_test_mock";

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn form_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, KEY)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, KEY)
        .body(String::new())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_key_is_authentication_error() {
    let resp = app()
        .oneshot(Request::builder().uri("/v1/customers").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["type"], "authentication_error");
}

#[tokio::test]
async fn live_key_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/v1/balance")
                .header(http::header::AUTHORIZATION, "Bearer sk_live_nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], "Invalid API Key provided.");
}

// --- customers ---

#[tokio::test]
async fn create_customer_nests_metadata() {
    let resp = app()
        .oneshot(form_request(
            "POST",
            "/v1/customers",
            "email=a%40b.com&metadata[order_id]=6735",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let customer = body_json(resp).await;
    assert!(customer["id"].as_str().unwrap().starts_with("cus_"));
    assert_eq!(customer["object"], "customer");
    assert_eq!(customer["email"], "a@b.com");
    assert_eq!(customer["metadata"]["order_id"], "6735");
}

#[tokio::test]
async fn unknown_customer_is_resource_missing() {
    let resp = app().oneshot(get_request("/v1/customers/cus_nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert_eq!(body["error"]["code"], "resource_missing");
    assert_eq!(body["error"]["param"], "id");
}

#[tokio::test]
async fn bad_limit_names_param() {
    let resp = app()
        .oneshot(get_request("/v1/customers?limit=lots"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["param"], "limit");
}

// --- payment intents ---

#[tokio::test]
async fn payment_intent_requires_currency() {
    let resp = app()
        .oneshot(form_request("POST", "/v1/payment_intents", "amount=2000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["param"], "currency");
}

#[tokio::test]
async fn declining_card_returns_402() {
    let resp = app()
        .oneshot(form_request(
            "POST",
            "/v1/payment_intents",
            "amount=2000&currency=usd&payment_method=pm_card_chargeDeclinedInsufficientFunds&confirm=true",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["type"], "card_error");
    assert_eq!(body["error"]["code"], "card_declined");
    assert_eq!(body["error"]["decline_code"], "insufficient_funds");
}

// --- idempotency ---

#[tokio::test]
async fn idempotent_replay_and_conflict() {
    use tower::Service;

    let mut app = app().into_service();
    let keyed = |body: &str| {
        let mut req = form_request("POST", "/v1/customers", body);
        req.headers_mut()
            .insert("idempotency-key", "key-1".parse().unwrap());
        req
    };

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(keyed("email=a%40b.com"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let first = body_json(resp).await;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(keyed("email=a%40b.com"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["idempotent-replayed"], "true");
    let replayed = body_json(resp).await;
    assert_eq!(replayed["id"], first["id"]);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(keyed("email=other%40b.com"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["type"], "idempotency_error");

    // only one customer was created
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/v1/customers"))
        .await
        .unwrap();
    let list = body_json(resp).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

// --- full customer lifecycle ---

#[tokio::test]
async fn customer_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request("POST", "/v1/customers", "email=walk%40dog.com&name=Walker"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    // update: metadata merges, name changes
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "POST",
            &format!("/v1/customers/{id}"),
            "name=Runner&metadata[tier]=gold",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["name"], "Runner");
    assert_eq!(updated["email"], "walk@dog.com");
    assert_eq!(updated["metadata"]["tier"], "gold");

    // list filtered by email
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/v1/customers?email=walk%40dog.com"))
        .await
        .unwrap();
    let list = body_json(resp).await;
    assert_eq!(list["object"], "list");
    assert_eq!(list["data"][0]["id"], id.as_str());

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request("DELETE", &format!("/v1/customers/{id}"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted = body_json(resp).await;
    assert_eq!(deleted["deleted"], true);

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/v1/customers/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
