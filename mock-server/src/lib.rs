//! In-memory stand-in for the subset of the Stripe API the client's
//! integration tests exercise.
//!
//! Speaks the same wire format as the real service: bearer auth, form-encoded
//! bodies with bracketed keys, `{"error": {...}}` envelopes, and idempotent
//! replay of POST requests keyed by `Idempotency-Key`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Secret keys must carry this prefix to authenticate.
pub const TEST_KEY_PREFIX: &str = "sk_test_";

/// Payment methods that always decline, with their decline code.
const DECLINING_METHODS: &[(&str, &str)] = &[
    ("pm_card_chargeDeclined", "generic_decline"),
    ("pm_card_chargeDeclinedInsufficientFunds", "insufficient_funds"),
    ("pm_card_chargeDeclinedExpiredCard", "expired_card"),
];

type Pairs = Vec<(String, String)>;

#[derive(Default)]
pub struct Store {
    customers: Vec<Value>,
    payment_intents: Vec<Value>,
    idempotency: HashMap<String, Replay>,
}

struct Replay {
    fingerprint: String,
    status: StatusCode,
    body: Value,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/v1/customers", get(list_customers).post(create_customer))
        .route(
            "/v1/customers/{id}",
            get(get_customer).post(update_customer).delete(delete_customer),
        )
        .route("/v1/payment_intents", post(create_payment_intent))
        .route("/v1/payment_intents/{id}", get(get_payment_intent))
        .route("/v1/balance", get(get_balance))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A Stripe-style error response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
    code: Option<&'static str>,
    param: Option<String>,
    decline_code: Option<&'static str>,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
            code: None,
            param: None,
            decline_code: None,
        }
    }

    fn missing_param(param: &str) -> Self {
        let mut err = Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_request_error",
            format!("Missing required param: {param}."),
        );
        err.code = Some("parameter_missing");
        err.param = Some(param.to_string());
        err
    }

    fn no_such(object: &str, id: &str) -> Self {
        let mut err = Self::new(
            StatusCode::NOT_FOUND,
            "invalid_request_error",
            format!("No such {object}: '{id}'"),
        );
        err.code = Some("resource_missing");
        err.param = Some("id".to_string());
        err
    }

    fn body(&self) -> Value {
        let mut error = Map::new();
        error.insert("type".into(), self.kind.into());
        error.insert("message".into(), self.message.clone().into());
        if let Some(code) = self.code {
            error.insert("code".into(), code.into());
        }
        if let Some(param) = &self.param {
            error.insert("param".into(), param.clone().into());
        }
        if let Some(decline_code) = self.decline_code {
            error.insert("decline_code".into(), decline_code.into());
        }
        json!({ "error": error })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

fn authorize(headers: &HeaderMap) -> Result<(), ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        Some(key) if key.starts_with(TEST_KEY_PREFIX) => Ok(()),
        Some(_) => Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "authentication_error",
            "Invalid API Key provided.",
        )),
        None => Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "authentication_error",
            "You did not provide an API key.",
        )),
    }
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", &Uuid::new_v4().simple().to_string()[..14])
}

/// Rebuild nested objects from bracketed form keys:
/// `metadata[order_id]=1` becomes `{"metadata": {"order_id": "1"}}`.
pub fn unflatten(pairs: &[(String, String)]) -> Map<String, Value> {
    let mut root = Map::new();
    for (key, value) in pairs {
        let mut segments = key
            .split('[')
            .map(|s| s.trim_end_matches(']'))
            .collect::<Vec<_>>();
        let Some(last) = segments.pop() else { continue };
        let mut node = &mut root;
        for segment in segments {
            let entry = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            node = match entry {
                Value::Object(map) => map,
                _ => unreachable!(),
            };
        }
        node.insert(last.to_string(), Value::String(value.clone()));
    }
    root
}

fn field<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Run `create` once per idempotency key. A replay with identical parameters
/// returns the stored response; different parameters are rejected.
async fn idempotent<F>(
    db: &Db,
    headers: &HeaderMap,
    route: &str,
    form: &Pairs,
    create: F,
) -> Response
where
    F: FnOnce(&mut Store) -> Result<Value, ApiError>,
{
    let key = headers
        .get("idempotency-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let fingerprint = format!("{route}?{form:?}");
    let mut store = db.write().await;

    if let Some(key) = &key {
        if let Some(replay) = store.idempotency.get(key) {
            if replay.fingerprint != fingerprint {
                return ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "idempotency_error",
                    format!(
                        "Keys for idempotent requests can only be used with the same parameters they were first used with. Try using a key other than '{key}' if you meant to execute a different request."
                    ),
                )
                .into_response();
            }
            tracing::debug!(key = %key, "replaying idempotent response");
            let mut response = (replay.status, Json(replay.body.clone())).into_response();
            response
                .headers_mut()
                .insert("idempotent-replayed", HeaderValue::from_static("true"));
            return response;
        }
    }

    let (status, body) = match create(&mut *store) {
        Ok(body) => (StatusCode::OK, body),
        Err(err) => (err.status, err.body()),
    };
    if let Some(key) = key {
        store.idempotency.insert(
            key,
            Replay {
                fingerprint,
                status,
                body: body.clone(),
            },
        );
    }
    (status, Json(body)).into_response()
}

async fn list_customers(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<Pairs>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let limit = match field(&query, "limit") {
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            let mut err = ApiError::new(
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                format!("Invalid integer: {raw}"),
            );
            err.param = Some("limit".to_string());
            err
        })?,
        None => 10,
    };
    let email = field(&query, "email");

    let store = db.read().await;
    let matching: Vec<&Value> = store
        .customers
        .iter()
        .rev()
        .filter(|c| email.map_or(true, |e| c["email"] == e))
        .collect();
    let has_more = matching.len() > limit;
    let data: Vec<Value> = matching.into_iter().take(limit).cloned().collect();
    Ok(Json(json!({
        "object": "list",
        "data": data,
        "has_more": has_more,
        "url": "/v1/customers"
    })))
}

async fn create_customer(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<Pairs>,
) -> Response {
    if let Err(err) = authorize(&headers) {
        return err.into_response();
    }
    idempotent(&db, &headers, "/v1/customers", &form, |store| {
        let mut customer = unflatten(&form);
        customer.insert("id".into(), new_id("cus").into());
        customer.insert("object".into(), "customer".into());
        customer.entry("metadata").or_insert_with(|| json!({}));
        let customer = Value::Object(customer);
        store.customers.push(customer.clone());
        Ok(customer)
    })
    .await
}

async fn get_customer(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    store
        .customers
        .iter()
        .find(|c| c["id"] == id.as_str())
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::no_such("customer", &id))
}

async fn update_customer(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<Pairs>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let customer = store
        .customers
        .iter_mut()
        .find(|c| c["id"] == id.as_str())
        .ok_or_else(|| ApiError::no_such("customer", &id))?;
    let Value::Object(fields) = customer else {
        return Err(ApiError::no_such("customer", &id));
    };
    for (key, value) in unflatten(&form) {
        // nested objects such as metadata merge rather than replace
        if let (Some(Value::Object(existing)), Value::Object(update)) = (fields.get_mut(&key), &value) {
            existing.extend(update.clone());
            continue;
        }
        fields.insert(key, value);
    }
    Ok(Json(customer.clone()))
}

async fn delete_customer(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let before = store.customers.len();
    store.customers.retain(|c| c["id"] != id.as_str());
    if store.customers.len() == before {
        return Err(ApiError::no_such("customer", &id));
    }
    Ok(Json(json!({ "id": id, "object": "customer", "deleted": true })))
}

async fn create_payment_intent(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<Pairs>,
) -> Response {
    if let Err(err) = authorize(&headers) {
        return err.into_response();
    }
    idempotent(&db, &headers, "/v1/payment_intents", &form, |store| {
        let amount = field(&form, "amount").ok_or_else(|| ApiError::missing_param("amount"))?;
        let amount: i64 = amount.parse().map_err(|_| {
            let mut err = ApiError::new(
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                format!("Invalid integer: {amount}"),
            );
            err.param = Some("amount".to_string());
            err
        })?;
        let currency = field(&form, "currency").ok_or_else(|| ApiError::missing_param("currency"))?;
        let payment_method = field(&form, "payment_method");
        let confirm = field(&form, "confirm") == Some("true");

        if confirm {
            if let Some((_, decline_code)) = DECLINING_METHODS
                .iter()
                .find(|(pm, _)| Some(*pm) == payment_method)
            {
                let mut err = ApiError::new(
                    StatusCode::PAYMENT_REQUIRED,
                    "card_error",
                    "Your card was declined.",
                );
                err.code = Some("card_declined");
                err.decline_code = Some(*decline_code);
                return Err(err);
            }
        }

        let status = match (payment_method, confirm) {
            (None, _) => "requires_payment_method",
            (Some(_), false) => "requires_confirmation",
            (Some(_), true) => "succeeded",
        };
        let id = new_id("pi");
        let intent = json!({
            "id": id,
            "object": "payment_intent",
            "amount": amount,
            "currency": currency,
            "status": status,
            "payment_method": payment_method,
            "customer": field(&form, "customer"),
            "client_secret": format!("{id}_secret_{}", &Uuid::new_v4().simple().to_string()[..8]),
            "metadata": unflatten(&form).remove("metadata").unwrap_or_else(|| json!({})),
        });
        store.payment_intents.push(intent.clone());
        Ok(intent)
    })
    .await
}

async fn get_payment_intent(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    store
        .payment_intents
        .iter()
        .find(|pi| pi["id"] == id.as_str())
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::no_such("payment_intent", &id))
}

async fn get_balance(headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let account = headers.get("stripe-account").and_then(|v| v.to_str().ok());
    Ok(Json(json!({
        "object": "balance",
        "livemode": false,
        "available": [{"amount": 0, "currency": "usd"}],
        "pending": [{"amount": 0, "currency": "usd"}],
        "account": account,
    })))
}
