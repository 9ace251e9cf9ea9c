use super::*;
use crate::models::{PaymentMethod, Role};
use crate::protocol::{
    CreateSaleRequest, CurrentSessionRequest, DeleteBranchRequest, ListBranchesRequest,
    LoginRequest, MeRequest,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;

// =========================================================
// Mock Transport
// =========================================================

#[derive(Default)]
struct MockTransport {
    /// Requests seen, in order
    requests: RefCell<Vec<HttpRequest>>,
    /// "METHOD url" -> (status, body)
    responses: RefCell<HashMap<String, (u16, String)>>,
    /// Simulate a network failure for every request
    offline: bool,
}

impl MockTransport {
    fn respond(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.responses.borrow_mut().insert(
            format!("{} {}", method.as_str(), url),
            (status, body.to_string()),
        );
    }

    fn last(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request sent")
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());
        if self.offline {
            return Err(ApiError::Network("Failed to fetch".into()));
        }
        let key = format!("{} {}", req.method.as_str(), req.url);
        let (status, body) = self
            .responses
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(HttpResponse { status, body })
    }
}

const BASE: &str = "https://api.pharma.test/api";

fn client() -> ApiClient<MockTransport> {
    ApiClient::new(format!("{}/", BASE), MockTransport::default())
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "u1",
        "name": "Sara",
        "email": "sara@selam.et",
        "role": "manager"
    })
}

// =========================================================
// Tests
// =========================================================

#[tokio::test]
async fn login_unwraps_session_without_bearer() {
    let api = client();
    api.transport().respond(
        HttpMethod::Post,
        &format!("{}/auth/login", BASE),
        200,
        json!({
            "success": true,
            "data": { "user": user_json(), "access_token": "tok-1" }
        }),
    );

    let session = api
        .send(&LoginRequest {
            email: "sara@selam.et".into(),
            password: "Secret1".into(),
        })
        .await
        .unwrap();

    assert_eq!(session.role(), Role::Manager);
    assert_eq!(session.access_token, "tok-1");

    let sent = api.transport().last();
    assert_eq!(sent.header(HEADER_AUTHORIZATION), None);
    assert_eq!(sent.header("content-type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["email"], "sara@selam.et");
}

#[tokio::test]
async fn bearer_token_is_attached_when_present() {
    let api = client().with_token(Some("tok-9".into()));
    api.transport().respond(
        HttpMethod::Get,
        &format!("{}/auth/me", BASE),
        200,
        json!({ "success": true, "data": user_json() }),
    );

    let me = api.send(&MeRequest).await.unwrap();
    assert_eq!(me.name, "Sara");

    let sent = api.transport().last();
    assert_eq!(sent.header(HEADER_AUTHORIZATION), Some("Bearer tok-9"));
    assert_eq!(sent.body, None);
}

#[tokio::test]
async fn empty_token_counts_as_anonymous() {
    let api = client().with_token(Some(String::new()));
    assert_eq!(api.token(), None);
    let http = api.build(&ListBranchesRequest).unwrap();
    assert_eq!(http.header(HEADER_AUTHORIZATION), None);
}

#[tokio::test]
async fn success_false_becomes_rejected() {
    let api = client();
    api.transport().respond(
        HttpMethod::Get,
        &format!("{}/manager/branches", BASE),
        200,
        json!({ "success": false, "message": "Subscription expired" }),
    );

    let err = api.send(&ListBranchesRequest).await.unwrap_err();
    assert_eq!(err, ApiError::Rejected("Subscription expired".into()));
}

#[tokio::test]
async fn unauthorized_is_distinguished() {
    let api = client().with_token(Some("stale".into()));
    api.transport().respond(
        HttpMethod::Get,
        &format!("{}/auth/me", BASE),
        401,
        json!({ "success": false, "message": "jwt expired" }),
    );

    let err = api.send(&MeRequest).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn http_error_prefers_envelope_message() {
    let api = client();
    api.transport().respond(
        HttpMethod::Delete,
        &format!("{}/manager/branches/b-1", BASE),
        409,
        json!({ "success": false, "message": "Branch still has staff" }),
    );

    let err = api
        .send(&DeleteBranchRequest { id: "b-1".into() })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            status: 409,
            message: "Branch still has staff".into()
        }
    );

    // no mock registered -> 404 with empty body
    let err = api.send(&MeRequest).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            status: 404,
            message: "Not found".into()
        }
    );
}

#[tokio::test]
async fn network_failure_is_reported() {
    let api = ApiClient::new(
        BASE,
        MockTransport {
            offline: true,
            ..Default::default()
        },
    );
    let err = api.send(&ListBranchesRequest).await.unwrap_err();
    assert_eq!(err, ApiError::Network("Failed to fetch".into()));
    assert_eq!(api.transport().requests.borrow().len(), 1);
}

#[tokio::test]
async fn null_data_maps_to_none_for_optional_responses() {
    let api = client();
    api.transport().respond(
        HttpMethod::Get,
        &format!("{}/cashier/session/current", BASE),
        200,
        json!({ "success": true, "data": null }),
    );
    let current = api.send(&CurrentSessionRequest).await.unwrap();
    assert!(current.is_none());
}

#[tokio::test]
async fn sale_is_posted_as_json() {
    let api = client().with_token(Some("tok".into()));
    let req = CreateSaleRequest {
        items: Vec::new(),
        subtotal: Decimal::from(10),
        discount_percent: Decimal::ZERO,
        total: Decimal::from(10),
        payment_method: PaymentMethod::Card,
    };
    let http = api.build(&req).unwrap();
    assert_eq!(http.url, format!("{}/cashier/sales", BASE));
    assert_eq!(http.method, HttpMethod::Post);
    let body: serde_json::Value = serde_json::from_str(http.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["payment_method"], "card");
    assert_eq!(body["total"], 10.0);
}
