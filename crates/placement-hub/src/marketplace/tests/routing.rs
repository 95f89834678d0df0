use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;

use crate::marketplace::domain::{ApplicationStatus, OrderStatus};
use crate::marketplace::marketplace_router;

const ADMIN: &[(&str, &str)] = &[("x-user-role", "admin"), ("x-user-email", "ops@acme.io")];
const STUDENT: &[(&str, &str)] = &[
    ("x-user-role", "student"),
    ("x-user-email", "priya@student.edu"),
];

fn router() -> axum::Router {
    router_with_store().0
}

fn router_with_store() -> (axum::Router, Arc<MemoryStore>) {
    let (service, store) = build_service();
    (marketplace_router(Arc::new(service)), store)
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    json_request_as(ADMIN, method, uri, payload)
}

fn json_request_as(
    identity: &[(&str, &str)],
    method: &str,
    uri: &str,
    payload: Value,
) -> Request<Body> {
    identity
        .iter()
        .fold(Request::builder(), |builder, (name, value)| {
            builder.header(*name, *value)
        })
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-as-of", "2024-01-15")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn orders_are_listed_by_ship_date() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/v1/orders?status=all&sort=ship_by_date&direction=asc")
                .header("x-as-of", "2024-01-15")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let ids: Vec<&str> = body["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["ORD-2", "ORD-3", "ORD-1"]);
    assert_eq!(body["matched"], 3);
    assert_eq!(body["limit"], 15);
}

#[tokio::test]
async fn order_quick_filter_narrows_the_list() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/v1/orders?quick=ship_by_today")
                .header("x-as-of", "2024-01-15")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let body = body_json(response).await;
    assert_eq!(body["matched"], 1);
    assert_eq!(body["items"][0]["id"], "ORD-3");
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn internship_search_matches_descriptions() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/v1/internships?search=react")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let body = body_json(response).await;
    assert_eq!(body["matched"], 1);
    assert_eq!(body["items"][0]["title"], "Frontend Developer Intern");
}

#[tokio::test]
async fn posting_valid_internship_returns_created() {
    let payload = serde_json::to_value(internship_draft()).expect("serialize draft");
    let response = router()
        .oneshot(json_request("POST", "/api/v1/internships", payload))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["internship"]["title"], "Backend Intern");
    assert_eq!(body["notification"]["level"], "success");
}

#[tokio::test]
async fn posting_invalid_internship_lists_issues() {
    let mut payload = serde_json::to_value(internship_draft()).expect("serialize draft");
    payload["title"] = json!("");
    payload["contact"]["email"] = json!("not-an-email");

    let response = router()
        .oneshot(json_request("POST", "/api/v1/internships", payload))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    let fields: Vec<&str> = body["issues"]
        .as_array()
        .expect("issues")
        .iter()
        .map(|issue| issue["field"].as_str().expect("field"))
        .collect();
    assert_eq!(fields, vec!["title", "contact.email"]);
}

#[tokio::test]
async fn illegal_order_transition_conflicts() {
    let response = router()
        .oneshot(json_request(
            "POST",
            "/api/v1/orders/ORD-1/status",
            json!({ "status": "sent" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["notification"]["title"], "Status change not allowed");
}

#[tokio::test]
async fn missing_application_is_not_found() {
    let response = router()
        .oneshot(json_request(
            "POST",
            "/api/v1/applications/app-404/status",
            json!({ "status": "reviewed" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn student_sees_own_applications_in_student_vocabulary() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/v1/applications")
                .header("x-user-role", "student")
                .header("x-user-email", "priya@student.edu")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let items = body["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(item["student_status"].is_string());
    }
    let pending = items
        .iter()
        .find(|item| item["id"] == "app-2")
        .expect("pending application listed");
    assert_eq!(pending["student_status"], "applied");
}

#[tokio::test]
async fn anonymous_requests_see_no_applications() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/v1/applications/analytics")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let body = body_json(response).await;
    assert_eq!(body["analytics"]["total"], 0);
    assert_eq!(body["analytics"]["shortlisted_ratio"], 0.0);
}

#[tokio::test]
async fn anonymous_callers_cannot_decide_applications() {
    let (router, store) = router_with_store();
    for status in ["shortlisted", "accepted"] {
        let response = router
            .clone()
            .oneshot(json_request_as(
                &[],
                "POST",
                "/api/v1/applications/app-2/status",
                json!({ "status": status }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["notification"]["title"], "Not permitted");
    }

    let response = router
        .oneshot(json_request_as(
            &[],
            "POST",
            "/api/v1/applications/app-2/messages",
            json!({ "sender": "employer", "body": "You are hired" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let applications = store.applications.lock().expect("lock");
    let pending = applications
        .iter()
        .find(|application| application.id.0 == "app-2")
        .expect("seeded application");
    assert_eq!(pending.status, ApplicationStatus::Pending);
    assert!(pending.messages.is_empty());
}

#[tokio::test]
async fn students_cannot_change_orders_but_may_withdraw() {
    let (router, store) = router_with_store();
    let response = router
        .clone()
        .oneshot(json_request_as(
            STUDENT,
            "POST",
            "/api/v1/orders/ORD-1/status",
            json!({ "status": "cancelled" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        store.orders.lock().expect("lock")[0].status,
        OrderStatus::Pending
    );

    let response = router
        .oneshot(json_request_as(
            STUDENT,
            "POST",
            "/api/v1/applications/app-2/status",
            json!({ "status": "withdrawn" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "withdrawn");
}

#[tokio::test]
async fn student_analytics_carry_student_vocabulary_and_language() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/v1/applications/analytics")
                .header("x-user-role", "student")
                .header("x-user-email", "priya@student.edu")
                .header("accept-language", "hi-IN,hi;q=0.9,en;q=0.8")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-language").expect("language"),
        "hi-IN"
    );

    let body = body_json(response).await;
    let entries = body["analytics"]["student_status"]["entries"]
        .as_array()
        .expect("student distribution");
    let applied = entries
        .iter()
        .find(|entry| entry["status"] == "applied")
        .expect("applied entry");
    assert_eq!(applied["count"], 1);
    assert_eq!(body["analytics"]["student_status"]["total"], 2);
}
