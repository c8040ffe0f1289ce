//! API Integration Tests
//!
//! Full router over the in-memory store, driven with `oneshot`.

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use pig_farm::api::routes::{RegisterBatchRequest, ReductionRequest, ServiceRequest};

mod common;

use common::{body_json, date_string, days_ago, empty_request, json_request, setup_app};

fn register_body(days_old: u64, males: u32, females: u32) -> RegisterBatchRequest {
    RegisterBatchRequest {
        date_of_birth: date_string(days_ago(days_old)),
        males,
        females,
        mother_id: "SOW-3".to_string(),
    }
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = setup_app();

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_batch_lifecycle_e2e() {
    let app = setup_app();

    // 1. Register an old and a young batch
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/batches", &register_body(170, 4, 3)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "First registration failed");
    let json = body_json(response).await;
    assert_eq!(json["identifier"], "A001");
    assert_eq!(json["id"], 1);

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/batches", &register_body(30, 2, 2)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["identifier"], "A002");

    // 2. List with ages
    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/batches"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[0]["age_in_days"], 170);
    assert_eq!(json[1]["age_in_days"], 30);

    // 3. Only the old batch is ready
    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/slaughter/ready"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["identifier"], "A001");

    // 4. Reduce it, attributed to the calling operator
    let mut request = json_request(
        "POST",
        "/api/v1/batches/A001/reductions",
        &ReductionRequest {
            males_removed: 2,
            females_removed: 1,
            average_weight: 95.5,
        },
    );
    request
        .headers_mut()
        .insert("x-actor-id", "alice".parse().unwrap());
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "Reduction failed");
    let json = body_json(response).await;
    assert_eq!(json["batch"]["males"], 2);
    assert_eq!(json["batch"]["females"], 2);
    assert_eq!(json["record"]["actor_id"], "alice");
    assert_eq!(json["record"]["event_date"], date_string(days_ago(0)));

    // 5. Asking for more than is left changes nothing
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/batches/A001/reductions",
            &ReductionRequest {
                males_removed: 3,
                females_removed: 0,
                average_weight: 95.5,
            },
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error_code"], "insufficient_stock");

    // 6. History holds the single successful reduction
    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/slaughter/history"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["batch_identifier"], "A001");
    assert_eq!(json[0]["reductions_for_batch"], 1);
}

#[tokio::test]
async fn test_young_batch_cannot_be_reduced() {
    let app = setup_app();
    app.router
        .clone()
        .oneshot(json_request("POST", "/api/v1/batches", &register_body(30, 2, 2)))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/batches/A001/reductions",
            &ReductionRequest {
                males_removed: 1,
                females_removed: 0,
                average_weight: 20.0,
            },
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error_code"], "not_ready_for_slaughter");

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/slaughter/history"))
        .await
        .unwrap();
    assert!(body_json(response).await.as_array().unwrap().is_empty());

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/batches"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await[0]["males"], 2);
}

#[tokio::test]
async fn test_registration_rejections() {
    let app = setup_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/batches",
            &json!({ "date_of_birth": "2024-13-01", "males": 1, "females": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "malformed_date");

    let tomorrow = pig_farm::domain::today().succ_opt().unwrap();
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/batches",
            &json!({ "date_of_birth": date_string(tomorrow), "males": 1, "females": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error_code"], "future_date");
}

#[tokio::test]
async fn test_growth_assessment() {
    let app = setup_app();
    app.router
        .clone()
        .oneshot(json_request("POST", "/api/v1/batches", &register_body(28, 3, 3)))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/batches/A001/assessment",
            &json!({ "actual_weight": 4.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["age_in_days"], 28);
    assert!((json["expected_weight"].as_f64().unwrap() - 5.88).abs() < 1e-9);
    assert_eq!(json["feed_label"], "breastfeeding");
    assert_eq!(json["health"], "Average");

    // cancelled weight prompt
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/batches/A001/assessment", &json!({})))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["health"], Value::Null);
    assert_eq!(json["actual_weight"], Value::Null);
}

#[tokio::test]
async fn test_batch_lookup_errors() {
    let app = setup_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/batches/a01/assessment", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "malformed_identifier");

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/batches/B007/assessment", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error_code"], "batch_not_found");
}

#[tokio::test]
async fn test_breeding_e2e() {
    let app = setup_app();
    let service = |pig: &str, days_ago_served: u64, confirm: bool| ServiceRequest {
        pig_identifier: pig.to_string(),
        served_date: date_string(days_ago(days_ago_served)),
        confirm_farrowed: confirm,
    };

    // 1. Due today and confirmed: removed straight away
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/breeding", &service("DUE", 144, true)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"]["urgency"], "Due");
    assert_eq!(json["effects"]["removed"], true);

    // 2. Imminent: reminder scheduled
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/breeding", &service("SOON", 142, false)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["status"]["days_left"], 2);
    assert_eq!(json["effects"]["reminder_scheduled"], true);
    assert_eq!(json["message"], "2 days left until the expected birth date.");

    // 3. Two more entries: one far off, one already past
    for body in [service("LATER", 10, false), service("PAST", 150, false)] {
        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/api/v1/breeding", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    assert_eq!(app.notifier.messages().len(), 4);

    // 4. Listed soonest first
    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/breeding"))
        .await
        .unwrap();
    let json = body_json(response).await;
    let order: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["pig_identifier"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["PAST", "SOON", "LATER"]);
    assert_eq!(json[0]["stale"], true);
    let later_id = json[2]["id"].as_i64().unwrap();

    // 5. Purge drops the stale entry
    let response = app
        .router
        .clone()
        .oneshot(empty_request("POST", "/api/v1/breeding/purge"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["removed"], 1);

    // 6. Operator confirms farrowing by id
    let response = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/breeding/{}", later_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["pig_identifier"], "LATER");

    let response = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/breeding/{}", later_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error_code"], "entry_not_found");
}

#[tokio::test]
async fn test_store_unavailable() {
    let app = setup_app();
    app.store.set_offline(true);

    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/batches"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["error_code"], "store_unavailable");
}
