mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, json_request, login, read_json, seeded_backend, send};

fn lead_ids(body: &serde_json::Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data")
        .iter()
        .map(|l| l["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_and_public_reference_data() {
    let app = app(seeded_backend());

    let response = send(&app, json_request("GET", "/api/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, json_request("GET", "/api/branches", None, None)).await;
    let body = read_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[1]["state"], "Telangana");

    let response = send(&app, json_request("GET", "/api/roles/counselor/permissions", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["permissions"].as_array().unwrap().len(), 7);

    let response = send(&app, json_request("GET", "/api/roles/intern/permissions", None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_validates_payload_and_credentials() {
    let app = app(seeded_backend());

    let response = send(
        &app,
        json_request("POST", "/api/auth/login", None, Some(json!({ "email": "not-an-email", "password": "x" }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["details"]["email"].is_array());

    let response = send(
        &app,
        json_request("POST", "/api/auth/login", None, Some(json!({ "email": "c1@dmhca.in", "password": "wrong-pass" }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        json_request("POST", "/api/auth/login", None, Some(json!({ "email": "inactive@dmhca.in", "password": common::PASSWORD }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_hydrated_user() {
    let app = app(seeded_backend());
    let response = send(
        &app,
        json_request("POST", "/api/auth/login", None, Some(json!({ "email": "lead@dmhca.in", "password": common::PASSWORD }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["user"]["role"], "team_lead");
    assert_eq!(body["user"]["teamMembers"], json!(["c1"]));
    assert_eq!(body["user"]["permissions"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn session_routes_require_a_token() {
    let app = app(seeded_backend());

    let response = send(&app, json_request("GET", "/api/users/me", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, json_request("GET", "/api/leads", Some("garbage"), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lead_visibility_scenario_over_http() {
    let app = app(seeded_backend());

    let manager = login(&app, "manager@dmhca.in").await;
    let response = send(&app, json_request("GET", "/api/leads", Some(&manager), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(lead_ids(&body).len(), 10);
    assert_eq!(body["pagination"]["total"], 10);

    let team_lead = login(&app, "lead@dmhca.in").await;
    let body = read_json(send(&app, json_request("GET", "/api/leads", Some(&team_lead), None)).await).await;
    assert_eq!(lead_ids(&body), vec!["l1", "l2", "l6", "l9"]);

    let counselor = login(&app, "c1@dmhca.in").await;
    let body = read_json(send(&app, json_request("GET", "/api/leads", Some(&counselor), None)).await).await;
    assert_eq!(lead_ids(&body), vec!["l1", "l6"]);
}

#[tokio::test]
async fn unknown_role_fails_closed() {
    let app = app(seeded_backend());
    let auditor = login(&app, "auditor@dmhca.in").await;

    // No leads:read grant at all.
    let response = send(&app, json_request("GET", "/api/leads", Some(&auditor), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let snapshot = json!({ "leads": [
        { "id": "l1", "branch": "kashmir", "assignedCounselor": "x1" }
    ]});
    let response = send(&app, json_request("POST", "/api/leads/visible", Some(&auditor), Some(snapshot))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([]));

    let response = send(&app, json_request("GET", "/api/access/me", Some(&auditor), None)).await;
    let body = read_json(response).await;
    assert_eq!(body["role"], "auditor");
    assert_eq!(body["isManager"], false);
    assert_eq!(body["permissions"], json!([]));
}

#[tokio::test]
async fn filter_visible_snapshot_preserves_order() {
    let app = app(seeded_backend());
    let counselor = login(&app, "c1@dmhca.in").await;

    let snapshot = json!({ "leads": [
        { "id": "a", "branch": "delhi", "assignedCounselor": "c1" },
        { "id": "b", "branch": "delhi" },
        { "id": "c", "branch": "kashmir", "assignedCounselor": "c1" },
        { "id": "d", "branch": "delhi", "assignedCounselor": "c1" }
    ]});
    let response = send(&app, json_request("POST", "/api/leads/visible", Some(&counselor), Some(snapshot))).await;
    let body = read_json(response).await;
    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|l| l["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a", "d"]);
}

#[tokio::test]
async fn permission_checks_follow_role_table() {
    let app = app(seeded_backend());
    let manager = login(&app, "manager@dmhca.in").await;
    let counselor = login(&app, "c1@dmhca.in").await;

    let cases = [
        (&manager, json!({ "resource": "leads", "action": "delete" }), true),
        (&counselor, json!({ "resource": "leads", "action": "delete" }), false),
        (&counselor, json!({ "resource": "leads", "action": "update", "scope": "own" }), true),
        (&counselor, json!({ "resource": "leads", "action": "update", "scope": "team" }), false),
        (&counselor, json!({ "resource": "courses", "action": "read", "scope": "team" }), true),
        (&counselor, json!({ "resource": "payroll", "action": "read" }), false),
        // A scope outside the known set is covered only by an `all` grant.
        (&counselor, json!({ "resource": "leads", "action": "read", "scope": "galaxy" }), false),
        (&counselor, json!({ "resource": "courses", "action": "read", "scope": "galaxy" }), true),
        (&manager, json!({ "resource": "leads", "action": "read", "scope": "galaxy" }), true),
        (&manager, json!({ "resource": "leads", "action": "teleport" }), false),
    ];

    for (token, payload, expected) in cases {
        let response = send(&app, json_request("POST", "/api/access/check", Some(token), Some(payload.clone()))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["allowed"], expected, "check {payload}");
    }

    let response = send(&app, json_request("GET", "/api/access/resources/users", Some(&counselor), None)).await;
    assert_eq!(read_json(response).await["accessible"], false);
    let response = send(&app, json_request("GET", "/api/access/resources/users", Some(&manager), None)).await;
    assert_eq!(read_json(response).await["accessible"], true);
}

#[tokio::test]
async fn user_directory_is_scoped_and_links_are_reported_to_managers() {
    let app = app(seeded_backend());

    let counselor = login(&app, "c1@dmhca.in").await;
    let response = send(&app, json_request("GET", "/api/users", Some(&counselor), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let team_lead = login(&app, "lead@dmhca.in").await;
    let body = read_json(send(&app, json_request("GET", "/api/users", Some(&team_lead), None)).await).await;
    let ids: Vec<&str> = body["data"].as_array().unwrap().iter().map(|u| u["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["c1", "t1"]);
    assert!(body.get("linkViolations").is_none());

    let manager = login(&app, "manager@dmhca.in").await;
    let body = read_json(send(&app, json_request("GET", "/api/users", Some(&manager), None)).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 6);
    // c3 points at the manager as its team lead.
    assert_eq!(
        body["linkViolations"],
        json!([{ "kind": "not_a_team_lead", "counselor_id": "c3", "team_lead_id": "m1" }])
    );
}

#[tokio::test]
async fn logout_ends_the_session() {
    let backend = seeded_backend();
    let app = app(backend.clone());
    let token = login(&app, "c1@dmhca.in").await;

    let response = send(&app, json_request("GET", "/api/users/me", Some(&token), None)).await;
    assert_eq!(read_json(response).await["id"], "c1");

    let response = send(&app, json_request("POST", "/api/auth/logout", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(backend.logouts.lock().unwrap().as_slice(), ["backend-c1".to_string()]);

    let response = send(&app, json_request("GET", "/api/users/me", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_replaces_the_profile() {
    let backend = seeded_backend();
    let app = app(backend.clone());
    let token = login(&app, "c1@dmhca.in").await;

    backend.rename_user("c1", "Chitra Rao");
    let response = send(&app, json_request("POST", "/api/auth/refresh", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["name"], "Chitra Rao");

    let response = send(&app, json_request("GET", "/api/users/me", Some(&token), None)).await;
    assert_eq!(read_json(response).await["name"], "Chitra Rao");
}

#[tokio::test]
async fn refresh_of_a_deactivated_account_ends_the_session() {
    let backend = seeded_backend();
    let app = app(backend.clone());
    let token = login(&app, "c1@dmhca.in").await;

    backend.deactivate_user("c1");
    let response = send(&app, json_request("POST", "/api/auth/refresh", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, json_request("GET", "/api/leads", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn failed_refresh_ends_the_session() {
    let backend = seeded_backend();
    let app = app(backend.clone());
    let token = login(&app, "c1@dmhca.in").await;

    backend.expire();
    let response = send(&app, json_request("POST", "/api/auth/refresh", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The snapshot filter makes no backend call, so only the gateway session decides.
    let snapshot = json!({ "leads": [] });
    let response = send(&app, json_request("POST", "/api/leads/visible", Some(&token), Some(snapshot))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn backend_expiry_signal_ends_the_session() {
    let backend = seeded_backend();
    let app = app(backend.clone());
    let token = login(&app, "lead@dmhca.in").await;

    backend.expire();
    let response = send(&app, json_request("GET", "/api/leads", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, json_request("GET", "/api/users/me", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lead_filters_are_forwarded_to_the_backend() {
    let backend = seeded_backend();
    let app = app(backend.clone());
    let token = login(&app, "manager@dmhca.in").await;

    let response = send(
        &app,
        json_request("GET", "/api/leads?page=2&status=hot&status=warm&branch=delhi&assignedTo=c1", Some(&token), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let query = backend.last_query.lock().unwrap().clone().expect("query forwarded");
    assert_eq!(query.page, Some(2));
    assert_eq!(query.status, vec!["hot".to_string(), "warm".to_string()]);
    assert_eq!(query.branch, vec!["delhi".to_string()]);
    assert_eq!(query.assigned_to, vec!["c1".to_string()]);
}
