// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end subscription routes against the Firestore emulator.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use runlog_api::db::ProfileStore;
use runlog_api::models::UserProfile;
use serde_json::Value;
use tower::ServiceExt;

mod common;
use common::{create_test_app_with_db, create_test_jwt, test_db, unique_user_id};

async fn call(app: &Router, method: &str, uri: &str, user_id: &str, body: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", create_test_jwt(user_id)));
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn expired_trial_user(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: Some(format!("{}@example.com", id)),
        status: "premium".to_string(),
        plan: Some("trial".to_string()),
        subscribed_at: Some("2024-01-01T00:00:00Z".to_string()),
        expires_at: Some("2024-01-08T00:00:00Z".to_string()),
        created_at: Some("2024-01-01T00:00:00Z".to_string()),
        ..UserProfile::default()
    }
}

#[tokio::test]
async fn test_me_expires_trial_then_downgrade() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("me");
    db.upsert_profile(&expired_trial_user(&user_id)).await.unwrap();
    let (app, _) = create_test_app_with_db(db);

    let response = call(&app, "GET", "/api/me", &user_id, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["subscription"]["tier"], "expired_trial");
    assert_eq!(body["subscription"]["expired"], true);
    assert_eq!(body["profile"]["status"], "expired_trial");

    // Premium features are closed.
    let response = call(&app, "GET", "/api/goals", &user_id, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = call(&app, "POST", "/api/subscription/downgrade", &user_id, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["subscription"]["tier"], "free");
    assert_eq!(body["profile"]["plano"], "gratuito");

    // Only an expired trial can be downgraded.
    let response = call(&app, "POST", "/api/subscription/downgrade", &user_id, None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_first_me_creates_free_profile() {
    require_emulator!();

    let db = test_db().await;
    let (app, _) = create_test_app_with_db(db.clone());
    let user_id = unique_user_id("signup");

    let response = call(&app, "GET", "/api/me", &user_id, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["profile"]["status"], "free");
    assert_eq!(body["profile"]["plano"], "gratuito");
    assert_eq!(body["profile"]["email"], "runner@example.com");
    assert_eq!(body["subscription"]["tier"], "free");
    assert_eq!(body["subscription"]["has_premium_access"], false);

    let stored = db.get_profile(&user_id).await.unwrap().expect("profile created");
    assert_eq!(stored.status, "free");
    assert!(stored.created_at.is_some());
    let listed = db.list_profiles().await.unwrap();
    assert!(listed.iter().any(|p| p.id == user_id));

    // Second visit reads the same profile back.
    let response = call(&app, "GET", "/api/me", &user_id, None).await;
    let body = json(response).await;
    assert_eq!(body["profile"]["criado_em"], stored.created_at.unwrap().as_str());
}

#[tokio::test]
async fn test_free_account_weekly_run_limit() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("free");
    db.upsert_profile(&UserProfile::new_free(&user_id, None, chrono::Utc::now()))
        .await
        .unwrap();
    let (app, _) = create_test_app_with_db(db);

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let run = format!(r#"{{"data": "{}", "distancia_km": 5.0, "tempo_min": 30}}"#, today);

    for _ in 0..3 {
        let response = call(&app, "POST", "/api/runs", &user_id, Some(&run)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = call(&app, "POST", "/api/runs", &user_id, Some(&run)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = call(&app, "GET", "/api/stats", &user_id, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["stats"]["runs_this_week"], 3);
    assert_eq!(body["runs_left_this_week"], 0);
    assert!(body["progress"].is_null());
}

#[tokio::test]
async fn test_admin_routes_require_admin_flag() {
    require_emulator!();

    let db = test_db().await;
    let admin_id = unique_user_id("admin");
    let member_id = unique_user_id("member");
    db.upsert_profile(&UserProfile {
        admin: true,
        ..UserProfile::new_free(&admin_id, None, chrono::Utc::now())
    })
    .await
    .unwrap();
    db.upsert_profile(&UserProfile::new_free(&member_id, None, chrono::Utc::now()))
        .await
        .unwrap();
    let (app, _) = create_test_app_with_db(db);

    let response = call(&app, "GET", "/api/admin/users", &member_id, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = call(&app, "GET", "/api/admin/users?plan=todos", &admin_id, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/admin/users/{}/trial", member_id);
    let response = call(&app, "POST", &uri, &admin_id, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["tier"], "active_trial");

    // The member now sees the trial.
    let response = call(&app, "GET", "/api/me", &member_id, None).await;
    let body = json(response).await;
    assert_eq!(body["subscription"]["tier"], "active_trial");
    assert_eq!(body["subscription"]["days_remaining"], 7);
}
