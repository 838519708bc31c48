// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin routes: user listing and trial grants.
//!
//! Mounted behind both `require_auth` and `require_admin`.

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::services::admin::{build_listing, AdminFilter, AdminSummary, AdminUserRow};
use crate::services::TransitionApplier;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}/trial", post(grant_trial))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminUsersResponse {
    pub users: Vec<AdminUserRow>,
    pub summary: AdminSummary,
}

/// All accounts, newest first, with optional filters.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Query(filter): Query<AdminFilter>,
) -> Result<Json<AdminUsersResponse>> {
    tracing::debug!(admin_id = %admin.user_id, ?filter, "Listing users");

    let profiles = state.db.list_profiles().await?;
    let (users, summary) = build_listing(profiles, &filter, Utc::now());

    Ok(Json(AdminUsersResponse { users, summary }))
}

/// Start a 7-day trial for a user.
async fn grant_trial(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> Result<Json<AdminUserRow>> {
    let mut profile = state
        .db
        .get_profile(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let now = Utc::now();
    let update = TransitionApplier::new(&state.db)
        .grant_trial(&user_id, now)
        .await?;
    profile.apply(&update);
    state.invalidate_profile(&user_id);

    tracing::info!(admin_id = %admin.user_id, user_id = %user_id, "Trial granted");
    Ok(Json(AdminUserRow::new(profile, now)))
}
