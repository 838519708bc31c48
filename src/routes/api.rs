// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::stats::start_of_week;
use crate::models::{Goals, NewRun, Run, RunStats, UserProfile};
use crate::services::entitlements;
use crate::services::progress::GoalsProgress;
use crate::services::{CheckTrigger, SubscriptionView, Tier};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/subscription/check", post(check_subscription))
        .route("/api/subscription/downgrade", post(downgrade_to_free))
        .route("/api/runs", get(list_runs).post(create_run))
        .route("/api/goals", get(get_goals).put(put_goals))
        .route("/api/stats", get(get_stats))
}

/// Current tier of the user, with the expiration check applied.
async fn current_tier(state: &AppState, user: &AuthUser) -> Result<Tier> {
    let (_, view) = state
        .refresh_subscription(&user.user_id, CheckTrigger::ProfileLoad)
        .await?;
    Ok(view.tier)
}

fn premium_required(feature: &str) -> AppError {
    AppError::Forbidden(format!("{} requires a premium or trial account", feature))
}

// ─── Profile & Subscription ──────────────────────────────────

/// Profile plus subscription state.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub user_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub profile: Option<UserProfile>,
    pub subscription: SubscriptionView,
}

/// Get current user profile. Runs the expiration check.
///
/// First call after signup creates the free profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let (profile, subscription) = state
        .load_profile(&user.user_id, user.email.clone())
        .await?;

    Ok(Json(MeResponse {
        user_id: user.user_id,
        profile: Some(profile),
        subscription,
    }))
}

#[derive(Deserialize)]
struct CheckRequest {
    trigger: CheckTrigger,
}

/// Re-run the expiration check for a client event (tab visible again, retry).
async fn check_subscription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CheckRequest>,
) -> Result<Json<MeResponse>> {
    tracing::debug!(
        user_id = %user.user_id,
        trigger = body.trigger.as_str(),
        "Subscription check requested"
    );

    let (profile, subscription) = state
        .refresh_subscription(&user.user_id, body.trigger)
        .await?;

    Ok(Json(MeResponse {
        user_id: user.user_id,
        profile,
        subscription,
    }))
}

/// "Continue with the free plan" after a trial ran out.
async fn downgrade_to_free(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let (profile, subscription) = state.continue_with_free(&user.user_id).await?;

    Ok(Json(MeResponse {
        user_id: user.user_id,
        profile: Some(profile),
        subscription,
    }))
}

// ─── Runs ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RunsQuery {
    /// Pagination: page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    50
}

const MAX_PER_PAGE: u32 = 100;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunsResponse {
    pub runs: Vec<RunSummary>,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunSummary {
    pub id: String,
    pub date: String,
    pub distance_km: f64,
    pub duration_min: u32,
    pub pace_min_per_km: f64,
    pub notes: Option<String>,
}

impl From<Run> for RunSummary {
    fn from(run: Run) -> Self {
        let pace_min_per_km = run.pace_min_per_km();
        Self {
            id: run.id,
            date: run.date,
            distance_km: run.distance_km,
            duration_min: run.duration_min,
            pace_min_per_km,
            notes: run.notes,
        }
    }
}

/// Run history, newest first. Premium feature.
async fn list_runs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RunsQuery>,
) -> Result<Json<RunsResponse>> {
    if params.page < 1 {
        return Err(AppError::BadRequest("Page must be greater than 0".to_string()));
    }
    let limit = params.per_page.clamp(1, MAX_PER_PAGE);
    let offset = (params.page - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))?;

    if !entitlements::can_view_history(current_tier(&state, &user).await?) {
        return Err(premium_required("Run history"));
    }

    tracing::debug!(user_id = %user.user_id, page = params.page, "Fetching runs");

    let runs = state
        .db
        .list_runs_for_user(&user.user_id, limit, offset)
        .await?;

    Ok(Json(RunsResponse {
        runs: runs.into_iter().map(RunSummary::from).collect(),
        page: params.page,
        per_page: limit,
    }))
}

/// First day whose runs count toward the dashboard totals.
fn stats_window_start(now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
    start_of_week(today).min(year_start)
}

async fn current_stats(state: &AppState, user_id: &str, now: DateTime<Utc>) -> Result<RunStats> {
    let since = stats_window_start(now).format("%Y-%m-%d").to_string();
    let runs = state.db.list_runs_since(user_id, &since).await?;
    Ok(RunStats::from_runs(&runs, now))
}

/// Log a run. Free accounts are limited per week.
async fn create_run(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<NewRun>,
) -> Result<(StatusCode, Json<RunSummary>)> {
    body.validate()?;

    let now = Utc::now();
    let tier = current_tier(&state, &user).await?;

    if !tier.has_premium_access() {
        let stats = current_stats(&state, &user.user_id, now).await?;
        if !entitlements::can_log_run(tier, stats.runs_this_week) {
            tracing::info!(
                user_id = %user.user_id,
                tier = tier.as_str(),
                runs_this_week = stats.runs_this_week,
                "Weekly run limit reached"
            );
            return Err(AppError::Forbidden(format!(
                "Free accounts can log {} runs per week",
                entitlements::FREE_WEEKLY_RUN_LIMIT
            )));
        }
    }

    let run = body.into_run(
        uuid::Uuid::new_v4().to_string(),
        user.user_id.clone(),
        format_utc_rfc3339(now),
    );
    state.db.add_run(&run).await?;

    tracing::info!(user_id = %user.user_id, run_id = %run.id, "Run logged");
    Ok((StatusCode::CREATED, Json(RunSummary::from(run))))
}

// ─── Goals ───────────────────────────────────────────────────

/// Current goals, or `null` if never set. Premium feature.
async fn get_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Option<Goals>>> {
    if !entitlements::can_use_goals(current_tier(&state, &user).await?) {
        return Err(premium_required("Goals"));
    }
    Ok(Json(state.db.get_goals(&user.user_id).await?))
}

async fn put_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(goals): Json<Goals>,
) -> Result<Json<Goals>> {
    goals.validate()?;
    if !entitlements::can_use_goals(current_tier(&state, &user).await?) {
        return Err(premium_required("Goals"));
    }
    state.db.set_goals(&user.user_id, &goals).await?;
    tracing::info!(user_id = %user.user_id, "Goals updated");
    Ok(Json(goals))
}

// ─── Stats ───────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsResponse {
    pub stats: RunStats,
    /// `None` for unlimited accounts.
    pub runs_left_this_week: Option<u32>,
    /// Only for premium accounts with goals set.
    pub progress: Option<GoalsProgress>,
}

/// Dashboard totals for the current week, month and year.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>> {
    let now = Utc::now();
    let tier = current_tier(&state, &user).await?;
    let stats = current_stats(&state, &user.user_id, now).await?;

    let progress = if entitlements::can_use_goals(tier) {
        state
            .db
            .get_goals(&user.user_id)
            .await?
            .map(|goals| GoalsProgress::compute(&goals, &stats))
    } else {
        None
    };

    Ok(Json(StatsResponse {
        stats,
        runs_left_this_week: entitlements::runs_left_this_week(tier, stats.runs_this_week),
        progress,
    }))
}
