// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription workflow for a single user:
//! 1. Load the profile (through the caller's cache)
//! 2. Run the expiration check for the triggering event
//! 3. Keep the cache in step with any transition that was written
//! 4. Report the resulting subscription view

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::services::expiration::{days_remaining, trial_deadline, CheckTrigger, ExpirationMonitor};
use crate::services::profile_cache::{get_or_fetch, CachedProfile};
use crate::services::tier::{classify, Tier};
use crate::services::transition::TransitionApplier;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// What the client needs to render subscription state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SubscriptionView {
    pub tier: Tier,
    pub expired: bool,
    pub has_premium_access: bool,
    /// Trial deadline (RFC 3339), only for active trials.
    pub deadline: Option<String>,
    pub days_remaining: Option<i64>,
}

impl SubscriptionView {
    pub fn new(profile: Option<&UserProfile>, expired: bool, now: DateTime<Utc>) -> Self {
        let tier = classify(profile);
        let (deadline, days_left) = match profile {
            Some(p) if tier == Tier::ActiveTrial => (
                trial_deadline(p).map(format_utc_rfc3339),
                days_remaining(p, now),
            ),
            _ => (None, None),
        };
        Self {
            tier,
            expired,
            has_premium_access: tier.has_premium_access(),
            deadline,
            days_remaining: days_left,
        }
    }
}

/// Load the profile and run the expiration check for `trigger`.
///
/// `UserRetry` always reads from the store. Returns the profile as it
/// stands after any transition, or `None` if the user has no profile.
pub async fn refresh<S: ProfileStore>(
    cache: &mut Option<CachedProfile>,
    store: &S,
    user_id: &str,
    max_age: Duration,
    now: DateTime<Utc>,
    trigger: CheckTrigger,
) -> Result<(Option<UserProfile>, SubscriptionView)> {
    let max_age = match trigger {
        CheckTrigger::UserRetry => Duration::zero(),
        _ => max_age,
    };

    let Some(mut profile) = get_or_fetch(cache, store, user_id, max_age, now).await? else {
        tracing::warn!(user_id, trigger = trigger.as_str(), "No profile for user");
        return Ok((None, SubscriptionView::new(None, false, now)));
    };

    let check = ExpirationMonitor::new(store)
        .check(&mut profile, now, trigger)
        .await?;

    if check.transitioned {
        if let Some(cached) = cache.as_mut() {
            cached.value = profile.clone();
        }
    }

    let view = SubscriptionView::new(Some(&profile), check.expired, now);
    Ok((Some(profile), view))
}

/// [`refresh`] for a signed-in user, creating a free profile on first login.
///
/// The new profile carries `email` from the session and `criado_em = now`.
pub async fn load_or_create<S: ProfileStore>(
    cache: &mut Option<CachedProfile>,
    store: &S,
    user_id: &str,
    email: Option<String>,
    max_age: Duration,
    now: DateTime<Utc>,
) -> Result<(UserProfile, SubscriptionView)> {
    if let (Some(profile), view) =
        refresh(cache, store, user_id, max_age, now, CheckTrigger::ProfileLoad).await?
    {
        return Ok((profile, view));
    }

    let profile = UserProfile::new_free(user_id, email, now);
    store.create_profile(&profile).await?;
    *cache = Some(CachedProfile::new(profile.clone(), now));
    tracing::info!(user_id, "Profile created");

    let view = SubscriptionView::new(Some(&profile), false, now);
    Ok((profile, view))
}

/// User-initiated move from an expired trial to the free plan.
///
/// Decided on a fresh read; any other tier is a [`AppError::Conflict`].
pub async fn continue_with_free<S: ProfileStore>(
    cache: &mut Option<CachedProfile>,
    store: &S,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<(UserProfile, SubscriptionView)> {
    let mut profile = get_or_fetch(cache, store, user_id, Duration::zero(), now)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user_id)))?;

    let tier = classify(Some(&profile));
    if tier != Tier::ExpiredTrial {
        return Err(AppError::Conflict(format!(
            "Cannot switch to the free plan from tier '{}'",
            tier
        )));
    }

    let update = TransitionApplier::new(store)
        .downgrade_to_free(user_id)
        .await?;
    profile.apply(&update);
    *cache = Some(CachedProfile::new(profile.clone(), now));

    let view = SubscriptionView::new(Some(&profile), false, now);
    Ok((profile, view))
}
