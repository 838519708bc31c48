// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription state transitions persisted to the profile store.
//!
//! Each transition is a single unconditional field-masked write, so
//! retrying one (or racing two identical ones) leaves the same end state.
//! Failures are returned to the caller; nothing here retries.

use crate::db::ProfileStore;
use crate::error::Result;
use crate::models::profile::{plan, status};
use crate::models::ProfileUpdate;
use crate::services::expiration::TRIAL_LENGTH_DAYS;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Duration, Utc};

/// Writes subscription state changes through a [`ProfileStore`].
pub struct TransitionApplier<'a, S> {
    store: &'a S,
}

impl<'a, S: ProfileStore> TransitionApplier<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Record that a trial has run out. Leaves `plano` and `expira_em`
    /// alone so the trial period stays on record.
    pub async fn expire_trial(&self, user_id: &str) -> Result<ProfileUpdate> {
        let update = ProfileUpdate {
            status: status::EXPIRED_TRIAL.to_string(),
            plan: None,
            subscribed_at: None,
            expires_at: None,
        };
        self.apply(user_id, update, "expire_trial").await
    }

    /// User chose to continue on the free plan after an expired trial.
    pub async fn downgrade_to_free(&self, user_id: &str) -> Result<ProfileUpdate> {
        let update = ProfileUpdate {
            status: status::FREE.to_string(),
            plan: Some(plan::FREE.to_string()),
            subscribed_at: None,
            expires_at: None,
        };
        self.apply(user_id, update, "downgrade_to_free").await
    }

    /// Start a trial of the standard length at `now`.
    pub async fn grant_trial(&self, user_id: &str, now: DateTime<Utc>) -> Result<ProfileUpdate> {
        let update = ProfileUpdate {
            status: status::PREMIUM.to_string(),
            plan: Some(plan::TRIAL.to_string()),
            subscribed_at: Some(format_utc_rfc3339(now)),
            expires_at: Some(format_utc_rfc3339(now + Duration::days(TRIAL_LENGTH_DAYS))),
        };
        self.apply(user_id, update, "grant_trial").await
    }

    async fn apply(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        transition: &'static str,
    ) -> Result<ProfileUpdate> {
        if let Err(e) = self.store.update_profile(user_id, &update).await {
            tracing::warn!(user_id, transition, error = %e, "Subscription transition failed");
            return Err(e);
        }

        tracing::info!(
            user_id,
            transition,
            status = %update.status,
            "Subscription transition applied"
        );
        Ok(update)
    }
}
