// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trial expiration detection.
//!
//! The deadline is the stored `expira_em`. When it is missing the trial
//! is assumed to end [`TRIAL_LENGTH_DAYS`] after `assinou_em`. With
//! neither, a trial never expires: expiry needs a deadline in the past.
//!
//! Checks run only on discrete triggers ([`CheckTrigger`]), never on a
//! timer.

use crate::db::ProfileStore;
use crate::error::Result;
use crate::models::UserProfile;
use crate::services::tier::{classify, AccountStatus, Tier};
use crate::services::transition::TransitionApplier;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Trial length used when only the start of the trial is recorded.
pub const TRIAL_LENGTH_DAYS: i64 = 7;

/// Event that caused an expiration check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckTrigger {
    /// Profile was (re)loaded.
    ProfileLoad,
    /// The client view came back to the foreground.
    #[serde(alias = "visibility")]
    VisibilityRegained,
    /// The user asked to retry.
    #[serde(alias = "retry")]
    UserRetry,
}

impl CheckTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckTrigger::ProfileLoad => "profile_load",
            CheckTrigger::VisibilityRegained => "visibility_regained",
            CheckTrigger::UserRetry => "user_retry",
        }
    }
}

/// Instant after which the trial counts as expired, if one is known.
pub fn trial_deadline(profile: &UserProfile) -> Option<DateTime<Utc>> {
    profile.expires_at_utc().or_else(|| {
        profile
            .subscribed_at_utc()
            .map(|start| start + Duration::days(TRIAL_LENGTH_DAYS))
    })
}

/// Whether an active trial has passed its deadline at `now`.
///
/// The deadline instant itself is still inside the trial. A trial with no
/// usable `assinou_em` is never evaluated, even if `expira_em` is set.
pub fn is_trial_expired(profile: &UserProfile, now: DateTime<Utc>) -> bool {
    if classify(Some(profile)) != Tier::ActiveTrial {
        return false;
    }
    if profile.subscribed_at_utc().is_none() {
        return false;
    }
    match trial_deadline(profile) {
        Some(deadline) => now > deadline,
        None => false,
    }
}

/// Whole days left in an active trial, rounded up and floored at zero.
pub fn days_remaining(profile: &UserProfile, now: DateTime<Utc>) -> Option<i64> {
    if classify(Some(profile)) != Tier::ActiveTrial {
        return None;
    }
    let deadline = trial_deadline(profile)?;
    let left_ms = (deadline - now).num_milliseconds();
    if left_ms <= 0 {
        return Some(0);
    }
    let day_ms = Duration::days(1).num_milliseconds();
    Some((left_ms + day_ms - 1) / day_ms)
}

/// Outcome of one expiration check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationCheck {
    /// The trial's deadline has passed.
    pub expired: bool,
    /// This check persisted `expired_trial`.
    pub transitioned: bool,
    /// Tier of the local profile after the check.
    pub tier: Tier,
}

/// Runs expiration checks and persists the trial → expired transition.
pub struct ExpirationMonitor<'a, S> {
    store: &'a S,
}

impl<'a, S: ProfileStore> ExpirationMonitor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Evaluate `profile` at `now`.
    ///
    /// On a newly detected expiry for a profile still recorded as premium,
    /// writes `expired_trial` once and then updates `profile` in place.
    /// If the write fails the error is returned and `profile` is left as
    /// it was.
    pub async fn check(
        &self,
        profile: &mut UserProfile,
        now: DateTime<Utc>,
        trigger: CheckTrigger,
    ) -> Result<ExpirationCheck> {
        let expired = is_trial_expired(profile, now);
        let still_premium = AccountStatus::parse(&profile.status)
            .is_some_and(|s| matches!(s, AccountStatus::Premium | AccountStatus::Lifetime));

        let transitioned = if expired && still_premium {
            tracing::info!(
                user_id = %profile.id,
                trigger = trigger.as_str(),
                deadline = ?trial_deadline(profile),
                "Trial expired, recording expiration"
            );
            let update = TransitionApplier::new(self.store)
                .expire_trial(&profile.id)
                .await?;
            profile.apply(&update);
            true
        } else {
            false
        };

        let tier = classify(Some(profile));
        tracing::debug!(
            user_id = %profile.id,
            trigger = trigger.as_str(),
            expired,
            transitioned,
            tier = %tier,
            "Expiration check complete"
        );

        Ok(ExpirationCheck {
            expired,
            transitioned,
            tier,
        })
    }
}
