// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access tier classification.
//!
//! Every access decision goes through [`classify`]. Raw `status`/`plano`
//! strings are never compared anywhere else. Anything ambiguous resolves
//! to the least-privileged tier.

use crate::models::profile::{plan, status, UserProfile};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Effective access level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Free,
    ActiveTrial,
    ExpiredTrial,
    Premium,
}

impl Tier {
    /// Whether this tier unlocks premium features.
    pub fn has_premium_access(&self) -> bool {
        matches!(self, Tier::ActiveTrial | Tier::Premium)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::ActiveTrial => "active_trial",
            Tier::ExpiredTrial => "expired_trial",
            Tier::Premium => "premium",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized stored account statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Free,
    Premium,
    ExpiredTrial,
    /// Legacy lifetime purchase; treated as `Premium`.
    Lifetime,
}

impl AccountStatus {
    /// Parse a stored status. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            status::FREE => Some(Self::Free),
            status::PREMIUM => Some(Self::Premium),
            status::EXPIRED_TRIAL => Some(Self::ExpiredTrial),
            status::LIFETIME => Some(Self::Lifetime),
            _ => None,
        }
    }

    fn is_premium(&self) -> bool {
        matches!(self, Self::Premium | Self::Lifetime)
    }
}

/// Recognized stored plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Free,
    Trial,
    Monthly,
    Yearly,
    Lifetime,
}

impl Plan {
    /// Parse a stored plan. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            plan::FREE => Some(Self::Free),
            plan::TRIAL => Some(Self::Trial),
            plan::MONTHLY => Some(Self::Monthly),
            plan::YEARLY => Some(Self::Yearly),
            plan::LIFETIME => Some(Self::Lifetime),
            _ => None,
        }
    }
}

/// Derive the effective tier from a stored profile.
///
/// An absent profile is `Free`. This does not look at the clock: a trial
/// past its deadline still classifies as `ActiveTrial` until the
/// expiration monitor has recorded `expired_trial`.
pub fn classify(profile: Option<&UserProfile>) -> Tier {
    let Some(profile) = profile else {
        return Tier::Free;
    };

    match AccountStatus::parse(&profile.status) {
        Some(AccountStatus::ExpiredTrial) => Tier::ExpiredTrial,
        Some(s) if s.is_premium() => {
            let plan = profile.plan.as_deref().and_then(Plan::parse);
            if plan == Some(Plan::Trial) {
                Tier::ActiveTrial
            } else {
                Tier::Premium
            }
        }
        _ => Tier::Free,
    }
}
