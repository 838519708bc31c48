// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! What each tier may do.
//!
//! Free and expired-trial accounts share the free limits.

use crate::services::tier::Tier;

/// Runs a free account may log per week.
pub const FREE_WEEKLY_RUN_LIMIT: u32 = 3;

/// Runs still allowed this week, or `None` when unlimited.
pub fn runs_left_this_week(tier: Tier, runs_this_week: u32) -> Option<u32> {
    if tier.has_premium_access() {
        None
    } else {
        Some(FREE_WEEKLY_RUN_LIMIT.saturating_sub(runs_this_week))
    }
}

pub fn can_log_run(tier: Tier, runs_this_week: u32) -> bool {
    runs_left_this_week(tier, runs_this_week) != Some(0)
}

/// Goals and full run history are premium features.
pub fn can_use_goals(tier: Tier) -> bool {
    tier.has_premium_access()
}

pub fn can_view_history(tier: Tier) -> bool {
    tier.has_premium_access()
}
