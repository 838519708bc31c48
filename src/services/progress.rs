// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal progress arithmetic.

use crate::models::{Goals, RunStats};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Percentage of `goal` covered by `current`, capped at 100.
///
/// A goal of zero (or less) is "not set" and reports 0.
pub fn progress_percent(current: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (current / goal * 100.0).min(100.0)
}

/// Progress toward a single distance goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalProgress {
    pub current_km: f64,
    pub goal_km: f64,
    pub percent: f64,
    pub remaining_km: f64,
    pub reached: bool,
}

impl GoalProgress {
    pub fn new(current_km: f64, goal_km: f64) -> Self {
        Self {
            current_km,
            goal_km,
            percent: progress_percent(current_km, goal_km),
            remaining_km: (goal_km - current_km).max(0.0),
            reached: goal_km > 0.0 && current_km >= goal_km,
        }
    }
}

/// Progress for all three goal periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalsProgress {
    pub weekly: GoalProgress,
    pub monthly: GoalProgress,
    pub yearly: GoalProgress,
}

impl GoalsProgress {
    pub fn compute(goals: &Goals, stats: &RunStats) -> Self {
        Self {
            weekly: GoalProgress::new(stats.this_week, goals.weekly_km),
            monthly: GoalProgress::new(stats.this_month, goals.monthly_km),
            yearly: GoalProgress::new(stats.this_year, goals.yearly_km),
        }
    }
}
