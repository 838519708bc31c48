// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Running totals for the dashboard.
//!
//! Computed from the user's runs on each request rather than stored: runs
//! are append-only and a user's list is small.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Run;
use crate::time_utils::parse_run_date;

/// Distance totals (km) for the current week, month and year.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunStats {
    pub this_week: f64,
    pub this_month: f64,
    pub this_year: f64,
    pub runs_this_week: u32,
}

impl RunStats {
    /// Aggregate `runs` relative to `now` (UTC).
    ///
    /// Weeks start on Sunday. Runs with an unparseable date are skipped.
    pub fn from_runs<'a, I>(runs: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Run>,
    {
        let today = now.date_naive();
        let week_start = start_of_week(today);
        let mut stats = Self::default();

        for run in runs {
            let Some(date) = parse_run_date(&run.date) else {
                tracing::debug!(run_id = %run.id, date = %run.date, "Skipping run with bad date");
                continue;
            };

            if date >= week_start {
                stats.this_week += run.distance_km;
                stats.runs_this_week += 1;
            }
            if date.year() == today.year() {
                stats.this_year += run.distance_km;
                if date.month() == today.month() {
                    stats.this_month += run.distance_km;
                }
            }
        }

        stats
    }
}

/// The Sunday on or before `day`.
pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_sunday() as i64)
}
