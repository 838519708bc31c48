// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin user listing: filtering and tier counters.

use crate::models::UserProfile;
use crate::services::expiration::is_trial_expired;
use crate::services::tier::{classify, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Filter values meaning "no filter".
const MATCH_ALL: [&str; 2] = ["todos", "all"];

/// Filters for the admin user list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminFilter {
    /// Case-insensitive substring of the e-mail address.
    pub search: Option<String>,
    /// Exact stored plan.
    pub plan: Option<String>,
    /// Exact stored status.
    pub status: Option<String>,
}

impl AdminFilter {
    pub fn matches(&self, profile: &UserProfile) -> bool {
        let search_ok = match active(&self.search) {
            Some(term) => profile
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&term.to_lowercase())),
            None => true,
        };
        let plan_ok = match active(&self.plan) {
            Some(plan) => profile.plan.as_deref() == Some(plan),
            None => true,
        };
        let status_ok = match active(&self.status) {
            Some(status) => profile.status == status,
            None => true,
        };
        search_ok && plan_ok && status_ok
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !MATCH_ALL.contains(&v.to_lowercase().as_str()))
}

/// Account counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminSummary {
    pub total: u32,
    pub premium: u32,
    pub active_trial: u32,
    pub expired_trial: u32,
    pub free: u32,
}

/// Tier as of `now`: a trial past its deadline counts as expired even
/// before the user's next visit records it.
fn effective_tier(profile: &UserProfile, now: DateTime<Utc>) -> (Tier, bool) {
    if is_trial_expired(profile, now) {
        (Tier::ExpiredTrial, true)
    } else {
        (classify(Some(profile)), false)
    }
}

impl AdminSummary {
    pub fn from_profiles(profiles: &[UserProfile], now: DateTime<Utc>) -> Self {
        let mut summary = Self::default();
        for profile in profiles {
            summary.total += 1;
            match effective_tier(profile, now).0 {
                Tier::Premium => summary.premium += 1,
                Tier::ActiveTrial => summary.active_trial += 1,
                Tier::ExpiredTrial => summary.expired_trial += 1,
                Tier::Free => summary.free += 1,
            }
        }
        summary
    }
}

/// One row of the admin listing.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminUserRow {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: String,
    pub plan: Option<String>,
    pub tier: Tier,
    /// Trial deadline has passed, whether or not the transition is stored yet.
    pub expired: bool,
    pub subscribed_at: Option<String>,
    pub expires_at: Option<String>,
    pub created_at: Option<String>,
    pub admin: bool,
}

impl AdminUserRow {
    pub fn new(p: UserProfile, now: DateTime<Utc>) -> Self {
        let (tier, expired) = effective_tier(&p, now);
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            status: p.status,
            plan: p.plan,
            tier,
            expired,
            subscribed_at: p.subscribed_at,
            expires_at: p.expires_at,
            created_at: p.created_at,
            admin: p.admin,
        }
    }
}

/// Filter `profiles` (already newest first) and count tiers over all of them.
pub fn build_listing(
    profiles: Vec<UserProfile>,
    filter: &AdminFilter,
    now: DateTime<Utc>,
) -> (Vec<AdminUserRow>, AdminSummary) {
    let summary = AdminSummary::from_profiles(&profiles, now);
    let rows = profiles
        .into_iter()
        .filter(|p| filter.matches(p))
        .map(|p| AdminUserRow::new(p, now))
        .collect();
    (rows, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-02-01T00:00:00Z".parse().unwrap()
    }

    fn user(id: &str, email: &str, status: &str, plan: Option<&str>) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            email: Some(email.to_string()),
            status: status.to_string(),
            plan: plan.map(String::from),
            ..UserProfile::default()
        }
    }

    fn sample() -> Vec<UserProfile> {
        vec![
            user("1", "Ana@Example.com", "premium", Some("trial")),
            user("2", "bruno@example.com", "premium", Some("premium-anual")),
            user("3", "carla@test.org", "expired_trial", Some("trial")),
            user("4", "dani@test.org", "free", Some("gratuito")),
            user("5", "eve@test.org", "weird", None),
        ]
    }

    #[test]
    fn test_summary_counts_by_tier() {
        let summary = AdminSummary::from_profiles(&sample(), now());
        assert_eq!(
            summary,
            AdminSummary {
                total: 5,
                premium: 1,
                active_trial: 1,
                expired_trial: 1,
                free: 2,
            }
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = AdminFilter {
            search: Some("ana@".to_string()),
            ..AdminFilter::default()
        };
        let (rows, summary) = build_listing(sample(), &filter, now());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "1");
        assert_eq!(rows[0].tier, Tier::ActiveTrial);
        // Counters ignore the filter.
        assert_eq!(summary.total, 5);
    }

    #[test]
    fn test_plan_and_status_filters() {
        let filter = AdminFilter {
            search: None,
            plan: Some("trial".to_string()),
            status: Some("expired_trial".to_string()),
        };
        let (rows, _) = build_listing(sample(), &filter, now());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "3");
    }

    #[test]
    fn test_todos_means_no_filter() {
        let filter = AdminFilter {
            search: Some("".to_string()),
            plan: Some("todos".to_string()),
            status: Some("all".to_string()),
        };
        let (rows, _) = build_listing(sample(), &filter, now());
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_trial_past_deadline_shows_as_expired() {
        let lapsed = UserProfile {
            subscribed_at: Some("2024-01-01T00:00:00Z".to_string()),
            expires_at: Some("2024-01-08T00:00:00Z".to_string()),
            ..user("6", "fabio@test.org", "premium", Some("trial"))
        };
        let running = UserProfile {
            subscribed_at: Some("2024-01-28T00:00:00Z".to_string()),
            expires_at: Some("2024-02-04T00:00:00Z".to_string()),
            ..user("7", "gil@test.org", "premium", Some("trial"))
        };

        let (rows, summary) =
            build_listing(vec![lapsed, running], &AdminFilter::default(), now());

        assert!(rows[0].expired);
        assert_eq!(rows[0].tier, Tier::ExpiredTrial);
        // Stored status is shown as-is.
        assert_eq!(rows[0].status, "premium");
        assert!(!rows[1].expired);
        assert_eq!(rows[1].tier, Tier::ActiveTrial);
        assert_eq!(summary.expired_trial, 1);
        assert_eq!(summary.active_trial, 1);
    }
}
