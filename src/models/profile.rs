// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model as stored in the `users` collection.
//!
//! Field names on disk are the store's column names (`plano`, `assinou_em`,
//! ...). Status, plan and timestamps are kept as raw strings so that a
//! malformed record still loads; interpretation happens in
//! [`crate::services::tier`] and [`crate::services::expiration`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored account status values.
pub mod status {
    pub const FREE: &str = "free";
    pub const PREMIUM: &str = "premium";
    pub const EXPIRED_TRIAL: &str = "expired_trial";
    /// Legacy lifetime purchase, equivalent to `premium`.
    pub const LIFETIME: &str = "vitalicio";
}

/// Stored plan values.
pub mod plan {
    pub const FREE: &str = "gratuito";
    pub const TRIAL: &str = "trial";
    pub const MONTHLY: &str = "premium-mensal";
    pub const YEARLY: &str = "premium-anual";
    pub const LIFETIME: &str = "vitalicio";
}

/// User profile stored in the external database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Auth provider user ID (also used as document ID)
    #[serde(default, alias = "_firestore_id")]
    pub id: String,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Raw account status (`free`, `premium`, `expired_trial`, `vitalicio`)
    #[serde(default)]
    pub status: String,
    /// Raw plan (`gratuito`, `trial`, `premium-mensal`, `premium-anual`)
    #[serde(rename = "plano", default)]
    pub plan: Option<String>,
    /// Start of the current premium/trial period (RFC 3339)
    #[serde(rename = "assinou_em", default)]
    pub subscribed_at: Option<String>,
    /// End of the current premium/trial period (RFC 3339)
    #[serde(rename = "expira_em", default)]
    pub expires_at: Option<String>,
    #[serde(rename = "criado_em", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

impl UserProfile {
    /// A freshly signed-up account on the free plan.
    pub fn new_free(id: impl Into<String>, email: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            email,
            status: status::FREE.to_string(),
            plan: Some(plan::FREE.to_string()),
            created_at: Some(crate::time_utils::format_utc_rfc3339(now)),
            ..Self::default()
        }
    }

    /// Parsed `assinou_em`, or `None` if absent or malformed.
    pub fn subscribed_at_utc(&self) -> Option<DateTime<Utc>> {
        self.subscribed_at
            .as_deref()
            .and_then(crate::time_utils::parse_utc)
    }

    /// Parsed `expira_em`, or `None` if absent or malformed.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        self.expires_at.as_deref().and_then(crate::time_utils::parse_utc)
    }

    /// Parsed `criado_em`, or `None` if absent or malformed.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(crate::time_utils::parse_utc)
    }

    /// Apply a successful partial update to this local copy.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        self.status = update.status.clone();
        if let Some(plan) = &update.plan {
            self.plan = Some(plan.clone());
        }
        if let Some(at) = &update.subscribed_at {
            self.subscribed_at = Some(at.clone());
        }
        if let Some(at) = &update.expires_at {
            self.expires_at = Some(at.clone());
        }
    }
}

/// Order profiles newest account first. Missing or unparseable
/// `criado_em` sorts last.
pub fn sort_newest_first(profiles: &mut [UserProfile]) {
    profiles.sort_by_key(|p| std::cmp::Reverse(p.created_at_utc()));
}

/// Partial profile write. Only `status` is always written; the other
/// fields are written when present and left untouched otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub status: String,
    #[serde(rename = "plano", skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(rename = "assinou_em", skip_serializing_if = "Option::is_none")]
    pub subscribed_at: Option<String>,
    #[serde(rename = "expira_em", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl ProfileUpdate {
    /// Stored field names this update writes, for field-masked updates.
    pub fn field_mask(&self) -> Vec<&'static str> {
        let mut fields = vec!["status"];
        if self.plan.is_some() {
            fields.push("plano");
        }
        if self.subscribed_at.is_some() {
            fields.push("assinou_em");
        }
        if self.expires_at.is_some() {
            fields.push("expira_em");
        }
        fields
    }
}
