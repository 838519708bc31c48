// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Runlog: a running log with free, trial and premium accounts.
//!
//! This crate provides the backend API: run logging, distance goals,
//! subscription tier classification and trial expiration.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use chrono::Utc;
use config::Config;
use db::FirestoreDb;
use error::Result;
use models::UserProfile;
use services::{subscription, CacheCheckout, CheckTrigger, ProfileCacheMap, SubscriptionView};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    /// One profile cache slot per user ID.
    pub profile_cache: ProfileCacheMap,
}

impl AppState {
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        Self {
            config,
            db,
            profile_cache: ProfileCacheMap::default(),
        }
    }

    /// Write a checked-out slot back unless another request got there first.
    fn commit_cache_slot(&self, user_id: &str, checkout: CacheCheckout) {
        if !self.profile_cache.commit(user_id, checkout) {
            tracing::debug!(user_id, "Profile cache slot changed during request, not storing");
        }
    }

    /// Load the user's profile and run the expiration check for `trigger`.
    pub async fn refresh_subscription(
        &self,
        user_id: &str,
        trigger: CheckTrigger,
    ) -> Result<(Option<UserProfile>, SubscriptionView)> {
        let mut checkout = self.profile_cache.checkout(user_id);
        let result = subscription::refresh(
            &mut checkout.slot,
            &self.db,
            user_id,
            self.config.profile_cache_max_age(),
            Utc::now(),
            trigger,
        )
        .await;
        self.commit_cache_slot(user_id, checkout);
        result
    }

    /// Load the signed-in user's profile, creating a free one on first login.
    pub async fn load_profile(
        &self,
        user_id: &str,
        email: Option<String>,
    ) -> Result<(UserProfile, SubscriptionView)> {
        let mut checkout = self.profile_cache.checkout(user_id);
        let result = subscription::load_or_create(
            &mut checkout.slot,
            &self.db,
            user_id,
            email,
            self.config.profile_cache_max_age(),
            Utc::now(),
        )
        .await;
        self.commit_cache_slot(user_id, checkout);
        result
    }

    /// Move an expired trial to the free plan.
    pub async fn continue_with_free(
        &self,
        user_id: &str,
    ) -> Result<(UserProfile, SubscriptionView)> {
        let mut checkout = self.profile_cache.checkout(user_id);
        let result =
            subscription::continue_with_free(&mut checkout.slot, &self.db, user_id, Utc::now())
                .await;
        self.commit_cache_slot(user_id, checkout);
        result
    }

    /// Drop a cached profile after an out-of-band change (admin writes).
    ///
    /// Requests already in flight for this user will not store their copy.
    pub fn invalidate_profile(&self, user_id: &str) {
        self.profile_cache.invalidate(user_id);
    }
}
