// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process profile store for tests and offline development.

use crate::db::ProfileStore;
use crate::error::AppError;
use crate::models::profile::sort_newest_first;
use crate::models::{ProfileUpdate, UserProfile};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// DashMap-backed [`ProfileStore`].
///
/// Records every successful update so callers can assert on the exact
/// writes made. Clones share the same underlying data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    profiles: Arc<DashMap<String, UserProfile>>,
    updates: Arc<Mutex<Vec<(String, ProfileUpdate)>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a whole profile.
    pub fn insert(&self, profile: UserProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    /// Current stored copy of a profile.
    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.get(user_id).map(|p| p.clone())
    }

    /// Successful updates, oldest first.
    pub fn updates(&self) -> Vec<(String, ProfileUpdate)> {
        self.updates
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Make subsequent reads fail with a database error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail with a database error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl ProfileStore for MemoryDb {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database("read failed (injected)".to_string()));
        }
        Ok(self.profile(user_id))
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("write failed (injected)".to_string()));
        }

        // Masked writes create the document if needed, as Firestore does.
        self.profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile {
                id: user_id.to_string(),
                ..UserProfile::default()
            })
            .apply(update);

        if let Ok(mut log) = self.updates.lock() {
            log.push((user_id.to_string(), update.clone()));
        }
        Ok(())
    }

    async fn create_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("write failed (injected)".to_string()));
        }
        self.insert(profile.clone());
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database("read failed (injected)".to_string()));
        }
        let mut profiles: Vec<UserProfile> =
            self.profiles.iter().map(|entry| entry.value().clone()).collect();
        sort_newest_first(&mut profiles);
        Ok(profiles)
    }
}
