// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Short-lived, caller-owned profile cache.
//!
//! The cache is a plain value: whoever holds the `Option<CachedProfile>`
//! owns it, and freshness is decided by the `max_age` and `now` passed in.

use crate::db::ProfileStore;
use crate::error::Result;
use crate::models::UserProfile;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Default maximum age of a cached profile.
pub const DEFAULT_MAX_AGE_SECS: i64 = 10 * 60;

/// A profile and the time it was read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedProfile {
    pub value: UserProfile,
    pub fetched_at: DateTime<Utc>,
}

impl CachedProfile {
    pub fn new(value: UserProfile, fetched_at: DateTime<Utc>) -> Self {
        Self { value, fetched_at }
    }

    pub fn is_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now - self.fetched_at <= max_age
    }
}

/// Return the cached profile if fresh, otherwise read it from the store.
///
/// A failed read leaves `cache` untouched. A profile that no longer exists
/// clears the cache.
pub async fn get_or_fetch<S: ProfileStore>(
    cache: &mut Option<CachedProfile>,
    store: &S,
    user_id: &str,
    max_age: Duration,
    now: DateTime<Utc>,
) -> Result<Option<UserProfile>> {
    if let Some(cached) = cache.as_ref() {
        if cached.value.id == user_id && cached.is_fresh(max_age, now) {
            tracing::debug!(user_id, "Profile served from cache");
            return Ok(Some(cached.value.clone()));
        }
    }

    let fetched = store.get_profile(user_id).await?;
    *cache = fetched
        .as_ref()
        .map(|profile| CachedProfile::new(profile.clone(), now));

    tracing::debug!(user_id, found = fetched.is_some(), "Profile fetched from store");
    Ok(fetched)
}

/// Per-user cache slots shared by concurrent requests.
///
/// A request checks a slot out, works on its own copy across awaits, then
/// commits it back. The commit only lands if nobody committed or
/// invalidated the slot in between; otherwise the newer state wins.
#[derive(Debug, Default)]
pub struct ProfileCacheMap {
    slots: DashMap<String, Slot>,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u64,
    cached: Option<CachedProfile>,
}

/// A request's working copy of one user's slot.
#[derive(Debug, Clone)]
pub struct CacheCheckout {
    generation: u64,
    pub slot: Option<CachedProfile>,
}

impl ProfileCacheMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checkout(&self, user_id: &str) -> CacheCheckout {
        match self.slots.get(user_id) {
            Some(entry) => CacheCheckout {
                generation: entry.generation,
                slot: entry.cached.clone(),
            },
            None => CacheCheckout {
                generation: 0,
                slot: None,
            },
        }
    }

    /// Write `checkout` back. Returns `false` (and writes nothing) if the
    /// slot changed since it was checked out.
    pub fn commit(&self, user_id: &str, checkout: CacheCheckout) -> bool {
        let mut entry = self.slots.entry(user_id.to_string()).or_default();
        if entry.generation != checkout.generation {
            return false;
        }
        entry.generation += 1;
        entry.cached = checkout.slot;
        true
    }

    /// Drop the cached profile and void any checkout in flight.
    pub fn invalidate(&self, user_id: &str) {
        let mut entry = self.slots.entry(user_id.to_string()).or_default();
        entry.generation += 1;
        entry.cached = None;
    }

    /// Current cached profile, if any.
    pub fn get(&self, user_id: &str) -> Option<CachedProfile> {
        self.slots.get(user_id).and_then(|entry| entry.cached.clone())
    }
}
