// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod admin;
pub mod entitlements;
pub mod expiration;
pub mod profile_cache;
pub mod progress;
pub mod subscription;
pub mod tier;
pub mod transition;

pub use expiration::{CheckTrigger, ExpirationMonitor};
pub use profile_cache::{CacheCheckout, CachedProfile, ProfileCacheMap};
pub use subscription::SubscriptionView;
pub use tier::{classify, Tier};
pub use transition::TransitionApplier;
