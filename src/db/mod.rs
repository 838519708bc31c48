// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore, plus an in-memory store).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{ProfileUpdate, UserProfile};
use std::future::Future;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const RUNS: &str = "corridas";
    pub const GOALS: &str = "metas";
}

/// Profile persistence used by the subscription logic.
///
/// Updates are field-masked and last-write-wins. Implementations must not
/// make `update_profile` conditional: expiring a trial relies on repeated
/// identical writes being harmless.
pub trait ProfileStore: Send + Sync {
    /// Read a profile by user ID. `None` if no such record exists.
    fn get_profile(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserProfile>, AppError>> + Send;

    /// Write the fields carried by `update`, leaving all others untouched.
    fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Store a newly created profile under `profile.id`.
    fn create_profile(
        &self,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// All profiles, newest account first.
    fn list_profiles(&self) -> impl Future<Output = Result<Vec<UserProfile>, AppError>> + Send;
}
