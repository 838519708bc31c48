// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod goals;
pub mod profile;
pub mod run;
pub mod stats;

pub use goals::Goals;
pub use profile::{ProfileUpdate, UserProfile};
pub use run::{NewRun, Run};
pub use stats::RunStats;
