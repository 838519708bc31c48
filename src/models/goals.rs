// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Distance goals (`metas` collection, keyed by user ID).

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Weekly, monthly and yearly distance targets in kilometres.
///
/// A missing document means no goals are set, which is not the same as
/// goals of zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Goals {
    #[serde(rename = "meta_semanal", default)]
    #[validate(range(min = 0.0, max = 10000.0))]
    pub weekly_km: f64,
    #[serde(rename = "meta_mensal", default)]
    #[validate(range(min = 0.0, max = 50000.0))]
    pub monthly_km: f64,
    #[serde(rename = "meta_anual", default)]
    #[validate(range(min = 0.0, max = 500000.0))]
    pub yearly_km: f64,
}
