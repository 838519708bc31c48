// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Stored run record (`corridas` collection). Runs are never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Run {
    /// Document ID
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Day of the run (`YYYY-MM-DD`)
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "distancia_km")]
    pub distance_km: f64,
    #[serde(rename = "tempo_min")]
    pub duration_min: u32,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "criado_em")]
    pub created_at: String,
}

impl Run {
    /// Average pace in minutes per kilometre.
    pub fn pace_min_per_km(&self) -> f64 {
        if self.distance_km > 0.0 {
            self.duration_min as f64 / self.distance_km
        } else {
            0.0
        }
    }
}

/// Request body for logging a run.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRun {
    #[serde(rename = "data")]
    #[validate(custom(function = "validate_run_date"))]
    pub date: String,
    #[serde(rename = "distancia_km")]
    #[validate(range(exclusive_min = 0.0, max = 1000.0))]
    pub distance_km: f64,
    #[serde(rename = "tempo_min")]
    #[validate(range(min = 1, max = 10080))]
    pub duration_min: u32,
    #[serde(rename = "notas", default)]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl NewRun {
    /// Build the stored record. Call after validation.
    pub fn into_run(self, id: String, user_id: String, created_at: String) -> Run {
        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Run {
            id,
            user_id,
            date: self.date.trim().to_string(),
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            notes,
            created_at,
        }
    }
}

fn validate_run_date(date: &str) -> Result<(), ValidationError> {
    match crate::time_utils::parse_run_date(date) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("invalid_date")),
    }
}
