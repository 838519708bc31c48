// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::services::profile_cache::DEFAULT_MAX_AGE_SECS;
use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// How long a cached profile may be served before re-reading it
    pub profile_cache_max_age_secs: i64,

    /// Shared secret the auth provider signs session JWTs with (HS256)
    pub auth_jwt_secret: Vec<u8>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            profile_cache_max_age_secs: DEFAULT_MAX_AGE_SECS,
            auth_jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let profile_cache_max_age_secs = match env::var("PROFILE_CACHE_MAX_AGE_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs >= 0)
                .ok_or(ConfigError::Invalid("PROFILE_CACHE_MAX_AGE_SECS"))?,
            Err(_) => DEFAULT_MAX_AGE_SECS,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            profile_cache_max_age_secs,
            auth_jwt_secret: env::var("AUTH_JWT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("AUTH_JWT_SECRET"))?
                .into_bytes(),
        })
    }

    pub fn profile_cache_max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.profile_cache_max_age_secs)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
