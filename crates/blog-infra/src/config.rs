//! Blog configuration loaded from environment variables.

use std::env;

use blog_core::domain::DEFAULT_PAGE_SIZE;

use crate::database::DatabaseConfig;
use crate::telemetry::TelemetryConfig;

/// Site-wide settings consumed by the post model's callers.
#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub database: Option<DatabaseConfig>,
    /// New comments wait for moderation before they become visible.
    pub comment_need_approval: bool,
    pub posts_per_page: u64,
    /// Prefix for generated URLs. Empty means site-relative.
    pub site_base_url: String,
    pub telemetry: TelemetryConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            database: None,
            comment_need_approval: true,
            posts_per_page: DEFAULT_PAGE_SIZE,
            site_base_url: String::new(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Load `.env` if present, then read the environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let database = lookup("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: lookup("DB_MIN_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        });

        Self {
            database,
            comment_need_approval: lookup("COMMENT_NEED_APPROVAL")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.comment_need_approval),
            posts_per_page: lookup("POSTS_PER_PAGE")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.posts_per_page),
            site_base_url: lookup("SITE_BASE_URL").unwrap_or(defaults.site_base_url),
            telemetry: TelemetryConfig {
                json_logs: lookup("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or(false),
            },
        }
    }
}
