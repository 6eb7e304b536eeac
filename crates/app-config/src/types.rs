// In crates/app-config/src/types.rs

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the database connection.
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    /// Tunables for the leaderboard computation.
    #[serde(default)]
    pub leaderboard: LeaderboardSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    /// The connection URL for the PostgreSQL database.
    pub url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LeaderboardSettings {
    /// How many per-user aggregation tasks may run concurrently. This bounds
    /// pressure on the trade store, not correctness.
    #[serde(default = "default_fan_out_concurrency")]
    pub fan_out_concurrency: usize,
    /// Page size used when the caller does not specify one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            fan_out_concurrency: default_fan_out_concurrency(),
            default_page_size: default_page_size(),
        }
    }
}

// Helper functions for serde defaults.
fn default_fan_out_concurrency() -> usize {
    16
}
fn default_page_size() -> u32 {
    50
}
