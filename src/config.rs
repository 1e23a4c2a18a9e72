//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use serde::{Deserialize, Deserializer};

/// Port used when `PORT` is missing, not a number, or zero.
pub const DEFAULT_PORT: u16 = 8080;

/// Origin allowed by CORS and trusted by the authentication provider.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `PORT` (optional): HTTP server port, defaults to 8080
/// - `AUTH_SECRET` (optional): key used to sign session cookies
/// - `CORS_ORIGIN` (optional): browser origin allowed to call the API, defaults to `http://localhost:3000`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port", deserialize_with = "lenient_port")]
    pub port: u16,

    #[serde(default)]
    pub auth_secret: Option<String>,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cors_origin() -> String {
    DEFAULT_CORS_ORIGIN.to_string()
}

/// Accept any value for `PORT`; anything that is not a non-zero port number
/// falls back to [`DEFAULT_PORT`] instead of failing startup.
fn lenient_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(parse_port(raw.as_deref()))
}

fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}
