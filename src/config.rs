use std::env;

use chrono::Datelike;

use crate::services::{DEFAULT_FITNESS_TABLE, DEFAULT_RELEASES_TABLE};

pub const DEFAULT_IDENTITY_HEADER: &str = "x-forwarded-email";
pub const DEFAULT_MOCK_IDENTITY: &str = "test@example.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
    /// No store: sessions read empty, releases fall back to fixtures.
    Disabled,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
            StoreBackend::Disabled => "none",
        }
    }

    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mock" => StoreBackend::Memory,
            "none" | "disabled" | "off" => StoreBackend::Disabled,
            _ => StoreBackend::Sqlite,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub fitness_table: String,
    pub releases_table: String,
    /// Header carrying the identity set by the authenticating proxy.
    pub identity_header: String,
    /// Fixed identity for local development and end-to-end tests.
    pub mock_identity: Option<String>,
    pub release_year: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let mock_identity = match lookup("MOCK_AUTH").as_deref() {
            Some("true") | Some("1") => Some(
                lookup("MOCK_IDENTITY").unwrap_or_else(|| DEFAULT_MOCK_IDENTITY.to_string()),
            ),
            _ => None,
        };

        Self {
            database_url: var("DATABASE_URL", "sqlite:nina.db?mode=rwc"),
            host: var("HOST", "127.0.0.1"),
            port: var("PORT", "3000").parse().unwrap_or(3000),
            store: StoreBackend::parse(&var("STORE_BACKEND", "sqlite")),
            fitness_table: var("FITNESS_TABLE", DEFAULT_FITNESS_TABLE),
            releases_table: var("RELEASES_TABLE", DEFAULT_RELEASES_TABLE),
            identity_header: var("IDENTITY_HEADER", DEFAULT_IDENTITY_HEADER).to_ascii_lowercase(),
            mock_identity,
            release_year: lookup("RELEASE_YEAR")
                .unwrap_or_else(|| chrono::Local::now().year().to_string()),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
