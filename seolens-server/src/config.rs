//! Server settings read from the environment.

use std::time::Duration;

use seolens_core::FetchConfig;

/// Listener, CORS and fetch settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Origins allowed by CORS.
    pub ui_origins: Vec<String>,
    /// Settings for page retrieval.
    pub fetch: FetchConfig,
}

impl ServerConfig {
    /// Read settings from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let host = lookup("SEOLENS_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("SEOLENS_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| format!("SEOLENS_PORT must be a u16 number, got {raw}"))?,
            None => 8080,
        };
        let ui_origins = lookup("SEOLENS_UI_ORIGINS")
            .unwrap_or_else(|| "http://127.0.0.1:4200,http://localhost:4200".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let mut fetch = FetchConfig::default();
        if let Some(raw) = lookup("SEOLENS_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| {
                    format!("SEOLENS_TIMEOUT_SECS must be a number of seconds, got {raw}")
                })?;
            fetch.timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = lookup("SEOLENS_USER_AGENT").filter(|agent| !agent.trim().is_empty())
        {
            fetch.user_agent = agent;
        }

        Ok(Self {
            host,
            port,
            ui_origins,
            fetch,
        })
    }
}
