// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    backend::{CrmBackend, HttpCrmBackend, RetryPolicy},
    services::{AuthService, CrmService, SessionStore},
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_CRM_API_URL: &str = "https://dmhcacrm.com/api/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub crm_api_url: String,
    pub jwt_secret: String,
    pub api_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// Reads the configuration from the environment (and `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            crm_api_url: env::var("CRM_API_URL").unwrap_or_else(|_| DEFAULT_CRM_API_URL.to_string()),
            jwt_secret,
            api_timeout: Duration::from_millis(env_number("API_TIMEOUT_MS", 30_000)?),
            retry: RetryPolicy {
                attempts: env_number("API_RETRY_ATTEMPTS", 3)?,
                initial_delay: Duration::from_millis(env_number("API_RETRY_DELAY_MS", 1_000)?),
            },
        })
    }
}

fn env_number<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().with_context(|| format!("{} must be a number, got '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub crm_service: CrmService,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backend = HttpCrmBackend::new(&config.crm_api_url, config.api_timeout, config.retry)
            .context("failed to build the CRM backend client")?;
        tracing::info!("✅ CRM backend client ready for {}", config.crm_api_url);
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Assembles the dependency graph around any backend implementation.
    pub fn with_backend(config: Config, backend: Arc<dyn CrmBackend>) -> Self {
        let sessions = SessionStore::new();
        let auth_service = AuthService::new(backend.clone(), sessions, config.jwt_secret);
        let crm_service = CrmService::new(backend);

        Self { auth_service, crm_service }
    }
}
