//! # Application State
//!
//! Configuration read from the environment and the shared assessment
//! registry. `AppState` is cheap to clone; every handler gets its own copy.
//!
//! The registry sits behind a single `parking_lot::RwLock`. Handlers take
//! the lock for synchronous work only and never hold it across an `.await`.

use std::sync::Arc;

use parking_lot::RwLock;

use rodo_state::AssessmentRegistry;

use crate::auth::SecretString;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Bearer token required on `/v1` routes. `None` disables auth.
    pub auth_token: Option<SecretString>,
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    /// Read `RODO_PORT`, `RODO_AUTH_TOKEN` and `RODO_METRICS_ENABLED`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("RODO_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("RODO_PORT must be a port number, got {raw:?}: {e}"))?,
            None => 8080,
        };
        let auth_token = lookup("RODO_AUTH_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::new);
        // Anything other than "false" keeps metrics on.
        let metrics_enabled = lookup("RODO_METRICS_ENABLED")
            .map(|v| v.trim().to_lowercase() != "false")
            .unwrap_or(true);

        Ok(Self {
            port,
            auth_token,
            metrics_enabled,
        })
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone, Default)]
pub struct AppState {
    pub config: AppConfig,
    pub registry: Arc<RwLock<AssessmentRegistry>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            registry: Arc::default(),
        }
    }

    /// Start from an already populated registry.
    pub fn with_registry(config: AppConfig, registry: AssessmentRegistry) -> Self {
        Self {
            config,
            registry: Arc::new(RwLock::new(registry)),
        }
    }
}
