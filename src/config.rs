//! Configuration snapshot shared by the resolver, client and orchestrator
//!
//! The environment is read exactly once, in [`RetagConfig::from_env`]. Everything
//! downstream receives the resulting value and never looks at the process
//! environment again.

use crate::logging::{LOG_LEVEL_ENV, LogLevel};
use std::env;
use std::path::PathBuf;

pub const INSECURE_REGISTRY_ENV: &str = "INSECURE_REGISTRY";
pub const USERNAME_ENV: &str = "DOCKER_USER";
pub const PASSWORD_ENV: &str = "DOCKER_PASS";
const HOME_ENV: &str = "HOME";

/// Upper bound on concurrent manifest uploads
pub const DEFAULT_MAX_WORKERS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Both halves present and non-empty
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetagConfig {
    /// Credentials given on the command line
    pub explicit: AuthConfig,
    /// Credentials from `DOCKER_USER` / `DOCKER_PASS`
    pub environment: AuthConfig,
    /// Use plain http instead of https
    pub insecure: bool,
    /// Location of the docker credential store, if any
    pub docker_config: Option<PathBuf>,
    pub max_workers: usize,
    pub log_level: LogLevel,
}

impl Default for RetagConfig {
    fn default() -> Self {
        Self {
            explicit: AuthConfig::default(),
            environment: AuthConfig::default(),
            insecure: false,
            docker_config: None,
            max_workers: DEFAULT_MAX_WORKERS,
            log_level: LogLevel::Info,
        }
    }
}

impl RetagConfig {
    /// Snapshot the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the snapshot from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = AuthConfig {
            username: lookup(USERNAME_ENV),
            password: lookup(PASSWORD_ENV),
        };
        let insecure = lookup(INSECURE_REGISTRY_ENV).is_some_and(|v| v == "true");
        let docker_config = lookup(HOME_ENV)
            .map(|home| PathBuf::from(home).join(".docker").join("config.json"));
        let log_level = LogLevel::from_env_value(lookup(LOG_LEVEL_ENV).as_deref());

        Self {
            environment,
            insecure,
            docker_config,
            log_level,
            ..Self::default()
        }
    }

    pub fn with_explicit_auth(
        mut self,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        self.explicit = AuthConfig { username, password };
        self
    }

    pub fn with_environment_auth(mut self, auth: AuthConfig) -> Self {
        self.environment = auth;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_docker_config(mut self, path: Option<PathBuf>) -> Self {
        self.docker_config = path;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// URL scheme for registry requests
    pub fn scheme(&self) -> &'static str {
        if self.insecure { "http" } else { "https" }
    }
}
