//! Client configuration with environment overrides.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every session component reads its routes, storage keys, and API prefix
//! from one [`ClientConfig`]. In the browser no process environment exists,
//! so `from_env` falls back to defaults there.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_TOKEN_COOKIE: &str = "auth_token";
pub const DEFAULT_TOKEN_MAX_AGE_DAYS: u64 = 7;
pub const DEFAULT_SESSION_KEY: &str = "auth";
pub const DEFAULT_TOAST_DURATION_MS: u32 = 5000;
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

/// Routes that never require an authenticated session.
pub const DEFAULT_PUBLIC_ROUTES: &[&str] =
    &["/login", "/login-v2", "/register", "/forgot-password", "/reset-password", "/logout"];

/// Errors produced while reading configuration overrides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A numeric override could not be parsed.
    #[error("invalid value for {key}: {value:?} is not a number")]
    InvalidNumber { key: &'static str, value: String },

    /// The log level override is not a known level.
    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),

    /// The API base override is empty after trimming.
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

/// Browser console log level installed by `hydrate()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(ConfigError::UnknownLogLevel(other.to_owned())),
        }
    }

    #[cfg(feature = "hydrate")]
    pub(crate) fn as_log_level(self) -> log::Level {
        match self {
            Self::Error => log::Level::Error,
            Self::Warn => log::Level::Warn,
            Self::Info => log::Level::Info,
            Self::Debug => log::Level::Debug,
            Self::Trace => log::Level::Trace,
        }
    }
}

/// Routes, storage keys, and API prefix shared by the session components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub login_route: String,
    pub home_route: String,
    pub logout_route: String,
    pub public_routes: Vec<String>,
    pub token_cookie: String,
    pub token_max_age_days: u64,
    pub session_key: String,
    pub toast_duration_ms: u32,
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            login_route: "/login".to_owned(),
            home_route: "/".to_owned(),
            logout_route: "/logout".to_owned(),
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|r| (*r).to_owned()).collect(),
            token_cookie: DEFAULT_TOKEN_COOKIE.to_owned(),
            token_max_age_days: DEFAULT_TOKEN_MAX_AGE_DAYS,
            session_key: DEFAULT_SESSION_KEY.to_owned(),
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl ClientConfig {
    /// Build config from process environment variables.
    ///
    /// Optional:
    /// - `ADMIN_API_BASE`: default `/api`
    /// - `ADMIN_TOKEN_COOKIE`: default `auth_token`
    /// - `ADMIN_TOKEN_MAX_AGE_DAYS`: default 7
    /// - `ADMIN_SESSION_KEY`: default `auth`
    /// - `ADMIN_TOAST_DURATION_MS`: default 5000
    /// - `ADMIN_LOG_LEVEL`: default `info`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if an override is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if an override is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("ADMIN_API_BASE") {
            let base = raw.trim().trim_end_matches('/');
            if base.is_empty() && raw.trim() != "/" {
                return Err(ConfigError::Empty { key: "ADMIN_API_BASE" });
            }
            config.api_base = base.to_owned();
        }
        if let Some(raw) = lookup("ADMIN_TOKEN_COOKIE") {
            let name = raw.trim();
            if name.is_empty() {
                return Err(ConfigError::Empty { key: "ADMIN_TOKEN_COOKIE" });
            }
            config.token_cookie = name.to_owned();
        }
        if let Some(raw) = lookup("ADMIN_TOKEN_MAX_AGE_DAYS") {
            config.token_max_age_days = parse_number("ADMIN_TOKEN_MAX_AGE_DAYS", &raw)?;
        }
        if let Some(raw) = lookup("ADMIN_SESSION_KEY") {
            let key = raw.trim();
            if key.is_empty() {
                return Err(ConfigError::Empty { key: "ADMIN_SESSION_KEY" });
            }
            config.session_key = key.to_owned();
        }
        if let Some(raw) = lookup("ADMIN_TOAST_DURATION_MS") {
            config.toast_duration_ms = parse_number("ADMIN_TOAST_DURATION_MS", &raw)?;
        }
        if let Some(raw) = lookup("ADMIN_LOG_LEVEL") {
            config.log_level = LogLevel::parse(&raw)?;
        }

        Ok(config)
    }

    /// Token cookie lifetime in seconds.
    #[must_use]
    pub fn token_max_age_secs(&self) -> u64 {
        self.token_max_age_days * 24 * 60 * 60
    }

    /// Whether `path` is one of the configured public routes.
    #[must_use]
    pub fn is_public_route(&self, path: &str) -> bool {
        self.public_routes.iter().any(|r| r == path)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber { key, value: raw.to_owned() })
}
