//! Process configuration, read from the environment (and `.env` when present).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_DB_PATH: &str = "products.sqlite";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_JWT_EXPIRES_IN: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set when APP_ENV=production")]
    MissingSecret,

    #[error("invalid duration {0:?}: expected <n>, <n>s, <n>m, <n>h or <n>d with n > 0")]
    InvalidDuration(String),

    #[error("invalid BIND_ADDR {0:?}")]
    InvalidBindAddr(String),

    #[error("invalid BCRYPT_COST {0:?}")]
    InvalidBcryptCost(String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub bind_addr: SocketAddr,
    pub bcrypt_cost: u32,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db_path", &self.db_path)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expires_in", &self.jwt_expires_in)
            .field("bind_addr", &self.bind_addr)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// Load the nearest `.env` into the process environment. Variables that are
/// already set win over the file.
///
/// Runs before logging is initialized so `RUST_LOG` and `LOG_FORMAT` from the
/// file apply; the caller logs the returned path once it can.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

impl AppConfig {
    /// Load `.env` if there is one, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let production = get("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));
        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if production => return Err(ConfigError::MissingSecret),
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let jwt_expires_in = match get("JWT_EXPIRES_IN") {
            Some(raw) => parse_duration(&raw)?,
            None => DEFAULT_JWT_EXPIRES_IN,
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidBcryptCost(raw.clone()))?,
            None => shelf_auth::DEFAULT_BCRYPT_COST,
        };

        Ok(Self {
            db_path: get("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            jwt_secret,
            jwt_expires_in,
            bind_addr,
            bcrypt_cost,
        })
    }
}

/// Parse `<n>`, `<n>s`, `<n>m`, `<n>h` or `<n>d` (bare numbers are seconds).
pub fn parse_duration(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(raw.to_string());
    let s = raw.trim();

    let (digits, unit_secs) = match s.char_indices().last() {
        Some((i, 's')) => (&s[..i], 1),
        Some((i, 'm')) => (&s[..i], 60),
        Some((i, 'h')) => (&s[..i], 60 * 60),
        Some((i, 'd')) => (&s[..i], 24 * 60 * 60),
        Some(_) => (s, 1),
        None => return Err(invalid()),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let n: u64 = digits.parse().map_err(|_| invalid())?;
    let secs = n.checked_mul(unit_secs).ok_or_else(invalid)?;
    if secs == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.db_path, "products.sqlite");
        assert_eq!(cfg.jwt_secret, "dev-secret");
        assert_eq!(cfg.jwt_expires_in, Duration::from_secs(3600));
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cfg.bcrypt_cost, 10);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = load(&[
            ("DB_PATH", ":memory:"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRES_IN", "15m"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("BCRYPT_COST", "4"),
        ])
        .unwrap();

        assert_eq!(cfg.db_path, ":memory:");
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.jwt_expires_in, Duration::from_secs(900));
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.bcrypt_cost, 4);
    }

    #[test]
    fn production_requires_a_secret() {
        assert_eq!(
            load(&[("APP_ENV", "production")]).unwrap_err(),
            ConfigError::MissingSecret
        );
        assert_eq!(
            load(&[("APP_ENV", "production"), ("JWT_SECRET", "  ")]).unwrap_err(),
            ConfigError::MissingSecret
        );
        assert!(load(&[("APP_ENV", "production"), ("JWT_SECRET", "x")]).is_ok());
        assert!(load(&[("APP_ENV", "development")]).is_ok());
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            load(&[("JWT_EXPIRES_IN", "soon")]),
            Err(ConfigError::InvalidDuration(_))
        ));
        assert!(matches!(
            load(&[("BIND_ADDR", "nowhere")]),
            Err(ConfigError::InvalidBindAddr(_))
        ));
        assert!(matches!(
            load(&[("BCRYPT_COST", "ten")]),
            Err(ConfigError::InvalidBcryptCost(_))
        ));
    }

    #[test]
    fn dotenv_values_reach_the_log_format() {
        // An explicit environment always beats the file.
        if std::env::var_os("LOG_FORMAT").is_some() {
            return;
        }

        let dir = std::env::temp_dir().join(format!(
            "shelf-dotenv-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join(".env");
        std::fs::write(&file, "LOG_FORMAT=text\n").unwrap();

        dotenvy::from_path(&file).unwrap();
        assert_eq!(shelf_observability::LogFormat::from_env(), shelf_observability::LogFormat::Text);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn durations_accept_unit_suffixes() {
        assert_eq!(parse_duration("90").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("2d").unwrap(), Duration::from_secs(172_800));
        assert_eq!(parse_duration(" 1h ").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn durations_reject_zero_and_garbage() {
        for raw in ["", "0", "0h", "h", "-1h", "1.5h", "1w", "1 h", "99999999999999999999d"] {
            assert!(parse_duration(raw).is_err(), "{raw:?} should be rejected");
        }
    }
}
