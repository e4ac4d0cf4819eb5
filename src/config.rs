use std::path::PathBuf;

use anyhow::Context;
use tracing::warn;

/// Secret used when `JWT_SECRET` is unset. Anyone can forge tokens with it.
pub const FALLBACK_JWT_SECRET: &str = "secret";

/// Accepted range for `JWT_TTL_DAYS`.
pub const TTL_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=3650;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// True when `secret` is [`FALLBACK_JWT_SECRET`] because nothing was configured.
    pub secret_is_fallback: bool,
    pub ttl_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match get("STORE_BACKEND").as_deref().unwrap_or("postgres") {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                database_url: get("DATABASE_URL")
                    .context("DATABASE_URL is required for the postgres store")?,
            },
            other => anyhow::bail!("unknown STORE_BACKEND `{other}`"),
        };

        let (secret, secret_is_fallback) = match get("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(s) => (s, false),
            None => (FALLBACK_JWT_SECRET.to_string(), true),
        };

        let ttl_days = match get("JWT_TTL_DAYS") {
            Some(d) => d
                .parse::<i64>()
                .with_context(|| format!("invalid JWT_TTL_DAYS `{d}`"))?,
            None => 7,
        };
        if !TTL_DAYS_RANGE.contains(&ttl_days) {
            anyhow::bail!(
                "JWT_TTL_DAYS must be between {} and {}, got {ttl_days}",
                TTL_DAYS_RANGE.start(),
                TTL_DAYS_RANGE.end()
            );
        }

        let jwt = JwtConfig {
            secret,
            secret_is_fallback,
            ttl_days,
        };

        let port = match get("APP_PORT") {
            Some(p) => p.parse::<u16>().with_context(|| format!("invalid APP_PORT `{p}`"))?,
            None => 5000,
        };

        let environment = match get("APP_ENV").as_deref() {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        };

        Ok(Self {
            store,
            jwt,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            environment,
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or_else(|| "static".into()),
        })
    }

    /// Startup check. A fallback signing secret is fatal in production and loud elsewhere.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt.secret_is_fallback {
            if self.environment == Environment::Production {
                anyhow::bail!("JWT_SECRET must be set when APP_ENV=production");
            }
            warn!("JWT_SECRET not set; using the insecure built-in fallback secret");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_secret_falls_back_and_is_flagged() {
        let cfg = AppConfig::from_lookup(lookup(&[("STORE_BACKEND", "memory")])).unwrap();
        assert_eq!(cfg.jwt.secret, FALLBACK_JWT_SECRET);
        assert!(cfg.jwt.secret_is_fallback);
        assert_eq!(cfg.jwt.ttl_days, 7);
        assert_eq!(cfg.port, 5000);
    }

    #[test]
    fn fallback_secret_is_rejected_in_production() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn fallback_secret_only_warns_in_development() {
        let cfg = AppConfig::from_lookup(lookup(&[("STORE_BACKEND", "memory")])).unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn configured_secret_passes_in_production() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("APP_ENV", "production"),
            ("JWT_SECRET", "s3cr3t"),
        ]))
        .unwrap();
        assert!(!cfg.jwt.secret_is_fallback);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());

        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/shop")]))
            .unwrap();
        assert_eq!(
            cfg.store,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/shop".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_backend_and_bad_port() {
        assert!(AppConfig::from_lookup(lookup(&[("STORE_BACKEND", "mongo")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("APP_PORT", "not-a-port"),
        ]))
        .is_err());
    }

    #[test]
    fn ttl_override_is_respected() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_TTL_DAYS", "30"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl_days, 30);
    }

    #[test]
    fn rejects_ttl_outside_range_or_unparseable() {
        for bad in ["0", "-1", "3651", "100000000", "9223372036854775807", "week"] {
            let res = AppConfig::from_lookup(lookup(&[
                ("STORE_BACKEND", "memory"),
                ("JWT_TTL_DAYS", bad),
            ]));
            assert!(res.is_err(), "accepted JWT_TTL_DAYS={bad}");
        }

        let cfg = AppConfig::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_TTL_DAYS", "3650"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl_days, 3650);
    }
}
