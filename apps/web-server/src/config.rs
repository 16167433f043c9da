//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConfig;
use quill_infra::{JwtConfig, PasswordConfig};

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads of the HTTP server.
    pub workers: usize,
    /// Pending connection queue of the listener.
    pub backlog: u32,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// Apply pending schema migrations at startup.
    pub auto_migrate: bool,
    pub jwt: JwtConfig,
    /// Argon2 cost of new password hashes.
    pub password: PasswordConfig,
    /// Page size of listings when the request names none.
    pub default_page_size: i64,
}

/// Parsed value of `key`, or `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 8080),
            workers: env_or("HTTP_WORKERS", 4),
            backlog: env_or("HTTP_BACKLOG", 100),
            #[cfg(feature = "postgres")]
            database: env_opt("DATABASE_URL").map(|url| DatabaseConfig {
                url,
                max_connections: env_or("DB_MAX_CONNECTIONS", 10),
                min_connections: env_or("DB_MIN_CONNECTIONS", 2),
            }),
            auto_migrate: env_or("AUTO_MIGRATE", true),
            jwt: Self::jwt_from_env(),
            password: Self::password_from_env(),
            default_page_size: env_or("DEFAULT_PAGE_SIZE", 6).max(1),
        }
    }

    fn password_from_env() -> PasswordConfig {
        let defaults = PasswordConfig::default();
        PasswordConfig {
            memory_kib: env_or("ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: env_or("ARGON2_ITERATIONS", defaults.iterations),
            parallelism: env_or("ARGON2_PARALLELISM", defaults.parallelism),
        }
    }

    fn jwt_from_env() -> JwtConfig {
        let secret = env_opt("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        // Warn if using default secret in production
        if secret == DEFAULT_JWT_SECRET {
            let is_production = env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        JwtConfig {
            secret,
            expiration_hours: env_or("JWT_EXPIRATION_HOURS", 24),
            issuer: env_opt("OIDC_ISSUER").unwrap_or_else(|| "quill".to_string()),
            audience: env_opt("OIDC_AUDIENCE"),
            public_key_pem: env_opt("OIDC_PUBLIC_KEY_PEM"),
        }
    }
}
