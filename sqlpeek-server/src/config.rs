//! Environment-based configuration
//!
//! Connection settings come from environment variables with fixed defaults:
//!
//! | Variable    | Default        |
//! |-------------|----------------|
//! | `DB_HOST`   | `localhost`    |
//! | `DB_PORT`   | `5432`         |
//! | `DB_NAME`   | `postgres`     |
//! | `DB_USER`   | `postgres`     |
//! | `DB_PASS`   | `postgres`     |
//! | `BIND_ADDR` | `0.0.0.0:5000` |

use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or("DB_HOST", "localhost"),
            port: env_or("DB_PORT", "5432").parse().unwrap_or(5432),
            name: env_or("DB_NAME", "postgres"),
            user: env_or("DB_USER", "postgres"),
            password: env_or("DB_PASS", "postgres"),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:5000"),
        }
    }

    /// Connection options for the pool; avoids URL-escaping the password
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
