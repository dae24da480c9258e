use std::env;
use std::net::SocketAddr;

pub mod cors;

pub use cors::create_cors_layer;

const DEFAULT_DATABASE_URL: &str = "sqlite://nearby_events.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            bind_addr: parse_or_default("BIND_ADDR", env::var("BIND_ADDR").ok(), default_bind_addr),
            max_connections: parse_or_default(
                "DATABASE_MAX_CONNECTIONS",
                env::var("DATABASE_MAX_CONNECTIONS").ok(),
                || DEFAULT_MAX_CONNECTIONS,
            ),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: default_bind_addr(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            cors_allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    DEFAULT_BIND_ADDR
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3001)))
}

fn parse_or_default<T: std::str::FromStr>(
    key: &str,
    raw: Option<String>,
    default: impl FnOnce() -> T,
) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Config: invalid {} '{}', using default", key, value);
            default()
        }),
        None => default(),
    }
}
