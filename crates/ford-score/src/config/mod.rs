//! Runtime settings for the FORD scoring service.
//!
//! Values come from the process environment, after an optional `.env` file
//! has been merged in. Every variable is optional.

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const ENV_VAR: &str = "FORD_ENV";
const HOST_VAR: &str = "FORD_HOST";
const PORT_VAR: &str = "FORD_PORT";
const LOG_LEVEL_VAR: &str = "FORD_LOG_LEVEL";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage; only development gets colored log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Reads `FORD_ENV`, `FORD_HOST`, `FORD_PORT`, and `FORD_LOG_LEVEL`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = env::var(ENV_VAR)
            .map(|value| AppEnvironment::parse(&value))
            .unwrap_or(AppEnvironment::Development);

        let host = var_or(HOST_VAR, DEFAULT_HOST);
        let port = match env::var(PORT_VAR) {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level: var_or(LOG_LEVEL_VAR, DEFAULT_LOG_LEVEL),
                ansi: environment == AppEnvironment::Development,
            },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Where the HTTP listener binds.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` maps to the IPv4 loopback; anything else must be a literal address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost {
                value: self.host.clone(),
                source,
            })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter directive and whether to emit ANSI colors.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "{PORT_VAR}='{value}' is not a TCP port (0-65535)")
            }
            ConfigError::InvalidHost { value, .. } => write!(
                f,
                "scoring service host '{value}' is neither localhost nor an IP address"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
        }
    }
}
