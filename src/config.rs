//! Configuration for the loyalty gateway server.
//!
//! All settings come from environment variables (loaded from `.env` at
//! startup), each with a hardcoded default:
//!
//! - `HOST`, `PORT` — bind address (default `0.0.0.0:8080`)
//! - `FETCH_CONCURRENCY` — per-item fetch parallelism during one aggregation
//!   pass: `sequential` (default) or a positive in-flight limit
//! - `REQUEST_TIMEOUT_SECS` — deadline after which an in-flight batch is
//!   abandoned and the request reports a timeout (default 30)

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

use crate::aggregate::Concurrency;

const ENV_HOST: &str = "HOST";
const ENV_PORT: &str = "PORT";
const ENV_FETCH_CONCURRENCY: &str = "FETCH_CONCURRENCY";
const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Server configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    host: IpAddr,
    port: u16,
    fetch_concurrency: Concurrency,
    request_timeout: Duration,
}

/// Error raised when an environment variable holds an unparseable value.
#[derive(Debug, thiserror::Error)]
#[error("invalid {name}: {value}")]
pub struct ConfigError {
    name: &'static str,
    value: String,
}

impl Config {
    /// Reads configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Config {
            host: parse_env(ENV_HOST, IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_env(ENV_PORT, DEFAULT_PORT)?,
            fetch_concurrency: parse_env(ENV_FETCH_CONCURRENCY, Concurrency::Sequential)?,
            request_timeout: parse_env(ENV_REQUEST_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS)
                .map(Duration::from_secs)?,
        })
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn fetch_concurrency(&self) -> Concurrency {
        self.fetch_concurrency
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn parse_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => value.parse().map_err(|_| ConfigError { name, value }),
    }
}
