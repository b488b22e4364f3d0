use crate::error::{ConfigError, Result};
use crate::progress::Progress;
use crate::signal::{StopSignal, SuccessCounter};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The (host, port) pair every worker connects to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Raw run parameters as they arrive from the command line. Numeric fields are
/// kept wide and signed so out-of-range input survives parsing and is rejected
/// with a descriptive message by [`RunConfig::try_from`].
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub host: String,
    pub port: i64,
    pub threads: i64,
    pub duration: f64,
    pub sleep: f64,
    pub path: String,
    pub grace: f64,
    pub connect_timeout: f64,
    pub read_timeout: f64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            threads: 10,
            duration: 5.0,
            sleep: 0.003,
            path: "/".to_string(),
            grace: 1.0,
            connect_timeout: 5.0,
            read_timeout: 2.0,
        }
    }
}

/// Per-connection settings for the request issuer.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuerConfig {
    pub path: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(2),
        }
    }
}

/// Validated, immutable parameters for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub target: Target,
    pub threads: usize,
    /// `None` runs until the interrupt future resolves.
    pub duration: Option<Duration>,
    pub sleep: Duration,
    pub grace: Duration,
    pub issuer: IssuerConfig,
}

impl TryFrom<RunOptions> for RunConfig {
    type Error = ConfigError;

    fn try_from(opts: RunOptions) -> Result<Self> {
        let port = u16::try_from(opts.port)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(ConfigError::InvalidPort(opts.port))?;
        let threads = usize::try_from(opts.threads)
            .ok()
            .filter(|t| *t >= 1)
            .ok_or(ConfigError::InvalidThreads(opts.threads))?;

        if opts.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if !is_header_token(&opts.host) {
            return Err(ConfigError::InvalidHost(opts.host));
        }
        if !opts.path.starts_with('/') || !is_header_token(&opts.path) {
            return Err(ConfigError::InvalidPath(opts.path));
        }

        let duration = non_negative("duration", opts.duration)?;
        Ok(Self {
            target: Target {
                host: opts.host,
                port,
            },
            threads,
            duration: (!duration.is_zero()).then_some(duration),
            sleep: non_negative("sleep", opts.sleep)?,
            grace: positive("grace", opts.grace)?,
            issuer: IssuerConfig {
                path: opts.path,
                connect_timeout: positive("connect-timeout", opts.connect_timeout)?,
                read_timeout: positive("read-timeout", opts.read_timeout)?,
            },
        })
    }
}

/// Host and path are written verbatim into the request head.
fn is_header_token(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_graphic())
}

fn non_negative(name: &'static str, value: f64) -> Result<Duration> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::NegativeSeconds { name, value });
    }
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::SecondsOutOfRange { name, value })
}

fn positive(name: &'static str, value: f64) -> Result<Duration> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPositiveSeconds { name, value });
    }
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::SecondsOutOfRange { name, value })
}

/// Everything a worker needs, shared by reference across the whole pool.
#[derive(Debug)]
pub struct WorkerConfig {
    pub target: Target,
    pub issuer: IssuerConfig,
    pub sleep: Duration,
    pub stop: StopSignal,
    pub counter: Arc<SuccessCounter>,
    pub progress: Progress,
}

/// Outcome of a run, assembled after the join phase.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub target: Target,
    pub threads: usize,
    pub workers_launched: usize,
    pub workers_joined: usize,
    pub stragglers: usize,
    pub successful_requests: u64,
    #[serde(rename = "elapsed_secs", serialize_with = "seconds")]
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
    pub interrupted: bool,
}

fn seconds<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
