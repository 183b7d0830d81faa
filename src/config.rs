use std::time::Duration;

use clap::Args;
use url::Url;

use crate::error::ConfigError;
use crate::proxy::DEFAULT_PROXY_ENDPOINT;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// Engine flags shared by every subcommand (override RSSAGG_* env vars).
#[derive(Args, Debug, Default, Clone)]
pub struct EngineArgs {
    /// Proxy endpoint the target URL is routed through
    #[arg(global = true, long)]
    pub proxy: Option<String>,
    /// Delay between polling cycles, in seconds (at least 1)
    #[arg(global = true, long)]
    pub interval_secs: Option<u64>,
    /// Per-fetch timeout in seconds; 0 disables it
    #[arg(global = true, long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub proxy_endpoint: Url,
    pub poll_interval: Duration,
    pub fetch_timeout: Option<Duration>,
}

impl EngineConfig {
    pub fn from_env_and_args(args: &EngineArgs) -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok(), args)
    }

    fn resolve<F>(lookup: F, args: &EngineArgs) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let proxy = args
            .proxy
            .clone()
            .or_else(|| lookup("RSSAGG_PROXY_URL"))
            .unwrap_or_else(|| DEFAULT_PROXY_ENDPOINT.to_string());
        let proxy_endpoint = Url::parse(&proxy).map_err(|e| ConfigError::ProxyEndpoint(proxy.clone(), e))?;

        let (interval, source) = match args.interval_secs {
            Some(v) => (v, "--interval-secs"),
            None => (
                secs_from(&lookup, "RSSAGG_POLL_INTERVAL_SECS")?.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
                "RSSAGG_POLL_INTERVAL_SECS",
            ),
        };
        // a zero delay would turn the polling loop into a busy loop
        if interval == 0 {
            return Err(ConfigError::Number { key: source, value: interval.to_string() });
        }
        let timeout = match args.timeout_secs {
            Some(v) => v,
            None => secs_from(&lookup, "RSSAGG_FETCH_TIMEOUT_SECS")?.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        Ok(EngineConfig {
            proxy_endpoint,
            poll_interval: Duration::from_secs(interval),
            fetch_timeout: if timeout == 0 { None } else { Some(Duration::from_secs(timeout)) },
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            proxy_endpoint: crate::proxy::ProxyGateway::default().endpoint().clone(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            fetch_timeout: Some(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)),
        }
    }
}

fn secs_from<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else { return Ok(None) };
    raw.trim().parse::<u64>().map(Some).map_err(|_| ConfigError::Number { key, value: raw })
}
