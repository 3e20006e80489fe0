//! Daemon settings
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. optional file at `RELAY_CONFIG_PATH` (or `CONFIG_PATH`), any format the
//!    `config` crate understands (toml, yaml, json)
//! 3. `RELAY__*` environment variables, e.g. `RELAY__QUEUE_NAMES=orders,events`

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use relay_api_rpc::RpcServerConfig;
use relay_core::domain::config::{default_delivery_workers, DEFAULT_CALLBACK_TIMEOUT};
use relay_core::domain::{BrokerConfig, RestartPolicy};
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "RELAY";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub rpc_host: String,
    pub rpc_port: u16,
    pub queue_names: Vec<String>,
    pub queue_length: usize,
    pub max_subscribers: usize,
    pub callback_timeout_ms: u64,
    /// Fan-out pool size; available parallelism when unset
    pub delivery_workers: Option<usize>,
    pub restart_backoff_first_ms: u64,
    pub restart_backoff_max_ms: u64,
    pub restart_backoff_factor: f64,
    /// Healthy uptime that resets the restart backoff
    pub restart_stable_after_ms: u64,
    pub restart_max: Option<u32>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        let rpc = RpcServerConfig::default();
        let restart = RestartPolicy::default();
        Self {
            rpc_host: rpc.host,
            rpc_port: rpc.port,
            queue_names: vec!["default".to_string()],
            queue_length: 1024,
            max_subscribers: 16,
            callback_timeout_ms: DEFAULT_CALLBACK_TIMEOUT.as_millis() as u64,
            delivery_workers: None,
            restart_backoff_first_ms: restart.backoff_first.as_millis() as u64,
            restart_backoff_max_ms: restart.backoff_max.as_millis() as u64,
            restart_backoff_factor: restart.backoff_factor,
            restart_stable_after_ms: restart.stable_after.as_millis() as u64,
            restart_max: restart.max_restarts,
        }
    }
}

impl DaemonConfig {
    /// Load from the config file (if any) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("RELAY_CONFIG_PATH")
            .or_else(|_| std::env::var("CONFIG_PATH"))
            .ok();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(&path));
        }

        Self::build(builder.add_source(env_source()))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn rpc(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc_host.clone(),
            port: self.rpc_port,
        }
    }

    /// Broker settings; validated by `Broker::start`
    pub fn broker(&self) -> BrokerConfig {
        let restart = RestartPolicy {
            backoff_first: Duration::from_millis(self.restart_backoff_first_ms),
            backoff_max: Duration::from_millis(self.restart_backoff_max_ms),
            backoff_factor: self.restart_backoff_factor,
            stable_after: Duration::from_millis(self.restart_stable_after_ms),
            max_restarts: self.restart_max,
        };

        BrokerConfig::new(
            self.queue_names.clone(),
            self.queue_length,
            self.max_subscribers,
        )
        .with_callback_timeout(Duration::from_millis(self.callback_timeout_ms))
        .with_delivery_workers(self.delivery_workers.unwrap_or_else(default_delivery_workers))
        .with_restart_policy(restart)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .list_separator(",")
        .with_list_parse_key("queue_names")
        .try_parsing(true)
}
