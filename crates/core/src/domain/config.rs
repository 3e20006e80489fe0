// Broker configuration (loaded once at startup by the composition root)

use super::error::{DomainError, Result};
use std::collections::HashSet;
use std::time::Duration;

/// Default callback timeout when none is configured (5s)
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(5);

/// First restart delay after a dispatcher fault (100ms)
pub const DEFAULT_RESTART_BACKOFF_FIRST: Duration = Duration::from_millis(100);

/// Upper bound for the restart delay (10s)
pub const DEFAULT_RESTART_BACKOFF_MAX: Duration = Duration::from_secs(10);

/// Uptime after which a dispatcher run counts as healthy and the backoff resets (30s)
pub const DEFAULT_RESTART_STABLE_AFTER: Duration = Duration::from_secs(30);

/// Fallback pool size when available parallelism cannot be queried
pub const FALLBACK_DELIVERY_WORKERS: usize = 4;

/// Broker configuration
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub queue_names: Vec<String>,
    /// Per-queue buffer capacity
    pub queue_length: usize,
    /// Per-queue subscriber capacity
    pub max_subscribers: usize,
    /// Hard bound for one delivery attempt
    pub callback_timeout: Duration,
    /// Maximum number of concurrent fan-out operations, process-wide
    pub delivery_workers: usize,
    pub restart: RestartPolicy,
}

impl BrokerConfig {
    pub fn new(queue_names: Vec<String>, queue_length: usize, max_subscribers: usize) -> Self {
        Self {
            queue_names,
            queue_length,
            max_subscribers,
            callback_timeout: DEFAULT_CALLBACK_TIMEOUT,
            delivery_workers: default_delivery_workers(),
            restart: RestartPolicy::default(),
        }
    }

    pub fn with_callback_timeout(mut self, timeout: Duration) -> Self {
        self.callback_timeout = timeout;
        self
    }

    pub fn with_delivery_workers(mut self, workers: usize) -> Self {
        self.delivery_workers = workers;
        self
    }

    pub fn with_restart_policy(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    /// Reject configurations the broker cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.queue_names.is_empty() {
            return Err(DomainError::InvalidConfig(
                "at least one queue name is required".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.queue_names.len());
        for name in &self.queue_names {
            if name.trim().is_empty() {
                return Err(DomainError::InvalidConfig(
                    "queue name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(DomainError::InvalidConfig(format!(
                    "duplicate queue name: {}",
                    name
                )));
            }
        }

        if self.queue_length == 0 {
            return Err(DomainError::InvalidConfig(
                "queue_length must be greater than 0".to_string(),
            ));
        }
        if self.max_subscribers == 0 {
            return Err(DomainError::InvalidConfig(
                "max_subscribers must be greater than 0".to_string(),
            ));
        }
        if self.callback_timeout.is_zero() {
            return Err(DomainError::InvalidConfig(
                "callback_timeout must be greater than 0".to_string(),
            ));
        }
        if self.delivery_workers == 0 {
            return Err(DomainError::InvalidConfig(
                "delivery_workers must be greater than 0".to_string(),
            ));
        }

        self.restart.validate()
    }
}

/// Pool size derived from the host's available parallelism
pub fn default_delivery_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_DELIVERY_WORKERS)
}

/// Restart policy for the supervised dispatcher.
///
/// The delay before restart `n` (0-indexed) is `backoff_first × backoff_factor^n`,
/// clamped to `backoff_max`. A run that stays up for `stable_after` resets `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestartPolicy {
    pub backoff_first: Duration,
    pub backoff_max: Duration,
    pub backoff_factor: f64,
    pub stable_after: Duration,
    /// Give up after this many consecutive restarts (`None` = never)
    pub max_restarts: Option<u32>,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            backoff_first: DEFAULT_RESTART_BACKOFF_FIRST,
            backoff_max: DEFAULT_RESTART_BACKOFF_MAX,
            backoff_factor: 2.0,
            stable_after: DEFAULT_RESTART_STABLE_AFTER,
            max_restarts: None,
        }
    }
}

impl RestartPolicy {
    /// Restart immediately-ish, for tests and embedded use
    pub fn immediate() -> Self {
        Self {
            backoff_first: Duration::from_millis(1),
            backoff_max: Duration::from_millis(10),
            backoff_factor: 1.0,
            stable_after: Duration::from_millis(10),
            max_restarts: None,
        }
    }

    /// Delay before the given restart attempt (0-indexed)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let max_secs = self.backoff_max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let secs = self.backoff_first.as_secs_f64() * self.backoff_factor.powi(exp);

        if !secs.is_finite() || secs < 0.0 || secs > max_secs {
            self.backoff_max
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    /// Whether `restarts` consecutive restarts exhaust the policy
    pub fn is_exhausted(&self, restarts: u32) -> bool {
        matches!(self.max_restarts, Some(max) if restarts > max)
    }

    fn validate(&self) -> Result<()> {
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(DomainError::InvalidConfig(format!(
                "restart backoff factor must be >= 1.0, got {}",
                self.backoff_factor
            )));
        }
        if self.backoff_first > self.backoff_max {
            return Err(DomainError::InvalidConfig(
                "restart backoff first delay exceeds max delay".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BrokerConfig {
        BrokerConfig::new(vec!["orders".to_string(), "events".to_string()], 2, 1)
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_empty_queue_list_rejected() {
        let cfg = BrokerConfig::new(vec![], 2, 1);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("at least one queue"));
    }

    #[test]
    fn test_duplicate_queue_name_rejected() {
        let cfg = BrokerConfig::new(vec!["orders".to_string(), "orders".to_string()], 2, 1);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_blank_queue_name_rejected() {
        let cfg = BrokerConfig::new(vec!["  ".to_string()], 2, 1);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(BrokerConfig::new(vec!["a".to_string()], 0, 1).validate().is_err());
        assert!(BrokerConfig::new(vec!["a".to_string()], 1, 0).validate().is_err());
        assert!(config()
            .with_callback_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(config().with_delivery_workers(0).validate().is_err());
    }

    #[test]
    fn test_default_workers_nonzero() {
        assert!(default_delivery_workers() > 0);
    }

    #[test]
    fn test_restart_backoff_grows_and_caps() {
        let policy = RestartPolicy {
            backoff_first: Duration::from_millis(100),
            backoff_max: Duration::from_secs(1),
            backoff_factor: 2.0,
            ..RestartPolicy::default()
        };

        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for(4), Duration::from_secs(1));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(1));
    }

    #[test]
    fn test_stable_after_independent_of_backoff_cap() {
        let policy = RestartPolicy::default();
        assert_eq!(policy.stable_after, DEFAULT_RESTART_STABLE_AFTER);
        assert_eq!(policy.backoff_max, DEFAULT_RESTART_BACKOFF_MAX);
        assert_ne!(policy.stable_after, policy.backoff_max);
    }

    #[test]
    fn test_restart_limit() {
        let mut policy = RestartPolicy::default();
        assert!(!policy.is_exhausted(1_000));

        policy.max_restarts = Some(3);
        assert!(!policy.is_exhausted(3));
        assert!(policy.is_exhausted(4));
    }

    #[test]
    fn test_restart_factor_below_one_rejected() {
        let policy = RestartPolicy {
            backoff_factor: 0.5,
            ..RestartPolicy::default()
        };
        assert!(config().with_restart_policy(policy).validate().is_err());
    }
}
