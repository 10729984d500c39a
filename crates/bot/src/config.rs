use std::fmt;

use shelfbot_core::delivery::DeliveryConfig;
use shelfbot_core::dispatch::RetryPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Bot configuration loaded from environment variables.
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub database_url: String,
    /// Bot API root (default: `https://api.telegram.org`).
    pub telegram_api_url: String,
    /// Requested items per page; clamped to the sink ceiling at startup.
    pub batch_size: usize,
    /// Leading items of a VIP resource visible without elevation.
    pub free_view_limit: usize,
    /// Where the upgrade prompt sends users, if anywhere.
    pub vip_recharge_url: Option<String>,
    pub dispatch_max_attempts: u32,
    /// Upper bound on handling a single update, in seconds.
    pub handler_timeout_secs: u64,
    /// Long-poll wait passed to `getUpdates`, in seconds.
    pub poll_timeout_secs: u64,
    pub health_host: String,
    pub health_port: u16,
}

impl BotConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `BOT_TOKEN`             | required                   |
    /// | `DATABASE_URL`          | required                   |
    /// | `TELEGRAM_API_URL`      | `https://api.telegram.org` |
    /// | `BATCH_SIZE`            | `10`                       |
    /// | `FREE_VIEW_LIMIT`       | `0`                        |
    /// | `VIP_RECHARGE_URL`      | unset                      |
    /// | `DISPATCH_MAX_ATTEMPTS` | `3`                        |
    /// | `HANDLER_TIMEOUT_SECS`  | `30`                       |
    /// | `POLL_TIMEOUT_SECS`     | `25`                       |
    /// | `HEALTH_HOST`           | `0.0.0.0`                  |
    /// | `HEALTH_PORT`           | `8080`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            database_url: required("DATABASE_URL")?,
            telegram_api_url: var("TELEGRAM_API_URL")
                .unwrap_or_else(|| "https://api.telegram.org".into()),
            batch_size: parse(&var, "BATCH_SIZE", 10)?,
            free_view_limit: parse(&var, "FREE_VIEW_LIMIT", 0)?,
            vip_recharge_url: var("VIP_RECHARGE_URL"),
            dispatch_max_attempts: parse(&var, "DISPATCH_MAX_ATTEMPTS", 3)?,
            handler_timeout_secs: parse(&var, "HANDLER_TIMEOUT_SECS", 30)?,
            poll_timeout_secs: parse(&var, "POLL_TIMEOUT_SECS", 25)?,
            health_host: var("HEALTH_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            health_port: parse(&var, "HEALTH_PORT", 8080)?,
        })
    }

    /// Delivery settings, with the batch size clamped to `sink_ceiling`.
    pub fn delivery(&self, sink_ceiling: usize) -> DeliveryConfig {
        DeliveryConfig::new(self.batch_size, self.free_view_limit, sink_ceiling)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.dispatch_max_attempts,
            ..RetryPolicy::default()
        }
    }
}

fn parse<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key,
            value: raw,
        }),
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("telegram_api_url", &self.telegram_api_url)
            .field("batch_size", &self.batch_size)
            .field("free_view_limit", &self.free_view_limit)
            .field("vip_recharge_url", &self.vip_recharge_url)
            .field("dispatch_max_attempts", &self.dispatch_max_attempts)
            .field("handler_timeout_secs", &self.handler_timeout_secs)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("health_host", &self.health_host)
            .field("health_port", &self.health_port)
            .finish_non_exhaustive()
    }
}
