use std::env;

use log::warn;

/// Server configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub ping_message: String,
    /// When set, OTP codes are echoed back in API responses instead of
    /// only being written to the log. Strictly a demo convenience; a real
    /// deployment delivers codes out-of-band and never enables this.
    pub insecure_demo_otp: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let config = Self {
            port: env_or("PORT", "3000"),
            ping_message: env::var("PING_MESSAGE").unwrap_or_else(|_| "ping".to_string()),
            insecure_demo_otp: flag("INSECURE_DEMO_OTP"),
        };
        if config.insecure_demo_otp {
            warn!("INSECURE_DEMO_OTP is enabled; OTP codes will be returned in API responses");
        }
        config
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: &str) -> T
where
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    match raw.parse() {
        Ok(v) => v,
        Err(e) => {
            warn!("invalid {key} value {raw:?} ({e}), using default {default}");
            default.parse().ok().expect("default must parse")
        }
    }
}

fn flag(key: &str) -> bool {
    matches!(
        env::var(key).unwrap_or_default().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
