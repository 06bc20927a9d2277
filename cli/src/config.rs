//! Layered configuration resolution: defaults, then a TOML file (if
//! `HOLDEM_CONFIG` points at one), then environment variables, each layer
//! overriding the last and recording which layer won for `cfg`'s benefit.

use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub starting_stack: u64,
    pub blind_time_secs: u64,
    pub starting_level: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub starting_stack: ValueSource,
    pub blind_time_secs: ValueSource,
    pub starting_level: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_stack: ValueSource::Default,
            blind_time_secs: ValueSource::Default,
            starting_level: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_stack: 20_000,
            blind_time_secs: 600,
            starting_level: 1,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("HOLDEM_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.blind_time_secs {
            cfg.blind_time_secs = v;
            sources.blind_time_secs = ValueSource::File;
        }
        if let Some(v) = f.starting_level {
            cfg.starting_level = v;
            sources.starting_level = ValueSource::File;
        }
    }

    if let Ok(v) = std::env::var("HOLDEM_STARTING_STACK")
        && !v.is_empty()
    {
        cfg.starting_stack = v
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid starting_stack".into()))?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Ok(v) = std::env::var("HOLDEM_BLIND_TIME_SECS")
        && !v.is_empty()
    {
        cfg.blind_time_secs = v
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid blind_time_secs".into()))?;
        sources.blind_time_secs = ValueSource::Env;
    }
    if let Ok(v) = std::env::var("HOLDEM_STARTING_LEVEL")
        && !v.is_empty()
    {
        cfg.starting_level = v
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid starting_level".into()))?;
        sources.starting_level = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    starting_stack: Option<u64>,
    #[serde(default)]
    blind_time_secs: Option<u64>,
    #[serde(default)]
    starting_level: Option<u32>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.starting_level == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_level must be >=1".into(),
        ));
    }
    if cfg.starting_stack == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_stack must be >0".into(),
        ));
    }
    if cfg.blind_time_secs == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: blind_time_secs must be >0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_when_unset() {
        unsafe {
            std::env::remove_var("HOLDEM_CONFIG");
            std::env::remove_var("HOLDEM_STARTING_STACK");
            std::env::remove_var("HOLDEM_BLIND_TIME_SECS");
            std::env::remove_var("HOLDEM_STARTING_LEVEL");
        }
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config, Config::default());
    }

    #[test]
    #[serial]
    fn env_overrides_default() {
        unsafe {
            std::env::remove_var("HOLDEM_CONFIG");
            std::env::set_var("HOLDEM_STARTING_STACK", "5000");
        }
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config.starting_stack, 5000);
        unsafe {
            std::env::remove_var("HOLDEM_STARTING_STACK");
        }
    }

    #[test]
    #[serial]
    fn rejects_zero_starting_level() {
        unsafe {
            std::env::remove_var("HOLDEM_CONFIG");
            std::env::set_var("HOLDEM_STARTING_LEVEL", "0");
        }
        let result = load_with_sources();
        unsafe {
            std::env::remove_var("HOLDEM_STARTING_LEVEL");
        }
        assert!(result.is_err());
    }
}
