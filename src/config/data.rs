use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ArcPath, ArcStr, log::LogLevel};

/// Options for path-based configuration values.
#[derive(Debug, Clone, Copy)]
pub enum PathOpt {
    /// Directory where log files are stored
    LogDir,
}

/// Options for numeric configuration values.
#[derive(Debug, Clone, Copy)]
pub enum USizeOpt {
    /// Maximum age of log files in days before they are deleted
    MaxAge,
    /// Timeout for feed requests in seconds
    Timeout,
}

/// Options for duration configuration values, stored as whole seconds.
#[derive(Debug, Clone, Copy)]
pub enum DurationOpt {
    /// How long a fetched feed stays in the cache
    CacheTtl,
    /// How often expired cache entries are reclaimed
    SweepInterval,
}

/// Options for string configuration values.
#[derive(Debug, Clone, Copy)]
pub enum StrOpt {
    /// Address the HTTP server listens on
    BindAddress,
}

/// The configuration data structure that holds all configurable values.
///
/// Missing keys in a configuration file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    /// Directory where log files are stored
    log_dir: ArcPath,
    /// Minimum level printed to stderr
    log_level: LogLevel,
    /// Maximum age of log files in days before they are deleted
    max_age: usize,
    /// Timeout for feed requests in seconds
    timeout: usize,
    /// Cache entry time-to-live in seconds
    cache_ttl: u64,
    /// Cache reclamation period in seconds
    sweep_interval: u64,
    /// Address the HTTP server listens on
    bind_address: ArcStr,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            log_dir: ArcPath::from("/tmp/newsfeed/logs"),
            log_level: LogLevel::Warning,
            max_age: 0,
            timeout: 10,
            cache_ttl: 5 * 60,
            sweep_interval: 60,
            bind_address: ArcStr::from("127.0.0.1:8080"),
        }
    }
}

impl Data {
    pub fn path(&self, opt: PathOpt) -> ArcPath {
        match opt {
            PathOpt::LogDir => self.log_dir.clone(),
        }
    }

    pub fn set_path(&mut self, opt: PathOpt, path: ArcPath) {
        match opt {
            PathOpt::LogDir => self.log_dir = path,
        }
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.log_level = level;
    }

    pub fn usize(&self, opt: USizeOpt) -> usize {
        match opt {
            USizeOpt::MaxAge => self.max_age,
            USizeOpt::Timeout => self.timeout,
        }
    }

    pub fn set_usize(&mut self, opt: USizeOpt, value: usize) {
        match opt {
            USizeOpt::MaxAge => self.max_age = value,
            USizeOpt::Timeout => self.timeout = value,
        }
    }

    pub fn duration(&self, opt: DurationOpt) -> Duration {
        match opt {
            DurationOpt::CacheTtl => Duration::from_secs(self.cache_ttl),
            DurationOpt::SweepInterval => Duration::from_secs(self.sweep_interval),
        }
    }

    /// Sets a duration value, truncated to whole seconds.
    pub fn set_duration(&mut self, opt: DurationOpt, value: Duration) {
        match opt {
            DurationOpt::CacheTtl => self.cache_ttl = value.as_secs(),
            DurationOpt::SweepInterval => self.sweep_interval = value.as_secs(),
        }
    }

    pub fn string(&self, opt: StrOpt) -> ArcStr {
        match opt {
            StrOpt::BindAddress => self.bind_address.clone(),
        }
    }

    pub fn set_string(&mut self, opt: StrOpt, value: ArcStr) {
        match opt {
            StrOpt::BindAddress => self.bind_address = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_default_values() {
        let data = Data::default();
        assert_eq!(data.log_level(), LogLevel::Warning);
        assert_eq!(
            data.path(PathOpt::LogDir).to_str().unwrap(),
            "/tmp/newsfeed/logs"
        );
        assert_eq!(data.usize(USizeOpt::MaxAge), 0);
        assert_eq!(data.usize(USizeOpt::Timeout), 10);
        assert_eq!(
            data.duration(DurationOpt::CacheTtl),
            Duration::from_secs(300)
        );
        assert_eq!(
            data.duration(DurationOpt::SweepInterval),
            Duration::from_secs(60)
        );
        assert_eq!(data.string(StrOpt::BindAddress).as_str(), "127.0.0.1:8080");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let data: Data = toml::from_str("cache_ttl = 30\nlog_level = \"Info\"\n").unwrap();
        assert_eq!(data.duration(DurationOpt::CacheTtl), Duration::from_secs(30));
        assert_eq!(data.log_level(), LogLevel::Info);
        assert_eq!(
            data.duration(DurationOpt::SweepInterval),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut data = Data::default();
        data.set_duration(DurationOpt::SweepInterval, Duration::from_millis(2500));
        data.set_string(StrOpt::BindAddress, ArcStr::from("0.0.0.0:9000"));

        let text = toml::to_string(&data).unwrap();
        let back: Data = toml::from_str(&text).unwrap();
        assert_eq!(back, data);
        assert_eq!(
            back.duration(DurationOpt::SweepInterval),
            Duration::from_secs(2)
        );
    }
}
