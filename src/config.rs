use crate::errors::ConfigError;
use std::env;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    pub host: String,
    pub port: u16,
}

impl MonitorConfig {
    /// Reads `MONITOR_HOST` and `MONITOR_PORT`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("MONITOR_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("MONITOR_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        Ok(MonitorConfig { host, port })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod test {
    use super::MonitorConfig;
    use crate::errors::ConfigError;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = MonitorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn reads_host_and_port() {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("MONITOR_HOST", "127.0.0.1"),
            ("MONITOR_PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn rejects_bad_port() {
        let err = MonitorConfig::from_lookup(lookup(&[("MONITOR_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(ref raw) if raw == "http"));
    }
}
