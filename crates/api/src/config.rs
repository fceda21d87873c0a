use anyhow::{bail, Context};
use std::net::SocketAddr;

const PREFIX: &str = "TIMETABLE__";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub seed_demo_data: bool,
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            log_format: LogFormat::Json,
            seed_demo_data: true,
            rng_seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, which receives full variable names
    /// such as `TIMETABLE__SERVER__PORT`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |name: &str| {
            lookup(&format!("{PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Self::default();

        if let Some(host) = get("SERVER__HOST") {
            cfg.host = host;
        }
        if let Some(port) = get("SERVER__PORT") {
            cfg.port = port
                .parse()
                .with_context(|| format!("{PREFIX}SERVER__PORT: invalid port {port:?}"))?;
        }
        if let Some(format) = get("LOG__FORMAT") {
            cfg.log_format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                other => bail!("{PREFIX}LOG__FORMAT: expected json or pretty, got {other:?}"),
            };
        }
        if let Some(flag) = get("SEED_DEMO_DATA") {
            cfg.seed_demo_data = parse_bool(&flag)
                .with_context(|| format!("{PREFIX}SEED_DEMO_DATA: invalid flag {flag:?}"))?;
        }
        if let Some(seed) = get("RNG_SEED") {
            cfg.rng_seed = Some(
                seed.parse()
                    .with_context(|| format!("{PREFIX}RNG_SEED: invalid seed {seed:?}"))?,
            );
        }
        Ok(cfg)
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (format!("{PREFIX}{k}"), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.listen_addr().unwrap().port(), 8080);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = load(&[
            ("SERVER__HOST", "127.0.0.1"),
            ("SERVER__PORT", "9090"),
            ("LOG__FORMAT", "Pretty"),
            ("SEED_DEMO_DATA", "false"),
            ("RNG_SEED", "42"),
        ])
        .unwrap();
        assert_eq!(cfg.listen_addr().unwrap().to_string(), "127.0.0.1:9090");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert!(!cfg.seed_demo_data);
        assert_eq!(cfg.rng_seed, Some(42));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = load(&[("SERVER__PORT", "  "), ("RNG_SEED", "")]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.rng_seed, None);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(load(&[("SERVER__PORT", "eighty")]).is_err());
        assert!(load(&[("LOG__FORMAT", "xml")]).is_err());
        assert!(load(&[("SEED_DEMO_DATA", "maybe")]).is_err());
        assert!(load(&[("RNG_SEED", "-1")]).is_err());
    }
}
