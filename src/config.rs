use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "psl_2025_matches.csv";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Runtime settings for the dashboard
///
/// Sources, lowest precedence first:
/// 1. built-in defaults
/// 2. `PSL_DATA_PATH`, `PSL_BIND_ADDR`, `PSL_STATIC_DIR` (a `.env` file is
///    read first by the binaries)
/// 3. positional arguments `[data-path] [bind-addr]`
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl Config {
    /// Build the configuration from the process arguments and environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Build the configuration from explicit sources
    ///
    /// # Arguments
    /// * `args` - Positional arguments, without the program name
    /// * `env` - Lookup for environment variables
    pub fn from_sources<I, F>(args: I, env: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();

        let data_path = args
            .next()
            .or_else(|| env("PSL_DATA_PATH"))
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

        let bind_addr = args
            .next()
            .or_else(|| env("PSL_BIND_ADDR"))
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_addr.clone(),
                source,
            })?;

        let static_dir = env("PSL_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());

        Ok(Config {
            data_path: PathBuf::from(data_path),
            bind_addr,
            static_dir: PathBuf::from(static_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_sources() {
        let config = Config::from_sources(Vec::new(), env_of(&[])).unwrap();
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
    }

    #[test]
    fn arguments_override_environment() {
        let env = env_of(&[
            ("PSL_DATA_PATH", "env.csv"),
            ("PSL_BIND_ADDR", "0.0.0.0:9000"),
            ("PSL_STATIC_DIR", "assets"),
        ]);
        let config = Config::from_sources(vec!["arg.csv".to_string()], env).unwrap();
        assert_eq!(config.data_path, PathBuf::from("arg.csv"));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.static_dir, PathBuf::from("assets"));
    }

    #[test]
    fn rejects_bad_bind_address() {
        let err = Config::from_sources(
            vec!["data.csv".to_string(), "localhost".to_string()],
            env_of(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    }
}
