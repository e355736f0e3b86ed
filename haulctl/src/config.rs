//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `config.yaml` and can be set via
//! `-f` or `HAULCTL_CONFIG`.
//!
//! Sources are merged in order (later overrides earlier):
//!
//! 1. YAML config file
//! 2. Environment variables prefixed with `HAULCTL_` (double underscore for
//!    nesting, e.g. `HAULCTL_DATABASE__URL`)
//! 3. `DATABASE_URL` - special case, overrides `database.url` when set

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::password::Argon2Params;

/// Simple CLI args - just for specifying the config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "HAULCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Base URL where the service is reachable; used to build the absolute
    /// URLs returned by the upload endpoint
    pub public_url: String,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Upload side-channel settings
    pub uploads: UploadConfig,
    /// Argon2 parameters for the driver credential hash
    pub password: Argon2Params,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8300,
            public_url: "http://localhost:8300".to_string(),
            database: DatabaseConfig::default(),
            uploads: UploadConfig::default(),
            password: Argon2Params::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite connection URL; the file is created when missing
    pub url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://haulctl.db".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Directory uploaded images are stored in (served under /uploads)
    pub dir: PathBuf,
    /// Maximum accepted file size in bytes
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_file_size: 5 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from the YAML file and environment overrides.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let figment = Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("HAULCTL_").split("__"));

        let mut config: Config = figment.extract()?;

        // DATABASE_URL wins over everything else for the database location
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8300");
        assert_eq!(config.uploads.max_file_size, 5 * 1024 * 1024);
        assert!(config.database.url.starts_with("sqlite://"));
    }

    #[test]
    fn env_overrides_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "port: 9000\ndatabase:\n  url: sqlite://from-yaml.db\n")?;
            jail.set_env("HAULCTL_DATABASE__URL", "sqlite://from-env.db");

            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args).expect("config should load");
            assert_eq!(config.port, 9000);
            assert_eq!(config.database.url, "sqlite://from-env.db");
            Ok(())
        });
    }
}
