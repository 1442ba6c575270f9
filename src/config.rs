use crate::cli::Cli;
use crate::location::Location;
use crate::logging::LoggingOptions;
use crate::monitor::MonitorOptions;
use crate::retry::RetryPolicy;
use crate::weather::Units;
use anyhow::{anyhow, Result};
use etcetera::{choose_app_strategy, AppStrategy, AppStrategyArgs};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const ENV_PREFIX: &str = "SKYGLANCE_";

#[derive(Debug)]
pub struct Config {
    pub config_path: PathBuf,
    pub main: MainConfig,
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct MainConfig {
    pub log_dir: PathBuf,
    pub locations: Vec<String>,
    pub logging: LoggingOptions,
    pub current_fstring: String,
    pub units: Units,
    pub unsplash_access_key: Option<String>,
    pub monitor: MonitorOptions,
    pub retry: RetryPolicy,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            log_dir: Config::default_dirs().cache.clone(),
            locations: Vec::new(),
            logging: LoggingOptions::default(),
            current_fstring: "{icon} {temp}° {text} ({min_temp}°/{max_temp}°)".to_string(),
            units: Units::default(),
            unsplash_access_key: None,
            monitor: MonitorOptions::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let mut path = PathBuf::from(&Self::default_dirs().config);
        path.push("config.yml");
        path
    }

    pub fn default_dirs() -> &'static DefaultDirs {
        DEFAULT_DIRS.get_or_init(|| match choose_app_strategy(AppStrategyArgs {
            top_level_domain: "org".to_string(),
            author: "sublipri".to_string(),
            app_name: "skyglance".to_string(),
        }) {
            Ok(strategy) => DefaultDirs {
                config: strategy.config_dir(),
                cache: strategy.cache_dir(),
            },
            // No home directory, fall back to the working directory
            Err(_) => DefaultDirs {
                config: PathBuf::from("."),
                cache: PathBuf::from("."),
            },
        })
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::from(Serialized::defaults(MainConfig::default()))
            .merge(Yaml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_path(config_path: &Path) -> Result<Self> {
        let main = Self::figment(config_path).extract()?;
        Ok(Self {
            config_path: config_path.to_owned(),
            main,
        })
    }

    pub fn from_cli(args: &Cli) -> Result<Self> {
        let config_path = if let Some(path) = &args.config_path {
            path.to_owned()
        } else {
            Self::default_path()
        };

        let main = Self::figment(&config_path)
            .merge(Serialized::defaults(args))
            .extract()?;

        Ok(Config { config_path, main })
    }

    pub fn write_config_file(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(&self.main)?;
        fs::write(&self.config_path, yaml)?;
        Ok(())
    }

    pub fn add_location(&mut self, location: &Location) -> Result<()> {
        if self.main.locations.contains(&location.id) {
            return Err(anyhow!(
                "{} already in {}",
                location.id,
                self.config_path.display()
            ));
        }
        info!("Adding {} to {}", location.id, self.config_path.display());
        self.main.locations.push(location.id.to_owned());
        self.write_config_file()?;
        Ok(())
    }
}

static DEFAULT_DIRS: OnceCell<DefaultDirs> = OnceCell::new();

#[derive(Debug)]
pub struct DefaultDirs {
    pub config: PathBuf,
    pub cache: PathBuf,
}
