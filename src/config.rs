/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::ConfigError;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub elevator: ElevatorConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Eventless transitions run before a queued selection is consumed.
    Deferred,
    /// A queued selection is consumed before eventless transitions.
    Immediate,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::Deferred
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    /// Milliseconds
    pub door_open_time: u64,
    pub top_floor: Option<u32>,
    pub selection_policy: SelectionPolicy,
    pub check_contracts: bool,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            door_open_time: 10_000,
            top_floor: None,
            selection_policy: SelectionPolicy::Deferred,
            check_contracts: true,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Milliseconds
    pub tick: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig { tick: 50 }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elevator.door_open_time == 0 {
            return Err(ConfigError::Invalid(
                "elevator.door_open_time must be greater than zero".into(),
            ));
        }
        if self.runtime.tick == 0 {
            return Err(ConfigError::Invalid(
                "runtime.tick must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Applies the `--door-open-time` command line override.
    pub fn override_door_open_time(&mut self, value: &str) -> Result<(), ConfigError> {
        self.elevator.door_open_time = value.trim().parse::<u64>().map_err(|e| {
            ConfigError::Invalid(format!(
                "--door-open-time expects milliseconds, got '{}': {}",
                value, e
            ))
        })?;
        self.validate()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
