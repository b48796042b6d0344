/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::StateName;

/***************************************/
/*               Errors                */
/***************************************/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElevatorError {
    #[error("invalid floor {floor}: floors below ground do not exist")]
    InvalidFloor { floor: i32 },

    #[error("floor {floor} is above the top floor {top}")]
    FloorOutOfRange { floor: i32, top: u32 },

    #[error("invariant violated: {0}")]
    InvariantViolated(String),

    #[error("transition {from} -> {to} is not enabled")]
    NotEnabled { from: StateName, to: StateName },

    #[error("clock cannot go backwards")]
    ClockWentBackwards,

    #[error("delay of {0:?} overflows the clock")]
    DelayOutOfRange(Duration),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
