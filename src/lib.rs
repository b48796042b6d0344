/* Modules */
pub mod config;
pub mod elevator;
pub mod shared;

pub use elevator::{ElevatorFSM, Interpreter, SimulatedClock, Statechart, WallClock};
pub use shared::{ElevatorError, ElevatorState};
