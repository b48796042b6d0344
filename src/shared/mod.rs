pub mod errors;
pub mod macros;
pub mod structs;

pub use errors::ConfigError;
pub use errors::ElevatorError;
pub use structs::ElevatorState;
pub use structs::Event;
pub use structs::MacroStep;
pub use structs::Motion;
pub use structs::Phase;
pub use structs::StateName;
pub use structs::Transition;
