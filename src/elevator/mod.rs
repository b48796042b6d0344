pub mod clock;
pub mod console;
pub mod fsm;
pub mod interpreter;
pub mod queue;
pub mod statechart;

mod fsm_tests;

pub use clock::{Clock, SimulatedClock, WallClock};
pub use console::ConsoleInput;
pub use fsm::ElevatorFSM;
pub use interpreter::Interpreter;
pub use statechart::{MicroStep, Statechart};
