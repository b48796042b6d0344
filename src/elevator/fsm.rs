use crate::config::{ElevatorConfig, RuntimeConfig};
use crate::elevator::clock::WallClock;
use crate::elevator::interpreter::Interpreter;
use crate::shared::{ElevatorError, ElevatorState, MacroStep};
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::time::Duration;

/**
 * Runs the elevator statechart on its own thread.
 *
 * The `ElevatorFSM` owns an interpreter driven by the wall clock. Floor requests arrive over a
 * channel, the door timer is polled on every tick, and every state the elevator passes through is
 * published to whoever listens on `state_tx`.
 *
 * # Fields
 * - `floor_request_rx`:        Receives floor selections (may be negative, those are rejected).
 * - `terminate_rx`:            Stops the main loop.
 * - `state_tx`:                Broadcasts the state after every transition.
 * - `rejected_tx`:             Reports floor selections that were refused.
 * - `macro_step_tx`:           Forwards the trace of every step (event, transition, exited and entered states).
 * - `interpreter`:             The statechart interpreter.
 * - `tick`:                    Polling interval of the door timer.
 *
 */

enum Event {
    FloorRequested(i32),
    Tick,
    Terminate,
}

pub struct ElevatorFSM {
    // Input channels
    floor_request_rx: cbc::Receiver<i32>,
    terminate_rx: cbc::Receiver<()>,

    // Output channels
    state_tx: cbc::Sender<ElevatorState>,
    rejected_tx: cbc::Sender<ElevatorError>,

    // Private fields
    interpreter: Interpreter<WallClock>,
    tick: Duration,
}

impl ElevatorFSM {
    pub fn new(
        config: &ElevatorConfig,
        runtime: &RuntimeConfig,
        floor_request_rx: cbc::Receiver<i32>,
        terminate_rx: cbc::Receiver<()>,
        state_tx: cbc::Sender<ElevatorState>,
        rejected_tx: cbc::Sender<ElevatorError>,
        macro_step_tx: cbc::Sender<MacroStep>,
    ) -> ElevatorFSM {
        let mut interpreter = Interpreter::new(config, WallClock::new());
        interpreter.bind(move |step: &MacroStep| {
            let _ = macro_step_tx.send(step.clone());
        });

        ElevatorFSM {
            floor_request_rx,
            terminate_rx,
            state_tx,
            rejected_tx,
            interpreter,
            tick: Duration::from_millis(runtime.tick),
        }
    }

    pub fn run(mut self) -> Result<ElevatorState, ElevatorError> {
        // Publish the initial state
        let _ = self.state_tx.send(self.interpreter.state().clone());

        // Main loop
        loop {
            let event = cbc::select! {
                recv(self.floor_request_rx) -> floor => {
                    match floor {
                        Ok(f) => Event::FloorRequested(f),
                        Err(e) => {
                            error!("Error receiving from floor_request_rx: {}", e);
                            Event::Terminate
                        }
                    }
                }
                recv(self.terminate_rx) -> _ => Event::Terminate,
                default(self.tick) => Event::Tick,
            };

            if !self.handle_event(event)? {
                info!("Elevator FSM terminated at {}", self.interpreter.state());
                return Ok(self.interpreter.state().clone());
            }
        }
    }

    /// Returns `false` once the loop should stop.
    fn handle_event(&mut self, event: Event) -> Result<bool, ElevatorError> {
        match event {
            Event::FloorRequested(floor) => {
                if let Err(e) = self.interpreter.select_floor(floor) {
                    warn!("Rejected floor request: {}", e);
                    let _ = self.rejected_tx.send(e);
                }
                self.step()?;
            }
            Event::Tick => self.step()?,
            Event::Terminate => return Ok(false),
        }
        Ok(true)
    }

    /// Runs every enabled transition, publishing the state after each one.
    fn step(&mut self) -> Result<(), ElevatorError> {
        while self.interpreter.execute_once()?.is_some() {
            let _ = self.state_tx.send(self.interpreter.state().clone());
        }
        Ok(())
    }
}
