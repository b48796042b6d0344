/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use std::fmt;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{ElevatorConfig, SelectionPolicy};
use crate::elevator::clock::Clock;
use crate::elevator::queue::EventQueue;
use crate::elevator::statechart::{MicroStep, Statechart};
use crate::shared::{ElevatorError, ElevatorState, Event, MacroStep, Motion, Phase, StateName};

/**
 * Discrete interpreter for the elevator statechart.
 *
 * Every call to `execute_once` reads the clock once, fires at most one
 * transition and checks the state invariants afterwards. Floor selections are
 * validated when they are queued, so a rejected request never reaches the
 * statechart.
 *
 * # Fields
 * - `statechart`:          The state record and transition function.
 * - `queue`:               External events waiting to be consumed.
 * - `clock`:               Time source, simulated in tests and wall time in the runtime.
 * - `time`:                Clock reading of the latest step.
 * - `door_open_time`:      How long the doors stay open before an idle elevator returns to ground.
 * - `doors_opened_at`:     Entry time of `doorsOpen`, `None` while the doors are closed.
 * - `top_floor`:           Highest floor that can be selected, if any.
 * - `selection_policy`:    Whether queued selections wait for the elevator to settle.
 * - `check_contracts`:     Check the invariants after every step.
 * - `listeners`:           Callables bound with `bind`, called with every macro step.
 */
pub struct Interpreter<C: Clock> {
    statechart: Statechart,
    queue: EventQueue,
    clock: C,
    time: Duration,
    door_open_time: Duration,
    doors_opened_at: Option<Duration>,
    top_floor: Option<u32>,
    selection_policy: SelectionPolicy,
    check_contracts: bool,
    listeners: Vec<Box<dyn FnMut(&MacroStep) + Send>>,
}

impl<C: Clock> Interpreter<C> {
    pub fn new(config: &ElevatorConfig, clock: C) -> Interpreter<C> {
        let time = clock.time();
        Interpreter {
            statechart: Statechart::new(),
            queue: EventQueue::new(),
            clock,
            time,
            door_open_time: Duration::from_millis(config.door_open_time),
            doors_opened_at: Some(time),
            top_floor: config.top_floor,
            selection_policy: config.selection_policy,
            check_contracts: config.check_contracts,
            listeners: Vec::new(),
        }
    }

    /// Binds `listener`, called with every macro step once it is complete.
    pub fn bind<F>(&mut self, listener: F)
    where
        F: FnMut(&MacroStep) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> &ElevatorState {
        self.statechart.state()
    }

    pub fn configuration(&self) -> Vec<StateName> {
        self.statechart.configuration()
    }

    /// Time of the latest step.
    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&mut self, event: Event) -> Result<(), ElevatorError> {
        self.queue_delayed(event, Duration::ZERO)
    }

    /// Queues `event`, available once `delay` has elapsed on the clock.
    pub fn queue_delayed(&mut self, event: Event, delay: Duration) -> Result<(), ElevatorError> {
        match event {
            Event::FloorSelected { floor } => {
                self.validate_floor(floor)?;
            }
        }
        let at = self
            .clock
            .time()
            .checked_add(delay)
            .ok_or(ElevatorError::DelayOutOfRange(delay))?;
        self.queue.push(at, event);
        Ok(())
    }

    pub fn select_floor(&mut self, floor: i32) -> Result<(), ElevatorError> {
        self.queue(Event::FloorSelected { floor })
    }

    /// Repeats `execute_once` until nothing is enabled or `max_steps` steps ran.
    pub fn execute(&mut self, max_steps: Option<usize>) -> Result<Vec<MacroStep>, ElevatorError> {
        let mut steps = Vec::new();
        while max_steps.map_or(true, |max| steps.len() < max) {
            match self.execute_once()? {
                Some(step) => steps.push(step),
                None => break,
            }
        }
        Ok(steps)
    }

    /// Fires at most one transition. Returns `None` when nothing was enabled.
    pub fn execute_once(&mut self) -> Result<Option<MacroStep>, ElevatorError> {
        self.time = self.clock.time();

        let door_timer_expired = self.door_timer_expired();
        let eventless = self.statechart.eventless_transition(door_timer_expired);
        let event_available = self.queue.available(self.time).is_some();
        let consume_event = match self.selection_policy {
            SelectionPolicy::Deferred => eventless.is_none() && event_available,
            SelectionPolicy::Immediate => event_available,
        };

        let (event, transition, exited, entered) = if consume_event {
            let event = match self.queue.pop() {
                Some((_, event)) => event,
                None => return Ok(None),
            };
            match event {
                Event::FloorSelected { floor } => {
                    let floor = self.validate_floor(floor)?;
                    let step = MicroStep::FloorSelected(floor);
                    let (exited, entered) = self.statechart.floor_selected(floor);
                    (Some(event), step.transition(), exited, entered)
                }
            }
        } else if let Some(step) = eventless {
            let (exited, entered) = self.statechart.apply(step, door_timer_expired)?;
            (None, step.transition(), exited, entered)
        } else {
            return Ok(None);
        };

        // Door timer
        if exited.contains(&StateName::DoorsOpen) {
            self.doors_opened_at = None;
        }
        if entered.contains(&StateName::DoorsOpen) {
            self.doors_opened_at = Some(self.time);
            info!("Doors open at floor {}", self.state().current);
        }

        if self.check_contracts {
            self.check_invariants()?;
        }

        match event {
            Some(event) => debug!(
                "[{:?}] {} -> {} on {}",
                self.time, transition.source, transition.target, event
            ),
            None => debug!(
                "[{:?}] {} -> {}",
                self.time, transition.source, transition.target
            ),
        }

        let macro_step = MacroStep {
            time: self.time,
            event,
            transition,
            exited,
            entered,
        };
        for listener in self.listeners.iter_mut() {
            listener(&macro_step);
        }
        Ok(Some(macro_step))
    }

    fn door_timer_expired(&self) -> bool {
        match self.doors_opened_at {
            Some(opened_at) => self.time.saturating_sub(opened_at) >= self.door_open_time,
            None => false,
        }
    }

    fn validate_floor(&self, floor: i32) -> Result<u32, ElevatorError> {
        let floor_u32 = u32::try_from(floor).map_err(|_| ElevatorError::InvalidFloor { floor })?;
        match self.top_floor {
            Some(top) if floor_u32 > top => Err(ElevatorError::FloorOutOfRange { floor, top }),
            _ => Ok(floor_u32),
        }
    }

    fn check_invariants(&self) -> Result<(), ElevatorError> {
        let state = self.state();

        if state.doors_open != (state.phase == Phase::DoorsOpen) {
            return Err(ElevatorError::InvariantViolated(format!(
                "doors are {} in phase {:?}",
                if state.doors_open { "open" } else { "closed" },
                state.phase
            )));
        }
        if (state.motion == Motion::Idle) == (state.phase == Phase::Moving) {
            return Err(ElevatorError::InvariantViolated(format!(
                "motion {:?} in phase {:?}",
                state.motion, state.phase
            )));
        }
        if let Some(top) = self.top_floor {
            if state.destination > top || state.current > top {
                return Err(ElevatorError::InvariantViolated(format!(
                    "floor above top floor {}: {}",
                    top, state
                )));
            }
        }
        Ok(())
    }
}

impl<C: Clock + fmt::Debug> fmt::Debug for Interpreter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("statechart", &self.statechart)
            .field("queue", &self.queue)
            .field("clock", &self.clock)
            .field("time", &self.time)
            .field("door_open_time", &self.door_open_time)
            .field("doors_opened_at", &self.doors_opened_at)
            .field("top_floor", &self.top_floor)
            .field("selection_policy", &self.selection_policy)
            .field("check_contracts", &self.check_contracts)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
