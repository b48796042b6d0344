/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{ElevatorError, ElevatorState, Motion, Phase, StateName, Transition};

/**
 * The elevator statechart.
 *
 * Two orthogonal regions live under the `active` root:
 * - `floorListener` with its single state `floorSelecting`, which reacts to
 *   `floorSelected` events by updating the destination.
 * - `movingElevator` with `doorsOpen`, `doorsClosed` and the compound `moving`
 *   state (`movingUp`, `movingDown`). All of its transitions are eventless
 *   and guarded on `current` and `destination`.
 *
 * The statechart holds no clock. Whether the door timer has expired is
 * passed in by the caller when asking for the next eventless transition.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Statechart {
    state: ElevatorState,
}

/// One transition of the chart together with its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicroStep {
    /// `floorSelecting -> floorSelecting`, sets the destination.
    FloorSelected(u32),
    /// `doorsOpen -> doorsClosed` when a different floor is requested.
    CloseDoors,
    /// `doorsOpen -> doorsClosed` after the door timer expired above ground.
    DoorTimeout,
    StartUp,
    StartDown,
    ContinueUp,
    ContinueDown,
    /// `movingUp -> movingDown`, only reachable when re-targeting mid-motion.
    ReverseDown,
    /// `movingDown -> movingUp`, only reachable when re-targeting mid-motion.
    ReverseUp,
    /// `moving -> doorsOpen` on reaching the destination.
    Arrive,
    /// `doorsClosed -> doorsOpen` when the destination became the current floor.
    Reopen,
}

impl MicroStep {
    pub fn transition(&self) -> Transition {
        let (source, target) = match *self {
            MicroStep::FloorSelected(_) => (StateName::FloorSelecting, StateName::FloorSelecting),
            MicroStep::CloseDoors | MicroStep::DoorTimeout => {
                (StateName::DoorsOpen, StateName::DoorsClosed)
            }
            MicroStep::StartUp => (StateName::DoorsClosed, StateName::MovingUp),
            MicroStep::StartDown => (StateName::DoorsClosed, StateName::MovingDown),
            MicroStep::ContinueUp => (StateName::MovingUp, StateName::MovingUp),
            MicroStep::ContinueDown => (StateName::MovingDown, StateName::MovingDown),
            MicroStep::ReverseDown => (StateName::MovingUp, StateName::MovingDown),
            MicroStep::ReverseUp => (StateName::MovingDown, StateName::MovingUp),
            MicroStep::Arrive => (StateName::Moving, StateName::DoorsOpen),
            MicroStep::Reopen => (StateName::DoorsClosed, StateName::DoorsOpen),
        };
        Transition { source, target }
    }
}

impl Statechart {
    pub fn new() -> Statechart {
        Statechart {
            state: ElevatorState::new(),
        }
    }

    pub fn state(&self) -> &ElevatorState {
        &self.state
    }

    /// Active states ordered by depth, ties broken by name.
    pub fn configuration(&self) -> Vec<StateName> {
        let mut configuration = vec![
            StateName::Active,
            StateName::FloorListener,
            StateName::FloorSelecting,
            StateName::MovingElevator,
        ];
        configuration.extend(ancestors_or_self(self.state.leaf(), StateName::MovingElevator));
        configuration.sort_by_key(|s| (s.depth(), *s));
        configuration
    }

    /// First enabled eventless transition of the `movingElevator` region.
    ///
    /// Transitions of a child state are checked before those of its parent,
    /// then in declaration order.
    pub fn eventless_transition(&self, door_timer_expired: bool) -> Option<MicroStep> {
        let current = self.state.current;
        let destination = self.state.destination;

        match self.state.leaf() {
            StateName::DoorsOpen => {
                if destination != current {
                    Some(MicroStep::CloseDoors)
                } else if door_timer_expired && current > 0 {
                    Some(MicroStep::DoorTimeout)
                } else {
                    None
                }
            }
            StateName::DoorsClosed => {
                // Floors are unsigned, so the `destination >= 0` guard always holds.
                if destination > current {
                    Some(MicroStep::StartUp)
                } else if destination < current {
                    Some(MicroStep::StartDown)
                } else {
                    Some(MicroStep::Reopen)
                }
            }
            StateName::MovingUp => {
                if destination > current {
                    Some(MicroStep::ContinueUp)
                } else if destination < current {
                    Some(MicroStep::ReverseDown)
                } else {
                    Some(MicroStep::Arrive)
                }
            }
            StateName::MovingDown => {
                if destination < current {
                    Some(MicroStep::ContinueDown)
                } else if destination > current {
                    Some(MicroStep::ReverseUp)
                } else {
                    Some(MicroStep::Arrive)
                }
            }
            _ => None,
        }
    }

    pub fn floor_selected(&mut self, floor: u32) -> (Vec<StateName>, Vec<StateName>) {
        // floorSelecting is always active
        self.fire(MicroStep::FloorSelected(floor))
    }

    /// Exits the source states, runs the transition action, enters the
    /// target states. Returns the exited and entered states in that order.
    ///
    /// `door_timer_expired` is the same flag given to `eventless_transition`.
    pub fn apply(
        &mut self,
        step: MicroStep,
        door_timer_expired: bool,
    ) -> Result<(Vec<StateName>, Vec<StateName>), ElevatorError> {
        if !self.is_enabled(step, door_timer_expired) {
            let transition = step.transition();
            return Err(ElevatorError::NotEnabled {
                from: transition.source,
                to: transition.target,
            });
        }
        Ok(self.fire(step))
    }

    fn fire(&mut self, step: MicroStep) -> (Vec<StateName>, Vec<StateName>) {
        let transition = step.transition();
        let active_leaf = match step {
            MicroStep::FloorSelected(_) => StateName::FloorSelecting,
            _ => self.state.leaf(),
        };
        let domain = transition_domain(transition);
        let exited = ancestors_or_self(active_leaf, domain);
        let mut entered = ancestors_or_self(transition.target, domain);
        entered.reverse();

        // Transition action
        match step {
            MicroStep::FloorSelected(floor) => self.state.destination = floor,
            MicroStep::CloseDoors => self.state.doors_open = false,
            MicroStep::DoorTimeout => {
                self.state.destination = 0;
                self.state.doors_open = false;
            }
            MicroStep::Arrive | MicroStep::Reopen => self.state.doors_open = true,
            _ => (),
        }

        // Entry actions
        for state in entered.iter() {
            match *state {
                StateName::DoorsOpen => {
                    self.state.phase = Phase::DoorsOpen;
                    self.state.motion = Motion::Idle;
                }
                StateName::DoorsClosed => {
                    self.state.phase = Phase::DoorsClosed;
                    self.state.motion = Motion::Idle;
                }
                StateName::Moving => self.state.phase = Phase::Moving,
                StateName::MovingUp => {
                    self.state.motion = Motion::MovingUp;
                    self.state.current += 1;
                }
                StateName::MovingDown => {
                    self.state.motion = Motion::MovingDown;
                    self.state.current -= 1;
                }
                _ => (),
            }
        }

        (exited, entered)
    }

    fn is_enabled(&self, step: MicroStep, door_timer_expired: bool) -> bool {
        let current = self.state.current;
        let destination = self.state.destination;
        let leaf = self.state.leaf();

        match step {
            MicroStep::FloorSelected(_) => true,
            MicroStep::CloseDoors => leaf == StateName::DoorsOpen && destination != current,
            MicroStep::DoorTimeout => {
                leaf == StateName::DoorsOpen && door_timer_expired && current > 0
            }
            MicroStep::StartUp => leaf == StateName::DoorsClosed && destination > current,
            MicroStep::StartDown => leaf == StateName::DoorsClosed && destination < current,
            MicroStep::Reopen => leaf == StateName::DoorsClosed && destination == current,
            MicroStep::ContinueUp => leaf == StateName::MovingUp && destination > current,
            MicroStep::ReverseDown => leaf == StateName::MovingUp && destination < current,
            MicroStep::ContinueDown => leaf == StateName::MovingDown && destination < current,
            MicroStep::ReverseUp => leaf == StateName::MovingDown && destination > current,
            MicroStep::Arrive => {
                self.state.phase == Phase::Moving && destination == current
            }
        }
    }
}

impl Default for Statechart {
    fn default() -> Self {
        Statechart::new()
    }
}

/// The innermost state strictly containing both ends of the transition.
/// For a self transition this is the parent of the state.
fn transition_domain(transition: Transition) -> StateName {
    let mut candidate = transition.source.parent();
    while let Some(state) = candidate {
        if is_descendant(transition.target, state) {
            return state;
        }
        candidate = state.parent();
    }
    StateName::Active
}

fn is_descendant(state: StateName, ancestor: StateName) -> bool {
    let mut candidate = state.parent();
    while let Some(parent) = candidate {
        if parent == ancestor {
            return true;
        }
        candidate = parent.parent();
    }
    false
}

/// `state` and its ancestors strictly below `limit`, innermost first.
fn ancestors_or_self(state: StateName, limit: StateName) -> Vec<StateName> {
    let mut states = Vec::new();
    let mut candidate = Some(state);
    while let Some(s) = candidate {
        if s == limit {
            break;
        }
        states.push(s);
        candidate = s.parent();
    }
    states
}
