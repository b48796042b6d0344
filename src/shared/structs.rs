/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[serde(rename = "floorSelecting")]
    FloorSelecting,
    #[serde(rename = "doorsOpen")]
    DoorsOpen,
    #[serde(rename = "doorsClosed")]
    DoorsClosed,
    #[serde(rename = "moving")]
    Moving,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "movingUp")]
    MovingUp,
    #[serde(rename = "movingDown")]
    MovingDown,
}

/// Every state of the elevator statechart, used for configurations and traces.
///
/// The variant order is the lexicographic order of the state names, so the
/// derived `Ord` breaks ties between states of equal depth.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum StateName {
    Active,
    DoorsClosed,
    DoorsOpen,
    FloorListener,
    FloorSelecting,
    Moving,
    MovingDown,
    MovingElevator,
    MovingUp,
}

impl StateName {
    pub fn depth(&self) -> usize {
        match *self {
            StateName::Active => 0,
            StateName::FloorListener | StateName::MovingElevator => 1,
            StateName::FloorSelecting
            | StateName::DoorsOpen
            | StateName::DoorsClosed
            | StateName::Moving => 2,
            StateName::MovingUp | StateName::MovingDown => 3,
        }
    }

    pub fn parent(&self) -> Option<StateName> {
        match *self {
            StateName::Active => None,
            StateName::FloorListener | StateName::MovingElevator => Some(StateName::Active),
            StateName::FloorSelecting => Some(StateName::FloorListener),
            StateName::DoorsOpen | StateName::DoorsClosed | StateName::Moving => {
                Some(StateName::MovingElevator)
            }
            StateName::MovingUp | StateName::MovingDown => Some(StateName::Moving),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            StateName::Active => "active",
            StateName::DoorsClosed => "doorsClosed",
            StateName::DoorsOpen => "doorsOpen",
            StateName::FloorListener => "floorListener",
            StateName::FloorSelecting => "floorSelecting",
            StateName::Moving => "moving",
            StateName::MovingDown => "movingDown",
            StateName::MovingElevator => "movingElevator",
            StateName::MovingUp => "movingUp",
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElevatorState {
    pub current: u32,
    pub destination: u32,
    #[serde(rename = "doorsOpen")]
    pub doors_open: bool,
    pub motion: Motion,
    pub phase: Phase,
}

impl ElevatorState {
    pub fn new() -> ElevatorState {
        ElevatorState {
            current: 0,
            destination: 0,
            doors_open: true,
            motion: Motion::Idle,
            phase: Phase::DoorsOpen,
        }
    }

    /// Leaf state of the door/motion region.
    pub fn leaf(&self) -> StateName {
        match (self.phase, self.motion) {
            (Phase::DoorsClosed, _) => StateName::DoorsClosed,
            (Phase::Moving, Motion::MovingDown) => StateName::MovingDown,
            (Phase::Moving, _) => StateName::MovingUp,
            _ => StateName::DoorsOpen,
        }
    }
}

impl Default for ElevatorState {
    fn default() -> Self {
        ElevatorState::new()
    }
}

impl fmt::Display for ElevatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "floor {} -> {} [{}, doors {}]",
            self.current,
            self.destination,
            self.leaf(),
            if self.doors_open { "open" } else { "closed" }
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Event {
    FloorSelected { floor: i32 },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::FloorSelected { floor } => write!(f, "floorSelected(floor={})", floor),
        }
    }
}

/// A transition between two states of the chart. Self transitions have
/// `source == target`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub source: StateName,
    pub target: StateName,
}

/// Trace of one `execute_once` call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MacroStep {
    pub time: Duration,
    pub event: Option<Event>,
    pub transition: Transition,
    pub exited: Vec<StateName>,
    pub entered: Vec<StateName>,
}

impl MacroStep {
    pub fn entered(&self, state: StateName) -> bool {
        self.entered.contains(&state)
    }

    pub fn exited(&self, state: StateName) -> bool {
        self.exited.contains(&state)
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_with_camel_case_names() {
        let state = ElevatorState::new();

        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "current": 0,
                "destination": 0,
                "doorsOpen": true,
                "motion": "idle",
                "phase": "doorsOpen",
            })
        );
    }

    #[test]
    fn test_event_round_trips_through_json() {
        let json = r#"{"name":"floorSelected","floor":3}"#;

        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event, Event::FloorSelected { floor: 3 });
        assert_eq!(serde_json::to_string(&event).unwrap(), json);
    }

    #[test]
    fn test_state_names_sort_by_name() {
        let mut names = vec![
            StateName::MovingUp,
            StateName::Moving,
            StateName::MovingElevator,
            StateName::MovingDown,
            StateName::DoorsOpen,
            StateName::DoorsClosed,
        ];
        names.sort();

        let sorted: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
        let mut expected = sorted.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_leaf_state() {
        let mut state = ElevatorState::new();
        assert_eq!(state.leaf(), StateName::DoorsOpen);

        state.phase = Phase::Moving;
        state.motion = Motion::MovingDown;
        assert_eq!(state.leaf(), StateName::MovingDown);
        assert_eq!(state.leaf().parent(), Some(StateName::Moving));
        assert_eq!(state.leaf().depth(), 3);
    }
}
