/*
 * Unit tests for the elevator FSM thread
 *
 * The unit tests follows the Arrange, Act, Assert pattern. The FSM runs on
 * the wall clock with a short door open time.
 *
 * Tests:
 * - test_fsm_init
 * - test_fsm_moves_to_selected_floor
 * - test_fsm_returns_to_ground_after_door_time
 * - test_fsm_rejects_negative_floor
 * - test_fsm_stops_when_requests_close
 * - test_fsm_publishes_macro_steps
 *
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod fsm_tests {
    use std::thread::spawn;
    use std::time::{Duration, Instant};

    use crate::config::{ElevatorConfig, RuntimeConfig, SelectionPolicy};
    use crate::elevator::ElevatorFSM;
    use crate::shared::{ElevatorError, ElevatorState, MacroStep, StateName};
    use crossbeam_channel::unbounded;

    fn setup_fsm() -> (
        ElevatorFSM,
        crossbeam_channel::Sender<i32>,
        crossbeam_channel::Sender<()>,
        crossbeam_channel::Receiver<ElevatorState>,
        crossbeam_channel::Receiver<ElevatorError>,
        crossbeam_channel::Receiver<MacroStep>,
    ) {
        // Arrange mock channels
        let (floor_request_tx, floor_request_rx) = unbounded::<i32>();
        let (terminate_tx, terminate_rx) = unbounded::<()>();
        let (state_tx, state_rx) = unbounded::<ElevatorState>();
        let (rejected_tx, rejected_rx) = unbounded::<ElevatorError>();
        let (macro_step_tx, macro_step_rx) = unbounded::<MacroStep>();

        // Default configuration
        let config = ElevatorConfig {
            door_open_time: 200,
            top_floor: Some(9),
            selection_policy: SelectionPolicy::Deferred,
            check_contracts: true,
        };
        let runtime = RuntimeConfig { tick: 10 };

        // Create the FSM and return it with the channels
        (
            ElevatorFSM::new(
                &config,
                &runtime,
                floor_request_rx,
                terminate_rx,
                state_tx,
                rejected_tx,
                macro_step_tx,
            ),
            floor_request_tx,
            terminate_tx,
            state_rx,
            rejected_rx,
            macro_step_rx,
        )
    }

    /// Collects states until one matches `done`, panics after three seconds.
    fn wait_for<F>(
        state_rx: &crossbeam_channel::Receiver<ElevatorState>,
        done: F,
    ) -> Vec<ElevatorState>
    where
        F: Fn(&ElevatorState) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(3);
        let mut states = Vec::new();
        loop {
            match state_rx.recv_deadline(deadline) {
                Ok(state) => {
                    let finished = done(&state);
                    states.push(state);
                    if finished {
                        return states;
                    }
                }
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                    panic!("Timed out waiting for fsm_state_rx, got {:?}", states);
                }
                Err(e) => {
                    panic!("Error receiving from fsm_state_rx: {:?}", e);
                }
            }
        }
    }

    #[test]
    fn test_fsm_init() {
        // Purpose: Verify that the FSM publishes the initial state and stops on request

        // Arrange
        let (fsm, _floor_request_tx, terminate_tx, state_rx, _rejected_rx, _macro_step_rx) =
            setup_fsm();
        let fsm_thread = spawn(move || fsm.run());

        // Act
        let states = wait_for(&state_rx, |_| true);

        // Assert
        assert_eq!(states[0], ElevatorState::new());

        // Cleanup
        terminate_tx.send(()).unwrap();
        let final_state = fsm_thread.join().unwrap().unwrap();
        assert_eq!(final_state.current, 0);
    }

    #[test]
    fn test_fsm_moves_to_selected_floor() {
        // Purpose: Verify that a floor request drives the elevator through every floor on the way

        // Arrange
        let (fsm, floor_request_tx, terminate_tx, state_rx, _rejected_rx, _macro_step_rx) =
            setup_fsm();
        let fsm_thread = spawn(move || fsm.run());

        // Act
        floor_request_tx.send(3).unwrap();
        let states = wait_for(&state_rx, |s| s.current == 3 && s.doors_open);

        // Assert
        let floors: Vec<u32> = states.iter().map(|s| s.current).collect();
        assert!(floors.contains(&1));
        assert!(floors.contains(&2));
        assert!(states.iter().any(|s| !s.doors_open));

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap().unwrap();
    }

    #[test]
    fn test_fsm_returns_to_ground_after_door_time() {
        // Purpose: Verify that idle open doors above ground send the elevator back down

        // Arrange
        let (fsm, floor_request_tx, terminate_tx, state_rx, _rejected_rx, _macro_step_rx) =
            setup_fsm();
        let fsm_thread = spawn(move || fsm.run());
        floor_request_tx.send(2).unwrap();
        wait_for(&state_rx, |s| s.current == 2 && s.doors_open);
        let arrived = Instant::now();

        // Act
        let states = wait_for(&state_rx, |s| s.current == 0 && s.doors_open);

        // Assert
        assert!(arrived.elapsed() >= Duration::from_millis(150));
        assert_eq!(states.last().unwrap().destination, 0);
        assert!(states.iter().any(|s| s.current == 1));

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap().unwrap();
    }

    #[test]
    fn test_fsm_rejects_negative_floor() {
        // Purpose: Verify that a negative floor is reported and leaves the destination untouched

        // Arrange
        let (fsm, floor_request_tx, terminate_tx, state_rx, rejected_rx, _macro_step_rx) =
            setup_fsm();
        let fsm_thread = spawn(move || fsm.run());
        wait_for(&state_rx, |_| true);

        // Act
        floor_request_tx.send(-2).unwrap();

        // Assert
        match rejected_rx.recv_timeout(Duration::from_secs(3)) {
            Ok(e) => assert_eq!(e, ElevatorError::InvalidFloor { floor: -2 }),
            Err(e) => panic!("Error receiving from rejected_rx: {:?}", e),
        }

        // Cleanup
        terminate_tx.send(()).unwrap();
        let final_state = fsm_thread.join().unwrap().unwrap();
        assert_eq!(final_state.destination, 0);
        assert!(final_state.doors_open);
    }

    #[test]
    fn test_fsm_stops_when_requests_close() {
        // Purpose: Verify that the FSM terminates once nobody can send requests anymore

        // Arrange
        let (fsm, floor_request_tx, _terminate_tx, _state_rx, _rejected_rx, _macro_step_rx) =
            setup_fsm();
        let fsm_thread = spawn(move || fsm.run());

        // Act
        drop(floor_request_tx);

        // Assert
        assert!(fsm_thread.join().unwrap().is_ok());
    }

    #[test]
    fn test_fsm_publishes_macro_steps() {
        // Purpose: Verify that listeners get the exited and entered states of every step

        // Arrange
        let (fsm, floor_request_tx, terminate_tx, state_rx, _rejected_rx, macro_step_rx) =
            setup_fsm();
        let fsm_thread = spawn(move || fsm.run());
        wait_for(&state_rx, |_| true);

        // Act
        floor_request_tx.send(2).unwrap();
        let deadline = Instant::now() + Duration::from_secs(3);
        let mut steps = Vec::new();
        loop {
            match macro_step_rx.recv_deadline(deadline) {
                Ok(step) => {
                    let arrived = step.entered(StateName::DoorsOpen);
                    steps.push(step);
                    if arrived {
                        break;
                    }
                }
                Err(e) => panic!("Error receiving from macro_step_rx: {:?}, got {:?}", e, steps),
            }
        }

        // Assert
        assert!(steps[0].event.is_some());
        assert!(steps
            .iter()
            .any(|s| s.entered(StateName::Moving) && s.entered(StateName::MovingUp)));
        let arrival = steps.last().unwrap();
        assert!(arrival.exited(StateName::Moving));
        assert!(arrival.exited(StateName::MovingUp));

        // Cleanup
        terminate_tx.send(()).unwrap();
        fsm_thread.join().unwrap().unwrap();
    }
}
