/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::{debug, error, info};
use std::thread::Builder;

/* Custom libraries */
use elevator_statechart::config;
use elevator_statechart::elevator::{ConsoleInput, ElevatorFSM};
use elevator_statechart::shared::{ElevatorError, ElevatorState, MacroStep};
use elevator_statechart::unwrap_or_exit;

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("elevator")
        .about("Elevator statechart: type a floor number to select it, 'quit' to stop")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("door-open-time")
                .long("door-open-time")
                .takes_value(true)
                .help("Door open time in milliseconds, overrides the configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print every state as a JSON object"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .help("Print the exited and entered states of every step as JSON"),
        )
        .get_matches();

    // Load the configuration
    let mut config = unwrap_or_exit!(config::load_config(
        matches.value_of("config").unwrap_or("config.toml")
    ));
    if let Some(door_open_time) = matches.value_of("door-open-time") {
        unwrap_or_exit!(config.override_door_open_time(door_open_time));
    }
    let json = matches.is_present("json");
    let trace = matches.is_present("trace");

    // Initialize channels
    let (floor_request_tx, floor_request_rx) = cbc::unbounded::<i32>();
    let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
    let (state_tx, state_rx) = cbc::unbounded::<ElevatorState>();
    let (rejected_tx, rejected_rx) = cbc::unbounded::<ElevatorError>();
    let (macro_step_tx, macro_step_rx) = cbc::unbounded::<MacroStep>();

    // Start the elevator module
    let elevator_fsm = ElevatorFSM::new(
        &config.elevator,
        &config.runtime,
        floor_request_rx,
        terminate_rx,
        state_tx,
        rejected_tx,
        macro_step_tx,
    );
    let elevator_fsm_thread = unwrap_or_exit!(Builder::new()
        .name("elevator_fsm".into())
        .spawn(move || elevator_fsm.run()));

    // Start reading floor requests
    let console = ConsoleInput::new(floor_request_tx, terminate_tx);
    unwrap_or_exit!(Builder::new()
        .name("console".into())
        .spawn(move || console.run(std::io::stdin().lock())));

    // Print states until the FSM stops
    loop {
        cbc::select! {
            recv(state_rx) -> state => match state {
                Ok(state) => print_state(&state, json),
                Err(_) => break,
            },
            recv(rejected_rx) -> rejected => match rejected {
                Ok(e) => eprintln!("{}", e),
                Err(_) => break,
            },
            recv(macro_step_rx) -> step => match step {
                Ok(step) => print_macro_step(&step, trace),
                Err(_) => break,
            },
        }
    }
    for state in state_rx.try_iter() {
        print_state(&state, json);
    }

    match elevator_fsm_thread.join() {
        Ok(Ok(state)) => info!("Stopped: {}", state),
        Ok(Err(e)) => {
            error!("ERROR: {}", e);
            std::process::exit(1);
        }
        Err(_) => {
            error!("ERROR: elevator FSM thread panicked");
            std::process::exit(1);
        }
    }
}

fn print_state(state: &ElevatorState, json: bool) {
    if json {
        match serde_json::to_string(state) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize state: {}", e),
        }
    } else {
        info!("{}", state);
    }
}

fn print_macro_step(step: &MacroStep, trace: bool) {
    if !trace {
        debug!("exited {:?}, entered {:?}", step.exited, step.entered);
        return;
    }
    match serde_json::to_string(step) {
        Ok(line) => println!("{}", line),
        Err(e) => error!("Failed to serialize step: {}", e),
    }
}
