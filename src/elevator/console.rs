/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, warn};
use std::io::BufRead;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectFloor(i32),
    Quit,
    Empty,
    Unknown(String),
}

/// Turns lines of text into floor requests for the elevator FSM.
pub struct ConsoleInput {
    floor_request_tx: cbc::Sender<i32>,
    terminate_tx: cbc::Sender<()>,
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => Command::Empty,
        "quit" | "exit" | "q" => Command::Quit,
        _ => match line.parse::<i32>() {
            Ok(floor) => Command::SelectFloor(floor),
            Err(_) => Command::Unknown(line.to_string()),
        },
    }
}

impl ConsoleInput {
    pub fn new(floor_request_tx: cbc::Sender<i32>, terminate_tx: cbc::Sender<()>) -> ConsoleInput {
        ConsoleInput {
            floor_request_tx,
            terminate_tx,
        }
    }

    /// Reads until `quit`, end of input or a closed channel, then asks the FSM to stop.
    pub fn run<R: BufRead>(self, reader: R) {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("Error reading input: {}", e);
                    break;
                }
            };

            match parse_command(&line) {
                Command::SelectFloor(floor) => {
                    debug!("Floor {} selected", floor);
                    if self.floor_request_tx.send(floor).is_err() {
                        return;
                    }
                }
                Command::Quit => break,
                Command::Empty => (),
                Command::Unknown(text) => warn!("Ignoring input '{}': expected a floor number or 'quit'", text),
            }
        }
        let _ = self.terminate_tx.send(());
    }
}
