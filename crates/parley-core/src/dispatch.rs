//! Maps a trimmed input line to a response.
//!
//! Dispatch is a total function: every input has a defined response and
//! unmatched input falls through to echo, so there is no "unknown command"
//! error path. The current time and client count are injected to keep the
//! mapping pure and unit-testable.

use chrono::{DateTime, Local};

/// What the session does with one dispatched line.
pub enum Outcome {
    /// Write the response and keep reading.
    Reply(String),
    /// Write the response, then end the session.
    Farewell(String),
}

const JOKE: &str = "If you wanted a joke you should have made one yourself\n";

const HELP: &str = "Available commands:\n\
    /echo [message] - Echoes back your message\n\
    /time - Shows current server time\n\
    /date - Shows current server date\n\
    /joke - Tells a joke\n\
    /clients - Number of connected clients\n\
    /quit or bye - Disconnects you\n";

/// Map one trimmed input line to its response.
pub fn dispatch(line: &str, clients: usize, now: DateTime<Local>) -> Outcome {
    match line {
        "" => Outcome::Reply("Wassup...\n".into()),
        "GIMME 3" => Outcome::Reply("Brrrrrrrrrrrr!\n".into()),
        "bye" | "/quit" => Outcome::Farewell("Later!\n".into()),
        "/time" => Outcome::Reply(format!("{}\n", now.to_rfc2822())),
        "/date" => Outcome::Reply(format!("{}\n", now.format("%Y-%m-%d"))),
        "/joke" => Outcome::Reply(JOKE.into()),
        "/clients" => Outcome::Reply(format!("Connected clients: {clients}\n")),
        "/help" => Outcome::Reply(HELP.into()),
        _ => match line.strip_prefix("/echo ") {
            Some(rest) => Outcome::Reply(format!("{rest}\n")),
            None => Outcome::Reply(format!("{line}\n")),
        },
    }
}
