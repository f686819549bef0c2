//! One connection, end to end.
//!
//! The session owns the read loop, the inactivity watchdog, the per-client
//! log, and the termination race between them. Whichever side loses the
//! race is dropped before anything else is written, so no message ever
//! follows termination.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use chrono::Local;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use parley_core::config::SessionConfig;
use parley_core::{dispatch, ClientCounter, ClientGuard, Outcome};

use crate::sink::SessionLog;
use crate::watchdog::Watchdog;
use crate::wire::LineReader;

/// Why a session ended. Reported in the operator log only.
enum Cause {
    Quit,
    Eof,
    ReadError,
    WriteError,
    Timeout,
    LogUnavailable,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cause::Quit => "quit",
            Cause::Eof => "eof",
            Cause::ReadError => "read-error",
            Cause::WriteError => "write-error",
            Cause::Timeout => "timeout",
            Cause::LogUnavailable => "log-unavailable",
        })
    }
}

pub struct ConnectionSession {
    stream: TcpStream,
    peer: SocketAddr,
    counter: ClientCounter,
    settings: SessionConfig,
    // Dropped when the session ends, on every path.
    _guard: ClientGuard,
}

impl ConnectionSession {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        counter: ClientCounter,
        settings: SessionConfig,
        guard: ClientGuard,
    ) -> Self {
        Self {
            stream,
            peer,
            counter,
            settings,
            _guard: guard,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(peer = %self.peer, "client connected");
        let cause = self.converse().await;
        tracing::info!(peer = %self.peer, cause = %cause, "client disconnected");
        // Dropping self closes the connection and releases the counter slot.
    }

    async fn converse(&mut self) -> Cause {
        let mut log = match SessionLog::open(&self.settings.log_dir, &self.peer.to_string()) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(peer = %self.peer, error = %e, "session log unavailable");
                let _ = self
                    .stream
                    .write_all(b"Server error: unable to open log file\n")
                    .await;
                return Cause::LogUnavailable;
            }
        };

        let mut watchdog = Watchdog::new(Duration::from_secs(self.settings.inactivity_secs));
        let (read_half, mut write_half) = self.stream.split();
        let mut lines = LineReader::new(read_half, self.settings.max_line_bytes);

        loop {
            tokio::select! {
                _ = watchdog.expired() => {
                    let _ = write_half.write_all(b"Disconnected \n").await;
                    return Cause::Timeout;
                }

                result = lines.next_line() => {
                    let raw = match result {
                        Ok(Some(raw)) => raw,
                        Ok(None) => return Cause::Eof,
                        Err(e) => {
                            tracing::warn!(peer = %self.peer, error = %e, "read failed");
                            return Cause::ReadError;
                        }
                    };
                    watchdog.rearm();

                    if raw.truncated
                        && write_half.write_all(b"Message too long.\n").await.is_err()
                    {
                        return Cause::WriteError;
                    }

                    // The input is on disk before any response is computed.
                    log.append(&raw.text);

                    match dispatch(&raw.text, self.counter.count(), Local::now()) {
                        Outcome::Reply(response) => {
                            if write_half.write_all(response.as_bytes()).await.is_err() {
                                return Cause::WriteError;
                            }
                        }
                        Outcome::Farewell(response) => {
                            let _ = write_half.write_all(response.as_bytes()).await;
                            return Cause::Quit;
                        }
                    }
                }
            }
        }
    }
}
