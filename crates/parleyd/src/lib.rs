//! parleyd — line-oriented TCP text server.
//!
//! One spawned task per accepted connection. Each session races
//! newline-delimited input against an inactivity watchdog, records every
//! line to a per-client log file, and answers from a fixed command set.

use anyhow::Result;
use tokio::net::TcpListener;

use parley_core::config::SessionConfig;
use parley_core::ClientCounter;

pub mod session;
pub mod sink;
pub mod watchdog;
pub mod wire;

use session::ConnectionSession;

/// Accept loop. Accept errors are logged and the loop keeps running; only
/// the caller's bind can fail fatally.
pub async fn serve(
    listener: TcpListener,
    counter: ClientCounter,
    settings: SessionConfig,
) -> Result<()> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };

        let guard = counter.join();
        let session =
            ConnectionSession::new(stream, peer, counter.clone(), settings.clone(), guard);
        tokio::spawn(session.run());
    }
}
