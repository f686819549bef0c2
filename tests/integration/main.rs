//! parley integration test harness.
//!
//! Each test spawns a real server on an ephemeral loopback port and talks
//! to it over TCP like any client would. Tests own their log directories
//! and clean them up themselves.

mod lifecycle;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

use parley_core::config::SessionConfig;
use parley_core::ClientCounter;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Spawn a server on an ephemeral loopback port.
/// Returns the port and the counter shared with the sessions.
pub async fn spawn_server(settings: SessionConfig) -> Result<(u16, ClientCounter)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let counter = ClientCounter::new();
    tokio::spawn(parleyd::serve(listener, counter.clone(), settings));
    Ok((port, counter))
}

/// Per-test settings: defaults except for an isolated log directory.
pub fn test_settings(tag: &str) -> SessionConfig {
    SessionConfig {
        log_dir: temp_log_dir(tag),
        ..SessionConfig::default()
    }
}

pub fn temp_log_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("parley-it-{tag}-{}", std::process::id()))
}

/// One connected test client with buffered line reads.
pub struct TestClient {
    pub local_addr: SocketAddr,
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(port: u16) -> Result<Self> {
        let stream = TcpStream::connect(("127.0.0.1", port)).await?;
        let local_addr = stream.local_addr()?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            local_addr,
            reader: BufReader::new(reader),
            writer,
        })
    }

    /// Send one line (the newline is appended here).
    pub async fn send(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    /// Read one response line, without its trailing newline.
    pub async fn recv(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = tokio::time::timeout(RECV_TIMEOUT, self.reader.read_line(&mut line)).await??;
        ensure!(n > 0, "server closed the connection");
        Ok(line.trim_end_matches('\n').to_string())
    }

    /// Expect the server side to close the connection.
    pub async fn expect_close(&mut self) -> Result<()> {
        let mut line = String::new();
        let n = tokio::time::timeout(RECV_TIMEOUT, self.reader.read_line(&mut line)).await??;
        ensure!(n == 0, "expected close, got {line:?}");
        Ok(())
    }
}
