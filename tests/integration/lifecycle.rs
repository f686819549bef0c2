//! Session lifecycle: the client counter, per-client logs, and the
//! inactivity timeout.

use std::time::Duration;

use parley_core::config::SessionConfig;

use crate::*;

#[tokio::test]
async fn clients_command_sees_concurrent_sessions() -> Result<()> {
    let (port, counter) = spawn_server(test_settings("clients")).await?;

    let mut a = TestClient::connect(port).await?;
    let mut b = TestClient::connect(port).await?;

    // A round-trip from each client proves both sessions are registered.
    a.send("").await?;
    a.recv().await?;
    b.send("").await?;
    b.recv().await?;

    a.send("/clients").await?;
    assert_eq!(a.recv().await?, "Connected clients: 2");

    // Both quit; the count drains back to zero.
    a.send("/quit").await?;
    a.recv().await?;
    a.expect_close().await?;
    b.send("/quit").await?;
    b.recv().await?;
    b.expect_close().await?;

    wait_for_count(&counter, 0).await?;
    Ok(())
}

#[tokio::test]
async fn idle_client_is_disconnected_by_the_watchdog() -> Result<()> {
    let settings = SessionConfig {
        inactivity_secs: 1,
        ..test_settings("timeout")
    };
    let (port, counter) = spawn_server(settings).await?;

    let mut client = TestClient::connect(port).await?;
    // Activity pushes the deadline out before the silence starts.
    client.send("/echo warming up").await?;
    client.recv().await?;

    // Then: no input at all. The server ends the session on its own.
    assert_eq!(client.recv().await?, "Disconnected ");
    client.expect_close().await?;

    wait_for_count(&counter, 0).await?;
    Ok(())
}

#[tokio::test]
async fn every_input_line_lands_in_the_session_log() -> Result<()> {
    let settings = test_settings("logfile");
    let log_dir = settings.log_dir.clone();
    let _ = std::fs::remove_dir_all(&log_dir);
    let (port, _) = spawn_server(settings).await?;

    let mut client = TestClient::connect(port).await?;
    client.send("/echo hello log").await?;
    client.recv().await?;

    // The append happens before the response is written, so the record is
    // already on disk here.
    let name = format!("{}.log", client.local_addr.to_string().replace(':', "_"));
    let text = std::fs::read_to_string(log_dir.join(name))?;
    assert!(text.lines().any(|l| l.ends_with(": /echo hello log")));

    let _ = std::fs::remove_dir_all(&log_dir);
    Ok(())
}

#[tokio::test]
async fn unopenable_log_ends_the_session_with_an_apology() -> Result<()> {
    // A regular file where the log directory should be makes every
    // session's log unopenable.
    let blocker = temp_log_dir("blocked");
    let _ = std::fs::remove_dir_all(&blocker);
    std::fs::write(&blocker, b"in the way")?;

    let settings = SessionConfig {
        log_dir: blocker.clone(),
        ..SessionConfig::default()
    };
    let (port, counter) = spawn_server(settings).await?;

    let mut client = TestClient::connect(port).await?;
    assert_eq!(
        client.recv().await?,
        "Server error: unable to open log file"
    );
    client.expect_close().await?;
    wait_for_count(&counter, 0).await?;

    let _ = std::fs::remove_file(&blocker);
    Ok(())
}

/// Poll the counter until it reaches `want` or a few seconds pass.
async fn wait_for_count(counter: &parley_core::ClientCounter, want: usize) -> Result<()> {
    for _ in 0..100 {
        if counter.count() == want {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    anyhow::bail!("counter stuck at {}, wanted {want}", counter.count())
}
