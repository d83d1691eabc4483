//! JSON-lines driver (default binary).
//!
//! Reads one command per stdin line (JSON or bare words such as `moveLeft`,
//! `start 3`, `snapshot`) and writes every published event to stdout as a
//! JSON line. Diagnostics go to stderr. Configuration comes from the
//! `BLOCKTRIS_*` environment variables.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use blocktris::engine::protocol::{create_error, encode_line, EventMessage, SnapshotMessage};
use blocktris::engine::{parse_line, Engine, EngineConfig, EngineError, Request};

#[tokio::main]
async fn main() -> Result<()> {
    let config = EngineConfig::from_env();
    eprintln!(
        "[Engine] seed {} extended_shapes {} start_level {:?}",
        config.seed, config.extended_shapes, config.start_level
    );

    let engine = Engine::spawn(config);
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    // Single stdout writer so event and snapshot lines never interleave.
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if stdout.write_all(b"\n").await.is_err() {
                break;
            }
            if stdout.flush().await.is_err() {
                break;
            }
        }
    });

    // Event forwarder.
    let mut events = engine.subscribe_events();
    let event_out = out_tx.clone();
    let forwarder = tokio::spawn(async move {
        while events.changed().await.is_ok() {
            let line = match events.borrow_and_update().as_ref() {
                Some(event) => encode_line(&EventMessage::from(event)),
                None => continue,
            };
            match line {
                Ok(line) => {
                    if event_out.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("[Engine] encode error: {}", e),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match parse_line(&line) {
            Ok(Request::Command(command)) => match engine.send(command).await {
                Ok(_) => None,
                Err(EngineError::Closed) => {
                    eprintln!("[Engine] closed, stopping input");
                    break;
                }
                Err(e) => Some(encode_line(&create_error(&e.to_string()))),
            },
            Ok(Request::Snapshot) => {
                Some(encode_line(&SnapshotMessage::from(&engine.snapshot())))
            }
            Err(e) => {
                eprintln!("[Engine] rejected line {:?}: {}", line, e);
                Some(encode_line(&create_error(&e.to_string())))
            }
        };

        if let Some(reply) = reply {
            let _ = out_tx.send(reply?);
        }
    }

    engine.shutdown().await?;
    // The event channel closes with the actor; the forwarder drains and exits.
    let _ = forwarder.await;
    drop(out_tx);
    let _ = writer.await;
    Ok(())
}
