//! Append-only JSON-lines event log
//!
//! Events are handed to a background task over an unbounded channel so the
//! actor never waits on the filesystem. Write failures stop the log, not the
//! engine.

use anyhow::Context;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::protocol::EventMessage;

#[derive(Debug)]
pub struct EventLog {
    tx: mpsc::UnboundedSender<EventMessage>,
    task: JoinHandle<()>,
}

impl EventLog {
    /// Start a writer appending to `path` (created if missing)
    pub fn spawn(path: String) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<EventMessage>();
        let task = tokio::spawn(async move {
            if let Err(e) = write_events(&path, rx).await {
                eprintln!("[Engine] event log stopped: {:#}", e);
            }
        });
        Self { tx, task }
    }

    pub fn record(&self, msg: EventMessage) {
        let _ = self.tx.send(msg);
    }

    /// Flush everything recorded so far and stop the writer
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}

async fn write_events(
    path: &str,
    mut rx: mpsc::UnboundedReceiver<EventMessage>,
) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("opening {}", path))?;

    let mut buf: Vec<u8> = Vec::with_capacity(512);
    while let Some(msg) = rx.recv().await {
        buf.clear();
        serde_json::to_writer(&mut buf, &msg)?;
        buf.push(b'\n');
        file.write_all(&buf)
            .await
            .with_context(|| format!("writing {}", path))?;
    }

    file.flush().await?;
    Ok(())
}
