//! Real-time runtime
//!
//! One tokio task owns the [`Session`]. Commands arrive over a bounded mpsc
//! channel; between commands the task sleeps until the session's next timer
//! deadline. Before anything is applied the session is advanced by the real
//! time that passed, so timers always fire in order relative to commands.
//!
//! State leaves the task through two `watch` channels. Both only hold the
//! latest value: a slow consumer sees the newest snapshot and must compare
//! event sequence numbers to notice that it skipped events. The optional
//! event log is the complete record: it receives every event of every step.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use blocktris_core::{Event, GameSnapshot, Session};
use blocktris_types::Command;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::event_log::EventLog;
use crate::protocol::EventMessage;

#[derive(Debug)]
enum ActorMessage {
    Command {
        command: Command,
        reply: Option<oneshot::Sender<bool>>,
    },
    Shutdown,
}

/// Cloneable command side of a running engine
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<ActorMessage>,
}

impl CommandSender {
    /// Apply `command` and wait for the outcome (true if anything changed)
    pub async fn send(&self, command: Command) -> Result<bool, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(ActorMessage::Command {
                command,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| EngineError::Closed)?;
        reply_rx.await.map_err(|_| EngineError::Closed)
    }

    /// Queue `command` without waiting for it to be applied
    pub fn try_send(&self, command: Command) -> Result<(), EngineError> {
        self.tx
            .try_send(ActorMessage::Command {
                command,
                reply: None,
            })
            .map_err(|_| EngineError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Handle to a running engine
#[derive(Debug)]
pub struct EngineHandle {
    commands: CommandSender,
    snapshots: watch::Receiver<GameSnapshot>,
    events: watch::Receiver<Option<Event>>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    pub async fn send(&self, command: Command) -> Result<bool, EngineError> {
        self.commands.send(command).await
    }

    pub fn commands(&self) -> CommandSender {
        self.commands.clone()
    }

    /// Latest-value stream of snapshots
    pub fn subscribe_snapshots(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Latest-value stream of events; `None` until the first event of a session
    pub fn subscribe_events(&self) -> watch::Receiver<Option<Event>> {
        self.events.clone()
    }

    /// Copy of the most recently published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Stop the actor and wait for it (and its event log) to finish
    pub async fn shutdown(self) -> Result<(), EngineError> {
        // The actor may already be gone; the join below still applies.
        let _ = self.commands.tx.send(ActorMessage::Shutdown).await;
        self.task.await.map_err(|_| EngineError::Closed)
    }
}

pub struct Engine;

impl Engine {
    /// Spawn the engine task on the current tokio runtime
    pub fn spawn(config: EngineConfig) -> EngineHandle {
        let mut session = Session::new(config.seed, config.extended_shapes);
        if let Some(level) = config.start_level {
            session.apply(Command::Start { level });
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(config.max_pending_commands.max(1));
        let (snapshot_tx, snapshots) = watch::channel(session.snapshot());
        let (event_tx, events) = watch::channel(session.last_event().cloned());
        let event_log = config.event_log_path.clone().map(EventLog::spawn);

        let actor = Actor {
            published_seq: session.last_event().map(|e| e.sequence),
            session,
            cmd_rx,
            snapshot_tx,
            event_tx,
            event_log,
        };
        let task = tokio::spawn(actor.run());

        EngineHandle {
            commands: CommandSender { tx: cmd_tx },
            snapshots,
            events,
            task,
        }
    }
}

struct Actor {
    session: Session,
    cmd_rx: mpsc::Receiver<ActorMessage>,
    snapshot_tx: watch::Sender<GameSnapshot>,
    event_tx: watch::Sender<Option<Event>>,
    event_log: Option<EventLog>,
    published_seq: Option<u64>,
}

impl Actor {
    async fn run(mut self) {
        let mut last_step = Instant::now();

        loop {
            let deadline = self
                .session
                .next_deadline_ms()
                .map(|ms| last_step + Duration::from_millis(ms as u64));

            tokio::select! {
                msg = self.cmd_rx.recv() => {
                    self.catch_up(&mut last_step);
                    match msg {
                        Some(ActorMessage::Command { command, reply }) => {
                            let changed = self.session.apply(command);
                            self.publish();
                            if let Some(reply) = reply {
                                let _ = reply.send(changed);
                            }
                        }
                        Some(ActorMessage::Shutdown) | None => break,
                    }
                }
                _ = wait_until(deadline) => {
                    self.catch_up(&mut last_step);
                    self.publish();
                }
            }
        }

        if let Some(log) = self.event_log.take() {
            log.close().await;
        }
    }

    /// Advance the session by the whole milliseconds since `last_step`
    fn catch_up(&mut self, last_step: &mut Instant) {
        let elapsed = Instant::now().saturating_duration_since(*last_step);
        let ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
        if ms == 0 {
            return;
        }
        self.session.advance(ms);
        *last_step += Duration::from_millis(ms as u64);
    }

    fn publish(&mut self) {
        // The log gets every event of the step; the watch only the latest.
        for event in self.session.drain_events() {
            if let Some(log) = self.event_log.as_ref() {
                log.record(EventMessage::from(&event));
            }
        }

        let session = &self.session;
        self.snapshot_tx
            .send_modify(|snap| session.snapshot_into(snap));

        // A new session clears the latest event; that is published as `None`.
        let event = session.last_event();
        let seq = event.map(|e| e.sequence);
        if seq == self.published_seq {
            return;
        }
        self.published_seq = seq;
        self.event_tx.send_replace(event.cloned());
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
