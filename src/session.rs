//! The game lives on one task.
//!
//! [`Session::spawn`] moves a [`Game`] and its [`TickDriver`] onto a tokio
//! task. Front ends talk to it through a [`SessionHandle`]: commands go in
//! over a channel, snapshots come back over a `watch`. Ticks and commands
//! are handled one at a time on that task, so nothing else ever touches the
//! game.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{info, trace};

use crate::driver::TickDriver;
use crate::error::{Error, Result};
use crate::game::{Game, Snapshot, TickOutcome};
use crate::snake::Direction;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug)]
enum Command {
    Start { reply: oneshot::Sender<Snapshot> },
    Turn { direction: Direction, reply: oneshot::Sender<Snapshot> },
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SessionHandle {
    /// Starts a new round, replacing any round in progress.
    pub async fn start(&self) -> Result<Snapshot> {
        self.request(|reply| Command::Start { reply }).await
    }

    pub async fn turn(&self, direction: Direction) -> Result<Snapshot> {
        self.request(|reply| Command::Turn { direction, reply }).await
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.commands.send(Command::Shutdown).await.map_err(|_| Error::SessionClosed)
    }

    async fn request(&self, command: impl FnOnce(oneshot::Sender<Snapshot>) -> Command) -> Result<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.commands.send(command(reply)).await.map_err(|_| Error::SessionClosed)?;
        response.await.map_err(|_| Error::SessionClosed)
    }
}

pub struct Session {
    game: Game,
    driver: TickDriver,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Snapshot>,
}

impl Session {
    /// Must be called inside a tokio runtime.
    pub fn spawn(game: Game, tick_interval: Duration) -> Result<(SessionHandle, JoinHandle<()>)> {
        let driver = TickDriver::new(tick_interval)?;
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(game.snapshot());

        let session = Session { game, driver, commands: command_rx, snapshots: snapshot_tx };
        let task = tokio::spawn(session.run());

        Ok((SessionHandle { commands: command_tx, snapshots: snapshot_rx }, task))
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Start { reply }) => {
                        self.start();
                        let _ = reply.send(self.publish());
                    }
                    Some(Command::Turn { direction, reply }) => {
                        self.game.set_direction(direction);
                        let _ = reply.send(self.publish());
                    }
                    Some(Command::Shutdown) | None => break,
                },
                () = self.driver.tick() => self.tick(),
            }
        }

        self.driver.disarm();
        info!(score = self.game.score(), "game session closed");
    }

    /// Cancel the old driver, reset, then arm a fresh one.
    fn start(&mut self) {
        self.driver.disarm();
        self.game.start();
        self.driver.arm();
    }

    fn tick(&mut self) {
        let outcome = self.game.tick();
        trace!(?outcome, "tick");

        if !self.game.status().is_running() {
            self.driver.disarm();
        }
        if outcome != TickOutcome::Idle {
            self.publish();
        }
    }

    fn publish(&self) -> Snapshot {
        let snapshot = self.game.snapshot();
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }
}
