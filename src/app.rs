//! Terminal front end: forwards keys into a [`SessionHandle`] and redraws
//! whenever the session publishes a new snapshot.

use anyhow::{bail, Context, Result};
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tracing::info;

use crate::config::GameConfig;
use crate::game::GameStatus;
use crate::input::{intent_for, Intent};
use crate::session::{Session, SessionHandle};
use crate::term::TermManager;

/// Plays until the user quits. The terminal is restored on every exit path
/// once it has been set up.
pub async fn run(config: &GameConfig) -> Result<()> {
    let grid = config.grid()?;
    let mut term = TermManager::new().context("Error reading terminal size")?;
    if !term.fits(&grid) {
        let side = grid.cells_per_side();
        bail!("terminal is too small for a {side}x{side} board");
    }

    let (session, task) = Session::spawn(config.build_game()?, config.tick_interval())?;

    // Setup can fail halfway, after the alternate screen is already up.
    let played = match term.setup().context("Error setting up terminal") {
        Ok(()) => play(&mut term, &session).await,
        Err(err) => Err(err),
    };
    let restored = term.restore().context("Error restoring terminal");

    // The task may already be gone if play() failed because it stopped.
    let _ = session.shutdown().await;
    task.await.context("game session panicked")?;

    played.and(restored)
}

async fn play(term: &mut TermManager, session: &SessionHandle) -> Result<()> {
    let mut snapshots = session.subscribe();
    let mut events = EventStream::new();

    let first = snapshots.borrow_and_update().clone();
    term.layout(&first.grid).context("Error drawing board")?;
    term.render(&first).context("Error drawing frame")?;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                changed.context("game session stopped")?;
                let snapshot = snapshots.borrow_and_update().clone();
                term.render(&snapshot).context("Error drawing frame")?;
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => match intent_for(&key) {
                    Intent::Turn(direction) => {
                        session.turn(direction).await?;
                    }
                    intent @ (Intent::Start | Intent::Restart) => {
                        if starts_round(intent, session.snapshot().status) {
                            session.start().await?;
                        }
                    }
                    Intent::Quit => break,
                    Intent::Ignore => {}
                },
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("Error reading terminal input"),
                None => break,
            },
        }
    }

    info!(score = session.snapshot().score, "player quit");
    Ok(())
}

/// Enter only starts from the title or an end screen; restart always does.
fn starts_round(intent: Intent, status: GameStatus) -> bool {
    match intent {
        Intent::Start => !status.is_running(),
        Intent::Restart => true,
        _ => false,
    }
}
