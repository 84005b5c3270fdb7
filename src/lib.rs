//! Snake on a fixed tick.
//!
//! - [`game`] holds the board rules: movement, collisions, food and score.
//! - [`driver`] and [`session`] run those rules at a steady rate on one task.
//! - [`app`], [`term`] and [`input`] are the terminal front end.

pub mod app;
pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod input;
pub mod session;
pub mod snake;
pub mod term;

pub use config::GameConfig;
pub use error::{Error, Result};
pub use game::{Game, GameStatus, Grid, Snapshot, TickOutcome};
pub use session::{Session, SessionHandle};
pub use snake::{Cell, Direction};
