//! A rule engine for Avalon-style hidden-role deduction games: player
//! roster and role assignment, the five-quest ledger, and the phase state
//! machine that governs which commands are legal at any moment.

pub mod error;
pub mod game;
pub mod time;

pub use error::GameError;
pub use game::Game;

/// Initialises the `env_logger` backend for `log`'s macros. A thin wrapper
/// so embedding applications don't need to depend on `env_logger`
/// themselves just to turn logging on.
pub fn init_logging() {
    env_logger::try_init().ok();
}
