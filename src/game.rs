mod commands;
pub mod level_preset;
pub mod options;
pub mod player;
pub mod players_manager;
pub mod quest;
pub mod quests_manager;
pub mod role;
mod snapshot;
pub mod state_machine;
#[cfg(test)]
mod test;
pub mod vote;

use std::time::SystemTime;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use options::RoleOptions;
use players_manager::PlayersManager;
use quests_manager::QuestsManager;
use state_machine::{GameConfig, GameStateMachine, RevealTimer, StateKind};

/// A single running Avalon game: the player roster, the quest ledger, the
/// phase state machine, and the role-concealment timer, composed behind one
/// facade.
pub struct Game {
    id: String,
    created_at: SystemTime,
    started_at: Option<SystemTime>,
    finished_at: Option<SystemTime>,
    players_manager: PlayersManager,
    quests_manager: Option<QuestsManager>,
    state_machine: GameStateMachine,
    reveal_timer: RevealTimer,
    role_options: RoleOptions,
    rng: ChaCha8Rng,
}

impl Game {
    /// Roles default to the base five (no Percival/Morgana/Mordred/Oberon);
    /// pass an override to `start` to enable any of them.
    pub fn new(id: impl Into<String>, seed: u64, config: GameConfig) -> Self {
        Self {
            id: id.into(),
            created_at: SystemTime::now(),
            started_at: None,
            finished_at: None,
            players_manager: PlayersManager::new(),
            quests_manager: None,
            state_machine: GameStateMachine::new(config),
            reveal_timer: RevealTimer::new(),
            role_options: RoleOptions::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> StateKind {
        self.state_machine.current()
    }

    pub fn players(&self) -> &PlayersManager {
        &self.players_manager
    }

    pub fn quests(&self) -> Option<&QuestsManager> {
        self.quests_manager.as_ref()
    }

    pub fn roles_are_revealed(&self) -> bool {
        self.reveal_timer.is_revealed()
    }
}
