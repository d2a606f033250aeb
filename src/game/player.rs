use serde::{Deserialize, Serialize};

use super::role::Role;
use super::vote::Vote;

/// Holds identity, current role, current vote, and phase flags for one player.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Player {
    username: String,
    role: Option<Role>,
    vote: Option<Vote>,
    is_leader: bool,
    is_proposed: bool,
    is_assassin: bool,
    is_assassinated: bool,
    is_game_creator: bool,
}

impl Player {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: None,
            vote: None,
            is_leader: false,
            is_proposed: false,
            is_assassin: false,
            is_assassinated: false,
            is_game_creator: false,
        }
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    pub fn get_vote(&self) -> Option<&Vote> {
        self.vote.as_ref()
    }

    pub fn set_vote(&mut self, vote: Vote) {
        self.vote = Some(vote);
    }

    pub fn clear_vote(&mut self) {
        self.vote = None;
    }

    pub fn mark_leader(&mut self, is_leader: bool) {
        self.is_leader = is_leader;
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader
    }

    pub fn mark_proposed(&mut self, is_proposed: bool) {
        self.is_proposed = is_proposed;
    }

    pub fn is_proposed(&self) -> bool {
        self.is_proposed
    }

    pub fn mark_assassin(&mut self) {
        self.is_assassin = true;
    }

    pub fn is_assassin(&self) -> bool {
        self.is_assassin
    }

    pub fn mark_assassinated(&mut self) {
        self.is_assassinated = true;
    }

    pub fn is_assassinated(&self) -> bool {
        self.is_assassinated
    }

    pub fn mark_game_creator(&mut self) {
        self.is_game_creator = true;
    }

    pub fn is_game_creator(&self) -> bool {
        self.is_game_creator
    }

    /// Delegates to `Role::can_see`; `false` if either player has no role yet.
    pub fn can_see(&self, other: &Player) -> bool {
        match (&self.role, &other.role) {
            (Some(mine), Some(theirs)) => mine.can_see(theirs),
            _ => false,
        }
    }

    pub fn serialize(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "role": self.role.as_ref().map(Role::serialize),
            "vote": self.vote.as_ref().map(Vote::serialize),
            "isAssassinated": self.is_assassinated,
        })
    }
}
