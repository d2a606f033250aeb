use super::Game;
use crate::time::iso8601;

/// Assembles the top-level read-only view of a `Game`, the shape a
/// collaborator (UI, bot, test harness) observes after every command. Each
/// entity hand-writes its own `serialize()` rather than deriving a generic
/// walker.
impl Game {
    pub fn serialize(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "createdAt": iso8601(self.created_at),
            "startedAt": self.started_at.map(iso8601),
            "finishedAt": self.finished_at.map(iso8601),
            "rolesAreRevealed": self.roles_are_revealed(),
            "playersManager": self.players_manager.serialize(),
            "questsManager": self.quests_manager.as_ref().map(|qm| qm.serialize()),
            "state": self.state().name(),
        })
    }
}
