use serde::{Deserialize, Serialize};

/// Options toggling the optional roles. Merlin and the Assassin are always
/// included regardless of these flags (see `PlayersManager::assign_roles`).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default)]
pub struct RoleOptions {
    /// Whether to include Percival.
    pub percival: bool,
    /// Whether to include Morgana.
    pub morgana: bool,
    /// Whether to include Mordred.
    pub mordred: bool,
    /// Whether to include Oberon.
    pub oberon: bool,
}
