use serde::{Deserialize, Serialize};

/// A secret role a player may be dealt.
///
/// `Servant`/`Minion` carry a 1-based ordinal so the role pool can be sized
/// for a player count without allocating a `Vec<RoleId>` per game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum RoleId {
    Merlin,
    Percival,
    Servant(u8),
    Assassin,
    Mordred,
    Morgana,
    Oberon,
    Minion(u8),
}

impl RoleId {
    pub fn loyalty(self) -> Loyalty {
        use RoleId::*;
        match self {
            Merlin | Percival | Servant(_) => Loyalty::Good,
            Assassin | Mordred | Morgana | Oberon | Minion(_) => Loyalty::Evil,
        }
    }
}

impl ToString for RoleId {
    fn to_string(&self) -> String {
        match self {
            RoleId::Merlin => "Merlin".to_string(),
            RoleId::Percival => "Percival".to_string(),
            RoleId::Servant(n) => format!("Servant{n}"),
            RoleId::Assassin => "Assassin".to_string(),
            RoleId::Mordred => "Mordred".to_string(),
            RoleId::Morgana => "Morgana".to_string(),
            RoleId::Oberon => "Oberon".to_string(),
            RoleId::Minion(n) => format!("Minion{n}"),
        }
    }
}

/// The two loyalties a role can carry.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Loyalty {
    Good,
    Evil,
}

/// Identity + loyalty + visibility predicate for a single player's secret role.
#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub struct Role {
    id: RoleId,
}

impl Role {
    pub fn new(id: RoleId) -> Self {
        Self { id }
    }

    pub fn get_id(&self) -> RoleId {
        self.id
    }

    pub fn get_loyalty(&self) -> Loyalty {
        self.id.loyalty()
    }

    /// Whether the holder of this role perceives `other` as evil.
    ///
    /// Static function of (viewer id, target id); never mutated. Mirrors the
    /// "who sees whom" table a source-language implementation would hardcode.
    pub fn can_see(&self, other: &Role) -> bool {
        use RoleId::*;
        match (self.id, other.id) {
            (Merlin, Mordred) => false,
            (Merlin, Assassin | Morgana | Oberon | Minion(_)) => true,
            (Percival, Merlin | Morgana) => true,
            (Assassin | Mordred | Morgana | Minion(_), Oberon) => false,
            (Oberon, _) => false,
            (a, b) if a.loyalty() == Loyalty::Evil && b.loyalty() == Loyalty::Evil => true,
            _ => false,
        }
    }

    pub fn serialize(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id.to_string(),
            "loyalty": match self.get_loyalty() {
                Loyalty::Good => "GOOD",
                Loyalty::Evil => "EVIL",
            },
        })
    }
}
