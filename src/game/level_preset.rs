use crate::error::GameError;

/// Per-quest team size and fail threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestConfig {
    pub votes_needed: u8,
    pub fails_needed: u8,
}

/// Player-count -> (goodCount, evilCount, per-quest config) lookup.
///
/// Compiled-in, not loaded from a file — configuration loading is out of
/// scope for this crate, not this table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelPreset {
    good_count: u8,
    evil_count: u8,
    quests: [QuestConfig; 5],
}

const fn qc(votes_needed: u8, fails_needed: u8) -> QuestConfig {
    QuestConfig { votes_needed, fails_needed }
}

const TABLE: [LevelPreset; 6] = [
    LevelPreset {
        good_count: 3,
        evil_count: 2,
        quests: [qc(2, 1), qc(3, 1), qc(2, 1), qc(3, 1), qc(3, 1)],
    },
    LevelPreset {
        good_count: 4,
        evil_count: 2,
        quests: [qc(2, 1), qc(3, 1), qc(4, 1), qc(3, 1), qc(4, 1)],
    },
    LevelPreset {
        good_count: 4,
        evil_count: 3,
        quests: [qc(2, 1), qc(3, 1), qc(3, 1), qc(4, 2), qc(4, 1)],
    },
    LevelPreset {
        good_count: 5,
        evil_count: 3,
        quests: [qc(3, 1), qc(4, 1), qc(4, 1), qc(5, 2), qc(5, 1)],
    },
    LevelPreset {
        good_count: 6,
        evil_count: 3,
        quests: [qc(3, 1), qc(4, 1), qc(4, 1), qc(5, 2), qc(5, 1)],
    },
    LevelPreset {
        good_count: 6,
        evil_count: 4,
        quests: [qc(3, 1), qc(4, 1), qc(4, 1), qc(5, 2), qc(5, 1)],
    },
];

impl LevelPreset {
    /// Looks up the preset for `player_count`, which must be in `5..=10`.
    pub fn for_player_count(player_count: usize) -> Result<Self, GameError> {
        if !(5..=10).contains(&player_count) {
            return Err(GameError::UnsupportedPlayerCount);
        }
        Ok(TABLE[player_count - 5])
    }

    pub fn get_good_count(&self) -> u8 {
        self.good_count
    }

    pub fn get_evil_count(&self) -> u8 {
        self.evil_count
    }

    pub fn get_quests_config(&self) -> [QuestConfig; 5] {
        self.quests
    }
}
