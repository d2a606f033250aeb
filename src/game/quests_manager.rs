use serde::{Deserialize, Serialize};

use super::level_preset::LevelPreset;
use super::quest::Quest;
use super::vote::Vote;
use crate::error::GameError;

/// Ordered collection of five quests. Tracks the current quest, the overall
/// score, and assassination eligibility.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct QuestsManager {
    quests: [Quest; 5],
    current_quest_index: usize,
    assassination_status: Option<bool>,
}

impl QuestsManager {
    pub fn init(level_preset: LevelPreset, total_players: usize) -> Self {
        let configs = level_preset.get_quests_config();
        let quests = configs.map(|config| Quest::new(config, total_players));
        Self {
            quests,
            current_quest_index: 0,
            assassination_status: None,
        }
    }

    pub fn get_current_quest(&self) -> &Quest {
        &self.quests[self.current_quest_index]
    }

    pub fn get_current_quest_mut(&mut self) -> &mut Quest {
        &mut self.quests[self.current_quest_index]
    }

    pub fn get_current_quest_index(&self) -> usize {
        self.current_quest_index
    }

    pub fn get_quests(&self) -> &[Quest; 5] {
        &self.quests
    }

    pub fn add_vote(&mut self, vote: Vote) -> Result<(), GameError> {
        self.get_current_quest_mut().add_vote(vote)
    }

    /// Advances past the current quest once it is terminal.
    pub fn next_quest(&mut self) {
        if self.get_current_quest().get_status() != -1 && self.current_quest_index < 4 {
            self.current_quest_index += 1;
        }
    }

    fn completed_quests(&self) -> impl Iterator<Item = i8> + '_ {
        self.quests.iter().map(|q| q.get_status()).filter(|s| *s != -1)
    }

    fn successes(&self) -> usize {
        self.completed_quests().filter(|s| *s == 1).count()
    }

    fn failures(&self) -> usize {
        self.completed_quests().filter(|s| *s == 0).count()
    }

    /// -1 ongoing; 0 if evil has won three quests; 1 if good has won three
    /// quests (provisional until assassination resolves).
    pub fn get_status(&self) -> i8 {
        if let Some(merlin_killed) = self.assassination_status {
            return if merlin_killed { 0 } else { 1 };
        }
        if self.failures() >= 3 {
            return 0;
        }
        if self.successes() >= 3 {
            return 1;
        }
        -1
    }

    pub fn assassination_is_allowed(&self) -> bool {
        self.successes() >= 3 && self.assassination_status.is_none()
    }

    pub fn set_assassination_status(&mut self, victim_was_merlin: bool) {
        self.assassination_status = Some(victim_was_merlin);
    }

    pub fn get_assassination_status(&self) -> Option<bool> {
        self.assassination_status
    }

    pub fn serialize(&self) -> serde_json::Value {
        serde_json::json!({
            "quests": self.quests.iter().map(Quest::serialize).collect::<Vec<_>>(),
            "currentQuestIndex": self.current_quest_index,
            "assassinationStatus": match self.assassination_status {
                None => serde_json::Value::Null,
                Some(true) => serde_json::Value::String("SUCCESS".into()),
                Some(false) => serde_json::Value::String("FAIL".into()),
            },
            "status": self.get_status(),
        })
    }
}
