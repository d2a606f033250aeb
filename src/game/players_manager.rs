use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

use super::level_preset::LevelPreset;
use super::options::RoleOptions;
use super::player::Player;
use super::role::{Role, RoleId};
use super::vote::Vote;

pub const MAX_PLAYERS: usize = 10;

/// Player roster, leader rotation, role assignment, and
/// proposition/submission/vote routing.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlayersManager {
    players: Vec<Player>,
    leader_index: Option<usize>,
    is_submitted: bool,
}

impl PlayersManager {
    pub fn new() -> Self {
        Self { players: Vec::new(), leader_index: None, is_submitted: false }
    }

    pub fn add(&mut self, player: Player) -> Result<(), GameError> {
        if self.players.iter().any(|p| p.get_username() == player.get_username()) {
            return Err(GameError::UsernameAlreadyExists);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::MaximumPlayersReached);
        }
        let is_first = self.players.is_empty();
        let mut player = player;
        if is_first {
            player.mark_game_creator();
        }
        self.players.push(player);
        Ok(())
    }

    pub fn get_all(&self) -> &[Player] {
        &self.players
    }

    pub fn find(&self, username: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.get_username() == username)
    }

    fn find_mut(&mut self, username: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.get_username() == username)
    }

    fn find_index(&self, username: &str) -> Option<usize> {
        self.players.iter().position(|p| p.get_username() == username)
    }

    /// Draws unique roles from a pool built from `level_preset`/`options`
    /// (Merlin and the Assassin are always included) and deals one to each
    /// player, then picks a random starting leader.
    pub fn assign_roles(
        &mut self,
        level_preset: LevelPreset,
        options: RoleOptions,
        rng: &mut impl Rng,
    ) -> Result<(), GameError> {
        let mut roles = build_role_pool(level_preset, options);
        roles.shuffle(rng);

        for (player, role_id) in self.players.iter_mut().zip(roles) {
            player.set_role(Role::new(role_id));
            if role_id == RoleId::Assassin {
                player.mark_assassin();
            }
        }

        let leader_index = rng.gen_range(0..self.players.len());
        self.set_leader(leader_index);
        Ok(())
    }

    fn set_leader(&mut self, index: usize) {
        if let Some(old) = self.leader_index {
            if let Some(player) = self.players.get_mut(old) {
                player.mark_leader(false);
            }
        }
        self.leader_index = Some(index);
        self.players[index].mark_leader(true);
    }

    /// Transfers leadership to the next player in seating order.
    pub fn next_leader(&mut self) {
        let n = self.players.len();
        let next = match self.leader_index {
            Some(current) => (current + 1) % n,
            None => 0,
        };
        self.set_leader(next);
    }

    pub fn get_leader(&self) -> Option<&Player> {
        self.leader_index.and_then(|i| self.players.get(i))
    }

    pub fn toggle_is_proposed(&mut self, username: &str) {
        if let Some(player) = self.find_mut(username) {
            let proposed = player.is_proposed();
            player.mark_proposed(!proposed);
        }
    }

    pub fn get_proposed_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_proposed()).collect()
    }

    pub fn get_assassin(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_assassin())
    }

    pub fn get_victim(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_assassinated())
    }

    pub fn get_game_creator(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_game_creator())
    }

    pub fn is_allowed_to_propose_player(&self, username: &str) -> bool {
        self.get_leader().map(|l| l.get_username() == username).unwrap_or(false)
    }

    pub fn is_allowed_to_propose_team(&self, username: &str) -> bool {
        self.is_allowed_to_propose_player(username)
    }

    pub fn mark_as_submitted(&mut self) {
        self.is_submitted = true;
    }

    pub fn unmark_as_submitted(&mut self) {
        self.is_submitted = false;
    }

    pub fn get_is_submitted(&self) -> bool {
        self.is_submitted
    }

    pub fn set_vote(&mut self, vote: Vote) {
        if let Some(player) = self.find_mut(vote.get_username()) {
            player.set_vote(vote);
        }
    }

    pub fn is_allowed_to_vote_for_team(&self, username: &str) -> bool {
        self.find(username).map(|p| p.get_vote().is_none()).unwrap_or(false)
    }

    pub fn is_allowed_to_vote_for_quest(&self, username: &str) -> bool {
        self.find(username)
            .map(|p| p.is_proposed() && p.get_vote().is_none())
            .unwrap_or(false)
    }

    pub fn reset_votes(&mut self) {
        for player in self.players.iter_mut() {
            player.clear_vote();
        }
    }

    pub fn reset_propositions(&mut self) {
        for player in self.players.iter_mut() {
            player.mark_proposed(false);
        }
        self.is_submitted = false;
    }

    pub fn reset(&mut self) {
        self.reset_votes();
        self.reset_propositions();
    }

    pub fn assassinate(&mut self, assassin_username: &str, victim_username: &str) -> Result<(), GameError> {
        let is_assassin = self.get_assassin().map(|a| a.get_username() == assassin_username).unwrap_or(false);
        if !is_assassin {
            return Err(GameError::NoRightToAssassinate);
        }
        let victim_index = self.find_index(victim_username).ok_or(GameError::PlayerNotFound)?;
        self.players[victim_index].mark_assassinated();
        Ok(())
    }

    pub fn serialize(&self) -> serde_json::Value {
        serde_json::json!({
            "players": self.players.iter().map(Player::serialize).collect::<Vec<_>>(),
            "leaderIndex": self.leader_index,
            "isSubmitted": self.is_submitted,
        })
    }
}

impl Default for PlayersManager {
    fn default() -> Self {
        Self::new()
    }
}

fn build_role_pool(level_preset: LevelPreset, options: RoleOptions) -> Vec<RoleId> {
    let good_count = level_preset.get_good_count() as usize;
    let evil_count = level_preset.get_evil_count() as usize;

    let mut good_roles = vec![RoleId::Merlin];
    if options.percival && good_roles.len() < good_count {
        good_roles.push(RoleId::Percival);
    }
    let mut servant_ordinal = 1u8;
    while good_roles.len() < good_count {
        good_roles.push(RoleId::Servant(servant_ordinal));
        servant_ordinal += 1;
    }

    let mut evil_roles = vec![RoleId::Assassin];
    if options.mordred && evil_roles.len() < evil_count {
        evil_roles.push(RoleId::Mordred);
    }
    if options.morgana && evil_roles.len() < evil_count {
        evil_roles.push(RoleId::Morgana);
    }
    if options.oberon && evil_roles.len() < evil_count {
        evil_roles.push(RoleId::Oberon);
    }
    let mut minion_ordinal = 1u8;
    while evil_roles.len() < evil_count {
        evil_roles.push(RoleId::Minion(minion_ordinal));
        minion_ordinal += 1;
    }

    good_roles.into_iter().chain(evil_roles).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn filled_manager(n: usize) -> PlayersManager {
        let mut mgr = PlayersManager::new();
        for i in 0..n {
            mgr.add(Player::new(format!("p{i}"))).unwrap();
        }
        mgr
    }

    #[test]
    fn first_player_added_is_game_creator() {
        let mgr = filled_manager(3);
        assert_eq!(mgr.get_game_creator().unwrap().get_username(), "p0");
    }

    #[test]
    fn duplicate_username_is_rejected_without_mutation() {
        let mut mgr = filled_manager(3);
        let err = mgr.add(Player::new("p0")).unwrap_err();
        assert_eq!(err, GameError::UsernameAlreadyExists);
        assert_eq!(mgr.get_all().len(), 3);
    }

    #[test]
    fn capacity_overflow_is_rejected() {
        let mut mgr = filled_manager(10);
        let err = mgr.add(Player::new("overflow")).unwrap_err();
        assert_eq!(err, GameError::MaximumPlayersReached);
        assert_eq!(mgr.get_all().len(), 10);
    }

    #[test]
    fn assign_roles_produces_exact_counts_and_unique_roles_for_every_player_count() {
        for n in 5..=10usize {
            let mut mgr = filled_manager(n);
            let preset = LevelPreset::for_player_count(n).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            mgr.assign_roles(preset, RoleOptions::default(), &mut rng).unwrap();

            let roles: Vec<RoleId> = mgr.get_all().iter().map(|p| p.get_role().unwrap().get_id()).collect();
            let good = roles.iter().filter(|r| r.loyalty() == super::super::role::Loyalty::Good).count();
            let evil = roles.len() - good;
            assert_eq!(good, preset.get_good_count() as usize);
            assert_eq!(evil, preset.get_evil_count() as usize);
            assert!(roles.iter().any(|r| matches!(r, RoleId::Merlin)));
            assert!(roles.iter().any(|r| matches!(r, RoleId::Assassin)));

            let mut seen = std::collections::HashSet::new();
            for r in &roles {
                assert!(seen.insert(format!("{r:?}")), "roles must be pairwise unique");
            }

            assert_eq!(mgr.get_all().iter().filter(|p| p.is_leader()).count(), 1);
            assert_eq!(mgr.get_all().iter().filter(|p| p.is_assassin()).count(), 1);
        }
    }

    #[test]
    fn merlin_and_assassin_are_present_even_with_all_options_off() {
        let mut mgr = filled_manager(5);
        let preset = LevelPreset::for_player_count(5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        mgr.assign_roles(preset, RoleOptions::default(), &mut rng).unwrap();
        let roles: Vec<RoleId> = mgr.get_all().iter().map(|p| p.get_role().unwrap().get_id()).collect();
        assert!(roles.contains(&RoleId::Merlin));
        assert!(roles.contains(&RoleId::Assassin));
    }

    #[test]
    fn next_leader_rotates_to_adjacent_player_modulo_n() {
        let mut mgr = filled_manager(4);
        mgr.set_leader(0);
        for expected in [1, 2, 3, 0] {
            mgr.next_leader();
            let leader_idx = mgr.leader_index.unwrap();
            assert_eq!(leader_idx, expected);
            assert_eq!(mgr.get_all().iter().filter(|p| p.is_leader()).count(), 1);
        }
    }

    #[test]
    fn toggle_is_proposed_is_ignored_for_unknown_username() {
        let mut mgr = filled_manager(3);
        mgr.toggle_is_proposed("ghost");
        assert!(mgr.get_proposed_players().is_empty());
    }

    #[test]
    fn vote_eligibility_requires_no_existing_vote() {
        let mut mgr = filled_manager(3);
        assert!(mgr.is_allowed_to_vote_for_team("p0"));
        mgr.set_vote(Vote::new("p0", true));
        assert!(!mgr.is_allowed_to_vote_for_team("p0"));
    }

    #[test]
    fn quest_vote_eligibility_requires_proposed_and_unvoted() {
        let mut mgr = filled_manager(3);
        assert!(!mgr.is_allowed_to_vote_for_quest("p0"));
        mgr.toggle_is_proposed("p0");
        assert!(mgr.is_allowed_to_vote_for_quest("p0"));
        mgr.set_vote(Vote::new("p0", true));
        assert!(!mgr.is_allowed_to_vote_for_quest("p0"));
    }

    #[test]
    fn assassinate_requires_assassin_and_marks_victim() {
        let mut mgr = filled_manager(5);
        let preset = LevelPreset::for_player_count(5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        mgr.assign_roles(preset, RoleOptions::default(), &mut rng).unwrap();

        let non_assassin = mgr.get_all().iter().find(|p| !p.is_assassin()).unwrap().get_username().to_string();
        let assassin = mgr.get_assassin().unwrap().get_username().to_string();
        let victim = mgr.get_all().iter().find(|p| p.get_username() != assassin).unwrap().get_username().to_string();

        assert_eq!(
            mgr.assassinate(&non_assassin, &victim),
            Err(GameError::NoRightToAssassinate)
        );
        mgr.assassinate(&assassin, &victim).unwrap();
        assert!(mgr.find(&victim).unwrap().is_assassinated());
    }
}
