use std::time::SystemTime;

use tokio::sync::watch;

use crate::error::GameError;

use super::level_preset::LevelPreset;
use super::options::RoleOptions;
use super::player::Player;
use super::quests_manager::QuestsManager;
use super::role::RoleId;
use super::state_machine::{StateKind, TransitionHandle};
use super::vote::Vote;
use super::Game;

/// Per-command legality checks and mutations — the "valid action" policy
/// of each game phase, dispatched by matching on the current `StateKind`
/// rather than through a per-state class hierarchy.
impl Game {
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.state() != StateKind::Preparation {
            log::debug!("addPlayer rejected: game {} already started", self.id);
            return Err(GameError::GameAlreadyStarted);
        }
        self.players_manager.add(player)?;
        Ok(())
    }

    pub fn start(&mut self, role_options: Option<RoleOptions>) -> Result<TransitionHandle, GameError> {
        if self.state() != StateKind::Preparation {
            return Err(GameError::GameAlreadyStarted);
        }

        if let Some(role_options) = role_options {
            self.role_options = role_options;
        }

        let player_count = self.players_manager.get_all().len();
        let preset = LevelPreset::for_player_count(player_count)
            .map_err(|_| GameError::IncorrectNumberOfPlayers)?;

        self.players_manager.assign_roles(preset, self.role_options, &mut self.rng)?;
        self.quests_manager = Some(QuestsManager::init(preset, player_count));
        self.started_at = Some(SystemTime::now());

        log::info!("game {} started with {player_count} players", self.id);
        self.state_machine.go(StateKind::TeamProposition)
    }

    /// Shows every player's role for `seconds`, then conceals them again.
    pub fn reveal_roles(&mut self, seconds: u64) -> watch::Receiver<bool> {
        self.reveal_timer.reveal(seconds)
    }

    pub fn toggle_is_proposed(&mut self, leader_username: &str, target_username: &str) -> Result<(), GameError> {
        if self.state() == StateKind::Frozen {
            return Err(GameError::NoActionTime);
        }
        if self.state() != StateKind::TeamProposition || self.players_manager.get_is_submitted() {
            return Err(GameError::NoPropositionTime);
        }
        if !self.players_manager.is_allowed_to_propose_player(leader_username) {
            return Err(GameError::NoRightToPropose);
        }
        self.players_manager.toggle_is_proposed(target_username);
        Ok(())
    }

    pub fn submit_team(&mut self, leader_username: &str) -> Result<TransitionHandle, GameError> {
        if self.state() == StateKind::Frozen {
            return Err(GameError::NoActionTime);
        }
        if self.state() != StateKind::TeamProposition {
            return Err(GameError::NoPropositionTime);
        }
        if !self.players_manager.is_allowed_to_propose_team(leader_username) {
            return Err(GameError::NoRightToSubmitTeam);
        }

        let needed = self.quests_manager().get_current_quest().get_votes_needed() as usize;
        let proposed = self.players_manager.get_proposed_players().len();
        if proposed != needed {
            return Err(GameError::IncorrectNumberOfPlayers);
        }

        self.players_manager.mark_as_submitted();
        let is_last_round = self.quests_manager().get_current_quest().is_last_round_of_team_voting();

        if is_last_round {
            log::info!("game {} forcing team vote approval on round 5", self.id);
            let team_approved = self.quests_manager().get_current_quest().team_approved_handle();
            Ok(self.state_machine.go_pre_approved(team_approved))
        } else {
            self.state_machine.go(StateKind::TeamVoting)
        }
    }

    pub fn vote_for_team(&mut self, username: &str, value: bool) -> Result<Option<TransitionHandle>, GameError> {
        if self.state() == StateKind::Frozen {
            return Err(GameError::NoActionTime);
        }
        if self.state() != StateKind::TeamVoting {
            return Err(GameError::NoVotingTime);
        }
        if !self.players_manager.is_allowed_to_vote_for_team(username) {
            return Err(GameError::NoRightToVote);
        }

        let vote = Vote::new(username, value);
        self.players_manager.set_vote(vote.clone());
        self.quests_manager_mut().add_vote(vote)?;

        let total_players = self.players_manager.get_all().len();
        let quest = self.quests_manager().get_current_quest();
        if quest.current_team_votes().len() < total_players {
            return Ok(None);
        }
        let succeeded = quest.team_voting_succeeded();

        if succeeded {
            self.quests_manager_mut().get_current_quest_mut().approve_team();
            self.players_manager.reset_votes();
            log::info!("game {} team approved, entering quest voting", self.id);
            self.state_machine.go(StateKind::QuestVoting).map(Some)
        } else {
            // The fifth round never reaches here: submitTeam routed it
            // through TeamVotingPreApproved instead of TeamVoting.
            self.players_manager.unmark_as_submitted();
            self.players_manager.reset_propositions();
            self.players_manager.reset_votes();
            self.quests_manager_mut().get_current_quest_mut().advance_team_voting_round();
            self.players_manager.next_leader();
            log::info!("game {} team rejected, leader rotates", self.id);
            self.state_machine.go(StateKind::TeamProposition).map(Some)
        }
    }

    pub fn vote_for_quest(&mut self, username: &str, value: bool) -> Result<Option<TransitionHandle>, GameError> {
        if self.state() == StateKind::Frozen {
            return Err(GameError::NoActionTime);
        }
        if self.state() != StateKind::QuestVoting {
            return Err(GameError::NoVotingTime);
        }
        if !self.players_manager.is_allowed_to_vote_for_quest(username) {
            return Err(GameError::NoRightToVote);
        }

        let vote = Vote::new(username, value);
        self.players_manager.set_vote(vote.clone());
        self.quests_manager_mut().add_vote(vote)?;

        if !self.quests_manager().get_current_quest().quest_voting_finished() {
            return Ok(None);
        }

        if self.quests_manager().get_status() == 0 {
            self.finished_at = Some(SystemTime::now());
            log::info!("game {} finished: evil wins on quest failures", self.id);
            return self.state_machine.go(StateKind::Finish).map(Some);
        }

        if self.quests_manager().assassination_is_allowed() {
            log::info!("game {} good reaches three quests, assassination opens", self.id);
            return self.state_machine.go(StateKind::Assassination).map(Some);
        }

        self.players_manager.reset_votes();
        self.players_manager.reset_propositions();
        self.players_manager.next_leader();
        self.quests_manager_mut().next_quest();
        self.state_machine.go(StateKind::TeamProposition).map(Some)
    }

    pub fn assassinate(&mut self, assassin_username: &str, victim_username: &str) -> Result<TransitionHandle, GameError> {
        if self.state() == StateKind::Frozen {
            return Err(GameError::NoActionTime);
        }
        if self.state() != StateKind::Assassination {
            return Err(GameError::NoAssassinationTime);
        }
        if !self.quests_manager().assassination_is_allowed() {
            return Err(GameError::NoAssassinationTime);
        }

        self.players_manager.assassinate(assassin_username, victim_username)?;
        let victim_was_merlin = self
            .players_manager
            .find(victim_username)
            .and_then(|p| p.get_role())
            .map(|role| role.get_id() == RoleId::Merlin)
            .unwrap_or(false);
        self.quests_manager_mut().set_assassination_status(victim_was_merlin);
        self.finished_at = Some(SystemTime::now());

        log::info!(
            "game {} finished: assassin {} struck {}, merlin killed = {victim_was_merlin}",
            self.id,
            assassin_username,
            victim_username
        );
        self.state_machine.go(StateKind::Finish)
    }

    fn quests_manager(&self) -> &QuestsManager {
        self.quests_manager.as_ref().expect("quests are initialised once start() has run")
    }

    fn quests_manager_mut(&mut self) -> &mut QuestsManager {
        self.quests_manager.as_mut().expect("quests are initialised once start() has run")
    }
}
