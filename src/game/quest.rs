use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GameError;

use super::level_preset::QuestConfig;
use super::vote::Vote;

fn serialize_team_approved<S: Serializer>(flag: &Arc<AtomicBool>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(flag.load(Ordering::SeqCst))
}

fn deserialize_team_approved<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<AtomicBool>, D::Error> {
    Ok(Arc::new(AtomicBool::new(bool::deserialize(deserializer)?)))
}

/// Per-mission state: team-vote rounds plus the quest vote itself.
///
/// `team_approved` lives behind an `Arc<AtomicBool>` rather than a plain
/// `bool` so the forced approval of the fifth proposal round can be set
/// directly from the state machine's Frozen-interval background task (see
/// `GameStateMachine::go_pre_approved`) instead of through a side flag a
/// later synchronous command would have to notice and apply.
#[derive(Serialize, Deserialize, Debug)]
pub struct Quest {
    votes_needed: u8,
    fails_needed: u8,
    total_players: usize,
    team_vote_rounds: [Vec<Vote>; 5],
    team_voting_round_index: usize,
    #[serde(serialize_with = "serialize_team_approved", deserialize_with = "deserialize_team_approved")]
    team_approved: Arc<AtomicBool>,
    quest_votes: Vec<Vote>,
}

impl Clone for Quest {
    fn clone(&self) -> Self {
        Self {
            votes_needed: self.votes_needed,
            fails_needed: self.fails_needed,
            total_players: self.total_players,
            team_vote_rounds: self.team_vote_rounds.clone(),
            team_voting_round_index: self.team_voting_round_index,
            team_approved: Arc::new(AtomicBool::new(self.team_approved.load(Ordering::SeqCst))),
            quest_votes: self.quest_votes.clone(),
        }
    }
}

impl Quest {
    pub fn new(config: QuestConfig, total_players: usize) -> Self {
        Self {
            votes_needed: config.votes_needed,
            fails_needed: config.fails_needed,
            total_players,
            team_vote_rounds: Default::default(),
            team_voting_round_index: 0,
            team_approved: Arc::new(AtomicBool::new(false)),
            quest_votes: Vec::new(),
        }
    }

    pub fn get_votes_needed(&self) -> u8 {
        self.votes_needed
    }

    pub fn get_fails_needed(&self) -> u8 {
        self.fails_needed
    }

    pub fn get_team_voting_round_index(&self) -> usize {
        self.team_voting_round_index
    }

    fn current_round(&self) -> &Vec<Vote> {
        &self.team_vote_rounds[self.team_voting_round_index]
    }

    fn current_round_mut(&mut self) -> &mut Vec<Vote> {
        &mut self.team_vote_rounds[self.team_voting_round_index]
    }

    pub fn current_team_votes(&self) -> &[Vote] {
        self.current_round()
    }

    /// Routes the vote to the current team-voting round, or to the quest
    /// vote once the team has been approved.
    pub fn add_vote(&mut self, vote: Vote) -> Result<(), GameError> {
        if self.is_team_approved() {
            if self.quest_votes.iter().any(|v| v.get_username() == vote.get_username()) {
                return Err(GameError::AlreadyVotedForQuest);
            }
            self.quest_votes.push(vote);
        } else {
            if self.current_round().iter().any(|v| v.get_username() == vote.get_username()) {
                return Err(GameError::AlreadyVotedForTeam);
            }
            self.current_round_mut().push(vote);
        }
        Ok(())
    }

    fn round_tally(&self) -> (usize, usize) {
        let round = self.current_round();
        let approvals = round.iter().filter(|v| v.get_value()).count();
        let rejections = round.len() - approvals;
        (approvals, rejections)
    }

    /// True while the current round is under-voted, or while a complete
    /// round has not yet reached majority approval.
    pub fn team_voting_allowed(&self) -> bool {
        self.current_round().len() < self.total_players || !self.team_voting_succeeded()
    }

    /// Current round complete and approvals strictly outnumber rejections.
    pub fn team_voting_succeeded(&self) -> bool {
        if self.current_round().len() < self.total_players {
            return false;
        }
        let (approvals, rejections) = self.round_tally();
        approvals > rejections
    }

    /// Current round complete and majority rejected.
    pub fn team_voting_round_finished(&self) -> bool {
        self.current_round().len() == self.total_players && !self.team_voting_succeeded()
    }

    pub fn is_last_round_of_team_voting(&self) -> bool {
        self.team_voting_round_index == 4
    }

    /// Advances to the next team-voting round after a rejection.
    pub fn advance_team_voting_round(&mut self) {
        self.team_voting_round_index += 1;
    }

    /// Marks the team approved after a normal majority-approval vote.
    pub fn approve_team(&self) {
        self.team_approved.store(true, Ordering::SeqCst);
    }

    /// Marks the team approved without any recorded votes, for the forced
    /// approval of the fifth proposal round.
    pub fn force_approve_team(&self) {
        self.team_approved.store(true, Ordering::SeqCst);
    }

    /// A handle to this quest's approval flag, shared with the background
    /// task that force-approves the fifth proposal round once its Frozen
    /// wait elapses (see `GameStateMachine::go_pre_approved`). Storing
    /// through this handle is exactly `force_approve_team`'s effect.
    pub fn team_approved_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.team_approved)
    }

    pub fn is_team_approved(&self) -> bool {
        self.team_approved.load(Ordering::SeqCst)
    }

    pub fn quest_voting_allowed(&self) -> bool {
        self.is_team_approved() && self.quest_votes.len() < self.votes_needed as usize
    }

    pub fn quest_voting_finished(&self) -> bool {
        self.quest_votes.len() == self.votes_needed as usize
    }

    /// -1 while in progress, 0 if the quest failed, 1 if it succeeded.
    pub fn get_status(&self) -> i8 {
        if self.quest_votes.len() < self.votes_needed as usize {
            return -1;
        }
        let rejections = self.quest_votes.iter().filter(|v| !v.get_value()).count();
        if rejections >= self.fails_needed as usize { 0 } else { 1 }
    }

    pub fn serialize(&self) -> serde_json::Value {
        serde_json::json!({
            "votesNeeded": self.votes_needed,
            "failsNeeded": self.fails_needed,
            "totalPlayers": self.total_players,
            "teamVoteRounds": self.team_vote_rounds.iter()
                .map(|round| round.iter().map(Vote::serialize).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
            "teamVotingRoundIndex": self.team_voting_round_index,
            "questVotes": self.quest_votes.iter().map(Vote::serialize).collect::<Vec<_>>(),
            "status": self.get_status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(votes_needed: u8, fails_needed: u8, total_players: usize) -> Quest {
        Quest::new(QuestConfig { votes_needed, fails_needed }, total_players)
    }

    #[test]
    fn status_is_in_progress_until_quest_votes_complete() {
        let mut q = quest(2, 1, 5);
        q.approve_team();
        assert_eq!(q.get_status(), -1);
        q.add_vote(Vote::new("a", true)).unwrap();
        assert_eq!(q.get_status(), -1);
        q.add_vote(Vote::new("b", true)).unwrap();
        assert_eq!(q.get_status(), 1);
    }

    #[test]
    fn status_fails_once_fails_needed_reached() {
        let mut q = quest(3, 1, 5);
        q.approve_team();
        q.add_vote(Vote::new("a", true)).unwrap();
        q.add_vote(Vote::new("b", false)).unwrap();
        q.add_vote(Vote::new("c", true)).unwrap();
        assert_eq!(q.get_status(), 0);
    }

    #[test]
    fn status_terminal_once_reached_does_not_change() {
        let mut q = quest(1, 1, 5);
        q.approve_team();
        q.add_vote(Vote::new("a", true)).unwrap();
        assert_eq!(q.get_status(), 1);
        // questVotingFinished is true; a further add_vote would be rejected
        // by the players manager before ever reaching the quest.
        assert_eq!(q.get_status(), 1);
    }

    #[test]
    fn double_team_vote_in_same_round_is_rejected() {
        let mut q = quest(2, 1, 5);
        q.add_vote(Vote::new("a", true)).unwrap();
        assert_eq!(q.add_vote(Vote::new("a", false)), Err(GameError::AlreadyVotedForTeam));
    }

    #[test]
    fn double_quest_vote_is_rejected() {
        let mut q = quest(2, 1, 5);
        q.approve_team();
        q.add_vote(Vote::new("a", true)).unwrap();
        assert_eq!(q.add_vote(Vote::new("a", false)), Err(GameError::AlreadyVotedForQuest));
    }

    #[test]
    fn team_voting_succeeds_on_strict_majority_and_rejects_ties() {
        let mut q = quest(2, 1, 4);
        q.add_vote(Vote::new("a", true)).unwrap();
        q.add_vote(Vote::new("b", true)).unwrap();
        q.add_vote(Vote::new("c", false)).unwrap();
        q.add_vote(Vote::new("d", false)).unwrap();
        assert!(!q.team_voting_succeeded());
        assert!(q.team_voting_round_finished());
    }

    #[test]
    fn team_voting_round_advances_on_rejection() {
        let mut q = quest(2, 1, 3);
        q.add_vote(Vote::new("a", false)).unwrap();
        q.add_vote(Vote::new("b", false)).unwrap();
        q.add_vote(Vote::new("c", true)).unwrap();
        assert!(q.team_voting_round_finished());
        assert_eq!(q.get_team_voting_round_index(), 0);
        q.advance_team_voting_round();
        assert_eq!(q.get_team_voting_round_index(), 1);
        assert!(q.current_team_votes().is_empty());
    }

    #[test]
    fn last_round_of_team_voting_is_index_four() {
        let mut q = quest(2, 1, 3);
        for _ in 0..4 {
            q.advance_team_voting_round();
        }
        assert!(q.is_last_round_of_team_voting());
    }

    #[test]
    fn forced_approval_sets_team_approved_without_recording_votes() {
        let mut q = quest(2, 1, 3);
        assert!(!q.is_team_approved());
        q.force_approve_team();
        assert!(q.is_team_approved());
        assert!(q.current_team_votes().is_empty());
        assert!(q.quest_voting_allowed());
    }

    #[test]
    fn team_approved_handle_is_visible_through_is_team_approved() {
        let q = quest(2, 1, 3);
        let handle = q.team_approved_handle();
        assert!(!q.is_team_approved());
        handle.store(true, Ordering::SeqCst);
        assert!(q.is_team_approved());
    }
}
