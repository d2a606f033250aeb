use thiserror::Error;

/// The result of attempting to perform an invalid operation on a [`crate::game::Game`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("a game with 10 players already has a full roster")]
    MaximumPlayersReached,
    #[error("a player with that username already exists in this game")]
    UsernameAlreadyExists,
    #[error("the game has already started")]
    GameAlreadyStarted,
    #[error("player count must be between 5 and 10")]
    IncorrectNumberOfPlayers,
    #[error("no player exists with that username")]
    PlayerNotFound,
    #[error("only the leader may propose players for the team")]
    NoRightToPropose,
    #[error("players cannot be proposed right now")]
    NoPropositionTime,
    #[error("only the leader may submit the team")]
    NoRightToSubmitTeam,
    #[error("team voting is not open right now")]
    NoVotingTime,
    #[error("this player is not allowed to cast this vote")]
    NoRightToVote,
    #[error("assassination is not available right now")]
    NoAssassinationTime,
    #[error("only the assassin may name a victim")]
    NoRightToAssassinate,
    #[error("no command is accepted while the game is paused between phases")]
    NoActionTime,
    #[error("that state transition is not permitted from the current state")]
    IllegalTransition,
    #[error("that player count is not supported")]
    UnsupportedPlayerCount,
    #[error("this player has already voted on the proposed team this round")]
    AlreadyVotedForTeam,
    #[error("this player has already voted on the outcome of this quest")]
    AlreadyVotedForQuest,
}
