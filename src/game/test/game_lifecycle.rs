//! Player roster setup and game start.

use crate::error::GameError;
use crate::game::options::RoleOptions;
use crate::game::player::Player;
use crate::game::role::RoleId;
use crate::game::state_machine::StateKind;

use super::test_utils::*;

#[test]
fn duplicate_username_is_rejected() {
    let mut game = new_game("g", 3, 1);
    assert_eq!(game.add_player(Player::new("p0")), Err(GameError::UsernameAlreadyExists));
}

#[test]
fn tenth_player_fills_the_roster_and_an_eleventh_is_rejected() {
    let mut game = new_game("g", 10, 1);
    assert_eq!(game.add_player(Player::new("overflow")), Err(GameError::MaximumPlayersReached));
}

#[test]
fn starting_with_too_few_players_is_rejected() {
    let mut game = new_game("g", 4, 1);
    assert_eq!(game.start(None).unwrap_err(), GameError::IncorrectNumberOfPlayers);
}

#[test]
fn adding_players_after_start_is_rejected() {
    let mut game = new_game("g", 5, 1);
    game.start(None).unwrap();
    assert_eq!(game.add_player(Player::new("latecomer")), Err(GameError::GameAlreadyStarted));
}

#[tokio::test]
async fn starting_assigns_a_role_to_every_player_and_opens_team_proposition() {
    let game = started_game("g", 5, 7).await;
    assert_eq!(game.state(), StateKind::TeamProposition);
    assert!(game.players().get_all().iter().all(|p| p.get_role().is_some()));
    assert!(game.players().get_leader().is_some());
    assert_eq!(game.quests().unwrap().get_current_quest_index(), 0);
}

#[test]
fn starting_twice_is_rejected() {
    let mut game = new_game("g", 5, 1);
    game.start(None).unwrap();
    assert_eq!(game.start(None).unwrap_err(), GameError::GameAlreadyStarted);
}

#[tokio::test]
async fn start_can_override_the_optional_role_pool() {
    let mut game = new_game("g", 7, 3);
    let roles = RoleOptions { percival: true, morgana: true, mordred: false, oberon: false };
    game.start(Some(roles)).unwrap().wait().await;

    let ids: std::collections::HashSet<_> =
        game.players().get_all().iter().map(|p| p.get_role().unwrap().get_id()).collect();
    assert!(ids.contains(&RoleId::Percival));
    assert!(ids.contains(&RoleId::Morgana));
    assert!(!ids.contains(&RoleId::Mordred));
    assert!(!ids.contains(&RoleId::Oberon));
}
