//! Integration tests for the `Game` facade: whole-command sequences driven
//! through the public API, as opposed to the unit tests embedded alongside
//! each component (`role.rs`, `quest.rs`, `players_manager.rs`, ...).

#![cfg(test)]


mod game_lifecycle;
