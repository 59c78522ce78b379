//! Room coordinator for a cooperative word-clue party game.
//!
//! Players join named rooms over WebSocket; each room runs one round at a
//! time (clues, approval, guess) and every state change is pushed to the
//! room's subscribers.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
