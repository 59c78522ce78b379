//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::Phase;

/// One entry of `GET /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomSummaryDto {
    pub name: String,
    pub players: Vec<String>,
    pub started: bool,
    pub phase: Phase,
    pub created_at: String,
}

/// `GET /api/rooms/{room}`. Never includes the secret word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomDetailDto {
    pub name: String,
    pub players: Vec<String>,
    pub phase: Phase,
    pub guesser: Option<String>,
    pub approver: Option<String>,
    pub submitted_clues: usize,
    pub approved_clues: usize,
    pub created_at: String,
}

/// `GET /{game_name}` when no redirect is needed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomEntryDto {
    pub game_name: String,
    pub exists: bool,
}
