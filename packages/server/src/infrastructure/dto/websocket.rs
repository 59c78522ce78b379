//! WebSocket message DTOs.
//!
//! Frames are JSON objects tagged by a snake_case `"type"` field.

use serde::{Deserialize, Serialize};

/// Client → server frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        user: String,
        game_name: String,
    },
    NameUpdated {
        old: String,
        new: String,
    },
    Start {
        guesser: String,
        game_name: String,
    },
    End {
        game_name: String,
    },
    SubmitClue {
        game_name: String,
        cluer_name: String,
        clue: String,
    },
    UnsubmitClue {
        game_name: String,
        cluer_name: String,
    },
    CluesApproved {
        game_name: String,
        approved_clues: Vec<String>,
    },
    SubmitGuess {
        game_name: String,
        guess: String,
        guesser: String,
    },
}

/// Server → client frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    PlayersUpdated {
        players: Vec<String>,
        game_started: bool,
    },
    Started {
        guesser: String,
        secret_word: String,
    },
    CluesUpdated {
        players: Vec<String>,
        clues: Vec<String>,
        guesser: String,
        secret_word: String,
    },
    RevealClues {
        players: Vec<String>,
        clues: Vec<String>,
        approver: String,
    },
    Guessing {
        approved_clues: Vec<String>,
        guesser: Option<String>,
    },
    GuessResolved {
        guesser: String,
        guess: String,
        correct: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secret_word: Option<String>,
    },
    Ended,
    Redirect {
        game_name: String,
    },
}
