//! Conversion logic between DTOs and domain types.

use justone_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    Game, Notification, PlayerName, RoomName, ValueObjectError, value_object::Timestamp,
};
use crate::infrastructure::dto::{
    http::{RoomDetailDto, RoomSummaryDto},
    websocket::{ClientMessage, ServerMessage},
};
use crate::usecase::InboundEvent;

fn names(players: Vec<PlayerName>) -> Vec<String> {
    players.into_iter().map(PlayerName::into_string).collect()
}

fn rfc3339(timestamp: Timestamp) -> String {
    timestamp_to_rfc3339(timestamp.value())
}

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<ClientMessage> for InboundEvent {
    type Error = ValueObjectError;

    fn try_from(dto: ClientMessage) -> Result<Self, Self::Error> {
        let event = match dto {
            ClientMessage::Join { user, game_name } => Self::Join {
                user: PlayerName::new(user)?,
                room: RoomName::new(game_name)?,
            },
            ClientMessage::NameUpdated { old, new } => Self::Rename {
                old: PlayerName::new(old)?,
                new: PlayerName::new(new)?,
            },
            ClientMessage::Start { guesser, game_name } => Self::Start {
                guesser: PlayerName::new(guesser)?,
                room: RoomName::new(game_name)?,
            },
            ClientMessage::End { game_name } => Self::End {
                room: RoomName::new(game_name)?,
            },
            ClientMessage::SubmitClue {
                game_name,
                cluer_name,
                clue,
            } => Self::SubmitClue {
                room: RoomName::new(game_name)?,
                cluer: PlayerName::new(cluer_name)?,
                clue,
            },
            ClientMessage::UnsubmitClue {
                game_name,
                cluer_name,
            } => Self::WithdrawClue {
                room: RoomName::new(game_name)?,
                cluer: PlayerName::new(cluer_name)?,
            },
            ClientMessage::CluesApproved {
                game_name,
                approved_clues,
            } => Self::ApproveClues {
                room: RoomName::new(game_name)?,
                clues: approved_clues,
            },
            ClientMessage::SubmitGuess {
                game_name,
                guess,
                guesser,
            } => Self::SubmitGuess {
                room: RoomName::new(game_name)?,
                guess,
                guesser: PlayerName::new(guesser)?,
            },
        };
        Ok(event)
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<Notification> for ServerMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::PlayersUpdated {
                players,
                game_started,
            } => Self::PlayersUpdated {
                players: names(players),
                game_started,
            },
            Notification::Started {
                guesser,
                secret_word,
            } => Self::Started {
                guesser: guesser.into_string(),
                secret_word,
            },
            Notification::CluesUpdated {
                players,
                clues,
                guesser,
                secret_word,
            } => Self::CluesUpdated {
                players: names(players),
                clues,
                guesser: guesser.into_string(),
                secret_word,
            },
            Notification::RevealClues {
                players,
                clues,
                approver,
            } => Self::RevealClues {
                players: names(players),
                clues,
                approver: approver.into_string(),
            },
            Notification::Guessing {
                approved_clues,
                guesser,
            } => Self::Guessing {
                approved_clues,
                guesser: guesser.map(PlayerName::into_string),
            },
            Notification::GuessResolved {
                guesser,
                guess,
                correct,
                secret_word,
            } => Self::GuessResolved {
                guesser: guesser.into_string(),
                guess,
                correct,
                secret_word,
            },
            Notification::Ended => Self::Ended,
            Notification::Redirect { game_name } => Self::Redirect {
                game_name: game_name.into_string(),
            },
        }
    }
}

impl From<&Game> for RoomSummaryDto {
    fn from(game: &Game) -> Self {
        Self {
            name: game.name().to_string(),
            players: names(game.players()),
            started: game.is_started(),
            phase: game.phase(),
            created_at: rfc3339(game.created_at()),
        }
    }
}

impl From<&Game> for RoomDetailDto {
    fn from(game: &Game) -> Self {
        Self {
            name: game.name().to_string(),
            players: names(game.players()),
            phase: game.phase(),
            guesser: game.guesser().map(ToString::to_string),
            approver: game.approver().map(ToString::to_string),
            submitted_clues: game.submitted_clue_count(),
            approved_clues: game.approved_clues().len(),
            created_at: rfc3339(game.created_at()),
        }
    }
}
