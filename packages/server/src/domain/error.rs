//! ドメイン層のエラー型

use thiserror::Error;

use super::{game::Phase, value_object::PlayerName};

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("value must not be empty")]
    Empty,

    #[error("value is too long ({actual} > {max} characters)")]
    TooLong { max: usize, actual: usize },

    #[error("value contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// ゲーム状態機械が検出する前提条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cannot {action} while the game is in {phase:?}")]
    InvalidTransition { phase: Phase, action: &'static str },

    #[error("'{0}' is the guesser and cannot submit a clue")]
    GuesserCannotClue(PlayerName),

    #[error("'{0}' is not a player in this room")]
    NotAMember(PlayerName),

    #[error("'{0}' is not the current guesser")]
    NotTheGuesser(PlayerName),
}

/// Repository のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("session for connection '{0}' not found")]
    SessionNotFound(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("push failed: {0}")]
    PushFailed(String),

    #[error("failed to encode message: {0}")]
    Encode(String),
}
