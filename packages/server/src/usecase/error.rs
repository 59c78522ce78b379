//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{ConnectionId, GameError, RoomName};

/// イベントルーターのエラー
///
/// どのエラーも接続を切断する理由にはならず、UI 層で warn として記録される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] GameError),

    #[error("room '{0}' does not exist")]
    UnknownRoom(RoomName),

    #[error("connection '{0}' has no session")]
    UnknownSession(ConnectionId),
}

/// ルーム参照のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomQueryError {
    #[error("room not found")]
    RoomNotFound,
}
