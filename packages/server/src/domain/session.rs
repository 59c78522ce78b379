//! Session 定義

use super::value_object::{PlayerName, RoomName};

/// 接続がどのルームのどのプレイヤーとして参加しているか
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub player: PlayerName,
    pub room: RoomName,
}

impl Session {
    pub fn new(player: PlayerName, room: RoomName) -> Self {
        Self { player, room }
    }
}
