//! UseCase: 受信イベント（ドメイン型に変換済み）

use crate::domain::{PlayerName, RoomName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Join {
        user: PlayerName,
        room: RoomName,
    },
    Rename {
        old: PlayerName,
        new: PlayerName,
    },
    Start {
        guesser: PlayerName,
        room: RoomName,
    },
    End {
        room: RoomName,
    },
    SubmitClue {
        room: RoomName,
        cluer: PlayerName,
        clue: String,
    },
    WithdrawClue {
        room: RoomName,
        cluer: PlayerName,
    },
    ApproveClues {
        room: RoomName,
        clues: Vec<String>,
    },
    SubmitGuess {
        room: RoomName,
        guess: String,
        guesser: PlayerName,
    },
}

impl InboundEvent {
    /// ログ出力用の種類名
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Rename { .. } => "name_updated",
            Self::Start { .. } => "start",
            Self::End { .. } => "end",
            Self::SubmitClue { .. } => "submit_clue",
            Self::WithdrawClue { .. } => "unsubmit_clue",
            Self::ApproveClues { .. } => "clues_approved",
            Self::SubmitGuess { .. } => "submit_guess",
        }
    }
}
