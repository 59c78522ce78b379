//! 送信通知（Notification）定義
//!
//! ゲーム状態機械はトランスポートに直接触れない。各操作は生成した通知を返し、
//! 配信先（ルーム全体か特定の接続か）はイベントルーターが決める。

use super::value_object::{PlayerName, RoomName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// プレイヤー一覧の変更（`players` はソート済み）
    PlayersUpdated {
        players: Vec<PlayerName>,
        game_started: bool,
    },
    /// ラウンド開始。回答者のクライアントはお題を表示しないこと
    Started {
        guesser: PlayerName,
        secret_word: String,
    },
    /// 途中のヒント状態。未提出のヒントは空文字列
    CluesUpdated {
        players: Vec<PlayerName>,
        clues: Vec<String>,
        guesser: PlayerName,
        secret_word: String,
    },
    /// 全員のヒントが揃った
    RevealClues {
        players: Vec<PlayerName>,
        clues: Vec<String>,
        approver: PlayerName,
    },
    Guessing {
        approved_clues: Vec<String>,
        guesser: Option<PlayerName>,
    },
    /// `secret_word` は不正解のときだけ含まれる
    GuessResolved {
        guesser: PlayerName,
        guess: String,
        correct: bool,
        secret_word: Option<String>,
    },
    Ended,
    /// 表記違いの既存ルームへの誘導
    Redirect { game_name: RoomName },
}

impl Notification {
    /// 通知の種類名（ワイヤー上の `type`。ログ出力用）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayersUpdated { .. } => "players_updated",
            Self::Started { .. } => "started",
            Self::CluesUpdated { .. } => "clues_updated",
            Self::RevealClues { .. } => "reveal_clues",
            Self::Guessing { .. } => "guessing",
            Self::GuessResolved { .. } => "guess_resolved",
            Self::Ended => "ended",
            Self::Redirect { .. } => "redirect",
        }
    }
}
