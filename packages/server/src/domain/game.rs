//! Game エンティティ（ルームごとのゲーム状態機械）
//!
//! 状態遷移: `Lobby` → `Cluing` → `Revealing` → `Guessing` → (`end`) `Lobby`
//!
//! `Revealing` 中にヒントが欠けた（またはヒント提出者が増えた）場合は
//! `Cluing` に戻る。各操作は生成した [`Notification`] を返し、I/O は行わない。

use std::collections::{HashMap, HashSet};

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use super::{
    error::GameError,
    notification::Notification,
    value_object::{PlayerName, RoomName, Timestamp},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Cluing,
    Revealing,
    Guessing,
}

#[derive(Debug, Clone)]
pub struct Game {
    name: RoomName,
    secret_word: String,
    created_at: Timestamp,
    players: HashSet<PlayerName>,
    guesser: Option<PlayerName>,
    approver: Option<PlayerName>,
    /// ヒント提出者 -> ヒント。回答者は含まれない
    clues: HashMap<PlayerName, String>,
    approved_clues: Vec<String>,
    phase: Phase,
}

impl Game {
    pub fn new(name: RoomName, secret_word: String, created_at: Timestamp) -> Self {
        Self {
            name,
            secret_word,
            created_at,
            players: HashSet::new(),
            guesser: None,
            approver: None,
            clues: HashMap::new(),
            approved_clues: Vec::new(),
            phase: Phase::Lobby,
        }
    }

    pub fn name(&self) -> &RoomName {
        &self.name
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase != Phase::Lobby
    }

    pub fn guesser(&self) -> Option<&PlayerName> {
        self.guesser.as_ref()
    }

    pub fn approver(&self) -> Option<&PlayerName> {
        self.approver.as_ref()
    }

    pub fn clue(&self, cluer: &PlayerName) -> Option<&str> {
        self.clues.get(cluer).map(String::as_str)
    }

    pub fn submitted_clue_count(&self) -> usize {
        self.clues.values().filter(|clue| !clue.is_empty()).count()
    }

    pub fn approved_clues(&self) -> &[String] {
        &self.approved_clues
    }

    pub fn has_player(&self, name: &PlayerName) -> bool {
        self.players.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// 名前順のプレイヤー一覧
    pub fn players(&self) -> Vec<PlayerName> {
        let mut players: Vec<PlayerName> = self.players.iter().cloned().collect();
        players.sort();
        players
    }

    /// 回答者以外のプレイヤー（名前順）
    pub fn cluers(&self) -> Vec<PlayerName> {
        let mut cluers: Vec<PlayerName> = self
            .players
            .iter()
            .filter(|player| Some(*player) != self.guesser.as_ref())
            .cloned()
            .collect();
        cluers.sort();
        cluers
    }

    /// 既に参加済みなら `false`
    pub fn add_player(&mut self, name: PlayerName) -> bool {
        self.players.insert(name)
    }

    /// プレイヤーを提出済みのヒントごと削除する。
    ///
    /// 承認者が抜けた場合は承認者をクリアし、次に全員のヒントが揃った時点で
    /// 残りのヒント提出者から選び直す。
    pub fn remove_player(&mut self, name: &PlayerName) -> bool {
        self.clues.remove(name);
        if self.approver.as_ref() == Some(name) {
            self.approver = None;
        }
        self.players.remove(name)
    }

    /// `guesser` でラウンドを開始する。
    ///
    /// 提出済みのヒントは保持し、新しいゲスサーのヒントだけを取り除く。
    /// `Guessing` からの開始は新しいラウンドとして承認済みヒントと承認者も
    /// クリアする。`Started` に続けて現在のヒント状態を返す。
    pub fn start<R: Rng + ?Sized>(&mut self, guesser: PlayerName, rng: &mut R) -> Vec<Notification> {
        if self.phase == Phase::Guessing {
            self.clues.clear();
            self.approved_clues.clear();
            self.approver = None;
        }
        self.clues.remove(&guesser);
        if self.approver.as_ref() == Some(&guesser) {
            self.approver = None;
        }
        self.guesser = Some(guesser.clone());
        self.phase = Phase::Cluing;

        let mut notifications = vec![Notification::Started {
            guesser,
            secret_word: self.secret_word.clone(),
        }];
        notifications.extend(self.reveal_check(rng));
        notifications
    }

    /// `cluer` のヒントを登録（上書き）
    pub fn submit_clue<R: Rng + ?Sized>(
        &mut self,
        cluer: PlayerName,
        clue: String,
        rng: &mut R,
    ) -> Result<Option<Notification>, GameError> {
        if self.guesser.as_ref() == Some(&cluer) {
            return Err(GameError::GuesserCannotClue(cluer));
        }
        self.clues.insert(cluer, clue);
        Ok(self.reveal_check(rng))
    }

    pub fn withdraw_clue<R: Rng + ?Sized>(
        &mut self,
        cluer: &PlayerName,
        rng: &mut R,
    ) -> Option<Notification> {
        self.clues.remove(cluer);
        self.reveal_check(rng)
    }

    /// 進行中かつ未承認のラウンドのヒント状態を再計算する。
    ///
    /// 全員が空でないヒントを提出していれば `RevealClues`（最初の公開時に承認者を
    /// 抽選）、そうでなければ `CluesUpdated` を返す。
    /// `Cluing`/`Revealing` 以外、またはヒント提出者がいない場合は何も返さない。
    pub fn reveal_check<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Notification> {
        if !matches!(self.phase, Phase::Cluing | Phase::Revealing) {
            return None;
        }
        let cluers = self.cluers();
        if cluers.is_empty() {
            return None;
        }

        let clues: Vec<String> = cluers
            .iter()
            .map(|cluer| self.clues.get(cluer).cloned().unwrap_or_default())
            .collect();

        if clues.iter().all(|clue| !clue.is_empty()) {
            self.phase = Phase::Revealing;
            let approver = match &self.approver {
                Some(approver) => approver.clone(),
                None => {
                    let picked = cluers.choose(rng)?.clone();
                    self.approver = Some(picked.clone());
                    picked
                }
            };
            Some(Notification::RevealClues {
                players: cluers,
                clues,
                approver,
            })
        } else {
            self.phase = Phase::Cluing;
            Some(Notification::CluesUpdated {
                players: cluers,
                clues,
                guesser: self.guesser.clone()?,
                secret_word: self.secret_word.clone(),
            })
        }
    }

    /// 承認済みヒントを保存し、回答フェーズに進む
    pub fn approve(&mut self, approved_clues: Vec<String>) -> Notification {
        self.approved_clues = approved_clues;
        self.phase = Phase::Guessing;
        self.guessing()
    }

    /// 回答フェーズの状態（承認時と参加時の再送で使う）
    pub fn guessing(&self) -> Notification {
        Notification::Guessing {
            approved_clues: self.approved_clues.clone(),
            guesser: self.guesser.clone(),
        }
    }

    /// 大文字小文字と英数字以外の文字を無視して `guess` をお題と比較する
    pub fn resolve_guess(&self, guess: String, guesser: PlayerName) -> Notification {
        let correct = normalize_word(&guess) == normalize_word(&self.secret_word);
        Notification::GuessResolved {
            guesser,
            guess,
            correct,
            secret_word: (!correct).then(|| self.secret_word.clone()),
        }
    }

    /// 参加者を含めて開始前の状態に戻す
    pub fn end(&mut self) -> Notification {
        self.players.clear();
        self.clues.clear();
        self.approved_clues.clear();
        self.guesser = None;
        self.approver = None;
        self.phase = Phase::Lobby;
        Notification::Ended
    }

    pub fn roster(&self) -> Notification {
        Notification::PlayersUpdated {
            players: self.players(),
            game_started: self.is_started(),
        }
    }

    pub fn started(&self) -> Option<Notification> {
        if !self.is_started() {
            return None;
        }
        Some(Notification::Started {
            guesser: self.guesser.clone()?,
            secret_word: self.secret_word.clone(),
        })
    }

    // 前提条件チェック。状態機械自体は検証せず、違反時に拒否するかは
    // イベントルーターが決める

    pub fn check_member(&self, name: &PlayerName) -> Result<(), GameError> {
        if self.has_player(name) {
            Ok(())
        } else {
            Err(GameError::NotAMember(name.clone()))
        }
    }

    pub fn check_phase(&self, allowed: &[Phase], action: &'static str) -> Result<(), GameError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                phase: self.phase,
                action,
            })
        }
    }

    pub fn check_guesser(&self, name: &PlayerName) -> Result<(), GameError> {
        if self.guesser.as_ref() == Some(name) {
            Ok(())
        } else {
            Err(GameError::NotTheGuesser(name.clone()))
        }
    }
}

/// 小文字化し、英字と数字だけを残す
pub fn normalize_word(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}
