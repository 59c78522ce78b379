//! UseCase: ルームレジストリ
//!
//! ルームの遅延生成、表記違いの名前の解決、空ルームのガベージコレクション。

use std::sync::Arc;

use justone_shared::time::Clock;

use crate::domain::{Game, RoomName, RoomRepository, Timestamp, WordSource};

#[derive(Clone)]
pub struct RoomRegistry {
    repository: Arc<dyn RoomRepository>,
    words: Arc<dyn WordSource>,
    clock: Arc<dyn Clock>,
}

impl RoomRegistry {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        words: Arc<dyn WordSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            words,
            clock,
        }
    }

    /// 既存のルーム、なければお題を引いて新しく作成する
    pub async fn get_or_create(&self, name: &RoomName) -> Game {
        if let Some(game) = self.repository.find(name).await {
            return game;
        }
        let game = Game::new(
            name.clone(),
            self.words.draw(),
            Timestamp::new(self.clock.now_millis()),
        );
        self.repository.save(game.clone()).await;
        tracing::info!("Room '{}' created", name);
        game
    }

    pub async fn find(&self, name: &RoomName) -> Option<Game> {
        self.repository.find(name).await
    }

    pub async fn save(&self, game: Game) {
        self.repository.save(game).await;
    }

    /// `requested` と表記だけが異なる既存ルームの正規名
    pub async fn canonical_alias(&self, requested: &str) -> Option<RoomName> {
        self.repository.find_case_variant(requested).await
    }

    /// プレイヤーのいないルームを全て削除する
    pub async fn garbage_collect(&self) -> Vec<RoomName> {
        let removed = self.repository.remove_empty().await;
        for name in &removed {
            tracing::info!("Room '{}' is empty and was removed", name);
        }
        removed
    }
}
