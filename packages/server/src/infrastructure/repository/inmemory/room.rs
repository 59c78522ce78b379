//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Game, RoomName, RoomRepository};

/// インメモリ Room Repository 実装
///
/// ルーム名 → Game のマップを保持します。テストごとに新しいインスタンスを作れます。
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomName, Game>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find(&self, name: &RoomName) -> Option<Game> {
        let rooms = self.rooms.lock().await;
        rooms.get(name).cloned()
    }

    async fn save(&self, game: Game) {
        let mut rooms = self.rooms.lock().await;
        rooms.insert(game.name().clone(), game);
    }

    async fn find_case_variant(&self, name: &str) -> Option<RoomName> {
        let rooms = self.rooms.lock().await;
        let mut variants: Vec<&RoomName> = rooms
            .keys()
            .filter(|canonical| canonical.is_case_variant_of(name))
            .collect();
        // Deterministic pick if several variants exist
        variants.sort();
        variants.first().map(|canonical| (*canonical).clone())
    }

    async fn remove_empty(&self) -> Vec<RoomName> {
        let mut rooms = self.rooms.lock().await;
        let empty: Vec<RoomName> = rooms
            .iter()
            .filter(|(_, game)| game.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        for name in &empty {
            rooms.remove(name);
        }
        empty
    }

    async fn list(&self) -> Vec<Game> {
        let rooms = self.rooms.lock().await;
        let mut games: Vec<Game> = rooms.values().cloned().collect();
        games.sort_by(|a, b| a.name().cmp(b.name()));
        games
    }
}
