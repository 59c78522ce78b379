//! InMemory Session Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, PlayerName, RepositoryError, RoomName, Session, SessionRepository,
};

/// インメモリ Session Repository 実装
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<ConnectionId, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn upsert(&self, connection_id: ConnectionId, session: Session) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(connection_id, session)
    }

    async fn rename(
        &self,
        connection_id: &ConnectionId,
        new_name: PlayerName,
    ) -> Result<Session, RepositoryError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(connection_id)
            .ok_or_else(|| RepositoryError::SessionNotFound(connection_id.to_string()))?;
        let previous = session.clone();
        session.player = new_name;
        Ok(previous)
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(connection_id)
    }

    async fn remove_room(&self, room: &RoomName) -> Vec<ConnectionId> {
        let mut sessions = self.sessions.lock().await;
        let detached: Vec<ConnectionId> = sessions
            .iter()
            .filter(|(_, session)| &session.room == room)
            .map(|(connection_id, _)| *connection_id)
            .collect();
        for connection_id in &detached {
            sessions.remove(connection_id);
        }
        detached
    }

    async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(player: &str, room: &str) -> Session {
        Session::new(
            PlayerName::new(player.to_string()).unwrap(),
            RoomName::new(room.to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_upsert_returns_previous_session() {
        // テスト項目: 同じ接続で再登録すると以前のセッションが返される
        // given (前提条件):
        let repo = InMemorySessionRepository::new();
        let connection_id = ConnectionId::generate();

        // when (操作):
        let first = repo.upsert(connection_id, session("alice", "R")).await;
        let second = repo.upsert(connection_id, session("alice", "S")).await;

        // then (期待する結果):
        assert_eq!(first, None);
        assert_eq!(second, Some(session("alice", "R")));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_rename_updates_player_and_returns_old_session() {
        // テスト項目: 名前変更で変更前のセッションが返り、保存値が更新される
        // given (前提条件):
        let repo = InMemorySessionRepository::new();
        let connection_id = ConnectionId::generate();
        repo.upsert(connection_id, session("alice", "R")).await;

        // when (操作):
        let previous = repo
            .rename(&connection_id, PlayerName::new("alicia".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(previous, Ok(session("alice", "R")));
        assert_eq!(
            repo.remove(&connection_id).await,
            Some(session("alicia", "R"))
        );
    }

    #[tokio::test]
    async fn test_rename_unknown_session() {
        // テスト項目: 存在しないセッションの名前変更はエラーになる
        let repo = InMemorySessionRepository::new();
        let connection_id = ConnectionId::generate();

        let result = repo
            .rename(&connection_id, PlayerName::new("bob".to_string()).unwrap())
            .await;

        assert_eq!(
            result,
            Err(RepositoryError::SessionNotFound(connection_id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        // テスト項目: セッション削除は冪等である
        let repo = InMemorySessionRepository::new();
        let connection_id = ConnectionId::generate();
        repo.upsert(connection_id, session("alice", "R")).await;

        assert!(repo.remove(&connection_id).await.is_some());
        assert!(repo.remove(&connection_id).await.is_none());
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_room_detaches_only_that_room() {
        // テスト項目: ルーム単位の削除は他のルームのセッションに影響しない
        // given (前提条件):
        let repo = InMemorySessionRepository::new();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let carol = ConnectionId::generate();
        repo.upsert(alice, session("alice", "R")).await;
        repo.upsert(bob, session("bob", "R")).await;
        repo.upsert(carol, session("carol", "S")).await;

        // when (操作):
        let mut detached = repo.remove_room(&RoomName::new("R".to_string()).unwrap()).await;

        // then (期待する結果):
        detached.sort_by_key(|id| id.to_string());
        let mut expected = vec![alice, bob];
        expected.sort_by_key(|id| id.to_string());
        assert_eq!(detached, expected);
        assert_eq!(repo.count().await, 1);
        assert_eq!(repo.remove(&carol).await, Some(session("carol", "S")));
    }
}
