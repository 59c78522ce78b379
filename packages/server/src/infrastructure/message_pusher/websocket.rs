//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - ルームの購読状態を管理（1 接続につき 1 ルーム）
//! - 通知を JSON にエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel, RoomName,
    },
    infrastructure::dto::websocket::ServerMessage,
};

#[derive(Default)]
struct Subscriptions {
    /// 接続 ID → 送信チャンネル
    clients: HashMap<ConnectionId, PusherChannel>,
    /// 接続 ID → 購読中のルーム
    rooms_by_client: HashMap<ConnectionId, RoomName>,
    /// ルーム → 購読中の接続
    clients_by_room: HashMap<RoomName, HashSet<ConnectionId>>,
}

impl Subscriptions {
    fn unsubscribe(&mut self, connection_id: &ConnectionId) {
        if let Some(room) = self.rooms_by_client.remove(connection_id)
            && let Some(members) = self.clients_by_room.get_mut(&room)
        {
            members.remove(connection_id);
            if members.is_empty() {
                self.clients_by_room.remove(&room);
            }
        }
    }
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id, tx).await;
/// pusher.subscribe(&connection_id, &room).await;
/// pusher.broadcast(&room, &Notification::Ended).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    inner: Mutex<Subscriptions>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(notification: &Notification) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(notification.clone()))
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }

    /// ルームを購読している接続数（テスト・デバッグ用）
    pub async fn subscriber_count(&self, room: &RoomName) -> usize {
        let inner = self.inner.lock().await;
        inner.clients_by_room.get(room).map_or(0, HashSet::len)
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut inner = self.inner.lock().await;
        inner.clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut inner = self.inner.lock().await;
        inner.unsubscribe(connection_id);
        inner.clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn subscribe(&self, connection_id: &ConnectionId, room: &RoomName) {
        let mut inner = self.inner.lock().await;
        inner.unsubscribe(connection_id);
        inner
            .rooms_by_client
            .insert(*connection_id, room.clone());
        inner
            .clients_by_room
            .entry(room.clone())
            .or_default()
            .insert(*connection_id);
        tracing::debug!("Connection '{}' subscribed to room '{}'", connection_id, room);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(notification)?;
        let inner = self.inner.lock().await;

        let sender = inner
            .clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!(
            "Pushed '{}' to connection '{}'",
            notification.kind(),
            connection_id
        );
        Ok(())
    }

    async fn broadcast(
        &self,
        room: &RoomName,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(notification)?;
        let inner = self.inner.lock().await;

        let Some(members) = inner.clients_by_room.get(room) else {
            tracing::debug!("No subscribers in room '{}', skipping broadcast", room);
            return Ok(());
        };

        for connection_id in members {
            match inner.clients.get(connection_id) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.clone()) {
                        tracing::warn!(
                            "Failed to push '{}' to connection '{}': {}",
                            notification.kind(),
                            connection_id,
                            e
                        );
                    }
                }
                None => tracing::warn!(
                    "Connection '{}' not found during broadcast, skipping",
                    connection_id
                ),
            }
        }
        tracing::debug!(
            "Broadcasted '{}' to {} connection(s) in room '{}'",
            notification.kind(),
            members.len(),
            room
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - broadcast: ルームを購読している接続だけへの送信
    // - subscribe: 別ルームへの購読で以前の購読が解除されること
    // - unregister_client: 登録解除で購読も解除されること
    // ========================================

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続に JSON エンコードされた通知を送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;

        // when (操作):
        let result = pusher.push_to(&connection_id, &Notification::Ended).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(r#"{"type":"ended"}"#.to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        let pusher = WebSocketMessagePusher::new();
        let connection_id = ConnectionId::generate();

        let result = pusher.push_to(&connection_id, &Notification::Ended).await;

        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_room_subscribers() {
        // テスト項目: ブロードキャストは同じルームの購読者だけに届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        let (alice, bob, carol) = (
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
        );
        pusher.register_client(alice, tx1).await;
        pusher.register_client(bob, tx2).await;
        pusher.register_client(carol, tx3).await;
        pusher.subscribe(&alice, &room("R")).await;
        pusher.subscribe(&bob, &room("R")).await;
        pusher.subscribe(&carol, &room("S")).await;

        // when (操作):
        let result = pusher.broadcast(&room("R"), &Notification::Ended).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
        assert!(rx3.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscribe_moves_connection_between_rooms() {
        // テスト項目: 別のルームを購読すると以前のルームの購読は解除される
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;
        pusher.subscribe(&connection_id, &room("R")).await;

        // when (操作):
        pusher.subscribe(&connection_id, &room("S")).await;

        // then (期待する結果):
        assert_eq!(pusher.subscriber_count(&room("R")).await, 0);
        assert_eq!(pusher.subscriber_count(&room("S")).await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_closed_receivers() {
        // テスト項目: 受信側が閉じていてもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let (alice, bob) = (ConnectionId::generate(), ConnectionId::generate());
        pusher.register_client(alice, tx1).await;
        pusher.register_client(bob, tx2).await;
        pusher.subscribe(&alice, &room("R")).await;
        pusher.subscribe(&bob, &room("R")).await;
        drop(rx1);

        // when (操作):
        let result = pusher.broadcast(&room("R"), &Notification::Ended).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unregister_removes_subscription() {
        // テスト項目: 登録解除すると購読も解除される
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();
        pusher.register_client(connection_id, tx).await;
        pusher.subscribe(&connection_id, &room("R")).await;

        pusher.unregister_client(&connection_id).await;

        assert_eq!(pusher.subscriber_count(&room("R")).await, 0);
        assert!(
            pusher
                .broadcast(&room("R"), &Notification::Ended)
                .await
                .is_ok()
        );
    }
}
