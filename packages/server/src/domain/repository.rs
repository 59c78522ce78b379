//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスと通知のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

#[cfg(test)]
use mockall::automock;

use super::{
    ConnectionId, Game, MessagePushError, Notification, PlayerName, RepositoryError, RoomName,
    Session,
};

/// クライアントへのメッセージ送信チャンネル（エンコード済み JSON）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Room Repository trait
///
/// ルーム名 → Game のマッピングを保持するデータストア。
/// 取得した Game は複製であり、変更後は `save` で書き戻す。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルーム名（大文字小文字を区別）で Game を取得
    async fn find(&self, name: &RoomName) -> Option<Game>;

    /// Game を保存（既存のものは置き換え）
    async fn save(&self, game: Game);

    /// 大文字小文字を無視して一致する、表記の異なる既存ルーム名を取得
    async fn find_case_variant(&self, name: &str) -> Option<RoomName>;

    /// プレイヤーのいないルームを全て削除し、削除したルーム名を返す
    async fn remove_empty(&self) -> Vec<RoomName>;

    /// 全ての Game を取得（ルーム名順）
    async fn list(&self) -> Vec<Game>;
}

/// Session Repository trait
///
/// 接続 ID → (プレイヤー名, ルーム名) の索引。切断時のクリーンアップに使う。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを登録し、以前のセッションがあれば返す
    async fn upsert(&self, connection_id: ConnectionId, session: Session) -> Option<Session>;

    /// セッションのプレイヤー名を変更し、変更前のセッションを返す
    async fn rename(
        &self,
        connection_id: &ConnectionId,
        new_name: PlayerName,
    ) -> Result<Session, RepositoryError>;

    async fn remove(&self, connection_id: &ConnectionId) -> Option<Session>;

    /// ルームに属する全てのセッションを削除し、対象の接続 ID を返す
    async fn remove_room(&self, room: &RoomName) -> Vec<ConnectionId>;

    async fn count(&self) -> usize;
}

/// MessagePusher trait
///
/// ルーム単位の pub/sub。接続をルームに購読させ、通知をエンコードして配信する。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を送信チャンネルと共に登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録と全ての購読を解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 接続をルームに購読させる（1 接続につき 1 ルーム）
    async fn subscribe(&self, connection_id: &ConnectionId, room: &RoomName);

    /// 特定の接続に通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// ルームを購読している全ての接続に通知を送信
    ///
    /// 一部の送信失敗は許容される（fire-and-forget）。
    async fn broadcast(
        &self,
        room: &RoomName,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}

/// 新しいルームの秘密の単語を引くための単語リスト
#[cfg_attr(test, automock)]
pub trait WordSource: Send + Sync {
    fn draw(&self) -> String;
}
