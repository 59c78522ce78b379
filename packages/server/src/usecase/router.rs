//! UseCase: イベントルーター
//!
//! 接続から届いたイベントを Game の操作に変換し、Game が生成した通知を
//! ルーム（または特定の接続）に配信します。
//!
//! ## 並行性
//!
//! 全てのイベント（切断を含む）は `gate` を取得してから処理されるため、
//! 全ルームを通じて到着順に 1 件ずつ処理されます。
//!
//! ## 配信範囲
//!
//! - ルーム全体: players_updated, started（開始時）, clues_updated, reveal_clues,
//!   guessing（承認時）, guess_resolved, ended
//! - 参加者のみ: 参加時の started / guessing の再送, redirect

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Game, MessagePusher, Notification, Phase, PlayerName, PusherChannel, RoomName,
    Session, SessionRepository,
};

use super::{
    error::RouterError, event::InboundEvent, registry::RoomRegistry, validation::ValidationPolicy,
};

/// イベントルーター
pub struct EventRouter {
    pub(super) registry: RoomRegistry,
    pub(super) sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    pub(super) policy: ValidationPolicy,
    /// イベントを 1 件ずつ処理するためのロック
    gate: Mutex<()>,
}

impl EventRouter {
    /// 新しい EventRouter を作成
    pub fn new(
        registry: RoomRegistry,
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            registry,
            sessions,
            message_pusher,
            policy,
            gate: Mutex::new(()),
        }
    }

    /// 新しい接続を登録する（まだどのルームにも属さない）
    pub async fn connect(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        tracing::info!("Connection '{}' opened", connection_id);
    }

    /// イベントを処理する
    pub async fn dispatch(
        &self,
        connection_id: ConnectionId,
        event: InboundEvent,
    ) -> Result<(), RouterError> {
        let _gate = self.gate.lock().await;
        tracing::debug!("Handling '{}' from '{}'", event.kind(), connection_id);

        match event {
            InboundEvent::Join { user, room } => self.join(connection_id, user, room).await,
            InboundEvent::Rename { old, new } => self.rename(connection_id, old, new).await,
            InboundEvent::Start { guesser, room } => self.start(room, guesser).await,
            InboundEvent::End { room } => self.end(room).await,
            InboundEvent::SubmitClue { room, cluer, clue } => {
                self.submit_clue(room, cluer, clue).await
            }
            InboundEvent::WithdrawClue { room, cluer } => self.withdraw_clue(room, cluer).await,
            InboundEvent::ApproveClues { room, clues } => self.approve_clues(room, clues).await,
            InboundEvent::SubmitGuess {
                room,
                guess,
                guesser,
            } => self.submit_guess(room, guess, guesser).await,
        }
    }

    /// 切断処理
    ///
    /// セッションの削除、ロスター配信、ヒント状態の再計算、空ルームの回収を
    /// 無条件に行う。
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        let _gate = self.gate.lock().await;

        self.message_pusher.unregister_client(&connection_id).await;
        if let Some(session) = self.sessions.remove(&connection_id).await {
            tracing::info!(
                "'{}' left room '{}' (connection '{}')",
                session.player,
                session.room,
                connection_id
            );
            self.leave_room(&session).await;
        }
        self.registry.garbage_collect().await;
        tracing::info!("Connection '{}' closed", connection_id);
    }

    async fn join(
        &self,
        connection_id: ConnectionId,
        user: PlayerName,
        room: RoomName,
    ) -> Result<(), RouterError> {
        if let Some(canonical) = self.registry.canonical_alias(room.as_str()).await {
            tracing::info!(
                "Redirecting '{}' from room '{}' to existing room '{}'",
                user,
                room,
                canonical
            );
            self.to_connection(
                &connection_id,
                &Notification::Redirect {
                    game_name: canonical,
                },
            )
            .await;
            return Ok(());
        }

        let previous = self
            .sessions
            .upsert(connection_id, Session::new(user.clone(), room.clone()))
            .await;
        match previous {
            Some(previous) if previous.room != room => {
                tracing::info!(
                    "Connection '{}' moves from room '{}' to '{}'",
                    connection_id,
                    previous.room,
                    room
                );
                self.leave_room(&previous).await;
                self.registry.garbage_collect().await;
            }
            Some(previous) if previous.player != user => {
                self.remove_from_room(&room, &previous.player).await;
            }
            _ => {}
        }

        self.message_pusher.subscribe(&connection_id, &room).await;

        let mut game = self.registry.get_or_create(&room).await;
        game.add_player(user.clone());
        let roster = game.roster();
        let started = game.started();
        let clue_state = game.reveal_check(&mut rand::thread_rng());
        let guessing = (game.phase() == Phase::Guessing).then(|| game.guessing());
        self.registry.save(game).await;
        tracing::info!("'{}' joined room '{}'", user, room);

        self.to_room(&room, &roster).await;
        if let Some(started) = started {
            self.to_connection(&connection_id, &started).await;
        }
        if let Some(clue_state) = clue_state {
            self.to_room(&room, &clue_state).await;
        }
        if let Some(guessing) = guessing {
            self.to_connection(&connection_id, &guessing).await;
        }
        Ok(())
    }

    async fn rename(
        &self,
        connection_id: ConnectionId,
        old: PlayerName,
        new: PlayerName,
    ) -> Result<(), RouterError> {
        let previous = self
            .sessions
            .rename(&connection_id, new.clone())
            .await
            .map_err(|_| RouterError::UnknownSession(connection_id))?;
        if previous.player != old {
            tracing::warn!(
                "Rename claims old name '{}' but connection '{}' plays as '{}'",
                old,
                connection_id,
                previous.player
            );
        }

        let mut game = self
            .registry
            .find(&previous.room)
            .await
            .ok_or_else(|| RouterError::UnknownRoom(previous.room.clone()))?;
        game.remove_player(&previous.player);
        game.add_player(new.clone());
        let roster = game.roster();
        let clue_state = game.reveal_check(&mut rand::thread_rng());
        self.registry.save(game).await;
        tracing::info!(
            "'{}' is now '{}' in room '{}'",
            previous.player,
            new,
            previous.room
        );

        self.to_room(&previous.room, &roster).await;
        if let Some(clue_state) = clue_state {
            self.to_room(&previous.room, &clue_state).await;
        }
        Ok(())
    }

    /// セッションのプレイヤーをルームから外し、残りのメンバーに通知する
    async fn leave_room(&self, session: &Session) {
        let Some(mut game) = self.registry.find(&session.room).await else {
            tracing::debug!("Room '{}' is already gone", session.room);
            return;
        };
        game.remove_player(&session.player);
        let roster = game.roster();
        let clue_state = game.reveal_check(&mut rand::thread_rng());
        self.registry.save(game).await;

        self.to_room(&session.room, &roster).await;
        if let Some(clue_state) = clue_state {
            self.to_room(&session.room, &clue_state).await;
        }
    }

    async fn remove_from_room(&self, room: &RoomName, player: &PlayerName) {
        if let Some(mut game) = self.registry.find(room).await {
            game.remove_player(player);
            self.registry.save(game).await;
        }
    }

    /// ルームを取得する。Strict ではルームが存在しなければエラー
    pub(super) async fn resolve_room(&self, room: &RoomName) -> Result<Game, RouterError> {
        if self.policy.is_strict() {
            self.registry
                .find(room)
                .await
                .ok_or_else(|| RouterError::UnknownRoom(room.clone()))
        } else {
            Ok(self.registry.get_or_create(room).await)
        }
    }

    /// ルーム全体へ配信（fire-and-forget）
    pub(super) async fn to_room(&self, room: &RoomName, notification: &Notification) {
        if let Err(e) = self.message_pusher.broadcast(room, notification).await {
            tracing::warn!(
                "Failed to broadcast '{}' to room '{}': {}",
                notification.kind(),
                room,
                e
            );
        }
    }

    /// 特定の接続へ配信（fire-and-forget）
    pub(super) async fn to_connection(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) {
        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, notification)
            .await
        {
            tracing::warn!(
                "Failed to push '{}' to connection '{}': {}",
                notification.kind(),
                connection_id,
                e
            );
        }
    }
}
