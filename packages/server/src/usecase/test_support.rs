//! UseCase テスト共通のフィクスチャ

use std::sync::Arc;

use justone_shared::time::FixedClock;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MockWordSource, PlayerName, RoomName, RoomRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryRoomRepository, InMemorySessionRepository},
    },
};

use super::{EventRouter, InboundEvent, RoomRegistry, ValidationPolicy};

pub const SECRET_WORD: &str = "icecream";

pub struct Harness {
    pub router: EventRouter,
    pub rooms: Arc<InMemoryRoomRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
}

pub struct TestConnection {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestConnection {
    /// これまでに受信した全フレーム（デコード済み）
    pub fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(text) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&text).expect("server frames are JSON"));
        }
        frames
    }

    /// これまでに受信した全フレームの種類
    pub fn drain_types(&mut self) -> Vec<String> {
        self.drain()
            .iter()
            .map(|frame| frame["type"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// 指定した種類の最後のフレーム
    pub fn last_of(&mut self, kind: &str) -> Option<Value> {
        self.drain()
            .into_iter()
            .filter(|frame| frame["type"] == kind)
            .last()
    }
}

impl Harness {
    pub fn new(policy: ValidationPolicy) -> Self {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let mut words = MockWordSource::new();
        words.expect_draw().return_const(SECRET_WORD.to_string());
        let registry = RoomRegistry::new(
            rooms.clone(),
            Arc::new(words),
            Arc::new(FixedClock::new(0)),
        );
        let router = EventRouter::new(
            registry,
            sessions.clone(),
            Arc::new(WebSocketMessagePusher::new()),
            policy,
        );
        Self {
            router,
            rooms,
            sessions,
        }
    }

    pub async fn connect(&self) -> TestConnection {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        self.router.connect(id, tx).await;
        TestConnection { id, rx }
    }

    /// 接続し、`user` として `room` に参加する
    pub async fn join(&self, user: &str, room: &str) -> TestConnection {
        let connection = self.connect().await;
        self.router
            .dispatch(
                connection.id,
                InboundEvent::Join {
                    user: player(user),
                    room: room_name(room),
                },
            )
            .await
            .expect("join succeeds");
        connection
    }

    pub async fn players(&self, room: &str) -> Option<Vec<PlayerName>> {
        self.rooms
            .find(&room_name(room))
            .await
            .map(|game| game.players())
    }
}

pub fn player(name: &str) -> PlayerName {
    PlayerName::new(name.to_string()).unwrap()
}

pub fn room_name(name: &str) -> RoomName {
    RoomName::new(name.to_string()).unwrap()
}
