//! WebSocket ハンドラー（`GET /ws`）
//!
//! 送信通知は接続ごとのチャンネルから専用タスクがソケットに書き込み、
//! 受信したテキストフレームはデコードして
//! [`EventRouter`](crate::usecase::EventRouter) に 1 件ずつ渡す。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::ConnectionId, infrastructure::dto::websocket::ClientMessage, ui::state::AppState,
    usecase::InboundEvent,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_connection(socket, state, ConnectionId::generate()))
}

async fn run_connection(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sink, mut stream) = socket.split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    state.event_router.connect(connection_id, outbound_tx).await;

    let mut writer = spawn_writer(outbound_rx, sink);

    // フレームの処理中はキャンセルしない。書き込み側の終了は次のフレーム待ちの間にだけ反映する
    loop {
        tokio::select! {
            frame = stream.next() => {
                if !handle_frame(&state, connection_id, frame).await {
                    writer.abort();
                    break;
                }
            }
            _ = &mut writer => {
                tracing::debug!("Writer for '{}' stopped", connection_id);
                break;
            }
        }
    }

    state.event_router.disconnect(connection_id).await;
}

fn spawn_writer(
    mut outbound: mpsc::UnboundedReceiver<String>,
    mut sink: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if let Err(e) = sink.send(Message::Text(frame.into())).await {
                tracing::debug!("Socket write failed: {}", e);
                return;
            }
        }
    })
}

/// 受信フレームを 1 件処理する。接続を続ける場合は `true`
async fn handle_frame(
    state: &AppState,
    connection_id: ConnectionId,
    frame: Option<Result<Message, axum::Error>>,
) -> bool {
    match frame {
        Some(Ok(Message::Text(text))) => {
            tracing::debug!("'{}' sent {}", connection_id, text.as_str());
            handle_text(state, connection_id, text.as_str()).await;
            true
        }
        Some(Ok(Message::Close(_))) | None => {
            tracing::info!("'{}' closed the socket", connection_id);
            false
        }
        // ping は axum が応答する
        Some(Ok(_)) => true,
        Some(Err(e)) => {
            tracing::warn!("Socket error on '{}': {}", connection_id, e);
            false
        }
    }
}

/// テキストフレームをデコードしてイベントとして処理する。
///
/// 不正な入力はログに記録して破棄し、接続は切らない。
async fn handle_text(state: &AppState, connection_id: ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => InboundEvent::try_from(message),
        Err(e) => {
            tracing::warn!("Unreadable frame from '{}': {}", connection_id, e);
            return;
        }
    };
    let event = match event {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Invalid payload from '{}': {}", connection_id, e);
            return;
        }
    };

    let kind = event.kind();
    if let Err(e) = state.event_router.dispatch(connection_id, event).await {
        tracing::warn!("Rejected '{}' from '{}': {}", kind, connection_id, e);
    }
}

#[cfg(test)]
mod tests {
    use justone_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::{Phase, RoomName, RoomRepository},
        infrastructure::{
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryRoomRepository, InMemorySessionRepository},
            wordlist::WordList,
        },
        usecase::{EventRouter, RoomQueryUseCase, RoomRegistry, ValidationPolicy},
    };

    fn create_state() -> (AppState, Arc<InMemoryRoomRepository>) {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let registry = RoomRegistry::new(
            rooms.clone(),
            Arc::new(WordList::parse("icecream")),
            Arc::new(FixedClock::new(0)),
        );
        let state = AppState {
            event_router: Arc::new(EventRouter::new(
                registry,
                Arc::new(InMemorySessionRepository::new()),
                Arc::new(WebSocketMessagePusher::new()),
                ValidationPolicy::Permissive,
            )),
            room_query_usecase: Arc::new(RoomQueryUseCase::new(rooms.clone())),
        };
        (state, rooms)
    }

    fn text(frame: serde_json::Value) -> Option<Result<Message, axum::Error>> {
        Some(Ok(Message::Text(frame.to_string().into())))
    }

    #[tokio::test]
    async fn test_frame_is_applied_and_broadcast_before_returning() {
        // テスト項目: フレームの処理は保存から配信まで完了してから戻る
        // given (前提条件):
        let (state, rooms) = create_state();
        let connection_id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.event_router.connect(connection_id, tx).await;

        // when (操作):
        let keep_open = handle_frame(
            &state,
            connection_id,
            text(serde_json::json!({"type": "join", "user": "A", "game_name": "R"})),
        )
        .await;

        // then (期待する結果):
        assert!(keep_open);
        let room = rooms
            .find(&RoomName::new("R".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(room.phase(), Phase::Lobby);
        let frame: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(frame["type"], "players_updated");
    }

    #[tokio::test]
    async fn test_bad_frames_keep_connection_open() {
        // テスト項目: 不正なフレームは破棄され、接続は維持される
        let (state, rooms) = create_state();
        let connection_id = ConnectionId::generate();

        assert!(handle_frame(&state, connection_id, Some(Ok(Message::Text("{".into())))).await);
        assert!(
            handle_frame(
                &state,
                connection_id,
                text(serde_json::json!({"type": "join", "user": "", "game_name": "R"})),
            )
            .await
        );
        assert!(rooms.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_close_and_end_of_stream_stop_the_connection() {
        // テスト項目: Close フレームとストリーム終端で接続を終了する
        let (state, _) = create_state();
        let connection_id = ConnectionId::generate();

        assert!(!handle_frame(&state, connection_id, Some(Ok(Message::Close(None)))).await);
        assert!(!handle_frame(&state, connection_id, None).await);
    }
}
