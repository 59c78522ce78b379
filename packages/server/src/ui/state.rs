//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{EventRouter, RoomQueryUseCase};

/// Shared application state
pub struct AppState {
    /// EventRouter（WebSocket イベントの処理）
    pub event_router: Arc<EventRouter>,
    /// RoomQueryUseCase（ルーム参照のユースケース）
    pub room_query_usecase: Arc<RoomQueryUseCase>,
}
