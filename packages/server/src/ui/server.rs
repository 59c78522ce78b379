//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{EventRouter, RoomQueryUseCase};

use super::{
    handler::{get_room_detail, get_rooms, health_check, show_game, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Game coordinator server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(event_router, room_query_usecase);
/// server.run("127.0.0.1", 8080).await?;
/// ```
pub struct Server {
    /// EventRouter（WebSocket イベントの処理）
    event_router: Arc<EventRouter>,
    /// RoomQueryUseCase（ルーム参照のユースケース）
    room_query_usecase: Arc<RoomQueryUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(event_router: Arc<EventRouter>, room_query_usecase: Arc<RoomQueryUseCase>) -> Self {
        Self {
            event_router,
            room_query_usecase,
        }
    }

    /// Build the axum application
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            event_router: self.event_router.clone(),
            room_query_usecase: self.room_query_usecase.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room}", get(get_room_detail))
            .route("/{game_name}", get(show_game))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Listening on {} (players connect to ws://{}/ws)",
            listener.local_addr()?,
            bind_addr
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("All rooms dropped, bye");

        Ok(())
    }
}
