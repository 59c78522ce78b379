//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::http::{RoomDetailDto, RoomEntryDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::RoomQueryError,
};

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_path_segment(segment: &str) -> String {
    segment
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                (byte as char).to_string()
            }
            _ => format!("%{:02X}", byte),
        })
        .collect()
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.room_query_usecase.list_rooms().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.room_query_usecase.get_room(&room).await {
        Ok(game) => Ok(Json(RoomDetailDto::from(&game))),
        Err(RoomQueryError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

/// Room entry point.
///
/// A differently-cased name of an existing room is redirected (302) to the
/// canonical name.
pub async fn show_game(
    State(state): State<Arc<AppState>>,
    Path(game_name): Path<String>,
) -> Response {
    if let Some(canonical) = state
        .room_query_usecase
        .canonical_redirect(&game_name)
        .await
    {
        tracing::info!("Redirecting '{}' to '{}'", game_name, canonical);
        let location = format!("/{}", encode_path_segment(canonical.as_str()));
        return (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
    }

    let exists = state.room_query_usecase.get_room(&game_name).await.is_ok();
    Json(RoomEntryDto { game_name, exists }).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("foo"), "foo");
        assert_eq!(encode_path_segment("my room"), "my%20room");
        assert_eq!(encode_path_segment("部屋"), "%E9%83%A8%E5%B1%8B");
    }
}
