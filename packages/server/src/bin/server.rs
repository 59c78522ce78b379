//! Word-clue party game server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin justone-server
//! cargo run --bin justone-server -- --host 0.0.0.0 --port 3000 --wordlist words.txt --strict
//! ```

use std::sync::Arc;

use clap::Parser;
use justone_server::{
    config::ServerConfig,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryRoomRepository, InMemorySessionRepository},
        wordlist::WordList,
    },
    ui::Server,
    usecase::{EventRouter, RoomQueryUseCase, RoomRegistry},
};
use justone_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(
        env!("CARGO_CRATE_NAME"),
        env!("CARGO_BIN_NAME"),
        &config.log_level,
    );

    // Initialize dependencies in order:
    // 1. Word list
    // 2. Repositories
    // 3. MessagePusher
    // 4. UseCases
    // 5. Server

    // 1. Load the word list once; it never changes while running
    let words = match &config.wordlist {
        Some(path) => match WordList::from_file(path) {
            Ok(words) => words,
            Err(e) => {
                tracing::error!("Failed to read word list {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => WordList::builtin(),
    };
    if words.is_empty() {
        tracing::warn!("Word list is empty; every room will use the fallback word");
    } else {
        tracing::info!("Loaded {} secret words", words.len());
    }

    // 2. Create Repositories (in-memory database)
    let room_repository = Arc::new(InMemoryRoomRepository::new());
    let session_repository = Arc::new(InMemorySessionRepository::new());

    // 3. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 4. Create UseCases
    let registry = RoomRegistry::new(
        room_repository.clone(),
        Arc::new(words),
        Arc::new(SystemClock),
    );
    let policy = config.validation_policy();
    tracing::info!("Validation policy: {:?}", policy);
    let event_router = Arc::new(EventRouter::new(
        registry,
        session_repository,
        message_pusher,
        policy,
    ));
    let room_query_usecase = Arc::new(RoomQueryUseCase::new(room_repository));

    // 5. Create and run the server
    let server = Server::new(event_router, room_query_usecase);
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
