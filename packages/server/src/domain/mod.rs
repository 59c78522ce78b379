//! Domain layer: the game state machine and the interfaces it needs.

pub mod error;
pub mod game;
pub mod notification;
pub mod repository;
pub mod session;
pub mod value_object;

pub use error::{GameError, MessagePushError, RepositoryError, ValueObjectError};
pub use game::{Game, Phase, normalize_word};
pub use notification::Notification;
pub use repository::{
    MessagePusher, PusherChannel, RoomRepository, SessionRepository, WordSource,
};
pub use session::Session;
pub use value_object::{ConnectionId, PlayerName, RoomName, Timestamp};

#[cfg(test)]
pub use repository::MockWordSource;
