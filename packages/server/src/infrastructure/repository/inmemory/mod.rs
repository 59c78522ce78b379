//! インメモリ Repository 実装
//!
//! 全ての状態はプロセス内のみに存在し、再起動で失われます。

pub mod room;
pub mod session;

pub use room::InMemoryRoomRepository;
pub use session::InMemorySessionRepository;
