//! UseCase layer: event routing and room queries.

mod error;
mod event;
mod query_rooms;
mod registry;
mod round;
mod router;
mod validation;

#[cfg(test)]
mod test_support;

pub use error::{RoomQueryError, RouterError};
pub use event::InboundEvent;
pub use query_rooms::RoomQueryUseCase;
pub use registry::RoomRegistry;
pub use router::EventRouter;
pub use validation::ValidationPolicy;
