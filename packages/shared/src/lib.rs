//! Utilities shared by the justone packages: logging setup and wall-clock time.

pub mod logger;
pub mod time;
