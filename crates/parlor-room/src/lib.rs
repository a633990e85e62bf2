//! Room lifecycle and move routing for Parlor.
//!
//! A room pairs one game engine with the clients connected to it; the
//! registry is the concurrent map that creates rooms on demand, routes
//! every inbound envelope, and fans state back out.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — joinOrCreate / leave / quickplay / dispatch
//! - [`Room`] — one match: engine + clients + the serialization guard
//! - [`RoomError`] — what can go wrong (not much; bad input is dropped,
//!   not raised)

mod error;
mod registry;
mod room;

pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::Room;
