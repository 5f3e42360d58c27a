//! IRC layer: connection management and translation of server traffic into
//! notifier events.

pub mod connection;
pub mod events;
pub mod manager;
