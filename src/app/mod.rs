//! Notifier state, event handling and the admin command surface.

pub mod action;
pub mod commands;
pub mod event;
pub mod handler;
pub mod state;
pub mod table;
