//! Core startup logic for the L2R Telegram bot.
//!
//! This crate is framework-agnostic: the chat platform lives behind the
//! [`ports::ChatClient`] trait, implemented by the `l2r-telegram` adapter.

pub mod bot;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod ports;

pub use errors::{Error, Result, StartupError};
