//! # Chat Bot
//!
//! The chat command interface: players talk to the game through a Telegram bot.
//!
//! ## Components
//!
//! - [`commands`] - command parsing and reply text ([`CommandProcessor`])
//! - [`gateway`] - the [`MessagingGateway`] transport seam
//! - [`telegram`] - Bot API implementation of the gateway (feature `telegram`)
//! - [`runner`] - the long-polling loop ([`run_bot`])
//!
//! ## Commands
//!
//! | Command     | Reply |
//! |-------------|-------|
//! | `/start`    | welcome text |
//! | `/profile`  | `Name: ..\nPoints: ..`, or a prompt to register |
//! | `/register` | creates the player (or resets an existing one) and confirms |
//! | other       | fixed fallback text |
//!
//! The player identity is the chat id; the display name is the sender's first name.

pub mod commands;
pub mod gateway;
pub mod runner;
#[cfg(feature = "telegram")]
pub mod telegram;

pub use commands::{ChatCommand, CommandProcessor};
pub use gateway::{GatewayError, InboundMessage, InboundUpdate, MessagingGateway};
pub use runner::run_bot;
#[cfg(feature = "telegram")]
pub use telegram::TelegramGateway;
