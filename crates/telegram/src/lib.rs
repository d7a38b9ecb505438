//! Bot API channel for leadflow.
//!
//! Talks to the Telegram Bot API over plain HTTPS with `reqwest`: one
//! `sendMessage` per delivery, `getMe` as a health probe, and `getUpdates`
//! for reading what users sent to the bot.

pub mod client;
pub mod error;
pub mod outbound;

pub use {
    client::{BotApiClient, BotUser, bot_link},
    error::{Error, Result},
    outbound::BotApiTransport,
};
