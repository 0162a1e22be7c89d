//! Chat command parsing and replies.
//!
//! Only the first whitespace-separated token of a message is considered. Commands
//! match case-insensitively and may carry Telegram's `@BotName` suffix, so
//! `/Profile@clicker_bot` is a profile request.
use log::{info, warn};

use super::gateway::InboundMessage;
use crate::logutil::escape_log;
use crate::metrics;
use crate::profile::{ProfileError, ProfileService};
use crate::validation::sanitize_display_name;

pub const WELCOME_REPLY: &str = "Welcome to Telegram Game Bot! Use /profile to see your stats.";
pub const NOT_REGISTERED_REPLY: &str = "Profile not found. Use /register to create a profile.";
pub const REGISTERED_REPLY: &str = "Registration successful! Use /profile to see your stats.";
pub const UNKNOWN_REPLY: &str = "Unknown command. Please use /profile or /register.";
pub const FAILURE_REPLY: &str = "Something went wrong. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Start,
    Profile,
    Register,
    Unknown,
}

impl ChatCommand {
    pub fn parse(raw: &str) -> Self {
        let Some(token) = raw.split_whitespace().next() else {
            return ChatCommand::Unknown;
        };
        let name = token.split('@').next().unwrap_or(token);
        if name.eq_ignore_ascii_case("/start") {
            ChatCommand::Start
        } else if name.eq_ignore_ascii_case("/profile") {
            ChatCommand::Profile
        } else if name.eq_ignore_ascii_case("/register") {
            ChatCommand::Register
        } else {
            ChatCommand::Unknown
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ChatCommand::Start => "start",
            ChatCommand::Profile => "profile",
            ChatCommand::Register => "register",
            ChatCommand::Unknown => "unknown",
        }
    }
}

pub fn format_profile(name: &str, points: i64) -> String {
    format!("Name: {}\nPoints: {}", name, points)
}

/// Turns inbound chat messages into profile service calls and reply text.
#[derive(Clone)]
pub struct CommandProcessor {
    profiles: ProfileService,
}

impl CommandProcessor {
    pub fn new(profiles: ProfileService) -> Self {
        Self { profiles }
    }

    pub async fn process(&self, message: &InboundMessage) -> String {
        let command = ChatCommand::parse(&message.text);
        metrics::record_command(command.slug());
        let telegram_id = message.telegram_id();
        info!(
            "chat {} sent {:?}: {}",
            message.chat_id,
            command,
            escape_log(&message.text)
        );
        match command {
            ChatCommand::Start => WELCOME_REPLY.to_string(),
            ChatCommand::Profile => match self.profiles.get_profile(&telegram_id).await {
                Ok(player) => format_profile(&player.name, player.points),
                Err(ProfileError::NotFound(_)) => NOT_REGISTERED_REPLY.to_string(),
                Err(e) => {
                    warn!("profile lookup for {} failed: {}", telegram_id, e);
                    FAILURE_REPLY.to_string()
                }
            },
            ChatCommand::Register => {
                let name = sanitize_display_name(message.first_name.as_deref());
                match self.profiles.register_or_replace(&telegram_id, &name).await {
                    Ok(_) => {
                        info!("registered player {} as {}", telegram_id, escape_log(&name));
                        REGISTERED_REPLY.to_string()
                    }
                    Err(e) => {
                        warn!("registration for {} failed: {}", telegram_id, e);
                        FAILURE_REPLY.to_string()
                    }
                }
            }
            ChatCommand::Unknown => UNKNOWN_REPLY.to_string(),
        }
    }
}
