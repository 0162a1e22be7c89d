//! Sanitizing of values that arrive from chat profiles.
//!
//! Display names come straight from the sender's Telegram profile. They are
//! stored and shown on the leaderboard, so control characters are removed and
//! the length is capped. Nothing here rejects input: a name that sanitizes to
//! nothing becomes [`FALLBACK_DISPLAY_NAME`].

pub const MAX_DISPLAY_NAME_CHARS: usize = 64;
pub const FALLBACK_DISPLAY_NAME: &str = "Player";

pub fn sanitize_display_name(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return FALLBACK_DISPLAY_NAME.to_string();
    };
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return FALLBACK_DISPLAY_NAME.to_string();
    }
    trimmed
        .chars()
        .take(MAX_DISPLAY_NAME_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}
