//! Process-wide counters, logged periodically by the `start` command.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

static HTTP_REQUESTS: AtomicU64 = AtomicU64::new(0);
static HTTP_SERVER_ERRORS: AtomicU64 = AtomicU64::new(0);
static STORE_FAILURES: AtomicU64 = AtomicU64::new(0);
static BOT_POLL_ERRORS: AtomicU64 = AtomicU64::new(0);
static BOT_SEND_ERRORS: AtomicU64 = AtomicU64::new(0);

static COMMAND_COUNTERS: OnceLock<Mutex<HashMap<String, u64>>> = OnceLock::new();

pub fn inc_http_requests() {
    HTTP_REQUESTS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_http_server_errors() {
    HTTP_SERVER_ERRORS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_store_failures() {
    STORE_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_bot_poll_errors() {
    BOT_POLL_ERRORS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_bot_send_errors() {
    BOT_SEND_ERRORS.fetch_add(1, Ordering::Relaxed);
}

fn command_counter_lock() -> MutexGuard<'static, HashMap<String, u64>> {
    COMMAND_COUNTERS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Count one handled chat command under `slug` and return the new total.
pub fn record_command(slug: &str) -> u64 {
    let mut guard = command_counter_lock();
    let counter = guard.entry(slug.to_string()).or_default();
    *counter = counter.saturating_add(1);
    *counter
}

pub fn command_count(slug: &str) -> u64 {
    command_counter_lock().get(slug).copied().unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub http_requests: u64,
    pub http_server_errors: u64,
    pub store_failures: u64,
    pub bot_poll_errors: u64,
    pub bot_send_errors: u64,
    pub commands: HashMap<String, u64>,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        http_requests: HTTP_REQUESTS.load(Ordering::Relaxed),
        http_server_errors: HTTP_SERVER_ERRORS.load(Ordering::Relaxed),
        store_failures: STORE_FAILURES.load(Ordering::Relaxed),
        bot_poll_errors: BOT_POLL_ERRORS.load(Ordering::Relaxed),
        bot_send_errors: BOT_SEND_ERRORS.load(Ordering::Relaxed),
        commands: command_counter_lock().clone(),
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut commands: Vec<_> = self.commands.iter().collect();
        commands.sort();
        let commands = commands
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "http={} http5xx={} store_fail={} poll_err={} send_err={} commands=[{}]",
            self.http_requests,
            self.http_server_errors,
            self.store_failures,
            self.bot_poll_errors,
            self.bot_send_errors,
            commands
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_counters_accumulate_per_slug() {
        let before = command_count("metrics-test");
        record_command("metrics-test");
        let after = record_command("metrics-test");
        assert_eq!(after, before + 2);
        assert_eq!(snapshot().commands.get("metrics-test"), Some(&after));
    }
}
