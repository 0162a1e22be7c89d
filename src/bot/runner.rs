use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;

use super::commands::CommandProcessor;
use super::gateway::{InboundMessage, MessagingGateway};
use crate::metrics;

const MIN_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Long-lived chat loop: poll updates, answer every text message in its own task.
///
/// Transport failures are logged and retried with exponential backoff; they never
/// end the loop. Returns once `shutdown` flips to `true` (or its sender is dropped).
pub async fn run_bot(
    gateway: Arc<dyn MessagingGateway>,
    processor: CommandProcessor,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("chat bot is now receiving updates");
    let mut offset = 0i64;
    let mut backoff = MIN_BACKOFF;
    loop {
        if *shutdown.borrow() {
            break;
        }
        let polled = tokio::select! {
            polled = gateway.poll_updates(offset) => Some(polled),
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                None
            }
        };
        let Some(polled) = polled else {
            continue;
        };
        match polled {
            Ok(updates) => {
                backoff = MIN_BACKOFF;
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    if let Some(message) = update.message {
                        spawn_reply(Arc::clone(&gateway), processor.clone(), message);
                    }
                }
            }
            Err(e) => {
                metrics::inc_bot_poll_errors();
                warn!("polling updates failed: {} (retrying in {:?})", e, backoff);
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {}
                    _ = shutdown.changed() => {}
                }
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }
    info!("chat bot stopped");
}

fn spawn_reply(
    gateway: Arc<dyn MessagingGateway>,
    processor: CommandProcessor,
    message: InboundMessage,
) {
    tokio::spawn(async move {
        let reply = processor.process(&message).await;
        match gateway.send_text(message.chat_id, &reply).await {
            Ok(()) => debug!("replied to chat {}", message.chat_id),
            Err(e) => {
                metrics::inc_bot_send_errors();
                warn!("failed to reply to chat {}: {}", message.chat_id, e);
            }
        }
    });
}
