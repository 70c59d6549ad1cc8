use std::time::Duration;

use log::warn;

use crate::error::Result;
use crate::events::{self, HandlerEvent};
use crate::transport::Transport;

const BACKOFF_BASE_MS: u64 = 1000;
const BACKOFF_CAP_MS: u64 = 5000;

/// Delay before retry number `attempt` (1-based): 1s, 2s, 4s, then capped
/// at 5s.
pub fn backoff_delay(attempt: usize) -> Duration {
    let exp = attempt.saturating_sub(1).min(32) as u32;
    let ms = BACKOFF_BASE_MS
        .saturating_mul(1u64 << exp)
        .min(BACKOFF_CAP_MS);
    Duration::from_millis(ms)
}

/// Sends one frame through the transport up to `max_attempts` times with
/// exponential backoff between failures, publishing a retry event before
/// each re-attempt. The last error is returned when every attempt fails;
/// the handler accounts the consecutive failure.
///
/// Every failure kind is retried identically, timeouts and socket errors
/// alike.
pub async fn send_with_retry(
    transport: &mut (dyn Transport + Send),
    frame: &[u8],
    expected_len: Option<usize>,
    max_attempts: usize,
    events: &events::Sender,
) -> Result<Vec<u8>> {
    let max_attempts = max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        if attempt > 1 {
            events::emit(
                events,
                HandlerEvent::Retrying {
                    attempt,
                    max_retries: max_attempts,
                },
            );
            tokio::time::sleep(backoff_delay(attempt - 1)).await;
        }

        match transport.send_command(frame, expected_len).await {
            Ok(response) => return Ok(response),
            Err(e) => {
                warn!(
                    "send attempt {attempt}/{max_attempts} failed: {e} (code {})",
                    e.code()
                );
                last_error = Some(e);
            }
        }
    }

    // max_attempts >= 1, so at least one error was recorded
    match last_error {
        Some(e) => Err(e),
        None => Err(crate::error::Error::validation("no send attempts made")),
    }
}
