//! Poll-with-timeout helper.
//!
//! Replaces open-ended spinning on completion flags: the condition is
//! checked, and between checks the caller yields through the delay so the
//! executor can run other tasks.

use embedded_hal_async::delay::DelayNs;

use crate::error::{Error, Result};

/// Poll `ready` every `interval_ms` until it returns `true` or `timeout_ms`
/// has elapsed. Returns the elapsed time in ms on success.
///
/// The condition is always checked once before the first yield, so an
/// already-satisfied condition returns `Ok(0)` without suspending.
pub async fn poll_until<D, F>(
    delay: &mut D,
    timeout_ms: u32,
    interval_ms: u32,
    mut ready: F,
) -> Result<u32>
where
    D: DelayNs,
    F: FnMut() -> bool,
{
    let interval_ms = interval_ms.max(1);
    let mut elapsed = 0u32;
    loop {
        if ready() {
            return Ok(elapsed);
        }
        if elapsed >= timeout_ms {
            return Err(Error::Timeout);
        }
        delay.delay_ms(interval_ms).await;
        elapsed = elapsed.saturating_add(interval_ms);
    }
}
