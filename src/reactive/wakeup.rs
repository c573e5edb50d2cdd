use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use calloop::ping::Ping;

/// Global flag set when a redraw has been requested
static REDRAW_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Global wakeup handle for the host event loop
static WAKEUP_PING: OnceLock<Ping> = OnceLock::new();

/// Register the event-loop wakeup handle.
///
/// The renderer creates a `calloop` ping source, inserts it into its event
/// loop, and hands the ping half here. Until this is called, signal writes
/// still set the redraw flag but nothing gets woken up.
pub fn init_wakeup(ping: Ping) {
    let _ = WAKEUP_PING.set(ping);
}

/// Request that the host event loop redraws.
///
/// Called by `Signal` on every real value change. Requests are coalesced:
/// only the first one after a `take_redraw_request` actually pings, so a
/// batched multi-signal transition costs one syscall.
pub fn request_redraw() {
    let was_requested = REDRAW_REQUESTED.swap(true, Ordering::Relaxed);
    if !was_requested {
        if let Some(ping) = WAKEUP_PING.get() {
            ping.ping();
        }
    }
}

/// Check whether a redraw has been requested and clear the flag.
pub fn take_redraw_request() -> bool {
    REDRAW_REQUESTED.swap(false, Ordering::Relaxed)
}
