//! Cooperative stop requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle for asking a running simulation to stop.
///
/// The runner checks the flag before starting each step; a step already
/// in progress always finishes. The run then completes with
/// [`StopReason::StopRequested`](crate::StopReason::StopRequested).
///
/// # Examples
///
/// ```
/// use calor_engine::StopHandle;
///
/// let handle = StopHandle::new();
/// let remote = handle.clone();
/// std::thread::spawn(move || remote.request_stop()).join().unwrap();
/// assert!(handle.is_requested());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// A handle with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop before its next step. Callable from any thread.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let a = StopHandle::new();
        let b = a.clone();
        assert!(!b.is_requested());
        a.request_stop();
        assert!(b.is_requested());
    }
}
