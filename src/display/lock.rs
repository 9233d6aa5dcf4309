//! Scoped connection lock
//!
//! Pairs `lock_display` with `unlock_display` + `sync_handle` on every exit
//! path, including a failed reply.

use super::Transport;
use crate::error::ConnectionError;

/// Holds a connection's request lock until dropped
pub struct DisplayLock<'a, T: Transport + ?Sized> {
    display: &'a T,
}

impl<'a, T: Transport + ?Sized> DisplayLock<'a, T> {
    pub fn acquire(display: &'a T) -> Self {
        display.lock_display();
        Self { display }
    }

    /// Send `request` and block for a reply of `reply.len()` bytes
    pub fn round_trip(&self, request: &[u8], reply: &mut [u8]) -> Result<(), ConnectionError> {
        self.display.send_request(request);
        self.display.read_reply(reply)
    }
}

impl<T: Transport + ?Sized> Drop for DisplayLock<'_, T> {
    fn drop(&mut self) {
        self.display.unlock_display();
        self.display.sync_handle();
    }
}
