//! Display Module
//!
//! The seams between this crate and the connection library that owns the
//! socket, the event queue and the extension dispatch table.
//!
//! ## Responsibilities of the collaborator
//! - Identify each open connection ([`Display::id`])
//! - Look up extensions by name and hand out private extension slots
//! - Send fixed-size requests and block for fixed-size replies under its
//!   per-connection lock ([`Transport`])
//! - Widen 16-bit sequence numbers into full serials
//! - Hold the hooks this crate installs and call them for events in the
//!   extension's range ([`HookTable`])
//!
//! ## Hooks implemented by this crate
//! - [`EventCodec`]: fixed 32-byte events, keyed by event code
//! - [`CookieCodec`]: generic events, keyed by major opcode
//! - [`CloseHook`]: connection teardown

mod lock;

pub use lock::DisplayLock;

use std::fmt;
use std::sync::Arc;

use crate::error::{ConnectionError, Result};
use crate::protocol::{CookieDisposition, Event, GenericEventCookie, EVENT_SIZE};

/// Identity of an open connection
///
/// Only ever compared; the registry never owns or dereferences the
/// connection behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection {:#x}", self.0)
    }
}

/// Codes the server assigned to an extension on one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionCodes {
    /// Collaborator-side extension slot number
    pub extension: i32,
    pub major_opcode: u8,
    pub first_event: u8,
    pub first_error: u8,
}

// =============================================================================
// Consumed Interfaces
// =============================================================================

/// Request/reply primitives of a connection
pub trait Transport {
    /// Take the connection's request lock
    fn lock_display(&self);

    /// Release the connection's request lock
    fn unlock_display(&self);

    /// Post-request notification (synchronous-mode flush, error delivery)
    fn sync_handle(&self);

    /// Queue a fixed-size request
    fn send_request(&self, request: &[u8]);

    /// Block until the reply to the last request arrives and copy it into `reply`
    fn read_reply(&self, reply: &mut [u8]) -> std::result::Result<(), ConnectionError>;

    /// Record `wire` as the last thing read and return its full serial
    fn set_last_request_read(&self, wire: &[u8]) -> u64;
}

/// Per-connection dispatch table
pub trait HookTable {
    /// Called when the connection closes, for the given extension slot
    fn set_close_display(&self, extension: i32, hook: Arc<dyn CloseHook>);

    /// Wire <-> event conversion for one event code
    fn set_event_codec(&self, event_type: u8, codec: Arc<dyn EventCodec>);

    /// Wire -> cookie and cookie copy for one extension major opcode
    fn set_cookie_codec(&self, major_opcode: u8, codec: Arc<dyn CookieCodec>);
}

/// An open connection
pub trait Display: Transport + HookTable + Send + Sync {
    fn id(&self) -> ConnectionId;

    /// Ask the server for an extension; `None` if it does not have it
    fn init_extension(&self, name: &str) -> Option<ExtensionCodes>;

    /// Reserve a client-private extension slot with no server counterpart
    fn add_extension(&self) -> Option<ExtensionCodes>;
}

// =============================================================================
// Provided Hooks
// =============================================================================

/// Connection teardown notification
pub trait CloseHook: Send + Sync {
    /// Returns whether anything was torn down
    fn close_display(&self, display: &dyn Display, codes: &ExtensionCodes) -> bool;
}

/// Conversion of fixed 32-byte events
///
/// `None` means "not handled": the collaborator offers the record to the next
/// extension.
pub trait EventCodec: Send + Sync {
    fn wire_to_event(&self, display: &dyn Display, wire: &[u8]) -> Option<Event>;

    fn event_to_wire(&self, display: &dyn Display, event: &Event) -> Option<[u8; EVENT_SIZE]>;
}

/// Conversion and duplication of generic event cookies
pub trait CookieCodec: Send + Sync {
    fn wire_to_cookie(&self, display: &dyn Display, wire: &[u8]) -> CookieDisposition;

    /// Deep copy; on failure the source keeps sole ownership of its payload
    fn copy_cookie(
        &self,
        display: &dyn Display,
        source: &GenericEventCookie,
    ) -> Result<GenericEventCookie>;
}
