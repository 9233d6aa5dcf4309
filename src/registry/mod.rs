//! Registry Module
//!
//! Per-connection extension metadata.
//!
//! ## Responsibilities
//! - One record per connection that has ever asked about the extension
//! - Fast repeat lookups through a single most-recently-used slot
//! - Teardown when the connection closes
//!
//! ## Data Structure Choice
//! Records are immutable once built and shared as `Arc`, so a lookup hands
//! out a handle that stays valid even if the connection is torn down
//! concurrently. The map lives behind one `Mutex`; the MRU slot has its own
//! `RwLock` so the fast path never touches the registry lock.

mod table;

pub use table::ExtensionRegistry;

use std::fmt;

use crate::display::{ConnectionId, ExtensionCodes};

/// Negotiated protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

impl ProtocolVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// What one connection knows about the extension
#[derive(Debug, PartialEq, Eq)]
pub struct ExtensionRecord {
    connection: ConnectionId,
    /// `None` when the server lacks the extension
    codes: Option<ExtensionCodes>,
    /// Only meaningful when `codes` is present
    version: ProtocolVersion,
}

impl ExtensionRecord {
    /// Record for a connection whose server has the extension
    pub fn present(connection: ConnectionId, codes: ExtensionCodes, version: ProtocolVersion) -> Self {
        Self {
            connection,
            codes: Some(codes),
            version,
        }
    }

    /// Record for a connection whose server lacks the extension
    pub fn absent(connection: ConnectionId) -> Self {
        Self {
            connection,
            codes: None,
            version: ProtocolVersion::default(),
        }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn codes(&self) -> Option<&ExtensionCodes> {
        self.codes.as_ref()
    }

    pub fn has_extension(&self) -> bool {
        self.codes.is_some()
    }

    /// Negotiated version, or `None` if the extension is absent
    pub fn version(&self) -> Option<ProtocolVersion> {
        self.codes.map(|_| self.version)
    }

    pub fn major_opcode(&self) -> Option<u8> {
        self.codes.map(|codes| codes.major_opcode)
    }

    pub fn first_event(&self) -> Option<u8> {
        self.codes.map(|codes| codes.first_event)
    }
}
