//! # xfixes
//!
//! Client-side marshalling for the XFIXES display-server extension:
//! - Per-connection registry of extension codes and negotiated version
//! - Wire <-> typed conversion for SelectionNotify and CursorNotify
//! - Generic event cookies carrying BarrierNotify payloads
//!
//! The connection itself (socket, event queue, dispatch table) belongs to a
//! collaborator described by the traits in [`display`].
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Connection library (Display)                │
//! │        transport · event queue · hook dispatch table        │
//! └──────────────┬─────────────────────────────▲────────────────┘
//!                │ find_display / queries      │ hooks
//! ┌──────────────▼─────────────────────────────┴────────────────┐
//! │                           XFixes                            │
//! │        registration · QueryVersion · hook implementations   │
//! └──────────────┬─────────────────────────────┬────────────────┘
//!                │                             │
//!                ▼                             ▼
//!   ┌─────────────────────────┐   ┌─────────────────────────────┐
//!   │    ExtensionRegistry    │   │          protocol           │
//!   │   (Mutex + MRU slot)    │   │  codec · cookies · requests │
//!   └─────────────────────────┘   └─────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod display;
pub mod dump;
pub mod extension;
pub mod protocol;
pub mod registry;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use display::{ConnectionId, Display, ExtensionCodes};
pub use error::{ConnectionError, Result, XFixesError};
pub use extension::{ExtensionBases, XFixes};
pub use protocol::library_version;
pub use registry::{ExtensionRecord, ExtensionRegistry, ProtocolVersion};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
