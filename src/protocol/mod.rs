//! Protocol Module
//!
//! Wire layouts and typed values for the XFIXES events this crate marshals.
//!
//! All multi-byte fields are in host byte order: the transport has already
//! swapped them by the time a record reaches this layer.
//!
//! ## SelectionNotify (32 bytes)
//! ```text
//! ┌─────────┬────────────┬─────────┬────────────┬───────────┬──────────────┬───────────────┬─────────────────┬─────────┐
//! │ Type(1) │ Subtype(1) │ Seq (2) │ Window (4) │ Owner (4) │ Selection(4) │ Timestamp (4) │ SelectionTs (4) │ Pad (8) │
//! └─────────┴────────────┴─────────┴────────────┴───────────┴──────────────┴───────────────┴─────────────────┴─────────┘
//! ```
//!
//! ## CursorNotify (32 bytes)
//! ```text
//! ┌─────────┬────────────┬─────────┬────────────┬──────────────┬───────────────┬──────────┬──────────┐
//! │ Type(1) │ Subtype(1) │ Seq (2) │ Window (4) │ CursorSer(4) │ Timestamp (4) │ Name (4) │ Pad (12) │
//! └─────────┴────────────┴─────────┴────────────┴──────────────┴───────────────┴──────────┴──────────┘
//! ```
//!
//! ## BarrierNotify (generic event, 72 bytes)
//! ```text
//!  0 Type(1)=35  1 Extension(1)  2 Seq(2)      4 Length(4)=10
//!  8 Evtype(2)  10 DeviceId(2)  12 Time(4)    16 Barrier(4)
//! 20 EventId(4) 24 Dt(4)        28 EventType(2) 30 Pad(2)
//! 32 RootX(2)   34 RootY(2)     36 Pad(4)
//! 40 Dx(8)      48 Dy(8)        56 RawDx(8)   64 RawDy(8)
//! ```
//! Each delta is 32.32 fixed point: a signed 32-bit integral part followed by
//! an unsigned 32-bit fraction over 2^32.
//!
//! ## QueryVersion
//! ```text
//! Request (12): ReqType(1) XFixesReqType(1)=0 Length(2)=3 Major(4) Minor(4)
//! Reply   (32): Type(1)=1 Pad(1) Seq(2) Length(4)=0 Major(4) Minor(4) Pad(16)
//! ```

mod codec;
mod cookie;
mod event;
mod request;

pub use codec::{
    decode_barrier_notify, decode_event, decode_generic_header, encode_barrier_notify,
    encode_event, GenericHeader,
};
pub use cookie::{BarrierNotifyEvent, CookieData, CookieDisposition, Fp3232, GenericEventCookie};
pub use event::{
    CursorNotifyEvent, Event, EventKind, SelectionNotifyEvent, CURSOR_DISPLAY_CURSOR,
    SELECTION_CLIENT_CLOSE, SELECTION_SET_OWNER, SELECTION_WINDOW_DESTROY,
};
pub use request::{QueryVersionReply, QueryVersionRequest};

// =============================================================================
// Extension Identity
// =============================================================================

/// Name the server advertises the extension under
pub const EXTENSION_NAME: &str = "XFIXES";

/// Protocol version this library speaks
pub const CLIENT_MAJOR_VERSION: u32 = 6;
pub const CLIENT_MINOR_VERSION: u32 = 0;
pub const CLIENT_REVISION: u32 = 0;

/// Number of fixed-size event codes the extension occupies
pub const NUMBER_EVENTS: u8 = 2;

// =============================================================================
// Wire Constants
// =============================================================================

/// Size of every core-protocol event record
pub const EVENT_SIZE: usize = 32;

/// Size of a BarrierNotify generic event record
pub const BARRIER_NOTIFY_SIZE: usize = 72;

/// Send-event flag carried in the top bit of the type byte
pub const SEND_EVENT_MASK: u8 = 0x80;

/// The 7-bit event code proper
pub const EVENT_TYPE_MASK: u8 = 0x7F;

/// Core event code shared by every generic event
pub const GENERIC_EVENT: u8 = 35;

/// Generic event sub-type for pointer barrier notifications
pub const BARRIER_NOTIFY: u16 = 0;

/// Minor opcode of the QueryVersion request
pub const X_QUERY_VERSION: u8 = 0;

/// Library version number: `major * 10000 + minor * 100 + revision`
pub fn library_version() -> u32 {
    CLIENT_MAJOR_VERSION * 10000 + CLIENT_MINOR_VERSION * 100 + CLIENT_REVISION
}
