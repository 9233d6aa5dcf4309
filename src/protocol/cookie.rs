//! Generic event cookies
//!
//! Generic events are too large for the fixed 32-byte record, so their decoded
//! form lives out of line, behind a cookie.
//!
//! ## Ownership
//! A cookie exclusively owns its payload. The collaborator's free path calls
//! [`GenericEventCookie::release_data`] once it is done with an enqueued
//! cookie; a second call finds nothing to release. Duplicating a cookie goes
//! through the cookie codec, which deep-copies the payload so both cookies can
//! be released independently.

use crate::display::ConnectionId;

// =============================================================================
// Fixed Point
// =============================================================================

/// 32.32 fixed-point value as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fp3232 {
    /// Signed integral part
    pub integral: i32,
    /// Fractional numerator over 2^32
    pub frac: u32,
}

impl Fp3232 {
    const FRAC_SCALE: f64 = 4_294_967_296.0; // 2^32

    pub fn new(integral: i32, frac: u32) -> Self {
        Self { integral, frac }
    }

    /// `integral + frac / 2^32`
    pub fn to_f64(self) -> f64 {
        f64::from(self.integral) + f64::from(self.frac) / Self::FRAC_SCALE
    }

    /// Nearest representable value at or below `value`
    ///
    /// Out-of-range inputs saturate.
    pub fn from_f64(value: f64) -> Self {
        let integral = value.floor();
        let frac = ((value - integral) * Self::FRAC_SCALE) as u32;
        Self {
            integral: integral as i32,
            frac,
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Pointer hit or released a pointer barrier
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarrierNotifyEvent {
    /// Raw type byte of the wire record
    pub event_type: u8,
    pub connection: ConnectionId,
    /// Major opcode of the extension that sent the event
    pub extension: u8,
    pub evtype: u16,
    pub deviceid: u16,
    /// Root coordinates of the pointer
    pub x: i32,
    pub y: i32,
    /// Constrained motion delta
    pub dx: f64,
    pub dy: f64,
    /// Unconstrained motion delta
    pub raw_dx: f64,
    pub raw_dy: f64,
    /// Milliseconds since the previous event for this barrier
    pub dt: u32,
    pub barrier: u32,
    pub event_id: u32,
    /// Whether the barrier was hit or left
    pub barrier_event_type: u16,
    pub timestamp: u32,
}

/// Out-of-line payload of a generic event cookie
#[derive(Debug, Clone, PartialEq)]
pub enum CookieData {
    BarrierNotify(BarrierNotifyEvent),
}

// =============================================================================
// Cookie
// =============================================================================

/// Header of a generic event plus its owned payload
#[derive(Debug, PartialEq)]
pub struct GenericEventCookie {
    /// Raw type byte of the wire record
    pub event_type: u8,
    pub serial: u64,
    pub send_event: bool,
    pub connection: ConnectionId,
    /// Major opcode of the extension that sent the event
    pub extension: u8,
    /// Extension-specific generic event sub-type
    pub evtype: u16,
    /// Identifier assigned by the collaborator's event queue
    pub cookie: u32,
    data: Option<Box<CookieData>>,
}

impl GenericEventCookie {
    /// Create a header with no payload attached
    pub fn new(
        event_type: u8,
        serial: u64,
        send_event: bool,
        connection: ConnectionId,
        extension: u8,
        evtype: u16,
    ) -> Self {
        Self {
            event_type,
            serial,
            send_event,
            connection,
            extension,
            evtype,
            cookie: 0,
            data: None,
        }
    }

    /// Copy of the header fields only: no payload and a cleared cookie id
    pub fn copy_header(&self) -> Self {
        Self {
            cookie: 0,
            data: None,
            ..*self
        }
    }

    pub fn data(&self) -> Option<&CookieData> {
        self.data.as_deref()
    }

    pub fn data_mut(&mut self) -> Option<&mut CookieData> {
        self.data.as_deref_mut()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Payload as a barrier event, if that is what it holds
    pub fn barrier_notify(&self) -> Option<&BarrierNotifyEvent> {
        match self.data() {
            Some(CookieData::BarrierNotify(ev)) => Some(ev),
            None => None,
        }
    }

    pub(crate) fn attach(&mut self, data: CookieData) {
        self.data = Some(Box::new(data));
    }

    /// Free the payload
    ///
    /// Returns whether a payload was actually released.
    pub fn release_data(&mut self) -> bool {
        self.data.take().is_some()
    }
}

/// Result of converting a wire record into a cookie
#[derive(Debug, PartialEq)]
pub enum CookieDisposition {
    /// Fully decoded; the cookie owns its payload and should be queued
    Enqueue(GenericEventCookie),
    /// Not ours or not decodable; nothing was allocated
    DontEnqueue,
}

impl CookieDisposition {
    pub fn is_enqueue(&self) -> bool {
        matches!(self, CookieDisposition::Enqueue(_))
    }

    pub fn into_cookie(self) -> Option<GenericEventCookie> {
        match self {
            CookieDisposition::Enqueue(cookie) => Some(cookie),
            CookieDisposition::DontEnqueue => None,
        }
    }
}
