//! Dispatch hooks
//!
//! What the collaborator calls once a connection is registered. Each hook
//! looks the connection up again (usually an MRU hit) to get the opcode and
//! event base it was registered with. A connection with no record, or whose
//! server lacks the extension, is never ours.

use super::XFixes;
use crate::display::{CloseHook, CookieCodec, Display, EventCodec, ExtensionCodes};
use crate::error::{Result, XFixesError};
use crate::protocol::{
    decode_barrier_notify, decode_event, decode_generic_header, encode_event, CookieData,
    CookieDisposition, Event, EventKind, GenericEventCookie, BARRIER_NOTIFY, EVENT_SIZE,
};

impl CloseHook for XFixes {
    fn close_display(&self, display: &dyn Display, _codes: &ExtensionCodes) -> bool {
        self.remove_display(display)
    }
}

// =============================================================================
// Fixed Events
// =============================================================================

impl EventCodec for XFixes {
    fn wire_to_event(&self, display: &dyn Display, wire: &[u8]) -> Option<Event> {
        let connection = display.id();
        let first_event = self.registry.find(connection)?.first_event()?;
        let kind = EventKind::from_wire_type(*wire.first()?, first_event)?;

        // Only a complete record may advance the serial tracker
        if wire.len() < EVENT_SIZE {
            tracing::debug!(%connection, len = wire.len(), "dropping truncated {:?}", kind);
            return None;
        }

        let serial = display.set_last_request_read(wire);
        match decode_event(kind, wire, serial, connection) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::debug!(%connection, "dropping {:?}: {}", kind, err);
                None
            }
        }
    }

    fn event_to_wire(&self, display: &dyn Display, event: &Event) -> Option<[u8; EVENT_SIZE]> {
        let connection = display.id();
        let first_event = self.registry.find(connection)?.first_event()?;
        match encode_event(event, first_event) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::debug!(%connection, "not encoding event: {}", err);
                None
            }
        }
    }
}

// =============================================================================
// Generic Event Cookies
// =============================================================================

impl XFixes {
    /// Major opcode registered for this connection
    fn registered_opcode(&self, display: &dyn Display) -> Result<u8> {
        self.registry
            .find(display.id())
            .and_then(|record| record.major_opcode())
            .ok_or_else(|| self.missing())
    }

    fn check_opcode(&self, display: &dyn Display, found: u8) -> Result<()> {
        let expected = self.registered_opcode(display)?;
        if found != expected {
            let connection = display.id();
            tracing::warn!(%connection, expected, found, "wrong extension opcode");
            return Err(XFixesError::OpcodeMismatch { expected, found });
        }
        Ok(())
    }
}

impl CookieCodec for XFixes {
    fn wire_to_cookie(&self, display: &dyn Display, wire: &[u8]) -> CookieDisposition {
        let header = match decode_generic_header(wire) {
            Ok(header) => header,
            Err(err) => {
                let connection = display.id();
                tracing::debug!(%connection, "not a generic event: {}", err);
                return CookieDisposition::DontEnqueue;
            }
        };
        if self.check_opcode(display, header.extension).is_err() {
            return CookieDisposition::DontEnqueue;
        }

        let mut cookie = GenericEventCookie::new(
            header.type_byte,
            display.set_last_request_read(wire),
            header.send_event(),
            display.id(),
            header.extension,
            header.evtype,
        );

        match header.evtype {
            BARRIER_NOTIFY => match decode_barrier_notify(wire, display.id()) {
                Ok(event) => {
                    cookie.attach(CookieData::BarrierNotify(event));
                    CookieDisposition::Enqueue(cookie)
                }
                Err(err) => {
                    tracing::warn!(evtype = header.evtype, "barrier event conversion failed: {}", err);
                    CookieDisposition::DontEnqueue
                }
            },
            evtype => {
                tracing::debug!(evtype, "unknown generic event");
                CookieDisposition::DontEnqueue
            }
        }
    }

    fn copy_cookie(
        &self,
        display: &dyn Display,
        source: &GenericEventCookie,
    ) -> Result<GenericEventCookie> {
        self.check_opcode(display, source.extension)?;

        let mut copy = source.copy_header();
        match source.evtype {
            BARRIER_NOTIFY => {
                let event = source.barrier_notify().ok_or(XFixesError::MissingPayload)?;
                copy.attach(CookieData::BarrierNotify(event.clone()));
                Ok(copy)
            }
            evtype => {
                tracing::debug!(evtype, "cannot copy unknown generic event");
                Err(XFixesError::UnknownGenericEvent(evtype))
            }
        }
    }
}
