//! Protocol codec
//!
//! Pure conversions between wire records and typed values. Nothing here
//! touches connection state: the caller supplies the event base, the serial
//! and the connection identity it already looked up.

use bytes::{Buf, BufMut};

use super::cookie::{BarrierNotifyEvent, Fp3232};
use super::event::{CursorNotifyEvent, Event, EventKind, SelectionNotifyEvent};
use super::{BARRIER_NOTIFY_SIZE, EVENT_SIZE, EVENT_TYPE_MASK, GENERIC_EVENT, SEND_EVENT_MASK};
use crate::display::ConnectionId;
use crate::error::{Result, XFixesError};

/// Size of the common generic event header
const GENERIC_HEADER_SIZE: usize = 10;

// =============================================================================
// Fixed Events
// =============================================================================

/// Decode a 32-byte record already classified as `kind`
///
/// Every field is copied verbatim; only the send-event bit is split out of the
/// type byte.
pub fn decode_event(
    kind: EventKind,
    wire: &[u8],
    serial: u64,
    connection: ConnectionId,
) -> Result<Event> {
    if wire.len() < EVENT_SIZE {
        return Err(XFixesError::Protocol(format!(
            "Incomplete event: expected {} bytes, got {}",
            EVENT_SIZE,
            wire.len()
        )));
    }

    let mut buf = &wire[..EVENT_SIZE];
    let type_byte = buf.get_u8();
    let subtype = buf.get_u8();
    buf.advance(2); // sequence number, replaced by the widened serial

    let event_type = type_byte & EVENT_TYPE_MASK;
    let send_event = type_byte & SEND_EVENT_MASK != 0;

    let event = match kind {
        EventKind::SelectionNotify => Event::SelectionNotify(SelectionNotifyEvent {
            event_type,
            subtype,
            serial,
            send_event,
            connection,
            window: buf.get_u32_ne(),
            owner: buf.get_u32_ne(),
            selection: buf.get_u32_ne(),
            timestamp: buf.get_u32_ne(),
            selection_timestamp: buf.get_u32_ne(),
        }),
        EventKind::CursorNotify => Event::CursorNotify(CursorNotifyEvent {
            event_type,
            subtype,
            serial,
            send_event,
            connection,
            window: buf.get_u32_ne(),
            cursor_serial: buf.get_u32_ne(),
            timestamp: buf.get_u32_ne(),
            cursor_name: buf.get_u32_ne(),
        }),
    };

    Ok(event)
}

/// Encode an event back into its 32-byte record
///
/// The event's type must map to the same kind as its variant under
/// `first_event`; anything else is not ours to encode. The low 16 bits of the
/// serial go into the sequence field.
pub fn encode_event(event: &Event, first_event: u8) -> Result<[u8; EVENT_SIZE]> {
    let event_type = event.event_type();
    match EventKind::from_wire_type(event_type, first_event) {
        Some(kind) if kind == event.kind() => {}
        _ => return Err(XFixesError::UnknownEvent(event_type)),
    }

    let type_byte = event_type | if event.send_event() { SEND_EVENT_MASK } else { 0 };

    let mut record = [0u8; EVENT_SIZE];
    let mut out = &mut record[..];

    match event {
        Event::SelectionNotify(ev) => {
            out.put_u8(type_byte);
            out.put_u8(ev.subtype);
            out.put_u16_ne(ev.serial as u16);
            out.put_u32_ne(ev.window);
            out.put_u32_ne(ev.owner);
            out.put_u32_ne(ev.selection);
            out.put_u32_ne(ev.timestamp);
            out.put_u32_ne(ev.selection_timestamp);
        }
        Event::CursorNotify(ev) => {
            out.put_u8(type_byte);
            out.put_u8(ev.subtype);
            out.put_u16_ne(ev.serial as u16);
            out.put_u32_ne(ev.window);
            out.put_u32_ne(ev.cursor_serial);
            out.put_u32_ne(ev.timestamp);
            out.put_u32_ne(ev.cursor_name);
        }
    }

    Ok(record)
}

// =============================================================================
// Generic Events
// =============================================================================

/// Fields common to every generic event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericHeader {
    /// Raw type byte, send-event bit included
    pub type_byte: u8,
    /// Major opcode of the sending extension
    pub extension: u8,
    pub sequence: u16,
    /// Extra length past the first 32 bytes, in 4-byte units
    pub length: u32,
    pub evtype: u16,
}

impl GenericHeader {
    pub fn send_event(&self) -> bool {
        self.type_byte & SEND_EVENT_MASK != 0
    }
}

/// Read the generic event header from the start of a record
pub fn decode_generic_header(wire: &[u8]) -> Result<GenericHeader> {
    if wire.len() < GENERIC_HEADER_SIZE {
        return Err(XFixesError::Protocol(format!(
            "Incomplete generic event header: expected {} bytes, got {}",
            GENERIC_HEADER_SIZE,
            wire.len()
        )));
    }

    let mut buf = wire;
    let header = GenericHeader {
        type_byte: buf.get_u8(),
        extension: buf.get_u8(),
        sequence: buf.get_u16_ne(),
        length: buf.get_u32_ne(),
        evtype: buf.get_u16_ne(),
    };

    if header.type_byte & EVENT_TYPE_MASK != GENERIC_EVENT {
        return Err(XFixesError::Protocol(format!(
            "Not a generic event: type {}",
            header.type_byte & EVENT_TYPE_MASK
        )));
    }

    Ok(header)
}

/// Decode a BarrierNotify record into a fresh payload
pub fn decode_barrier_notify(wire: &[u8], connection: ConnectionId) -> Result<BarrierNotifyEvent> {
    if wire.len() < BARRIER_NOTIFY_SIZE {
        return Err(XFixesError::Protocol(format!(
            "Incomplete barrier event: expected {} bytes, got {}",
            BARRIER_NOTIFY_SIZE,
            wire.len()
        )));
    }

    let header = decode_generic_header(wire)?;

    let mut buf = &wire[GENERIC_HEADER_SIZE..BARRIER_NOTIFY_SIZE];
    let mut event = BarrierNotifyEvent {
        event_type: header.type_byte,
        connection,
        extension: header.extension,
        evtype: header.evtype,
        ..BarrierNotifyEvent::default()
    };

    event.deviceid = buf.get_u16_ne();
    event.timestamp = buf.get_u32_ne();
    event.barrier = buf.get_u32_ne();
    event.event_id = buf.get_u32_ne();
    event.dt = buf.get_u32_ne();
    event.barrier_event_type = buf.get_u16_ne();
    buf.advance(2);
    event.x = i32::from(buf.get_i16_ne());
    event.y = i32::from(buf.get_i16_ne());
    buf.advance(4);
    event.dx = get_fp3232(&mut buf).to_f64();
    event.dy = get_fp3232(&mut buf).to_f64();
    event.raw_dx = get_fp3232(&mut buf).to_f64();
    event.raw_dy = get_fp3232(&mut buf).to_f64();

    Ok(event)
}

/// Build the wire record for a barrier event
///
/// Used to synthesize events; deltas are truncated to 32.32 precision and
/// coordinates to 16 bits.
pub fn encode_barrier_notify(event: &BarrierNotifyEvent, sequence: u16) -> [u8; BARRIER_NOTIFY_SIZE] {
    let mut record = [0u8; BARRIER_NOTIFY_SIZE];
    let mut out = &mut record[..];

    out.put_u8(event.event_type);
    out.put_u8(event.extension);
    out.put_u16_ne(sequence);
    out.put_u32_ne(((BARRIER_NOTIFY_SIZE - EVENT_SIZE) / 4) as u32);
    out.put_u16_ne(event.evtype);
    out.put_u16_ne(event.deviceid);
    out.put_u32_ne(event.timestamp);
    out.put_u32_ne(event.barrier);
    out.put_u32_ne(event.event_id);
    out.put_u32_ne(event.dt);
    out.put_u16_ne(event.barrier_event_type);
    out.put_u16_ne(0);
    out.put_i16_ne(event.x as i16);
    out.put_i16_ne(event.y as i16);
    out.put_u32_ne(0);
    for value in [event.dx, event.dy, event.raw_dx, event.raw_dy] {
        put_fp3232(&mut out, Fp3232::from_f64(value));
    }

    record
}

fn get_fp3232<B: Buf>(buf: &mut B) -> Fp3232 {
    let integral = buf.get_i32_ne();
    let frac = buf.get_u32_ne();
    Fp3232::new(integral, frac)
}

fn put_fp3232<B: BufMut>(buf: &mut B, value: Fp3232) {
    buf.put_i32_ne(value.integral);
    buf.put_u32_ne(value.frac);
}
