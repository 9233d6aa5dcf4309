//! Typed fixed-size events
//!
//! Flat value types produced by decoding a 32-byte wire record.

use crate::display::ConnectionId;
use super::EVENT_TYPE_MASK;

/// SelectionNotify subtypes
pub const SELECTION_SET_OWNER: u8 = 0;
pub const SELECTION_WINDOW_DESTROY: u8 = 1;
pub const SELECTION_CLIENT_CLOSE: u8 = 2;

/// CursorNotify subtype
pub const CURSOR_DISPLAY_CURSOR: u8 = 0;

/// Known fixed event kinds, by offset from the connection's first event code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    SelectionNotify = 0,
    CursorNotify = 1,
}

impl EventKind {
    /// Classify a raw type byte against the extension's event base
    ///
    /// The send-event bit is ignored. Codes below the base or past the known
    /// kinds are not ours.
    pub fn from_wire_type(wire_type: u8, first_event: u8) -> Option<Self> {
        match (wire_type & EVENT_TYPE_MASK).checked_sub(first_event)? {
            0 => Some(EventKind::SelectionNotify),
            1 => Some(EventKind::CursorNotify),
            _ => None,
        }
    }

    /// Offset of this kind from the event base
    pub fn offset(self) -> u8 {
        self as u8
    }
}

/// Selection ownership changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionNotifyEvent {
    /// Event code without the send-event bit
    pub event_type: u8,
    pub subtype: u8,
    pub serial: u64,
    /// True if the event came from a SendEvent request
    pub send_event: bool,
    pub connection: ConnectionId,
    pub window: u32,
    pub owner: u32,
    pub selection: u32,
    pub timestamp: u32,
    pub selection_timestamp: u32,
}

/// The displayed cursor changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorNotifyEvent {
    /// Event code without the send-event bit
    pub event_type: u8,
    pub subtype: u8,
    pub serial: u64,
    /// True if the event came from a SendEvent request
    pub send_event: bool,
    pub connection: ConnectionId,
    pub window: u32,
    pub cursor_serial: u32,
    pub timestamp: u32,
    /// Atom naming the cursor, or None (0)
    pub cursor_name: u32,
}

/// A decoded XFIXES event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    SelectionNotify(SelectionNotifyEvent),
    CursorNotify(CursorNotifyEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::SelectionNotify(_) => EventKind::SelectionNotify,
            Event::CursorNotify(_) => EventKind::CursorNotify,
        }
    }

    pub fn event_type(&self) -> u8 {
        match self {
            Event::SelectionNotify(ev) => ev.event_type,
            Event::CursorNotify(ev) => ev.event_type,
        }
    }

    pub fn serial(&self) -> u64 {
        match self {
            Event::SelectionNotify(ev) => ev.serial,
            Event::CursorNotify(ev) => ev.serial,
        }
    }

    pub fn send_event(&self) -> bool {
        match self {
            Event::SelectionNotify(ev) => ev.send_event,
            Event::CursorNotify(ev) => ev.send_event,
        }
    }

    pub fn connection(&self) -> ConnectionId {
        match self {
            Event::SelectionNotify(ev) => ev.connection,
            Event::CursorNotify(ev) => ev.connection,
        }
    }
}
