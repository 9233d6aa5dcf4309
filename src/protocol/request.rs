//! QueryVersion request and reply
//!
//! The one round trip this crate makes itself, during first-time registration.

use bytes::{Buf, BufMut};

use super::X_QUERY_VERSION;
use crate::error::{Result, XFixesError};
use crate::registry::ProtocolVersion;

/// Reply packet type
const X_REPLY: u8 = 1;

/// QueryVersion request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryVersionRequest {
    /// The extension's major opcode on this connection
    pub major_opcode: u8,
    /// Version the client speaks
    pub client_version: ProtocolVersion,
}

impl QueryVersionRequest {
    pub const SIZE: usize = 12;

    pub fn new(major_opcode: u8, client_version: ProtocolVersion) -> Self {
        Self {
            major_opcode,
            client_version,
        }
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut request = [0u8; Self::SIZE];
        let mut out = &mut request[..];
        out.put_u8(self.major_opcode);
        out.put_u8(X_QUERY_VERSION);
        out.put_u16_ne((Self::SIZE / 4) as u16);
        out.put_u32_ne(self.client_version.major);
        out.put_u32_ne(self.client_version.minor);
        request
    }
}

/// QueryVersion reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryVersionReply {
    pub sequence: u16,
    /// Version the server agreed to
    pub server_version: ProtocolVersion,
}

impl QueryVersionReply {
    pub const SIZE: usize = 32;

    pub fn decode(reply: &[u8]) -> Result<Self> {
        if reply.len() < Self::SIZE {
            return Err(XFixesError::Protocol(format!(
                "Incomplete QueryVersion reply: expected {} bytes, got {}",
                Self::SIZE,
                reply.len()
            )));
        }

        let mut buf = reply;
        let reply_type = buf.get_u8();
        if reply_type != X_REPLY {
            return Err(XFixesError::Protocol(format!(
                "Unexpected packet type {} in QueryVersion reply",
                reply_type
            )));
        }
        buf.advance(1);
        let sequence = buf.get_u16_ne();
        buf.advance(4); // reply length, always 0
        let major = buf.get_u32_ne();
        let minor = buf.get_u32_ne();

        Ok(Self {
            sequence,
            server_version: ProtocolVersion::new(major, minor),
        })
    }

    /// Build a reply packet; used by loopback transports and tests
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut reply = [0u8; Self::SIZE];
        let mut out = &mut reply[..];
        out.put_u8(X_REPLY);
        out.put_u8(0);
        out.put_u16_ne(self.sequence);
        out.put_u32_ne(0);
        out.put_u32_ne(self.server_version.major);
        out.put_u32_ne(self.server_version.minor);
        reply
    }
}
