//! Extension Module
//!
//! Ties the registry, the codecs and the collaborator's connection together.
//!
//! ## Responsibilities
//! - First-time registration of a connection: presence check, version
//!   negotiation, hook installation
//! - The public query surface (presence, event/error base, version)
//! - Implementing the hooks the collaborator dispatches into (see `hooks`)

mod hooks;

use std::sync::Arc;

use crate::config::Config;
use crate::display::{Display, DisplayLock, ExtensionCodes};
use crate::error::{Result, XFixesError};
use crate::protocol::{QueryVersionReply, QueryVersionRequest};
use crate::registry::{ExtensionRecord, ExtensionRegistry, ProtocolVersion};

/// First event and error codes the extension occupies on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionBases {
    pub event_base: u8,
    pub error_base: u8,
}

/// Client side of the extension, shared by every connection
///
/// Always handled through an `Arc`: registration hands clones of it to each
/// connection's dispatch table.
#[derive(Debug, Default)]
pub struct XFixes {
    config: Config,
    registry: ExtensionRegistry,
}

impl XFixes {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            registry: ExtensionRegistry::new(),
        })
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Return the record for `display`, registering it on first use
    ///
    /// First use costs one QueryVersion round trip when the server has the
    /// extension. If that round trip fails nothing is cached, no hooks are
    /// installed and a later call tries again.
    pub fn find_display(self: &Arc<Self>, display: &dyn Display) -> Result<Arc<ExtensionRecord>> {
        let connection = display.id();
        if let Some(record) = self.registry.find(connection) {
            return Ok(record);
        }

        // Step 1: Ask the server (no shared state touched yet)
        let (record, close_slot) = self.probe(display)?;

        // Step 2: Publish; a concurrent registration may already have won
        let (record, inserted) = self.registry.insert_if_absent(record);
        if !inserted {
            // The winner installs the hooks. A private slot reserved by this
            // call stays unused: the collaborator has no way to return it.
            return Ok(record);
        }

        // Step 3: Route events and teardown to us
        self.install_hooks(display, &record, close_slot);

        tracing::debug!(
            %connection,
            present = record.has_extension(),
            version = ?record.version(),
            "registered extension {}",
            self.config.extension_name
        );
        Ok(record)
    }

    /// Build the record for a connection that has none yet
    ///
    /// Returns the extension slot the close hook should hang on.
    fn probe(&self, display: &dyn Display) -> Result<(ExtensionRecord, i32)> {
        let connection = display.id();

        match display.init_extension(&self.config.extension_name) {
            Some(codes) => {
                let version = self.negotiate_version(display, &codes)?;
                Ok((ExtensionRecord::present(connection, codes, version), codes.extension))
            }
            None => {
                // Hang the close hook on a private slot so the record is
                // still reclaimed when the connection goes away.
                let private = display.add_extension().ok_or(XFixesError::NoExtensionSlot)?;
                Ok((ExtensionRecord::absent(connection), private.extension))
            }
        }
    }

    /// QueryVersion round trip under the connection lock
    fn negotiate_version(&self, display: &dyn Display, codes: &ExtensionCodes) -> Result<ProtocolVersion> {
        let request = QueryVersionRequest::new(codes.major_opcode, self.config.client_version).encode();
        let mut reply = [0u8; QueryVersionReply::SIZE];

        {
            let lock = DisplayLock::acquire(display);
            if let Err(err) = lock.round_trip(&request, &mut reply) {
                let connection = display.id();
                tracing::warn!(%connection, "QueryVersion failed: {}", err);
                return Err(err.into());
            }
        }

        Ok(QueryVersionReply::decode(&reply)?.server_version)
    }

    fn install_hooks(self: &Arc<Self>, display: &dyn Display, record: &ExtensionRecord, close_slot: i32) {
        let this: Arc<XFixes> = Arc::clone(self);
        display.set_close_display(close_slot, this.clone());

        if let Some(codes) = record.codes() {
            for offset in 0..self.config.event_count {
                display.set_event_codec(codes.first_event.wrapping_add(offset), this.clone());
            }
            display.set_cookie_codec(codes.major_opcode, this);
        }
    }

    /// Forget a connection; called from the close hook
    pub fn remove_display(&self, display: &dyn Display) -> bool {
        let connection = display.id();
        let removed = self.registry.remove(connection);
        tracing::debug!(%connection, removed, "connection closed");
        removed
    }

    // =========================================================================
    // Query Surface
    // =========================================================================

    /// Event and error base, or `None` if the extension is unavailable
    ///
    /// A failed registration also reads as "not present".
    pub fn query_extension(self: &Arc<Self>, display: &dyn Display) -> Option<ExtensionBases> {
        let record = match self.find_display(display) {
            Ok(record) => record,
            Err(err) => {
                let connection = display.id();
                tracing::debug!(%connection, "extension unavailable: {}", err);
                return None;
            }
        };

        record.codes().map(|codes| ExtensionBases {
            event_base: codes.first_event,
            error_base: codes.first_error,
        })
    }

    /// Version negotiated with the server
    pub fn query_version(self: &Arc<Self>, display: &dyn Display) -> Result<ProtocolVersion> {
        self.find_display(display)?
            .version()
            .ok_or_else(|| self.missing())
    }

    pub fn has_extension(self: &Arc<Self>, display: &dyn Display) -> bool {
        self.query_extension(display).is_some()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    fn missing(&self) -> XFixesError {
        XFixesError::ExtensionMissing {
            name: self.config.extension_name.clone(),
        }
    }
}
