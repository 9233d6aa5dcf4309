//! xfixes-decode
//!
//! Decodes raw XFIXES event records from a hex dump, without a server.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use xfixes::dump::{parse_hex_record, read_records};
use xfixes::protocol::{
    decode_barrier_notify, decode_event, decode_generic_header, EventKind, BARRIER_NOTIFY,
    EVENT_TYPE_MASK, GENERIC_EVENT,
};
use xfixes::{ConnectionId, Result, XFixesError};

/// Decode XFIXES event records
#[derive(Parser, Debug)]
#[command(name = "xfixes-decode")]
#[command(about = "Decode hex-encoded XFIXES event records")]
#[command(version)]
struct Args {
    /// First event code assigned to the extension
    #[arg(short, long, default_value = "87")]
    event_base: u8,

    /// Major opcode assigned to the extension
    #[arg(short, long, default_value = "138")]
    opcode: u8,

    /// Read records from a dump file (one hex record per line)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Hex records given directly
    records: Vec<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,xfixes=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let records = match collect_records(&args) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to read records: {}", e);
            std::process::exit(1);
        }
    };

    let mut failures = 0;
    for (index, record) in records.iter().enumerate() {
        match describe(record, &args) {
            Ok(text) => println!("#{}: {}", index, text),
            Err(e) => {
                failures += 1;
                tracing::warn!("record #{}: {}", index, e);
            }
        }
    }

    tracing::info!("Decoded {} of {} records", records.len() - failures, records.len());
    if failures > 0 {
        std::process::exit(2);
    }
}

fn collect_records(args: &Args) -> Result<Vec<Vec<u8>>> {
    let mut records = match &args.input {
        Some(path) => read_records(BufReader::new(File::open(path)?))?,
        None => Vec::new(),
    };
    for text in &args.records {
        records.push(parse_hex_record(text)?);
    }
    Ok(records)
}

fn describe(record: &[u8], args: &Args) -> Result<String> {
    let connection = ConnectionId::default();
    let type_byte = *record
        .first()
        .ok_or_else(|| XFixesError::InvalidDump("empty record".to_string()))?;

    if type_byte & EVENT_TYPE_MASK == GENERIC_EVENT {
        let header = decode_generic_header(record)?;
        if header.extension != args.opcode {
            return Err(XFixesError::OpcodeMismatch {
                expected: args.opcode,
                found: header.extension,
            });
        }
        if header.evtype != BARRIER_NOTIFY {
            return Err(XFixesError::UnknownGenericEvent(header.evtype));
        }
        let event = decode_barrier_notify(record, connection)?;
        return Ok(format!("{:?}", event));
    }

    let kind = EventKind::from_wire_type(type_byte, args.event_base)
        .ok_or(XFixesError::UnknownEvent(type_byte & EVENT_TYPE_MASK))?;
    // No connection to widen it, so the serial is the raw sequence number
    let sequence = match record.get(2..4) {
        Some(&[lo, hi]) => u16::from_ne_bytes([lo, hi]),
        _ => 0,
    };
    let event = decode_event(kind, record, u64::from(sequence), connection)?;
    Ok(format!("{:?}", event))
}
