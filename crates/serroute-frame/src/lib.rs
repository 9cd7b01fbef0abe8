//! Delimiter-based line framing over byte streams.
//!
//! This is the framing layer of serroute. Incoming bytes are split into
//! lines at a configurable delimiter (default `\n`):
//! - No partial reads, no buffer management in user code.
//! - A maximum line length bounds buffering on a delimiter-less stream.
//! - Outgoing lines get the delimiter appended; payloads that already
//!   contain it are rejected rather than silently split on the wire.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{decode_line, encode_line, LineConfig, DEFAULT_DELIMITER, DEFAULT_MAX_LINE_LEN};
pub use error::{LineError, Result};
pub use reader::LineReader;
pub use writer::LineWriter;
