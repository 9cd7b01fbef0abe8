//! Serial-device byte stream transport.
//!
//! Opens a character device (e.g. `/dev/ttyS0`), puts it in raw mode at a
//! requested baud rate, and hands back a [`LinkStream`] — a plain
//! `Read + Write` byte stream. Everything above this layer (line framing,
//! routing) is transport-agnostic and works over any `Read`/`Write` pair.
//!
//! This is the lowest layer of serroute.

pub mod error;
pub mod serial;
pub mod stream;

pub use error::{Result, TransportError};
pub use serial::SerialDevice;
pub use stream::LinkStream;
