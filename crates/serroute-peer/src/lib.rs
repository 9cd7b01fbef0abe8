//! Path-routed command dispatch over a line-framed byte stream.
//!
//! This is the "just works" layer. A [`Peer`] owns the link, frames bytes
//! into lines, and routes each `/path?key=value` command line to the
//! registered [`Endpoint`], which validates the query against its schema
//! and invokes its handler with an already-typed body. Lines that are not
//! commands surface through the [`PeerEvents`] callbacks.

pub mod endpoint;
pub mod error;
pub mod events;
pub mod peer;

pub use endpoint::{Endpoint, Handler};
pub use error::{PeerError, Result};
pub use events::{ErrorDisposition, LinePayload, PeerEvents};
pub use peer::{LinkConfig, LinkState, Peer, PollOutcome};
