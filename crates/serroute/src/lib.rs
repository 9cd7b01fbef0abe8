//! Line-delimited command routing for serial links.
//!
//! serroute turns a raw serial byte stream into routed commands: lines of
//! the form `/path?key=value&key2=value2` are dispatched to registered
//! endpoints, whose schemas validate and coerce the query into typed
//! bodies before a handler runs.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial device access and blocking link streams
//! - [`frame`] — Delimiter-based line framing over any byte stream
//! - [`schema`] — Query body validation and coercion (behind `schema` feature)
//! - [`peer`] — Endpoint registry and line dispatch (behind `peer` feature)

/// Re-export transport types.
pub mod transport {
    pub use serroute_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use serroute_frame::*;
}

/// Re-export schema types (requires `schema` feature).
#[cfg(feature = "schema")]
pub mod schema {
    pub use serroute_schema::*;
}

/// Re-export peer types (requires `peer` feature).
#[cfg(feature = "peer")]
pub mod peer {
    pub use serroute_peer::*;
}
