/// Errors that can occur in peer operations.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] serroute_transport::TransportError),

    /// Line framing error.
    #[error("line error: {0}")]
    Line(#[from] serroute_frame::LineError),

    /// The peer was built without a write half.
    #[error("peer has no write half")]
    WriteHalfMissing,
}

pub type Result<T> = std::result::Result<T, PeerError>;
