/// Errors that can occur during line framing.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// No delimiter was seen within the configured maximum line length.
    #[error("line too long ({size} bytes buffered, max {max})")]
    LineTooLong { size: usize, max: usize },

    /// An outgoing payload contains the delimiter and would split on the wire.
    #[error("payload contains the line delimiter at byte offset {offset}")]
    DelimiterInPayload { offset: usize },

    /// An I/O error occurred while reading or writing lines.
    #[error("line I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream closed; any partial undelimited line is discarded.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, LineError>;
