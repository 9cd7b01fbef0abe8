use bytes::Bytes;

use crate::error::PeerError;

/// One received line that was not dispatched to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinePayload {
    /// A UTF-8 line with no command shape (or an unmatched route, by
    /// default — see [`PeerEvents::on_unmatched`]).
    Text(String),
    /// A non-UTF-8 line, forwarded verbatim. Never routed.
    Binary(Bytes),
}

impl LinePayload {
    /// The text form, if this payload decoded as UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LinePayload::Text(text) => Some(text),
            LinePayload::Binary(_) => None,
        }
    }

    /// The raw bytes of the payload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            LinePayload::Text(text) => text.as_bytes(),
            LinePayload::Binary(bytes) => bytes.as_ref(),
        }
    }
}

/// What the delivery loop should do after an error callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Keep polling the link.
    Continue,
    /// Stop and propagate the error to the caller.
    Fatal,
}

/// Lifecycle and data callbacks for a [`crate::Peer`].
///
/// All callbacks run on the single delivery path, one line at a time —
/// a blocking callback stalls subsequent line processing, so keep them
/// short and offload real work elsewhere.
pub trait PeerEvents: Send {
    /// The link transitioned to open.
    fn on_open(&mut self) {}

    /// A received line was not a routable command.
    fn on_data(&mut self, _line: &LinePayload) {}

    /// A command line named a path with no registered endpoint.
    ///
    /// Default: forward the raw line to [`Self::on_data`]. A routing miss
    /// is a recoverable condition, never a fault.
    fn on_unmatched(&mut self, line: &str) {
        self.on_data(&LinePayload::Text(line.to_string()));
    }

    /// The link reported an error.
    ///
    /// Default: [`ErrorDisposition::Fatal`], propagating the error out of
    /// the delivery loop. Return [`ErrorDisposition::Continue`] to keep
    /// the link alive instead.
    fn on_error(&mut self, _err: &PeerError) -> ErrorDisposition {
        ErrorDisposition::Fatal
    }
}

/// No callbacks; every event is ignored and errors stop the loop.
impl PeerEvents for () {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_accessors() {
        let text = LinePayload::Text("hello".into());
        assert_eq!(text.as_text(), Some("hello"));
        assert_eq!(text.as_bytes(), b"hello");

        let binary = LinePayload::Binary(Bytes::from_static(&[0xFF, 0xFE]));
        assert_eq!(binary.as_text(), None);
        assert_eq!(binary.as_bytes(), &[0xFF, 0xFE]);
    }

    #[test]
    fn unmatched_defaults_to_data_path() {
        struct Collector {
            data: Vec<String>,
        }
        impl PeerEvents for Collector {
            fn on_data(&mut self, line: &LinePayload) {
                if let Some(text) = line.as_text() {
                    self.data.push(text.to_string());
                }
            }
        }

        let mut events = Collector { data: Vec::new() };
        events.on_unmatched("/missing?a=1");
        assert_eq!(events.data, vec!["/missing?a=1".to_string()]);
    }
}
