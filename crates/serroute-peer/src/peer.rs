use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;

use bytes::Bytes;
use serroute_frame::{LineConfig, LineError, LineReader, LineWriter};
use serroute_transport::{LinkStream, SerialDevice};
use tracing::{debug, trace, warn};

use crate::endpoint::Endpoint;
use crate::error::{PeerError, Result};
use crate::events::{ErrorDisposition, LinePayload, PeerEvents};

/// Link configuration: device path, baud rate, line delimiter.
///
/// Passed through opaquely to the transport and framing layers.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Serial device path.
    pub device: PathBuf,
    /// Baud rate for tty devices.
    pub baud_rate: u32,
    /// Line delimiter on the wire.
    pub delimiter: Vec<u8>,
    /// Read timeout; `None` blocks indefinitely. A timeout makes
    /// [`Peer::poll`] return [`PollOutcome::Idle`] periodically, which
    /// cooperative-shutdown loops rely on.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout; `None` blocks indefinitely.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/ttyS0"),
            baud_rate: SerialDevice::DEFAULT_BAUD_RATE,
            delimiter: b"\n".to_vec(),
            read_timeout: None,
            write_timeout: None,
        }
    }
}

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No link.
    Closed,
    /// Transport open in progress.
    Opening,
    /// Dispatching lines.
    Open,
    /// A fatal error stopped the delivery loop.
    Errored,
}

/// What one call to [`Peer::poll`] accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// One line was read and dispatched.
    Dispatched,
    /// The read timed out with nothing to dispatch.
    Idle,
    /// The link is closed; polling again is a no-op.
    Closed,
}

/// Owns a line-framed link and routes command lines to endpoints.
///
/// Events are processed one at a time in arrival order: each line is
/// dispatched synchronously and completely before the next is read.
/// Registry mutation goes through `&mut self`, so it is serialized with
/// dispatch by construction.
pub struct Peer<T, E> {
    reader: LineReader<T>,
    writer: Option<LineWriter<T>>,
    endpoints: HashMap<String, Endpoint>,
    events: E,
    state: LinkState,
}

impl<E: PeerEvents> Peer<LinkStream, E> {
    /// Open the configured serial device and build a peer over it.
    ///
    /// Fires `on_open` once the transport is up.
    pub fn open(config: &LinkConfig, endpoints: Vec<Endpoint>, events: E) -> Result<Self> {
        let line_config = LineConfig {
            delimiter: config.delimiter.clone(),
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
            ..LineConfig::default()
        };

        let stream = SerialDevice::open(&config.device, config.baud_rate)?;
        let read_half = stream.try_clone()?;
        let reader = LineReader::with_config_link(read_half, line_config.clone())?;
        let writer = LineWriter::with_config_link(stream, line_config)?;

        Ok(Self::from_parts(reader, Some(writer), endpoints, events))
    }
}

impl<T: Read, E: PeerEvents> Peer<T, E> {
    /// Build a peer from already-constructed framing halves.
    ///
    /// The stream is considered open; `on_open` fires immediately. A peer
    /// without a write half dispatches normally but cannot `send_line`.
    pub fn from_parts(
        reader: LineReader<T>,
        writer: Option<LineWriter<T>>,
        endpoints: Vec<Endpoint>,
        events: E,
    ) -> Self {
        let mut peer = Self {
            reader,
            writer,
            endpoints: HashMap::new(),
            events,
            state: LinkState::Opening,
        };
        for endpoint in endpoints {
            peer.set_endpoint(endpoint);
        }

        peer.state = LinkState::Open;
        peer.events.on_open();
        peer
    }

    /// Registry lookup by path.
    pub fn get_endpoint(&self, path: &str) -> Option<&Endpoint> {
        self.endpoints.get(path)
    }

    /// Insert or replace the endpoint registered at its path.
    ///
    /// Last write wins: re-registering a path swaps in the new endpoint
    /// (and its handler) for all subsequent lines.
    pub fn set_endpoint(&mut self, endpoint: Endpoint) {
        let path = endpoint.path().to_string();
        if self.endpoints.insert(path.clone(), endpoint).is_some() {
            debug!(path, "replaced endpoint registration");
        } else {
            debug!(path, "registered endpoint");
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Borrow the event callbacks.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Mutably borrow the event callbacks.
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Read and dispatch at most one line.
    ///
    /// Returns `Idle` when the read timed out (cooperative-shutdown loops
    /// poll on a timeout), `Closed` once the stream has ended. Errors are
    /// offered to `on_error` first; only a `Fatal` disposition propagates.
    pub fn poll(&mut self) -> Result<PollOutcome> {
        if self.state != LinkState::Open {
            return Ok(PollOutcome::Closed);
        }

        match self.reader.read_line() {
            Ok(line) => {
                self.dispatch_line(line);
                Ok(PollOutcome::Dispatched)
            }
            Err(LineError::ConnectionClosed) => {
                debug!("link closed");
                self.state = LinkState::Closed;
                Ok(PollOutcome::Closed)
            }
            Err(LineError::Io(err))
                if err.kind() == ErrorKind::TimedOut || err.kind() == ErrorKind::WouldBlock =>
            {
                Ok(PollOutcome::Idle)
            }
            Err(err) => {
                let framing_error = matches!(err, LineError::LineTooLong { .. });
                let err = PeerError::from(err);
                match self.events.on_error(&err) {
                    ErrorDisposition::Continue => {
                        if framing_error {
                            // The buffer is poisoned past the cap; drop it so
                            // the link can resync at the next delimiter.
                            self.reader.discard_buffered();
                        }
                        Ok(PollOutcome::Idle)
                    }
                    ErrorDisposition::Fatal => {
                        self.state = LinkState::Errored;
                        Err(err)
                    }
                }
            }
        }
    }

    /// Drive [`Peer::poll`] until the stream closes or an error is fatal.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.poll()? {
                PollOutcome::Dispatched | PollOutcome::Idle => {}
                PollOutcome::Closed => return Ok(()),
            }
        }
    }

    /// Route one received line.
    ///
    /// Non-UTF-8 payloads go to `on_data` verbatim. Text is split at the
    /// first `?`; a non-empty route starting with `/` is a command and is
    /// dispatched to its endpoint, a registered-path miss goes to
    /// `on_unmatched`, everything else is plain data.
    fn dispatch_line(&mut self, line: Bytes) {
        match std::str::from_utf8(&line) {
            Ok(text) => {
                let (route, query) = match text.find('?') {
                    Some(at) => (&text[..at], &text[at + 1..]),
                    None => (text, ""),
                };

                if !route.is_empty() && route.starts_with('/') {
                    if let Some(endpoint) = self.endpoints.get_mut(route) {
                        trace!(route, "dispatching command line");
                        endpoint.trigger(&format!("?{query}"));
                    } else {
                        warn!(route, "no endpoint registered for route");
                        self.events.on_unmatched(text);
                    }
                } else {
                    self.events.on_data(&LinePayload::Text(text.to_string()));
                }
            }
            Err(_) => {
                trace!(len = line.len(), "non-text line");
                self.events.on_data(&LinePayload::Binary(line));
            }
        }
    }
}

impl<T: Write, E: PeerEvents> Peer<T, E> {
    /// Write one line to the link (delimiter appended by the framing layer).
    pub fn send_line(&mut self, payload: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(PeerError::WriteHalfMissing)?;
        writer.send(payload)?;
        Ok(())
    }
}
