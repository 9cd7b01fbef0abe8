use std::io::{ErrorKind, Read};

use bytes::{Buf, Bytes, BytesMut};
use serroute_transport::LinkStream;
use tracing::{debug, trace};

use crate::codec::{decode_line, LineConfig};
use crate::error::{LineError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads complete delimited lines from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete lines
/// with the delimiter stripped.
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
    config: LineConfig,
}

impl<T: Read> LineReader<T> {
    /// Create a new line reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, LineConfig::default())
    }

    /// Create a new line reader with explicit configuration.
    pub fn with_config(inner: T, config: LineConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete line (blocking).
    ///
    /// Returns `Err(LineError::ConnectionClosed)` at EOF; a partial line
    /// buffered without its delimiter is discarded, matching readline-style
    /// parsers that only emit on a delimiter.
    pub fn read_line(&mut self) -> Result<Bytes> {
        loop {
            if let Some(line) =
                decode_line(&mut self.buf, &self.config.delimiter, self.config.max_line_len)?
            {
                trace!(len = line.len(), "decoded line");
                return Ok(line);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(LineError::Io(err)),
            };

            if read == 0 {
                return Err(LineError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Drop buffered bytes up to and including the next delimiter.
    ///
    /// Resynchronizes the stream after a framing error: the offending
    /// bytes are thrown away and reading resumes at the next line
    /// boundary. With no delimiter buffered the whole buffer is dropped.
    pub fn discard_buffered(&mut self) {
        let delimiter = &self.config.delimiter;
        match self
            .buf
            .windows(delimiter.len())
            .position(|window| window == &delimiter[..])
        {
            Some(at) => {
                debug!(discarded = at + delimiter.len(), "resyncing at delimiter");
                self.buf.advance(at + delimiter.len());
            }
            None => {
                debug!(discarded = self.buf.len(), "discarding undelimited buffer");
                self.buf.clear();
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current line reader configuration.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }
}

impl LineReader<LinkStream> {
    /// Create a line reader for [`LinkStream`] and apply the read timeout
    /// from config.
    pub fn with_config_link(inner: LinkStream, config: LineConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_line_error)?;
        Ok(Self::with_config(inner, config))
    }
}

fn transport_to_line_error(err: serroute_transport::TransportError) -> LineError {
    match err {
        serroute_transport::TransportError::Io(io) => LineError::Io(io),
        serroute_transport::TransportError::Open { source, .. }
        | serroute_transport::TransportError::Configure { source, .. } => LineError::Io(source),
        other => LineError::Io(std::io::Error::other(other.to_string())),
    }
}
