use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{LineError, Result};

/// Default line delimiter.
pub const DEFAULT_DELIMITER: &[u8] = b"\n";

/// Default maximum line length: 64 KiB.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Configuration for the line codec.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Delimiter terminating each line. Default: `\n`. May be multi-byte
    /// (e.g. `\r\n`); it is never part of the decoded line.
    pub delimiter: Vec<u8>,
    /// Maximum bytes buffered while waiting for a delimiter. Default: 64 KiB.
    pub max_line_len: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_vec(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl LineConfig {
    /// Config with an explicit delimiter and defaults elsewhere.
    pub fn with_delimiter(delimiter: impl Into<Vec<u8>>) -> Self {
        Self {
            delimiter: delimiter.into(),
            ..Self::default()
        }
    }
}

/// Decode one line from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete line yet.
/// On success, consumes the line and its delimiter from the buffer; the
/// returned bytes exclude the delimiter.
pub fn decode_line(src: &mut BytesMut, delimiter: &[u8], max_line_len: usize) -> Result<Option<Bytes>> {
    debug_assert!(!delimiter.is_empty(), "delimiter must not be empty");

    match find(src, delimiter) {
        Some(at) => {
            if at > max_line_len {
                return Err(LineError::LineTooLong {
                    size: at,
                    max: max_line_len,
                });
            }
            let line = src.split_to(at).freeze();
            src.advance(delimiter.len());
            Ok(Some(line))
        }
        None => {
            // A tail shorter than the delimiter may still complete a match,
            // so only full undelimited bytes count against the cap.
            let undelimited = src.len().saturating_sub(delimiter.len() - 1);
            if undelimited > max_line_len {
                return Err(LineError::LineTooLong {
                    size: undelimited,
                    max: max_line_len,
                });
            }
            Ok(None) // Need more data
        }
    }
}

/// Encode one line into the wire format (payload followed by delimiter).
///
/// Fails if the payload itself contains the delimiter — that would frame
/// as two lines on the receiving side.
pub fn encode_line(payload: &[u8], delimiter: &[u8], dst: &mut BytesMut) -> Result<()> {
    if let Some(offset) = find_slice(payload, delimiter) {
        return Err(LineError::DelimiterInPayload { offset });
    }
    dst.reserve(payload.len() + delimiter.len());
    dst.put_slice(payload);
    dst.put_slice(delimiter);
    Ok(())
}

fn find(haystack: &BytesMut, needle: &[u8]) -> Option<usize> {
    find_slice(haystack.as_ref(), needle)
}

fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
