use std::cell::Cell;
use std::io::{Read, Write};
use std::time::Duration;

use crate::error::Result;

/// A connected serial byte stream — implements Read + Write.
///
/// This is the fundamental I/O type returned by transport operations.
/// On Unix, this wraps a file descriptor for an opened character device
/// (or any file-like object, which is how tests inject FIFOs).
pub struct LinkStream {
    inner: LinkStreamInner,
    read_timeout: Cell<Option<Duration>>,
    write_timeout: Cell<Option<Duration>>,
}

enum LinkStreamInner {
    #[cfg(unix)]
    Device(std::fs::File),
}

impl Read for LinkStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Device(file) => {
                if let Some(timeout) = self.read_timeout.get() {
                    wait_ready(file, libc::POLLIN, timeout)?;
                }
                file.read(buf)
            }
        }
    }
}

impl Write for LinkStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Device(file) => {
                if let Some(timeout) = self.write_timeout.get() {
                    wait_ready(file, libc::POLLOUT, timeout)?;
                }
                file.write(buf)
            }
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Device(file) => file.flush(),
        }
    }
}

impl LinkStream {
    /// Create a LinkStream from an already-opened device file.
    #[cfg(unix)]
    pub(crate) fn from_device(file: std::fs::File) -> Self {
        Self {
            inner: LinkStreamInner::Device(file),
            read_timeout: Cell::new(None),
            write_timeout: Cell::new(None),
        }
    }

    /// Set read timeout on the stream. `None` blocks indefinitely.
    ///
    /// Enforced with `poll(2)` before each read, so it works uniformly for
    /// ttys, FIFOs, and sockets wrapped in a device file.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.read_timeout.set(timeout);
        Ok(())
    }

    /// Set write timeout on the stream. `None` blocks indefinitely.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.write_timeout.set(timeout);
        Ok(())
    }

    /// Try to clone this stream (creates a new file descriptor).
    ///
    /// Timeouts are per-handle and carried over to the clone.
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            #[cfg(unix)]
            LinkStreamInner::Device(file) => {
                let cloned = file.try_clone()?;
                let stream = Self::from_device(cloned);
                stream.read_timeout.set(self.read_timeout.get());
                stream.write_timeout.set(self.write_timeout.get());
                Ok(stream)
            }
        }
    }
}

/// Wait until `fd` is ready for `events` or the timeout elapses.
///
/// Returns `ErrorKind::TimedOut` on expiry so callers can distinguish an
/// idle link from a closed one (a closed link reads 0 bytes instead).
#[cfg(unix)]
fn wait_ready(file: &std::fs::File, events: libc::c_short, timeout: Duration) -> std::io::Result<()> {
    use std::os::fd::AsRawFd;

    let mut pfd = libc::pollfd {
        fd: file.as_raw_fd(),
        events,
        revents: 0,
    };
    let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);

    // SAFETY: `pfd` is a valid, writable pollfd for the duration of the call
    // and the descriptor is owned by `file`, which outlives it.
    let rc = unsafe { libc::poll(&mut pfd, 1, millis) };

    if rc < 0 {
        return Err(std::io::Error::last_os_error());
    }
    if rc == 0 {
        return Err(std::io::Error::from(std::io::ErrorKind::TimedOut));
    }
    Ok(())
}

impl std::fmt::Debug for LinkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            #[cfg(unix)]
            LinkStreamInner::Device(_) => f
                .debug_struct("LinkStream")
                .field("type", &"device")
                .field("read_timeout", &self.read_timeout.get())
                .finish(),
        }
    }
}
