use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::LinkStream;

/// Serial character device transport.
///
/// Opens a device node (e.g. `/dev/ttyS0`, `/dev/ttyUSB0`), applies raw-mode
/// termios settings at the requested baud rate, and returns a [`LinkStream`].
/// Non-tty paths (FIFOs, regular files) are opened as-is with no line
/// configuration, which is what tests and loopback setups rely on.
pub struct SerialDevice;

impl SerialDevice {
    /// Default baud rate used when the caller does not specify one.
    pub const DEFAULT_BAUD_RATE: u32 = 9_600;

    /// Open a serial device at the given baud rate (blocking I/O).
    pub fn open(path: impl AsRef<Path>, baud_rate: u32) -> Result<LinkStream> {
        let path = path.as_ref().to_path_buf();

        // Validate the baud rate before touching the device.
        let speed = baud_to_speed(baud_rate).ok_or(TransportError::UnsupportedBaudRate(baud_rate))?;

        let file = open_options()
            .open(&path)
            .map_err(|e| TransportError::Open {
                path: path.clone(),
                source: e,
            })?;

        // SAFETY: the descriptor is open and owned by `file` for the call.
        let is_tty = unsafe { libc::isatty(file.as_raw_fd()) } == 1;
        if is_tty {
            configure_raw(&file, speed, &path)?;
            info!(?path, baud_rate, "opened serial device");
        } else {
            debug!(?path, "path is not a tty; skipping line configuration");
        }

        Ok(LinkStream::from_device(file))
    }
}

#[cfg(unix)]
fn open_options() -> std::fs::OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = std::fs::OpenOptions::new();
    // O_NOCTTY: opening the device must not make it our controlling terminal.
    options.read(true).write(true).custom_flags(libc::O_NOCTTY);
    options
}

/// Put the descriptor in raw mode at the given speed.
///
/// Raw mode disables echo, line editing, and CR/NL translation — the framing
/// layer owns delimiters, so the kernel must not rewrite them.
#[cfg(unix)]
fn configure_raw(file: &std::fs::File, speed: libc::speed_t, path: &Path) -> Result<()> {
    let fd = file.as_raw_fd();
    let configure_err = |path: &Path| TransportError::Configure {
        path: path.to_path_buf(),
        source: std::io::Error::last_os_error(),
    };

    // SAFETY: `termios` is a plain-old-data struct fully initialized by
    // tcgetattr before any field is read; `fd` is an open tty descriptor.
    unsafe {
        let mut termios = std::mem::zeroed::<libc::termios>();
        if libc::tcgetattr(fd, &mut termios) != 0 {
            return Err(configure_err(path));
        }

        libc::cfmakeraw(&mut termios);
        if libc::cfsetispeed(&mut termios, speed) != 0
            || libc::cfsetospeed(&mut termios, speed) != 0
        {
            return Err(configure_err(path));
        }

        // Blocking single-byte reads; timeouts are layered on with poll(2).
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        if libc::tcsetattr(fd, libc::TCSANOW, &termios) != 0 {
            return Err(configure_err(path));
        }
        // Drop whatever was buffered under the previous line discipline.
        if libc::tcflush(fd, libc::TCIOFLUSH) != 0 {
            return Err(configure_err(path));
        }
    }

    Ok(())
}

/// Map a numeric baud rate to its termios speed constant.
fn baud_to_speed(baud_rate: u32) -> Option<libc::speed_t> {
    let speed = match baud_rate {
        1_200 => libc::B1200,
        2_400 => libc::B2400,
        4_800 => libc::B4800,
        9_600 => libc::B9600,
        19_200 => libc::B19200,
        38_400 => libc::B38400,
        57_600 => libc::B57600,
        115_200 => libc::B115200,
        230_400 => libc::B230400,
        #[cfg(target_os = "linux")]
        460_800 => libc::B460800,
        #[cfg(target_os = "linux")]
        921_600 => libc::B921600,
        _ => return None,
    };
    Some(speed)
}
