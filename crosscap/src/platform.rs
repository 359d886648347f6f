//! Platform capability resolution
//!
//! Capture-library builds disagree about what an open handle can do: whether
//! it exposes a descriptor usable for readiness polling, whether non-blocking
//! reads can be toggled after activation, and whether packets can be
//! delivered without buffering delay. One backend is selected here at compile
//! time and everything else in the crate goes through it, so call sites never
//! branch on the target OS themselves.

use std::io;

/// Raw descriptor type used for readiness polling
#[cfg(unix)]
pub use std::os::unix::io::RawFd;
/// Raw descriptor type used for readiness polling
#[cfg(not(unix))]
pub type RawFd = std::os::raw::c_int;

/// What the platform backend compiled into this build can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// An open live handle exposes a pollable descriptor
    pub poll_descriptor: bool,
    /// Non-blocking reads can be toggled on an open handle
    pub nonblocking: bool,
    /// Immediate packet delivery is available
    pub immediate_mode: bool,
}

/// Capabilities of the backend selected for this build
pub fn capabilities() -> Capabilities {
    imp::CAPABILITIES
}

pub(crate) fn set_descriptor_nonblocking(fd: RawFd, enabled: bool) -> io::Result<()> {
    imp::set_descriptor_nonblocking(fd, enabled)
}

pub(crate) fn descriptor_nonblocking(fd: RawFd) -> io::Result<bool> {
    imp::descriptor_nonblocking(fd)
}

pub(crate) fn tune(fd: RawFd) -> io::Result<()> {
    imp::tune(fd)
}

#[cfg(target_os = "linux")]
use linux as imp;
#[cfg(any(
    target_os = "macos",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
use bsd as imp;
#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
use fallback as imp;

/// Descriptor flag manipulation shared by the unix-family backends. This is
/// the same mechanism the capture library itself uses to switch live handles
/// between blocking and non-blocking reads.
#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod fdflags {
    use super::RawFd;
    use std::io;

    pub fn set_nonblocking(fd: RawFd, enabled: bool) -> io::Result<()> {
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        let flags = if enabled {
            flags | libc::O_NONBLOCK
        } else {
            flags & !libc::O_NONBLOCK
        };
        if unsafe { libc::fcntl(fd, libc::F_SETFL, flags) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub fn nonblocking(fd: RawFd) -> io::Result<bool> {
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(flags & libc::O_NONBLOCK != 0)
    }
}

/// Linux: packet sockets expose a selectable descriptor, and immediate
/// delivery is requested at activation time, so no post-activation tuning is
/// needed.
#[cfg(target_os = "linux")]
mod linux {
    use super::{Capabilities, RawFd};
    use std::io;

    pub const CAPABILITIES: Capabilities = Capabilities {
        poll_descriptor: true,
        nonblocking: true,
        immediate_mode: true,
    };

    pub fn set_descriptor_nonblocking(fd: RawFd, enabled: bool) -> io::Result<()> {
        super::fdflags::set_nonblocking(fd, enabled)
    }

    pub fn descriptor_nonblocking(fd: RawFd) -> io::Result<bool> {
        super::fdflags::nonblocking(fd)
    }

    pub fn tune(_fd: RawFd) -> io::Result<()> {
        Ok(())
    }
}

/// BSD family: the BPF device buffers packets until the store buffer fills
/// or the read timeout fires, so tuning enables immediate delivery on the
/// descriptor.
#[cfg(any(
    target_os = "macos",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod bsd {
    use super::{Capabilities, RawFd};
    use std::io;

    pub const CAPABILITIES: Capabilities = Capabilities {
        poll_descriptor: true,
        nonblocking: true,
        immediate_mode: true,
    };

    pub fn set_descriptor_nonblocking(fd: RawFd, enabled: bool) -> io::Result<()> {
        super::fdflags::set_nonblocking(fd, enabled)
    }

    pub fn descriptor_nonblocking(fd: RawFd) -> io::Result<bool> {
        super::fdflags::nonblocking(fd)
    }

    pub fn tune(fd: RawFd) -> io::Result<()> {
        let enable: libc::c_uint = 1;
        if unsafe { libc::ioctl(fd, libc::BIOCIMMEDIATE, &enable) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// Conservative backend for targets where the capture build exposes no
/// pollable descriptor. Reports the missing capabilities instead of guessing.
#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
mod fallback {
    use super::{Capabilities, RawFd};
    use std::io;

    pub const CAPABILITIES: Capabilities = Capabilities {
        poll_descriptor: false,
        nonblocking: false,
        immediate_mode: false,
    };

    pub fn set_descriptor_nonblocking(_fd: RawFd, _enabled: bool) -> io::Result<()> {
        Err(unsupported())
    }

    pub fn descriptor_nonblocking(_fd: RawFd) -> io::Result<bool> {
        Err(unsupported())
    }

    pub fn tune(_fd: RawFd) -> io::Result<()> {
        Ok(())
    }

    fn unsupported() -> io::Error {
        io::Error::new(
            io::ErrorKind::Unsupported,
            "descriptor control is not available on this platform",
        )
    }
}
