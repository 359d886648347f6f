//! Readiness polling on a capture handle's descriptor

use std::time::Duration;

use crosscap_core::{Error, Result};

use crate::handle::CaptureHandle;
use crate::platform::RawFd;

/// Wait until the handle's descriptor is readable.
///
/// Returns `false` when the timeout elapses first; `None` waits
/// indefinitely. Fails with [`Error::Unsupported`] when the handle exposes no
/// pollable descriptor.
pub fn wait_readable<H: CaptureHandle + ?Sized>(
    handle: &H,
    timeout: Option<Duration>,
) -> Result<bool> {
    let Some(fd) = handle.poll_descriptor() else {
        return Err(Error::Unsupported("readiness polling"));
    };
    wait_descriptor_readable(fd, timeout)
}

#[cfg(unix)]
fn wait_descriptor_readable(fd: RawFd, timeout: Option<Duration>) -> Result<bool> {
    let timeout_ms = match timeout {
        Some(timeout) => timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int,
        None => -1,
    };

    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    loop {
        let rc = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err.into());
        }
        return Ok(rc > 0 && fds.revents & libc::POLLIN != 0);
    }
}

#[cfg(not(unix))]
fn wait_descriptor_readable(_fd: RawFd, _timeout: Option<Duration>) -> Result<bool> {
    Err(Error::Unsupported("readiness polling"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Capabilities;
    use crosscap_core::ReadOutcome;

    struct DescriptorHandle {
        descriptor: Option<RawFd>,
    }

    impl CaptureHandle for DescriptorHandle {
        fn capabilities(&self) -> Capabilities {
            crate::platform::capabilities()
        }

        fn immediate_mode(&self) -> bool {
            false
        }

        fn poll_descriptor(&self) -> Option<RawFd> {
            self.descriptor
        }

        fn apply_tuning(&mut self) {}

        fn set_nonblocking(&mut self, _enabled: bool) -> Result<()> {
            Err(Error::Unsupported("test handle"))
        }

        fn nonblocking(&self) -> Result<bool> {
            Err(Error::Unsupported("test handle"))
        }

        fn next_packet(&mut self) -> Result<ReadOutcome<'_>> {
            Ok(ReadOutcome::TimedOut)
        }
    }

    #[test]
    fn test_no_descriptor_is_unsupported() {
        let handle = DescriptorHandle { descriptor: None };
        assert!(matches!(
            wait_readable(&handle, Some(Duration::ZERO)),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_readable_and_timeout() {
        let mut fds = [0 as RawFd; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let handle = DescriptorHandle {
            descriptor: Some(fds[0]),
        };

        // Nothing written yet: a zero timeout reports not-readable.
        assert!(!wait_readable(&handle, Some(Duration::ZERO)).unwrap());

        let byte = [0u8];
        assert_eq!(
            unsafe { libc::write(fds[1], byte.as_ptr() as *const _, 1) },
            1
        );
        assert!(wait_readable(&handle, Some(Duration::from_secs(5))).unwrap());

        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }
}
