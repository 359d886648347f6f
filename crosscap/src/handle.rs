//! The uniform capture handle surface

use crosscap_core::{ReadOutcome, Result};

use crate::platform::{Capabilities, RawFd};

/// Uniform surface over an open capture handle.
///
/// Capture-library implementations disagree on how (and whether) a handle
/// reports a pollable descriptor, toggles non-blocking reads, or delivers
/// packets immediately. Implementations of this trait translate those
/// differences into one contract so callers never branch on platform or
/// handle kind. The trait is also the seam for exercising callers against a
/// controllable stand-in.
pub trait CaptureHandle {
    /// What the backend serving this handle can do
    fn capabilities(&self) -> Capabilities;

    /// Whether packets are delivered to this handle without buffering delay
    fn immediate_mode(&self) -> bool;

    /// Descriptor usable for readiness polling, or `None` when the platform
    /// or handle kind has none
    fn poll_descriptor(&self) -> Option<RawFd>;

    /// Apply platform-specific delivery tuning to the handle.
    ///
    /// Tuning failures are logged and swallowed; a handle that cannot be
    /// tuned still captures, just with the platform's default buffering.
    fn apply_tuning(&mut self);

    /// Switch the handle between blocking and non-blocking reads
    fn set_nonblocking(&mut self, enabled: bool) -> Result<()>;

    /// Current blocking mode of the handle
    fn nonblocking(&self) -> Result<bool>;

    /// Read the next packet.
    ///
    /// Returns [`ReadOutcome::Packet`] when a packet was delivered and
    /// [`ReadOutcome::TimedOut`] when the read timeout fired or no packet was
    /// ready in non-blocking mode. Capture errors and source exhaustion
    /// surface as errors; reads are never retried internally.
    fn next_packet(&mut self) -> Result<ReadOutcome<'_>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosscap_core::{Error, PacketHeader, PacketView};
    use std::collections::VecDeque;
    use std::time::SystemTime;

    /// Scriptable stand-in for a capture handle on a simulated platform.
    struct FakeHandle {
        caps: Capabilities,
        immediate: bool,
        descriptor: Option<RawFd>,
        nonblocking: bool,
        queue: VecDeque<Vec<u8>>,
        failed: bool,
        current: Option<Vec<u8>>,
    }

    impl FakeHandle {
        fn new(caps: Capabilities) -> Self {
            Self {
                caps,
                immediate: caps.immediate_mode,
                descriptor: if caps.poll_descriptor { Some(7) } else { None },
                nonblocking: false,
                queue: VecDeque::new(),
                failed: false,
                current: None,
            }
        }

        fn push_packet(&mut self, data: &[u8]) {
            self.queue.push_back(data.to_vec());
        }
    }

    const FULL: Capabilities = Capabilities {
        poll_descriptor: true,
        nonblocking: true,
        immediate_mode: true,
    };

    const BARE: Capabilities = Capabilities {
        poll_descriptor: false,
        nonblocking: false,
        immediate_mode: false,
    };

    impl CaptureHandle for FakeHandle {
        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        fn immediate_mode(&self) -> bool {
            self.immediate
        }

        fn poll_descriptor(&self) -> Option<RawFd> {
            self.descriptor
        }

        fn apply_tuning(&mut self) {}

        fn set_nonblocking(&mut self, enabled: bool) -> Result<()> {
            if !self.caps.nonblocking {
                return Err(Error::Unsupported("non-blocking mode"));
            }
            self.nonblocking = enabled;
            Ok(())
        }

        fn nonblocking(&self) -> Result<bool> {
            if !self.caps.nonblocking {
                return Err(Error::Unsupported("non-blocking mode"));
            }
            Ok(self.nonblocking)
        }

        fn next_packet(&mut self) -> Result<ReadOutcome<'_>> {
            if self.failed {
                return Err(Error::capture("handle is closed"));
            }
            match self.queue.pop_front() {
                Some(data) => {
                    self.current = Some(data);
                    let data = self.current.as_deref().unwrap();
                    Ok(ReadOutcome::Packet(PacketView {
                        header: PacketHeader {
                            timestamp: SystemTime::now(),
                            caplen: data.len() as u32,
                            len: data.len() as u32,
                        },
                        data,
                    }))
                }
                None => Ok(ReadOutcome::TimedOut),
            }
        }
    }

    #[test]
    fn test_immediate_follows_backend() {
        let handle = FakeHandle::new(BARE);
        assert!(!handle.immediate_mode());

        let handle = FakeHandle::new(FULL);
        assert!(handle.immediate_mode());
    }

    #[test]
    fn test_nonblocking_round_trip() {
        let mut handle = FakeHandle::new(FULL);
        assert!(!handle.nonblocking().unwrap());

        handle.set_nonblocking(true).unwrap();
        assert!(handle.nonblocking().unwrap());

        handle.set_nonblocking(false).unwrap();
        assert!(!handle.nonblocking().unwrap());
    }

    #[test]
    fn test_nonblocking_unsupported_backend() {
        let mut handle = FakeHandle::new(BARE);
        assert!(matches!(
            handle.set_nonblocking(true),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(handle.nonblocking(), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_read_outcomes() {
        let mut handle = FakeHandle::new(FULL);
        handle.set_nonblocking(true).unwrap();

        // Nothing queued: a timeout tick, not an error.
        assert!(handle.next_packet().unwrap().is_timeout());

        handle.push_packet(&[0xaa, 0xbb, 0xcc]);
        match handle.next_packet().unwrap() {
            ReadOutcome::Packet(view) => {
                assert_eq!(view.data, &[0xaa, 0xbb, 0xcc]);
                assert_eq!(view.header.caplen, 3);
            }
            ReadOutcome::TimedOut => panic!("expected a packet"),
        }

        handle.failed = true;
        assert!(matches!(handle.next_packet(), Err(Error::Capture(_))));
    }

    #[test]
    fn test_missing_poll_descriptor_is_none() {
        let handle = FakeHandle::new(BARE);
        assert_eq!(handle.poll_descriptor(), None);

        let handle = FakeHandle::new(FULL);
        assert!(handle.poll_descriptor().is_some());
    }
}
