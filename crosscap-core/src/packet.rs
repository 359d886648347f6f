//! Packet representations shared by all capture handle kinds

use std::time::SystemTime;

/// Metadata recorded by the capture library for one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// When the packet was captured
    pub timestamp: SystemTime,
    /// Bytes actually captured (limited by the snapshot length)
    pub caplen: u32,
    /// Original length of the packet on the wire
    pub len: u32,
}

impl PacketHeader {
    /// Whether the snapshot length cut the packet short
    pub fn is_truncated(&self) -> bool {
        self.len > self.caplen
    }
}

/// A captured packet borrowed from the handle's buffer.
///
/// The capture library reuses its buffer across reads, so the view is only
/// valid until the next read on the same handle. Use [`PacketView::to_owned`]
/// to keep a packet longer.
#[derive(Debug, Clone, Copy)]
pub struct PacketView<'a> {
    /// Capture metadata
    pub header: PacketHeader,
    /// Captured bytes, `header.caplen` long
    pub data: &'a [u8],
}

impl PacketView<'_> {
    /// Captured length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the view carries no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy the view into an owned [`Packet`]
    pub fn to_owned(&self) -> Packet {
        Packet {
            header: self.header,
            data: self.data.to_vec(),
        }
    }
}

/// An owned captured packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Capture metadata
    pub header: PacketHeader,
    /// Captured bytes
    pub data: Vec<u8>,
}

impl Packet {
    /// Borrow the packet back as a view
    pub fn as_view(&self) -> PacketView<'_> {
        PacketView {
            header: self.header,
            data: &self.data,
        }
    }
}

/// Outcome of one read on a capture handle.
///
/// Errors and end-of-capture are reported through `Result`, so a successful
/// read is either a packet or a timeout tick.
#[derive(Debug)]
pub enum ReadOutcome<'a> {
    /// A packet was delivered
    Packet(PacketView<'a>),
    /// The read timed out, or no packet was ready in non-blocking mode
    TimedOut,
}

impl ReadOutcome<'_> {
    /// Whether this outcome is a timeout tick
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReadOutcome::TimedOut)
    }
}
