//! Cross-platform capture handle adaptation
//!
//! This crate puts one uniform surface over the system packet capture
//! library, hiding the places where real-world builds disagree:
//!
//! - **Handle surface**: one trait covering live and savefile captures
//!   (pollable descriptor, blocking mode, delivery tuning, packet reads)
//! - **Platform capabilities**: descriptor polling, non-blocking control and
//!   immediate delivery resolved once per target, not per call site
//! - **Device resolution**: default-device lookup and name normalization
//! - **Standalone filters**: compile filter expressions without opening a
//!   device
//!
//! ## Example
//!
//! ```no_run
//! use crosscap::{CaptureConfig, CaptureHandle, LiveCapture, ReadOutcome};
//!
//! # fn main() -> crosscap::Result<()> {
//! let device = crosscap::resolve_name(None)?;
//! let mut capture = LiveCapture::open(&device, &CaptureConfig::default())?;
//! capture.apply_tuning();
//! capture.set_nonblocking(true)?;
//!
//! loop {
//!     match capture.next_packet()? {
//!         ReadOutcome::Packet(packet) => println!("{} bytes", packet.len()),
//!         ReadOutcome::TimedOut => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod device;
pub mod dump;
pub mod filter;
pub mod handle;
pub mod live;
pub mod offline;
pub mod platform;
pub mod poll;

mod translate;

// Re-export main types
pub use device::{default_device, find_device, list_devices, resolve_name, DeviceInfo};
pub use dump::DumpWriter;
pub use filter::{compile, FilterProgram, FilterSpec};
pub use handle::CaptureHandle;
pub use live::{CaptureConfig, LiveCapture, DEFAULT_SNAPLEN, DEFAULT_TIMEOUT_MS};
pub use offline::OfflineCapture;
pub use platform::{capabilities, Capabilities, RawFd};
pub use poll::wait_readable;

pub use crosscap_core::{Error, Packet, PacketHeader, PacketView, ReadOutcome, Result};

/// Link-layer type, re-exported from the capture binding
pub use pcap::Linktype;
