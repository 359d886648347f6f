//! Savefile reading through the capture handle surface

use std::path::{Path, PathBuf};

use pcap::{Capture, Linktype, Offline};
use tracing::{debug, info};

use crosscap_core::{Error, ReadOutcome, Result};

use crate::handle::CaptureHandle;
use crate::platform::{Capabilities, RawFd};
use crate::translate;

/// A capture reading packets back from a savefile
pub struct OfflineCapture {
    path: PathBuf,
    inner: Capture<Offline>,
}

impl OfflineCapture {
    /// Open a savefile for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = Capture::from_file(&path).map_err(|e| {
            Error::Capture(format!("Failed to open savefile '{}': {}", path.display(), e))
        })?;
        info!("Reading savefile {}", path.display());
        Ok(Self { path, inner })
    }

    /// Path of the savefile being read
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Link-layer type recorded in the savefile
    pub fn datalink(&self) -> Linktype {
        self.inner.get_datalink()
    }
}

impl CaptureHandle for OfflineCapture {
    fn capabilities(&self) -> Capabilities {
        // Savefiles read the same on every platform.
        Capabilities {
            poll_descriptor: false,
            nonblocking: false,
            immediate_mode: true,
        }
    }

    fn immediate_mode(&self) -> bool {
        true
    }

    fn poll_descriptor(&self) -> Option<RawFd> {
        None
    }

    fn apply_tuning(&mut self) {}

    fn set_nonblocking(&mut self, enabled: bool) -> Result<()> {
        // The capture library accepts and ignores mode changes on savefiles;
        // reads never wait on a file.
        debug!(
            "Ignoring non-blocking change ({}) on savefile {}",
            enabled,
            self.path.display()
        );
        Ok(())
    }

    fn nonblocking(&self) -> Result<bool> {
        Ok(false)
    }

    fn next_packet(&mut self) -> Result<ReadOutcome<'_>> {
        translate::read_next(&mut self.inner)
    }
}
