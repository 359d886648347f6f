//! Live capture handles

use pcap::{Active, Capture, Linktype};
use tracing::{debug, info, warn};

use crosscap_core::{Error, ReadOutcome, Result};

use crate::handle::CaptureHandle;
use crate::platform::{self, Capabilities, RawFd};
use crate::translate;

#[cfg(unix)]
use std::os::unix::io::AsRawFd;

/// Default snapshot length (maximum bytes per packet)
pub const DEFAULT_SNAPLEN: i32 = 65535;

/// Default read timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: i32 = 1000;

/// Configuration for opening a live capture
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Maximum bytes to capture per packet
    pub snaplen: i32,
    /// Read timeout in milliseconds
    pub timeout_ms: i32,
    /// Enable promiscuous mode
    pub promiscuous: bool,
    /// Kernel buffer size (0 = platform default)
    pub buffer_size: i32,
    /// Request immediate packet delivery
    pub immediate_mode: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            snaplen: DEFAULT_SNAPLEN,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            promiscuous: true,
            buffer_size: 0,
            immediate_mode: true,
        }
    }
}

/// An activated live capture on one network device
pub struct LiveCapture {
    device: String,
    inner: Capture<Active>,
    // Immediate delivery is fixed at activation time; the binding cannot
    // report it afterwards, so the handle remembers what it asked for.
    immediate: bool,
}

impl LiveCapture {
    /// Open and activate a capture on the named device
    pub fn open(device: &str, config: &CaptureConfig) -> Result<Self> {
        debug!("Opening capture on {} with {:?}", device, config);

        let immediate = config.immediate_mode && platform::capabilities().immediate_mode;

        let mut inactive = Capture::from_device(device)
            .map_err(|e| Error::Capture(format!("Failed to create capture on '{}': {}", device, e)))?
            .promisc(config.promiscuous)
            .snaplen(config.snaplen)
            .timeout(config.timeout_ms)
            .immediate_mode(immediate);

        if config.buffer_size > 0 {
            inactive = inactive.buffer_size(config.buffer_size);
        }

        let inner = inactive
            .open()
            .map_err(|e| Error::Capture(format!("Failed to open capture on '{}': {}", device, e)))?;

        info!("Capture open on {}", device);

        Ok(Self {
            device: device.to_string(),
            inner,
            immediate,
        })
    }

    /// Open a capture on the platform's default device
    pub fn open_default(config: &CaptureConfig) -> Result<Self> {
        let device = crate::device::default_device()?;
        Self::open(&device, config)
    }

    /// Name of the device this capture reads from
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Link-layer type of the capture
    pub fn datalink(&self) -> Linktype {
        self.inner.get_datalink()
    }

    /// Compile and install a filter expression on the handle
    pub fn apply_filter(&mut self, expression: &str, optimize: bool) -> Result<()> {
        self.inner
            .filter(expression, optimize)
            .map_err(|e| Error::Filter(format!("'{}': {}", expression, e)))?;
        debug!("Applied filter on {}: {}", self.device, expression);
        Ok(())
    }
}

impl CaptureHandle for LiveCapture {
    fn capabilities(&self) -> Capabilities {
        platform::capabilities()
    }

    fn immediate_mode(&self) -> bool {
        self.immediate
    }

    fn poll_descriptor(&self) -> Option<RawFd> {
        #[cfg(unix)]
        {
            Some(self.inner.as_raw_fd())
        }
        #[cfg(not(unix))]
        {
            None
        }
    }

    fn apply_tuning(&mut self) {
        let Some(fd) = self.poll_descriptor() else {
            debug!("No descriptor to tune on {}", self.device);
            return;
        };
        if let Err(e) = platform::tune(fd) {
            warn!("Delivery tuning failed on {}: {}", self.device, e);
        }
    }

    fn set_nonblocking(&mut self, enabled: bool) -> Result<()> {
        let fd = self
            .poll_descriptor()
            .ok_or(Error::Unsupported("non-blocking mode"))?;
        platform::set_descriptor_nonblocking(fd, enabled).map_err(|e| {
            Error::Capture(format!(
                "Failed to change blocking mode on '{}': {}",
                self.device, e
            ))
        })?;
        debug!("Non-blocking mode on {}: {}", self.device, enabled);
        Ok(())
    }

    fn nonblocking(&self) -> Result<bool> {
        let fd = self
            .poll_descriptor()
            .ok_or(Error::Unsupported("non-blocking mode"))?;
        platform::descriptor_nonblocking(fd).map_err(|e| {
            Error::Capture(format!(
                "Failed to query blocking mode on '{}': {}",
                self.device, e
            ))
        })
    }

    fn next_packet(&mut self) -> Result<ReadOutcome<'_>> {
        translate::read_next(&mut self.inner)
    }
}
