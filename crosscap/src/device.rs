//! Capture device enumeration and name resolution

use std::net::IpAddr;

use pnet_datalink as datalink;
use tracing::debug;

use crosscap_core::{Error, Result};

/// Metadata for one network interface
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Interface name (e.g. "eth0", "en0")
    pub name: String,
    /// Human-readable description, where the platform provides one
    pub description: String,
    /// Addresses assigned to the interface
    pub ips: Vec<IpAddr>,
    /// Whether the interface is up
    pub is_up: bool,
    /// Whether the interface is a loopback
    pub is_loopback: bool,
}

impl DeviceInfo {
    /// Whether the interface is a sensible default capture target
    pub fn is_capture_capable(&self) -> bool {
        self.is_up && !self.is_loopback
    }
}

impl From<&datalink::NetworkInterface> for DeviceInfo {
    fn from(iface: &datalink::NetworkInterface) -> Self {
        DeviceInfo {
            name: iface.name.clone(),
            description: iface.description.clone(),
            ips: iface.ips.iter().map(|network| network.ip()).collect(),
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
        }
    }
}

/// List all network interfaces visible to the process
pub fn list_devices() -> Result<Vec<DeviceInfo>> {
    let interfaces = datalink::interfaces();
    if interfaces.is_empty() {
        return Err(Error::capture(
            "No network interfaces visible. Are you running with sufficient privileges?",
        ));
    }
    Ok(interfaces.iter().map(DeviceInfo::from).collect())
}

/// Look up one interface by name
pub fn find_device(name: &str) -> Result<DeviceInfo> {
    datalink::interfaces()
        .iter()
        .find(|iface| iface.name == name)
        .map(DeviceInfo::from)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}

/// Name of the system's default capturable device.
///
/// Asks the capture library for its default first; when the library has no
/// answer, falls back to the first up, non-loopback interface.
pub fn default_device() -> Result<String> {
    if let Ok(Some(device)) = pcap::Device::lookup() {
        debug!("Default device from capture library: {}", device.name);
        return Ok(device.name);
    }

    list_devices()?
        .into_iter()
        .find(DeviceInfo::is_capture_capable)
        .map(|device| device.name)
        .ok_or_else(|| Error::capture("No capturable device available"))
}

/// Normalize a caller-supplied device name.
///
/// `None` or an empty string selects the platform's default device; anything
/// else must name an existing interface.
pub fn resolve_name(name: Option<&str>) -> Result<String> {
    match name {
        None => default_device(),
        Some(name) if name.is_empty() => default_device(),
        Some(name) => find_device(name).map(|device| device.name),
    }
}
