//! Filter compilation without an open capture handle
//!
//! Installing a filter on a live handle is the binding's job. Compiling one
//! with nothing open (a specific snapshot length, link-layer type and
//! netmask, no device touched) is not expressible through it, so this module
//! drives the capture library directly through its FFI binding using a dead
//! handle.

use std::ffi::{CStr, CString};
use std::fmt;
use std::os::raw::c_int;

use pcap::Linktype;
use tracing::debug;

use crosscap_core::{Error, Result};

use crate::live::DEFAULT_SNAPLEN;

/// Parameters for compiling a filter without a live handle
#[derive(Debug, Clone)]
pub struct FilterSpec {
    /// Filter expression in the capture library's syntax
    pub expression: String,
    /// Link-layer type the expression compiles against
    pub link_type: Linktype,
    /// Snapshot length assumed by the compiled program
    pub snaplen: i32,
    /// Run the library's optimizer over the program
    pub optimize: bool,
    /// IPv4 netmask for broadcast matching (0 = unknown)
    pub netmask: u32,
}

impl FilterSpec {
    /// Spec for an Ethernet capture at the default snapshot length
    pub fn new<S: Into<String>>(expression: S) -> Self {
        Self {
            expression: expression.into(),
            link_type: Linktype::ETHERNET,
            snaplen: DEFAULT_SNAPLEN,
            optimize: true,
            netmask: 0,
        }
    }
}

/// An owned compiled filter program.
///
/// Releases the capture library's program storage on drop.
pub struct FilterProgram {
    program: pcap_sys::bpf_program,
    expression: String,
}

impl FilterProgram {
    /// The expression this program was compiled from
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Number of BPF instructions in the program
    pub fn len(&self) -> usize {
        self.program.bf_len as usize
    }

    /// Whether the program contains no instructions
    pub fn is_empty(&self) -> bool {
        self.program.bf_len == 0
    }
}

impl fmt::Debug for FilterProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterProgram")
            .field("expression", &self.expression)
            .field("instructions", &self.len())
            .finish()
    }
}

impl Drop for FilterProgram {
    fn drop(&mut self) {
        unsafe { pcap_sys::pcap_freecode(&mut self.program) }
    }
}

// The instruction storage is heap-allocated by the capture library and holds
// no reference back into the handle that compiled it.
unsafe impl Send for FilterProgram {}

/// Compile a filter expression against a dead capture handle.
///
/// No live handle is required or touched; syntax errors carry the capture
/// library's diagnostic text.
pub fn compile(spec: &FilterSpec) -> Result<FilterProgram> {
    let expression = CString::new(spec.expression.as_str())
        .map_err(|_| Error::filter("expression contains an interior NUL byte"))?;

    unsafe {
        let handle = pcap_sys::pcap_open_dead(spec.link_type.0, spec.snaplen);
        if handle.is_null() {
            return Err(Error::filter("could not allocate a dead capture handle"));
        }

        let mut program: pcap_sys::bpf_program = std::mem::zeroed();
        let rc = pcap_sys::pcap_compile(
            handle,
            &mut program,
            expression.as_ptr(),
            spec.optimize as c_int,
            spec.netmask,
        );

        if rc != 0 {
            let message = CStr::from_ptr(pcap_sys::pcap_geterr(handle))
                .to_string_lossy()
                .into_owned();
            pcap_sys::pcap_close(handle);
            return Err(Error::Filter(message));
        }
        pcap_sys::pcap_close(handle);

        debug!(
            "Compiled filter '{}' ({} instructions)",
            spec.expression, program.bf_len
        );

        Ok(FilterProgram {
            program,
            expression: spec.expression.clone(),
        })
    }
}

/// Filter-expression builders for common cases
pub mod expr {
    /// Match TCP traffic on a port (either direction)
    pub fn tcp_port(port: u16) -> String {
        format!("tcp port {}", port)
    }

    /// Match UDP traffic on a port (either direction)
    pub fn udp_port(port: u16) -> String {
        format!("udp port {}", port)
    }

    /// Match traffic to or from a host
    pub fn host(addr: &str) -> String {
        format!("host {}", addr)
    }

    /// Require all of the given expressions
    pub fn all_of(parts: &[&str]) -> String {
        join(parts, " and ")
    }

    /// Require any of the given expressions
    pub fn any_of(parts: &[&str]) -> String {
        join(parts, " or ")
    }

    /// Negate an expression
    pub fn negate(part: &str) -> String {
        format!("not ({})", part)
    }

    fn join(parts: &[&str], separator: &str) -> String {
        parts
            .iter()
            .map(|part| format!("({})", part))
            .collect::<Vec<_>>()
            .join(separator)
    }
}
