//! Crosscap Core Library
//!
//! This crate provides the shared error type and packet representations
//! used by the crosscap capture portability layer.

pub mod error;
pub mod packet;

// Re-export commonly used types
pub use error::{Error, Result};
pub use packet::{Packet, PacketHeader, PacketView, ReadOutcome};
