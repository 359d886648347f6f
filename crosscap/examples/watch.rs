//! Example: Non-blocking capture with readiness polling
//!
//! Resolves a device (the platform default when none is given), switches the
//! handle to non-blocking reads and drains packets whenever the descriptor
//! becomes readable. Note: Requires root/administrator privileges to run.
//!
//! Run with: sudo cargo run --example watch [device]

use std::time::Duration;

use crosscap::{wait_readable, CaptureConfig, CaptureHandle, LiveCapture, ReadOutcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let requested = std::env::args().nth(1);
    let device = crosscap::resolve_name(requested.as_deref())?;
    println!("Capturing on: {}", device);

    let mut capture = LiveCapture::open(&device, &CaptureConfig::default())?;
    capture.apply_tuning();
    capture.set_nonblocking(true)?;

    println!("Datalink: {:?}", capture.datalink());
    println!("Waiting for packets... (will capture 20)");
    println!();

    let mut seen = 0usize;
    while seen < 20 {
        if !wait_readable(&capture, Some(Duration::from_secs(5)))? {
            println!("(no traffic for 5s)");
            continue;
        }

        loop {
            match capture.next_packet()? {
                ReadOutcome::Packet(packet) => {
                    seen += 1;
                    println!(
                        "[{}] {} bytes (wire length {})",
                        seen,
                        packet.len(),
                        packet.header.len
                    );
                }
                ReadOutcome::TimedOut => break,
            }
        }
    }

    Ok(())
}
