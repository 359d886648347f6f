//! Savefile writing

use std::path::{Path, PathBuf};

use pcap::{Capture, Linktype, Savefile};
use tracing::{debug, info};

use crosscap_core::{Error, PacketView, Result};

use crate::translate;

/// Writes captured packets out in savefile format
pub struct DumpWriter {
    path: PathBuf,
    file: Savefile,
}

impl DumpWriter {
    /// Create a savefile at `path` framed with the given link-layer type
    pub fn create<P: AsRef<Path>>(path: P, link_type: Linktype) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let dead = Capture::dead(link_type)
            .map_err(|e| Error::Capture(format!("Failed to create dead handle: {}", e)))?;
        let file = dead.savefile(&path).map_err(|e| {
            Error::Capture(format!(
                "Failed to create savefile '{}': {}",
                path.display(),
                e
            ))
        })?;
        info!("Writing savefile {}", path.display());
        Ok(Self { path, file })
    }

    /// Path of the savefile being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one packet, preserving its capture header
    pub fn write(&mut self, packet: &PacketView<'_>) {
        let header = translate::header_to_pcap(&packet.header);
        self.file.write(&pcap::Packet::new(&header, packet.data));
        debug!(
            "Wrote {} bytes to {}",
            packet.header.caplen,
            self.path.display()
        );
    }

    /// Flush buffered packets to disk
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush().map_err(|e| {
            Error::Capture(format!(
                "Failed to flush savefile '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::CaptureHandle;
    use crate::offline::OfflineCapture;
    use crosscap_core::{PacketHeader, ReadOutcome};
    use std::time::{Duration, UNIX_EPOCH};

    fn view<'a>(data: &'a [u8], caplen: u32, len: u32, micros: u64) -> PacketView<'a> {
        PacketView {
            header: PacketHeader {
                timestamp: UNIX_EPOCH + Duration::from_micros(micros),
                caplen,
                len,
            },
            data,
        }
    }

    #[test]
    fn test_create_in_missing_directory() {
        let result = DumpWriter::create("/nonexistent/dir/out.pcap", Linktype::ETHERNET);
        assert!(matches!(result, Err(Error::Capture(_))));
    }

    #[test]
    fn test_round_trip_through_offline_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round_trip.pcap");

        let first = [0x11u8; 60];
        let second = [0x22u8; 42];

        let mut writer = DumpWriter::create(&path, Linktype::ETHERNET).unwrap();
        writer.write(&view(&first, 60, 60, 1_000_069));
        // Second packet was cut short by the snapshot length.
        writer.write(&view(&second, 42, 1_500, 2_000_000));
        writer.flush().unwrap();
        drop(writer);

        let mut reader = OfflineCapture::open(&path).unwrap();

        match reader.next_packet().unwrap() {
            ReadOutcome::Packet(packet) => {
                assert_eq!(packet.data, &first);
                assert_eq!(packet.header.caplen, 60);
                assert_eq!(packet.header.len, 60);
                assert!(!packet.header.is_truncated());
                assert_eq!(
                    packet.header.timestamp,
                    UNIX_EPOCH + Duration::from_micros(1_000_069)
                );
            }
            ReadOutcome::TimedOut => panic!("expected first packet"),
        }

        match reader.next_packet().unwrap() {
            ReadOutcome::Packet(packet) => {
                assert_eq!(packet.data, &second);
                assert_eq!(packet.header.len, 1_500);
                assert!(packet.header.is_truncated());
            }
            ReadOutcome::TimedOut => panic!("expected second packet"),
        }

        assert!(matches!(reader.next_packet(), Err(Error::EndOfCapture)));
    }
}
