//! Conversions between the capture binding's types and crosscap types

use std::time::{Duration, UNIX_EPOCH};

use pcap::{Activated, Capture};

use crosscap_core::{Error, PacketHeader, PacketView, ReadOutcome, Result};

/// Read one packet from an activated capture and translate the binding's
/// three-way status (packet / timeout / error) into a [`ReadOutcome`].
pub(crate) fn read_next<T: Activated + ?Sized>(capture: &mut Capture<T>) -> Result<ReadOutcome<'_>> {
    match capture.next_packet() {
        Ok(packet) => Ok(ReadOutcome::Packet(PacketView {
            header: header_from_pcap(packet.header),
            data: packet.data,
        })),
        Err(pcap::Error::TimeoutExpired) => Ok(ReadOutcome::TimedOut),
        Err(pcap::Error::NoMorePackets) => Err(Error::EndOfCapture),
        Err(e) => Err(Error::Capture(e.to_string())),
    }
}

pub(crate) fn header_from_pcap(header: &pcap::PacketHeader) -> PacketHeader {
    let secs = header.ts.tv_sec.max(0) as u64;
    let micros = header.ts.tv_usec.max(0) as u32;
    PacketHeader {
        timestamp: UNIX_EPOCH + Duration::new(secs, micros.saturating_mul(1_000)),
        caplen: header.caplen,
        len: header.len,
    }
}

pub(crate) fn header_to_pcap(header: &PacketHeader) -> pcap::PacketHeader {
    let since_epoch = header
        .timestamp
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    pcap::PacketHeader {
        ts: libc::timeval {
            tv_sec: since_epoch.as_secs() as _,
            tv_usec: since_epoch.subsec_micros() as _,
        },
        caplen: header.caplen,
        len: header.len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[test]
    fn test_header_conversion_round_trip() {
        let header = PacketHeader {
            timestamp: UNIX_EPOCH + Duration::new(1_234, 567_000),
            caplen: 96,
            len: 1_500,
        };

        let raw = header_to_pcap(&header);
        assert_eq!(raw.ts.tv_sec, 1_234);
        assert_eq!(raw.ts.tv_usec, 567);
        assert_eq!(raw.caplen, 96);
        assert_eq!(raw.len, 1_500);

        let back = header_from_pcap(&raw);
        assert_eq!(back, header);
    }

    #[test]
    fn test_pre_epoch_timestamp_clamps() {
        let raw = pcap::PacketHeader {
            ts: libc::timeval {
                tv_sec: -1 as _,
                tv_usec: 0,
            },
            caplen: 0,
            len: 0,
        };
        let header = header_from_pcap(&raw);
        assert_eq!(header.timestamp, SystemTime::UNIX_EPOCH);
    }
}
