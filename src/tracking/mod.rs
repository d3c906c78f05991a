//! Head tracking
//!
//! A background thread reads tracker datagrams from a UDP socket and hands
//! decoded samples to the UI thread over a bounded channel. The tracker is
//! best effort: if nothing is listening or no packets arrive, the rig keeps
//! rendering with its last orientation.

#![allow(dead_code)]

pub mod protocol;

pub use protocol::{decode_datagram, encode_datagram, HeadSample, DATAGRAM_LEN};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

/// Default listen address, matching the common tracker output port
pub const DEFAULT_TRACKER_ADDR: &str = "127.0.0.1:4242";

const CHANNEL_CAPACITY: usize = 64;
const READ_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Invalid tracker address '{addr}': {source}")]
    Addr {
        addr: String,
        source: std::net::AddrParseError,
    },
    #[error("Failed to bind tracker socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Tracker socket error: {0}")]
    Socket(#[from] std::io::Error),
}

/// Handle to the tracker reader thread
pub struct HeadTracker {
    rx: Receiver<HeadSample>,
    addr: SocketAddr,
    last: Option<HeadSample>,
    received: u64,
}

impl HeadTracker {
    /// Bind the socket and spawn the reader thread. Fails if the address
    /// is malformed or the port cannot be bound.
    pub fn connect(addr: &str) -> Result<Self, TrackerError> {
        let parsed: SocketAddr = addr.parse().map_err(|source| TrackerError::Addr {
            addr: addr.to_string(),
            source,
        })?;
        let socket = UdpSocket::bind(parsed).map_err(|source| TrackerError::Bind {
            addr: parsed,
            source,
        })?;
        socket.set_read_timeout(Some(READ_TIMEOUT))?;
        let local = socket.local_addr()?;

        let (tx, rx) = bounded(CHANNEL_CAPACITY);
        std::thread::Builder::new()
            .name("head-tracker".to_string())
            .spawn(move || reader_loop(socket, tx))?;

        log::info!("Head tracker listening on {}", local);
        Ok(Self {
            rx,
            addr: local,
            last: None,
            received: 0,
        })
    }

    /// Drain the channel and return the newest sample, or None when no
    /// datagram arrived since the last poll.
    pub fn poll(&mut self) -> Option<HeadSample> {
        let mut newest = None;
        for sample in self.rx.try_iter() {
            self.received += 1;
            newest = Some(sample);
        }
        if newest.is_some() {
            self.last = newest;
        }
        newest
    }

    /// Address the socket actually bound to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Newest sample seen so far, surviving across empty polls
    pub fn last_sample(&self) -> Option<HeadSample> {
        self.last
    }

    pub fn samples_received(&self) -> u64 {
        self.received
    }
}

fn reader_loop(socket: UdpSocket, tx: Sender<HeadSample>) {
    let mut buf = [0u8; DATAGRAM_LEN];
    loop {
        match socket.recv_from(&mut buf) {
            Ok((len, _)) => {
                if let Some(sample) = decode_datagram(&buf[..len]) {
                    match tx.try_send(sample) {
                        Ok(()) => {}
                        // UI is behind, drop the sample
                        Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Disconnected(_)) => break,
                    }
                }
            }
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(e) => {
                log::warn!("Head tracker socket read failed: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_invalid_address_is_rejected() {
        assert!(matches!(
            HeadTracker::connect("not-an-address"),
            Err(TrackerError::Addr { .. })
        ));
    }

    #[test]
    fn test_fresh_tracker_polls_none() {
        let mut tracker = HeadTracker::connect("127.0.0.1:0").unwrap();
        assert!(tracker.poll().is_none());
        assert!(tracker.last_sample().is_none());
    }

    #[test]
    fn test_datagram_arrives_through_poll() {
        let mut tracker = HeadTracker::connect("127.0.0.1:0").unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        let data = encode_datagram(90.0, 0.0, 0.0, [0.0; 3]);

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut sample = None;
        while sample.is_none() && Instant::now() < deadline {
            sender.send_to(&data, tracker.addr()).unwrap();
            std::thread::sleep(Duration::from_millis(10));
            sample = tracker.poll();
        }

        let sample = sample.expect("no sample arrived within the deadline");
        let expected = glam::Quat::from_euler(glam::EulerRot::YXZ, 90f32.to_radians(), 0.0, 0.0);
        assert!((sample.rotation.dot(expected).abs() - 1.0).abs() < 1e-5);
        assert!(tracker.samples_received() >= 1);
        assert_eq!(tracker.last_sample(), Some(sample));
    }

    #[test]
    fn test_poll_drains_to_newest() {
        let mut tracker = HeadTracker::connect("127.0.0.1:0").unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        for yaw in [10.0, 20.0, 30.0] {
            sender
                .send_to(&encode_datagram(yaw, 0.0, 0.0, [0.0; 3]), tracker.addr())
                .unwrap();
        }

        let deadline = Instant::now() + Duration::from_secs(2);
        while tracker.samples_received() < 3 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
            tracker.poll();
        }

        assert_eq!(tracker.samples_received(), 3);
        let expected = glam::Quat::from_euler(glam::EulerRot::YXZ, 30f32.to_radians(), 0.0, 0.0);
        let last = tracker.last_sample().unwrap();
        assert!((last.rotation.dot(expected).abs() - 1.0).abs() < 1e-5);
    }
}
