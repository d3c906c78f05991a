//! Head tracker wire format
//!
//! Datagrams carry six little-endian f64 values: x, y, z in centimeters
//! followed by yaw, pitch, roll in degrees. This is the "UDP over network"
//! output format that opentrack and compatible trackers emit.

#![allow(dead_code)]

use glam::{EulerRot, Quat, Vec3};

/// Exact size of a tracker datagram in bytes
pub const DATAGRAM_LEN: usize = 48;

/// One decoded tracker sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadSample {
    /// Head orientation as a quaternion
    pub rotation: Quat,
    /// Head position in centimeters
    pub position: Vec3,
}

/// Decode one datagram. Returns None for short or oversized packets;
/// the values themselves are taken as-is.
pub fn decode_datagram(data: &[u8]) -> Option<HeadSample> {
    if data.len() != DATAGRAM_LEN {
        return None;
    }
    let mut values = [0.0f64; 6];
    for (i, chunk) in data.chunks_exact(8).enumerate() {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        values[i] = f64::from_le_bytes(bytes);
    }
    let position = Vec3::new(values[0] as f32, values[1] as f32, values[2] as f32);
    let rotation = Quat::from_euler(
        EulerRot::YXZ,
        (values[3] as f32).to_radians(),
        (values[4] as f32).to_radians(),
        (values[5] as f32).to_radians(),
    );
    Some(HeadSample { rotation, position })
}

/// Encode a datagram in the tracker's format. Used by tests and the demo
/// sender.
pub fn encode_datagram(yaw_deg: f64, pitch_deg: f64, roll_deg: f64, position: [f64; 3]) -> [u8; DATAGRAM_LEN] {
    let values = [
        position[0],
        position[1],
        position[2],
        yaw_deg,
        pitch_deg,
        roll_deg,
    ];
    let mut data = [0u8; DATAGRAM_LEN];
    for (i, value) in values.iter().enumerate() {
        data[i * 8..i * 8 + 8].copy_from_slice(&value.to_le_bytes());
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_sample() {
        let data = encode_datagram(90.0, 0.0, 0.0, [1.0, 2.0, 3.0]);
        let sample = decode_datagram(&data).unwrap();
        assert_eq!(sample.position, Vec3::new(1.0, 2.0, 3.0));
        let expected = Quat::from_euler(EulerRot::YXZ, 90f32.to_radians(), 0.0, 0.0);
        assert!((sample.rotation.dot(expected).abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_angles_decode_to_identity() {
        let data = encode_datagram(0.0, 0.0, 0.0, [0.0; 3]);
        let sample = decode_datagram(&data).unwrap();
        assert_eq!(sample.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(decode_datagram(&[0u8; 47]).is_none());
        assert!(decode_datagram(&[0u8; 49]).is_none());
        assert!(decode_datagram(&[]).is_none());
    }
}
