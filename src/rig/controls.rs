//! Trackball controls
//!
//! Orbit-style mouse control around a target point, with inertial rotation
//! damped each frame. Each eye owns its own controller; both are fed the
//! same pointer input so they stay in lockstep.

#![allow(dead_code)]

use glam::{EulerRot, Quat, Vec3};

use super::camera::RIG_DISTANCE;

/// Rotation speed factor
pub const ROTATE_SPEED: f32 = 1.0;
/// Scroll zoom speed factor
pub const ZOOM_SPEED: f32 = 1.2;
/// Pan speed factor
pub const PAN_SPEED: f32 = 0.8;
/// Fraction of rotational velocity removed per update
pub const DAMPING: f32 = 0.3;

const MIN_DISTANCE: f32 = 50.0;
const MAX_DISTANCE: f32 = 900.0;
const PITCH_LIMIT: f32 = 1.4;

/// Pointer input for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    /// Drag movement in points since the last frame
    pub drag_delta: (f32, f32),
    /// Scroll movement, positive away from the user
    pub scroll_delta: f32,
    /// True while the secondary button drags (pan instead of rotate)
    pub panning: bool,
}

/// Tunable speed factors for a controller
#[derive(Debug, Clone, Copy)]
pub struct ControlSpeeds {
    pub rotate: f32,
    pub zoom: f32,
    pub pan: f32,
    pub damping: f32,
}

impl Default for ControlSpeeds {
    fn default() -> Self {
        Self {
            rotate: ROTATE_SPEED,
            zoom: ZOOM_SPEED,
            pan: PAN_SPEED,
            damping: DAMPING,
        }
    }
}

/// Orbit controller with rotational inertia
#[derive(Debug, Clone)]
pub struct TrackballControls {
    yaw: f32,
    pitch: f32,
    distance: f32,
    target: Vec3,
    velocity: (f32, f32),
    pub speeds: ControlSpeeds,
}

impl TrackballControls {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: RIG_DISTANCE,
            target: Vec3::ZERO,
            velocity: (0.0, 0.0),
            speeds: ControlSpeeds::default(),
        }
    }

    /// Advance one frame of input. Call once per frame even with no pointer
    /// movement so inertia keeps decaying.
    pub fn update(&mut self, pointer: &PointerState) {
        if pointer.panning {
            let (dx, dy) = pointer.drag_delta;
            let right = self.orientation() * Vec3::X;
            let up = self.orientation() * Vec3::Y;
            let factor = self.distance * 0.002 * self.speeds.pan;
            self.target -= right * dx * factor;
            self.target += up * dy * factor;
        } else {
            let (dx, dy) = pointer.drag_delta;
            self.velocity.0 += dx * self.speeds.rotate * 0.005;
            self.velocity.1 += dy * self.speeds.rotate * 0.005;
        }

        self.yaw += self.velocity.0;
        self.pitch = (self.pitch + self.velocity.1).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.velocity.0 *= 1.0 - self.speeds.damping;
        self.velocity.1 *= 1.0 - self.speeds.damping;

        if pointer.scroll_delta != 0.0 {
            let factor = 1.0 - pointer.scroll_delta * 0.1 * self.speeds.zoom;
            self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    /// Rig center position on the orbit sphere
    pub fn center_position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Orientation looking from the orbit position toward the target
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Return to the initial framing
    pub fn reset(&mut self) {
        *self = Self {
            speeds: self.speeds,
            ..Self::new()
        };
    }
}

impl Default for TrackballControls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_input_keeps_framing() {
        let mut controls = TrackballControls::new();
        let before = controls.center_position();
        controls.update(&PointerState::default());
        assert_eq!(controls.center_position(), before);
        assert_eq!(controls.orientation(), Quat::IDENTITY);
    }

    #[test]
    fn test_drag_rotates() {
        let mut controls = TrackballControls::new();
        controls.update(&PointerState {
            drag_delta: (20.0, 0.0),
            ..Default::default()
        });
        assert!(controls.orientation() != Quat::IDENTITY);
    }

    #[test]
    fn test_inertia_decays() {
        let mut controls = TrackballControls::new();
        controls.update(&PointerState {
            drag_delta: (20.0, 0.0),
            ..Default::default()
        });
        let first = controls.velocity.0.abs();
        for _ in 0..30 {
            controls.update(&PointerState::default());
        }
        assert!(controls.velocity.0.abs() < first * 0.01);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut controls = TrackballControls::new();
        for _ in 0..200 {
            controls.update(&PointerState {
                drag_delta: (0.0, 50.0),
                ..Default::default()
            });
        }
        assert!(controls.pitch <= PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut controls = TrackballControls::new();
        for _ in 0..100 {
            controls.update(&PointerState {
                scroll_delta: 10.0,
                ..Default::default()
            });
        }
        assert_eq!(controls.distance(), MIN_DISTANCE);
        for _ in 0..100 {
            controls.update(&PointerState {
                scroll_delta: -10.0,
                ..Default::default()
            });
        }
        assert_eq!(controls.distance(), MAX_DISTANCE);
    }

    #[test]
    fn test_identical_input_keeps_controllers_in_lockstep() {
        let mut a = TrackballControls::new();
        let mut b = TrackballControls::new();
        let frames = [
            PointerState {
                drag_delta: (12.0, -4.0),
                ..Default::default()
            },
            PointerState {
                scroll_delta: 1.5,
                ..Default::default()
            },
            PointerState::default(),
        ];
        for pointer in &frames {
            a.update(pointer);
            b.update(pointer);
        }
        assert_eq!(a.center_position(), b.center_position());
        assert_eq!(a.orientation(), b.orientation());
        assert_eq!(a.distance(), b.distance());
    }
}
