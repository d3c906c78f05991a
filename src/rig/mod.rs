//! Stereo rig
//!
//! The rig owns the two eye cameras, their trackball controllers, the
//! scene pair and the persisted eye separation. Each frame it applies head
//! tracking and pointer input to both eyes and renders left then right
//! through an [`EyeSink`].

#![allow(dead_code)]

pub mod camera;
pub mod controls;

pub use camera::{EyeCamera, EYE_DISTANCE, EYE_FAR, EYE_FOV_DEG, EYE_NEAR, RIG_DISTANCE};
pub use controls::{ControlSpeeds, PointerState, TrackballControls};

use glam::Vec3;
use std::time::Instant;

use crate::prefs::{parse_px, PreferenceStore};
use crate::scene::{instance_panel, BillboardId, PanelSource, Scene, ScenePair};
use crate::trace::TraceLog;
use crate::tracking::HeadSample;

/// Units added or removed per separation keypress
pub const SEPARATION_STEP: i32 = 2;
/// Separation applied when no stored preference exists
pub const DEFAULT_EYE_SEPARATION: i32 = 44;
/// Preference name for the persisted separation
pub const EYE_SEPARATION_PREF: &str = "eyeSeparation";
/// Lifetime of the stored separation preference
pub const SEPARATION_TTL_DAYS: i64 = 365;

/// Which eye a render call is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

/// Receives one render call per eye per frame, left before right
pub trait EyeSink {
    fn render_eye(&mut self, eye: Eye, scene: &Scene, camera: &EyeCamera);
}

/// Everything a frame tick consumes
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Latest head tracker sample, if one arrived since the last frame
    pub head: Option<HeadSample>,
    pub pointer: PointerState,
    /// True while the mouse-control toggle is on
    pub mouse_control: bool,
}

/// On-screen placement of the two eye regions.
///
/// The left region is offset from the left viewport edge by the separation
/// and the right region from the right edge. Measuring each from its own
/// edge is deliberate; offsetting both from the left would double the
/// overlap shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskLayout {
    /// Size of each eye region in points
    pub eye_size: (f32, f32),
    /// Top-left corner of the left region
    pub left_pos: (f32, f32),
    /// Top-left corner of the right region
    pub right_pos: (f32, f32),
}

/// Owner of the stereo cameras, controls, scenes and separation state
pub struct StereoRig {
    left_camera: EyeCamera,
    right_camera: EyeCamera,
    left_controls: TrackballControls,
    right_controls: TrackballControls,
    pub scenes: ScenePair,
    panel_handles: (BillboardId, BillboardId),
    store: PreferenceStore,
    separation: i32,
    viewport: (f32, f32),
    running: bool,
    frames: u64,
    last_tick: Option<Instant>,
}

impl StereoRig {
    /// Build the rig: cameras on either side of the rig center, one panel
    /// billboard instanced into each eye scene, separation restored from
    /// the preference store. The frame loop starts paused; call
    /// [`StereoRig::start`].
    pub fn new(
        viewport: (f32, f32),
        source: &PanelSource,
        store: PreferenceStore,
        trace: &mut TraceLog,
    ) -> Self {
        let aspect = (viewport.0 * 0.5) / viewport.1;
        let mut scenes = ScenePair::default();
        let panel_handles = instance_panel(source, &mut scenes);
        let mut rig = Self {
            left_camera: EyeCamera::new(Vec3::new(-EYE_DISTANCE, 0.0, RIG_DISTANCE), aspect),
            right_camera: EyeCamera::new(Vec3::new(EYE_DISTANCE, 0.0, RIG_DISTANCE), aspect),
            left_controls: TrackballControls::new(),
            right_controls: TrackballControls::new(),
            scenes,
            panel_handles,
            store,
            separation: DEFAULT_EYE_SEPARATION,
            viewport,
            running: false,
            frames: 0,
            last_tick: None,
        };
        rig.restore_separation(trace);
        rig
    }

    fn restore_separation(&mut self, trace: &mut TraceLog) {
        let stored = self.store.get(EYE_SEPARATION_PREF);
        self.separation = if stored.is_empty() {
            DEFAULT_EYE_SEPARATION
        } else {
            let parsed = parse_px(&stored);
            let trimmed = stored.trim();
            if parsed == 0 && trimmed != "0" && trimmed != "0px" {
                log::warn!("Ignoring malformed eye separation value {:?}", stored);
                DEFAULT_EYE_SEPARATION
            } else {
                parsed
            }
        };
        // Zero delta re-persists the restored value, restarting the expiry
        self.adjust_eye_separation(0, trace);
    }

    /// Accumulate `delta` into the separation, persist the new value and
    /// log it to the trace. Values are not clamped.
    pub fn adjust_eye_separation(&mut self, delta: i32, trace: &mut TraceLog) {
        self.separation += delta;
        self.store.set(
            EYE_SEPARATION_PREF,
            &self.separation.to_string(),
            SEPARATION_TTL_DAYS,
        );
        trace.trace(format!("EyeSeparation:{}", self.separation));
    }

    /// Current placement of the eye regions for the current viewport and
    /// separation.
    pub fn mask_layout(&self) -> MaskLayout {
        let (width, height) = self.viewport;
        let eye_width = width * 0.5;
        let sep = self.separation as f32;
        MaskLayout {
            eye_size: (eye_width, height),
            left_pos: (sep, 0.0),
            right_pos: (width - eye_width - sep, 0.0),
        }
    }

    /// Advance one frame: apply the head sample (if any) to both cameras,
    /// run the trackball controllers when mouse control is on, then render
    /// the left eye and the right eye in that order.
    pub fn frame_tick(&mut self, input: &FrameInput, sink: &mut dyn EyeSink) {
        if let Some(sample) = input.head {
            self.left_camera.set_orientation(sample.rotation);
            self.right_camera.set_orientation(sample.rotation);
            self.apply_separation_axis();
        }

        if input.mouse_control {
            self.left_controls.update(&input.pointer);
            self.right_controls.update(&input.pointer);
            self.apply_controls();
        }

        sink.render_eye(Eye::Left, &self.scenes.left, &self.left_camera);
        sink.render_eye(Eye::Right, &self.scenes.right, &self.right_camera);

        self.frames += 1;
        self.last_tick = Some(Instant::now());
    }

    /// Re-derive the eye positions from the shared orientation: center
    /// point stays put, eyes sit either side of it along the oriented
    /// X axis.
    fn apply_separation_axis(&mut self) {
        let center = (self.left_camera.position() + self.right_camera.position()) * 0.5;
        let axis = self.left_camera.orientation() * Vec3::X;
        self.left_camera.set_position(center - axis * EYE_DISTANCE);
        self.right_camera.set_position(center + axis * EYE_DISTANCE);
    }

    /// Copy each controller's framing onto its camera, offset sideways by
    /// the eye distance.
    fn apply_controls(&mut self) {
        let orientation = self.left_controls.orientation();
        let axis = orientation * Vec3::X;
        self.left_camera.set_orientation(orientation);
        self.right_camera.set_orientation(self.right_controls.orientation());
        self.left_camera
            .set_position(self.left_controls.center_position() - axis * EYE_DISTANCE);
        self.right_camera
            .set_position(self.right_controls.center_position() + axis * EYE_DISTANCE);
    }

    /// Resume the frame loop
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Pause the frame loop; state is kept
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Timestamp of the most recent tick
    pub fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }

    pub fn separation(&self) -> i32 {
        self.separation
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn left_camera(&self) -> &EyeCamera {
        &self.left_camera
    }

    pub fn right_camera(&self) -> &EyeCamera {
        &self.right_camera
    }

    pub fn panel_handles(&self) -> (BillboardId, BillboardId) {
        self.panel_handles
    }

    /// Track a viewport resize; camera aspect follows the half width
    pub fn set_viewport(&mut self, viewport: (f32, f32)) {
        if viewport.0 <= 0.0 || viewport.1 <= 0.0 {
            return;
        }
        self.viewport = viewport;
        let aspect = (viewport.0 * 0.5) / viewport.1;
        self.left_camera.set_aspect(aspect);
        self.right_camera.set_aspect(aspect);
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// Replace the panel content in both scenes
    pub fn set_document(&mut self, source: &PanelSource) {
        self.scenes = ScenePair::default();
        self.panel_handles = instance_panel(source, &mut self.scenes);
    }

    /// Reset both trackball controllers to the initial framing
    pub fn reset_view(&mut self) {
        self.left_controls.reset();
        self.right_controls.reset();
    }
}
