//! Example: Build the scatter fixture and tick the stereo rig headless
//!
//! Usage: cargo run --example scatter_preview [seed]
//!
//! Builds both eye scenes, scatters the fixture rectangles, then runs a
//! few frame ticks against a printing sink to show the camera state
//! without opening a window.

use stereopane::prefs::PreferenceStore;
use stereopane::rig::{Eye, EyeCamera, EyeSink, FrameInput, StereoRig, SEPARATION_STEP};
use stereopane::scene::scatter::{populate_scatter, scatter_rects};
use stereopane::scene::{PanelDocument, PanelSource, Scene};
use stereopane::trace::TraceLog;

struct PrintSink;

impl EyeSink for PrintSink {
    fn render_eye(&mut self, eye: Eye, scene: &Scene, camera: &EyeCamera) {
        let position = camera.position();
        println!(
            "  {:?} eye: {} billboards, camera at ({:.1}, {:.1}, {:.1})",
            eye,
            scene.len(),
            position.x,
            position.y,
            position.z,
        );
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    println!("Scatter fixture, seed {}", seed);
    for (i, rect) in scatter_rects(seed).iter().enumerate() {
        println!(
            "  rect-{}: #{:02x}{:02x}{:02x} at ({:.1}, {:.1}, {:.1}) scale {:.2}",
            i,
            rect.color[0],
            rect.color[1],
            rect.color[2],
            rect.position.x,
            rect.position.y,
            rect.position.z,
            rect.scale,
        );
    }

    let mut trace = TraceLog::new();
    let source = PanelSource::Document(PanelDocument::builtin());
    let mut rig = StereoRig::new(
        (1280.0, 720.0),
        &source,
        PreferenceStore::in_memory(),
        &mut trace,
    );
    populate_scatter(&mut rig.scenes, seed);
    rig.start();

    println!("\nTicking 3 frames:");
    let mut sink = PrintSink;
    for frame in 0..3 {
        println!("frame {}", frame);
        rig.frame_tick(&FrameInput::default(), &mut sink);
    }

    rig.adjust_eye_separation(SEPARATION_STEP, &mut trace);
    rig.adjust_eye_separation(SEPARATION_STEP, &mut trace);
    println!("\nSeparation after two widen steps: {}", rig.separation());

    let layout = rig.mask_layout();
    println!(
        "Mask layout: eye {}x{}, left at {:.0}, right at {:.0}",
        layout.eye_size.0, layout.eye_size.1, layout.left_pos.0, layout.right_pos.0
    );

    println!("\nTrace:");
    for line in trace.lines() {
        println!("  {}", line);
    }
}
