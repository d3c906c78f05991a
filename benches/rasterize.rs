//! Benchmark for scene preparation
//!
//! Measures document rasterization, scatter fixture population and the
//! per-frame rig tick against a no-op sink.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stereopane::prefs::PreferenceStore;
use stereopane::rig::{Eye, EyeCamera, EyeSink, FrameInput, StereoRig};
use stereopane::scene::scatter::populate_scatter;
use stereopane::scene::{PanelDocument, PanelSource, Scene, ScenePair};
use stereopane::trace::TraceLog;

struct NullSink;

impl EyeSink for NullSink {
    fn render_eye(&mut self, _eye: Eye, _scene: &Scene, _camera: &EyeCamera) {}
}

fn bench_rasterize_builtin(c: &mut Criterion) {
    let doc = PanelDocument::builtin();
    c.bench_function("rasterize_builtin", |b| {
        b.iter(|| black_box(doc.rasterize()));
    });
}

fn bench_populate_scatter(c: &mut Criterion) {
    c.bench_function("populate_scatter", |b| {
        b.iter(|| {
            let mut pair = ScenePair::default();
            black_box(populate_scatter(&mut pair, 42))
        });
    });
}

fn bench_frame_tick(c: &mut Criterion) {
    let mut trace = TraceLog::new();
    let source = PanelSource::Document(PanelDocument::builtin());
    let mut rig = StereoRig::new(
        (1280.0, 720.0),
        &source,
        PreferenceStore::in_memory(),
        &mut trace,
    );
    populate_scatter(&mut rig.scenes, 42);
    rig.start();
    let mut sink = NullSink;

    c.bench_function("frame_tick", |b| {
        b.iter(|| {
            rig.frame_tick(black_box(&FrameInput::default()), &mut sink);
        });
    });
}

criterion_group!(
    benches,
    bench_rasterize_builtin,
    bench_populate_scatter,
    bench_frame_tick,
);

criterion_main!(benches);
