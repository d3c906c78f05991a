//! Stereopane Library
//!
//! A side-by-side stereo panel viewer with head tracking and mouse orbit
//! controls.

pub mod app;
pub mod prefs;
pub mod render;
pub mod rig;
pub mod scene;
pub mod trace;
pub mod tracking;

// Re-export commonly used types
pub use app::{load_document, AppOptions, StereopaneApp};
pub use prefs::PreferenceStore;
pub use render::StereoRenderer;
pub use rig::{Eye, EyeCamera, EyeSink, FrameInput, StereoRig, TrackballControls};
pub use scene::{Billboard, PanelDocument, PanelImage, PanelSource, Scene, ScenePair};
pub use trace::TraceLog;
pub use tracking::{HeadSample, HeadTracker};
