//! Main application state and UI
//!
//! Hosts the stereo rig inside an eframe window: menu and status bars, a
//! control panel on the right, and the side-by-side eye views in the
//! center. The rig ticks once per UI frame while running.

#![allow(dead_code)]

use crate::prefs::PreferenceStore;
use crate::render::StereoRenderer;
use crate::rig::{Eye, FrameInput, PointerState, StereoRig, SEPARATION_STEP};
use crate::scene::{PanelDocument, PanelImage, PanelSource};
use crate::trace::TraceLog;
use crate::tracking::{HeadTracker, DEFAULT_TRACKER_ADDR};
use eframe::egui::{self, Color32};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Launch options resolved before the window opens
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// RON document or raster image to show; None selects the built-in page
    pub panel_path: Option<PathBuf>,
    /// UDP listen address for the head tracker; None disables tracking
    pub tracker_addr: Option<String>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            panel_path: None,
            tracker_addr: Some(DEFAULT_TRACKER_ADDR.to_string()),
        }
    }
}

/// Resolve a panel path into a source. No path means the built-in
/// document; a missing file is an error the caller surfaces before the
/// window opens.
pub fn load_document(path: Option<&Path>) -> anyhow::Result<PanelSource> {
    let Some(path) = path else {
        return Ok(PanelSource::Document(PanelDocument::builtin()));
    };
    if !path.exists() {
        anyhow::bail!("panel source {:?} not found", path);
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(PanelSource::Document(PanelDocument::load(path)?)),
        _ => {
            let image = PanelImage::from_file(path)?;
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("panel")
                .to_string();
            Ok(PanelSource::Image { name, image })
        }
    }
}

/// Main application state
pub struct StereopaneApp {
    // Core components
    pub rig: StereoRig,
    pub renderer: StereoRenderer,
    pub tracker: Option<HeadTracker>,
    pub trace: TraceLog,

    // UI state
    pub mouse_control: bool,
    pub poll_tracker: bool,
    pub show_trace: bool,
    document_name: String,

    // Timing
    last_update: Instant,
}

impl StereopaneApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>, source: PanelSource, options: AppOptions) -> Self {
        log::info!("Initializing Stereopane...");

        let mut trace = TraceLog::new();
        trace.trace("Starting stereo rig");

        let tracker = match options.tracker_addr.as_deref() {
            None => {
                trace.trace("Head tracking disabled");
                None
            }
            Some(addr) => match HeadTracker::connect(addr) {
                Ok(tracker) => {
                    trace.trace(format!("Head tracker listening on {}", tracker.addr()));
                    Some(tracker)
                }
                Err(e) => {
                    log::error!("Head tracker unavailable: {}", e);
                    trace.trace(format!("Head tracker unavailable: {}", e));
                    rfd::MessageDialog::new()
                        .set_level(rfd::MessageLevel::Warning)
                        .set_title("Head tracker unavailable")
                        .set_description(format!(
                            "{}\n\nStart an opentrack-compatible tracker with UDP \
                             output and relaunch to enable head tracking.",
                            e
                        ))
                        .set_buttons(rfd::MessageButtons::Ok)
                        .show();
                    None
                }
            },
        };

        let document_name = source.name().to_string();
        let store = PreferenceStore::load_default();
        let mut rig = StereoRig::new((1280.0, 720.0), &source, store, &mut trace);

        let mut renderer = StereoRenderer::new();
        if let Some(render_state) = cc.wgpu_render_state.clone() {
            renderer.initialize(render_state.device.clone(), render_state.queue.clone());
            log::info!("Stereo renderer initialized with WGPU");
        } else {
            log::warn!("WGPU render state not available - eye rendering disabled");
        }

        rig.start();
        log::info!("Stereopane initialized");

        Self {
            rig,
            renderer,
            tracker,
            trace,
            mouse_control: false,
            poll_tracker: true,
            show_trace: true,
            document_name,
            last_update: Instant::now(),
        }
    }

    fn open_panel(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Panel Documents", &["ron"])
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        {
            match load_document(Some(&path)) {
                Ok(source) => {
                    self.document_name = source.name().to_string();
                    self.rig.set_document(&source);
                    self.renderer.clear_textures();
                    self.trace.trace(format!("Loaded panel {}", source.name()));
                }
                Err(e) => {
                    log::error!("Failed to load panel: {}", e);
                }
            }
        }
    }
}

impl eframe::App for StereopaneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Frame time for the status bar
        let now = Instant::now();
        let delta_ms = now.duration_since(self.last_update).as_secs_f32() * 1000.0;
        self.last_update = now;

        // Separation keys: O widens, P narrows
        if ctx.input(|i| i.key_pressed(egui::Key::O)) {
            self.rig.adjust_eye_separation(SEPARATION_STEP, &mut self.trace);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::P)) {
            self.rig.adjust_eye_separation(-SEPARATION_STEP, &mut self.trace);
        }

        // Menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Panel...").clicked() {
                        self.open_panel();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        std::process::exit(0);
                    }
                });

                ui.menu_button("View", |ui| {
                    let mut running = self.rig.is_running();
                    if ui.checkbox(&mut running, "Rendering").changed() {
                        if running {
                            self.rig.start();
                        } else {
                            self.rig.stop();
                        }
                    }
                    ui.checkbox(&mut self.show_trace, "Trace Panel");
                    ui.separator();
                    if ui.button("Reset View").clicked() {
                        self.rig.reset_view();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Panel: {}", self.document_name));
                ui.separator();
                ui.label(format!("Separation: {}", self.rig.separation()));
                ui.separator();
                ui.label(format!("Frames: {}", self.rig.frames()));
                ui.separator();
                match &self.tracker {
                    Some(tracker) => {
                        ui.label(format!(
                            "Tracker: {} ({} samples)",
                            tracker.addr(),
                            tracker.samples_received()
                        ));
                    }
                    None => {
                        ui.label("Tracker: offline");
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{:.1} ms", delta_ms));
                });
            });
        });

        // Pointer input gathered from the control pad, consumed by the tick
        let mut pointer = PointerState::default();

        // Right side panel with rig controls
        egui::SidePanel::right("control_panel")
            .resizable(true)
            .default_width(260.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Stereo Rig");
                ui.label(format!("Panel: {}", self.document_name));
                ui.separator();

                ui.checkbox(&mut self.mouse_control, "Mouse control");
                if self.tracker.is_some() {
                    ui.checkbox(&mut self.poll_tracker, "Head tracking");
                } else {
                    ui.label("Head tracker offline");
                }
                ui.label(format!("Eye separation: {}", self.rig.separation()));
                ui.small("O widens, P narrows");
                ui.separator();

                // Control pad: drag orbits, right-drag pans, scroll zooms
                let pad_width = ui.available_width();
                let (response, painter) = ui.allocate_painter(
                    egui::vec2(pad_width, 120.0),
                    egui::Sense::click_and_drag(),
                );
                painter.rect_filled(response.rect, 4.0, Color32::from_rgb(25, 28, 32));
                painter.text(
                    response.rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "drag to orbit",
                    egui::FontId::default(),
                    Color32::GRAY,
                );
                if response.dragged() {
                    let delta = response.drag_delta();
                    pointer.drag_delta = (delta.x, delta.y);
                    pointer.panning = response.dragged_by(egui::PointerButton::Secondary);
                }
                if response.hovered() {
                    pointer.scroll_delta = ctx.input(|i| i.raw_scroll_delta.y) / 100.0;
                }

                if self.show_trace {
                    ui.separator();
                    ui.collapsing("Trace", |ui| {
                        self.trace.show(ui);
                    });
                }
            });

        // Central panel: the two eye views
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let available = ui.available_size();
                let (rect, _) = ui.allocate_exact_size(available, egui::Sense::hover());

                self.rig.set_viewport((rect.width(), rect.height()));
                let layout = self.rig.mask_layout();
                self.renderer.resize(
                    (layout.eye_size.0 as u32).max(1),
                    (layout.eye_size.1 as u32).max(1),
                );

                let head = if self.poll_tracker {
                    self.tracker.as_mut().and_then(|t| t.poll())
                } else {
                    None
                };
                let input = FrameInput {
                    head,
                    pointer,
                    mouse_control: self.mouse_control,
                };
                if self.rig.is_running() {
                    self.rig.frame_tick(&input, &mut self.renderer);
                }

                // Register this frame's eye textures and paint them at the
                // masked positions
                if let Some(render_state) = _frame.wgpu_render_state() {
                    for (eye, pos) in [(Eye::Left, layout.left_pos), (Eye::Right, layout.right_pos)]
                    {
                        if let Some(view) = self.renderer.eye_view(eye) {
                            let id = render_state.renderer.write().register_native_texture(
                                &render_state.device,
                                view,
                                wgpu::FilterMode::Linear,
                            );
                            let min = rect.min + egui::vec2(pos.0, pos.1);
                            let eye_rect = egui::Rect::from_min_size(
                                min,
                                egui::vec2(layout.eye_size.0, layout.eye_size.1),
                            );
                            ui.painter().image(
                                id,
                                eye_rect,
                                egui::Rect::from_min_max(
                                    egui::pos2(0.0, 0.0),
                                    egui::pos2(1.0, 1.0),
                                ),
                                Color32::WHITE,
                            );
                        }
                    }
                }
            });

        // Keep ticking while the rig runs
        if self.rig.is_running() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_enable_tracker() {
        let options = AppOptions::default();
        assert_eq!(options.tracker_addr.as_deref(), Some(DEFAULT_TRACKER_ADDR));
        assert!(options.panel_path.is_none());
    }

    #[test]
    fn test_load_document_defaults_to_builtin() {
        let source = load_document(None).unwrap();
        assert_eq!(source.name(), "builtin");
        assert!(matches!(source, PanelSource::Document(_)));
    }

    #[test]
    fn test_load_document_missing_path_fails() {
        let missing = Path::new("/nonexistent/stereopane-panel.ron");
        assert!(load_document(Some(missing)).is_err());
    }

    #[test]
    fn test_load_document_reads_ron() {
        let path =
            std::env::temp_dir().join(format!("stereopane-app-{}.ron", uuid::Uuid::new_v4()));
        PanelDocument::builtin().save(&path).unwrap();
        let source = load_document(Some(&path)).unwrap();
        assert_eq!(source.name(), "builtin");
        assert_eq!(source.pixel_size(), (512, 640));
        let _ = std::fs::remove_file(&path);
    }
}
