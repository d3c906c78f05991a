//! On-screen diagnostic trace
//!
//! Numbered, newest-first message list shown in the trace panel and mirrored
//! to the log facade. Purely additive; sessions are short enough that the
//! list is never evicted.

#![allow(dead_code)]

/// Numbered diagnostic message log
#[derive(Debug, Default)]
pub struct TraceLog {
    lines: Vec<String>,
    counter: u64,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a numbered line and mirror it to the log facade
    pub fn trace(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.counter += 1;
        self.lines.insert(0, format!("{}. {}", self.counter, message));
    }

    /// All lines, newest first
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the log into the trace panel
    pub fn show(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(200.0)
            .show(ui, |ui| {
                for line in &self.lines {
                    ui.label(line);
                }
            });
    }
}
