//! Soundboard control panel, an egui/eframe application.
//!
//! # Architecture
//!
//! [`SoundboardApp`] is the top-level [`eframe::App`].  It owns the
//! [`AppContext`] (stores, library, player, volume) and the
//! [`HotkeyCoordinator`], and drains three channels every frame:
//!
//! * `hotkey_rx`: [`HotkeyEvent`]s from the cancel listener.
//! * `playback_rx`: [`PlaybackEvent`]s from the playback worker.
//! * `import_rx`: [`ImportReport`]s from import jobs on the tokio runtime.
//!
//! Nothing outside the GUI thread touches the coordinator or the stores;
//! other threads only send on these channels and request a repaint.
//!
//! # Layout
//!
//! | Area | Contents |
//! |------|----------|
//! | Central | Log pane, action buttons, settings / stop playback |
//! | Right | Vertical volume slider, top = loudest |
//! | Windows | Set keybind, delete keybind, settings, error modal |

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::context::{ActionError, AppContext};
use crate::hotkey::{HotkeyCoordinator, HotkeyEvent, KeyHook, WakeFn};
use crate::import::ImportReport;
use crate::library::{SoundList, SUPPORTED_EXTENSIONS};
use crate::playback::PlaybackEvent;

pub const WINDOW_TITLE: &str = "Soundboard";

const START_LABEL: &str = "Start Soundboard";
const STOP_LABEL: &str = "Stop Soundboard";

/// Oldest log pane lines are dropped past this many.
const LOG_CAPACITY: usize = 1_000;

/// Scrollback shown in the log pane.
struct LogPane {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogPane {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    fn push(&mut self, line: String) {
        while self.lines.len() >= self.capacity.max(1) {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// State of the open "Set Keybind" window.
struct BindDialog {
    key: String,
    sounds: SoundList,
    selected: Option<usize>,
}

// ---------------------------------------------------------------------------
// SoundboardApp
// ---------------------------------------------------------------------------

pub struct SoundboardApp {
    ctx: AppContext,
    coordinator: HotkeyCoordinator,
    runtime: tokio::runtime::Handle,

    // ── Channels ─────────────────────────────────────────────────────────
    hotkey_rx: mpsc::UnboundedReceiver<HotkeyEvent>,
    playback_rx: mpsc::UnboundedReceiver<PlaybackEvent>,
    import_tx: mpsc::UnboundedSender<ImportReport>,
    import_rx: mpsc::UnboundedReceiver<ImportReport>,

    // ── UI state ─────────────────────────────────────────────────────────
    log_pane: LogPane,
    importing: bool,
    bind_dialog: Option<BindDialog>,
    unbind_dialog: Option<String>,
    settings_dialog: Option<Settings>,
    error: Option<String>,
}

impl SoundboardApp {
    /// Build the app inside eframe's creator closure.
    ///
    /// The coordinator's wake function is tied to `cc.egui_ctx` so a cancel
    /// from the background listener repaints even an unfocused window.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        ctx: AppContext,
        hook: Arc<dyn KeyHook>,
        playback_rx: mpsc::UnboundedReceiver<PlaybackEvent>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        apply_theme(&cc.egui_ctx, &ctx.settings);

        let egui_ctx = cc.egui_ctx.clone();
        let wake: WakeFn = Arc::new(move || egui_ctx.request_repaint());

        let (hotkey_tx, hotkey_rx) = mpsc::unbounded_channel();
        let (import_tx, import_rx) = mpsc::unbounded_channel();

        Self {
            ctx,
            coordinator: HotkeyCoordinator::new(hook, hotkey_tx, wake),
            runtime,
            hotkey_rx,
            playback_rx,
            import_tx,
            import_rx,
            log_pane: LogPane::with_capacity(LOG_CAPACITY),
            importing: false,
            bind_dialog: None,
            unbind_dialog: None,
            settings_dialog: None,
            error: None,
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        self.log_pane.push(message);
    }

    // ── Channel polling ──────────────────────────────────────────────────

    fn poll_hotkey(&mut self) {
        while let Ok(event) = self.hotkey_rx.try_recv() {
            match event {
                HotkeyEvent::CancelRequested { session } => {
                    if self.coordinator.handle_cancel(session) {
                        self.log("Soundboard stopped.");
                    }
                }
            }
        }
    }

    fn poll_playback(&mut self) {
        while let Ok(event) = self.playback_rx.try_recv() {
            match event {
                PlaybackEvent::Failed { message, .. } => {
                    self.log(format!("Error playing sound: {message}"));
                }
            }
        }
    }

    fn poll_imports(&mut self) {
        while let Ok(report) = self.import_rx.try_recv() {
            self.importing = false;
            for line in report.messages() {
                self.log(line);
            }
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn show_keybinds(&mut self) {
        if self.ctx.keybinds.is_empty() {
            self.log("No keybinds set.");
            return;
        }
        let lines: Vec<String> = self
            .ctx
            .keybinds
            .iter()
            .map(|(key, sound)| format!("{key} -> {sound}"))
            .collect();
        self.log("Current keybinds:");
        for line in lines {
            self.log(line);
        }
    }

    fn import_audio(&mut self) {
        let Some(files) = rfd::FileDialog::new()
            .set_title("Select audio files")
            .add_filter("Audio files", SUPPORTED_EXTENSIONS)
            .pick_files()
        else {
            return;
        };
        self.start_import(files);
    }

    /// Run the importer on the blocking pool and post the report back.
    fn start_import(&mut self, files: Vec<PathBuf>) {
        let importer = self.ctx.importer();
        let tx = self.import_tx.clone();
        self.importing = true;
        self.runtime.spawn_blocking(move || {
            let report = importer.import(&files);
            let _ = tx.send(report);
        });
    }

    fn open_bind_dialog(&mut self) {
        match self.ctx.sounds() {
            Ok(sounds) => {
                self.bind_dialog = Some(BindDialog {
                    key: String::new(),
                    sounds,
                    selected: None,
                });
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Returns `true` when the dialog should close.
    fn submit_bind(&mut self, dialog: &BindDialog) -> bool {
        let Some(index) = dialog.selected else {
            self.error = Some("Invalid selection.".into());
            return false;
        };
        let sound = match dialog.sounds.select(index) {
            Ok(sound) => sound.clone(),
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };

        match self.ctx.bind(&dialog.key, &sound) {
            Ok(key) => {
                self.log(format!("Bound '{key}' to '{}'", sound.name));
                true
            }
            Err(e) => self.report_action_error(e),
        }
    }

    /// Returns `true` when the dialog should close.
    fn submit_unbind(&mut self, key: &str) -> bool {
        match self.ctx.unbind(key) {
            Ok(key) => {
                self.log(format!("Unbound '{key}'"));
                true
            }
            Err(e) => self.report_action_error(e),
        }
    }

    /// Input errors open the error dialog and keep the form open; save
    /// failures only reach the log.
    fn report_action_error(&mut self, error: ActionError) -> bool {
        if error.is_user_error() {
            self.error = Some(error.to_string());
            false
        } else {
            self.log(error.to_string());
            true
        }
    }

    fn toggle_soundboard(&mut self) {
        if self.coordinator.is_active() {
            self.coordinator.stop();
            self.log("Soundboard stopped.");
            return;
        }

        let report = self.coordinator.start(&self.ctx.keybinds, self.ctx.trigger());
        for (key, reason) in &report.rejected {
            self.log(format!("Could not hook '{key}': {reason}"));
        }
        if !report.cancel_key_armed {
            self.log(format!("ESC is unavailable, use {STOP_LABEL} to stop."));
        }
        if self.coordinator.is_active() {
            self.log("Soundboard started. Press ESC to stop.");
        } else {
            self.log("Soundboard could not start: no keys could be hooked.");
        }
    }

    fn save_settings(&mut self, ctx: &egui::Context, settings: Settings) {
        if let Err(e) = self.ctx.update_settings(settings) {
            self.log(e.to_string());
        }
        apply_theme(ctx, &self.ctx.settings);
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_volume(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label("Volume");
            let mut volume = self.ctx.volume.get();
            let slider = egui::Slider::new(&mut volume, 0.0..=1.0)
                .vertical()
                .step_by(0.1)
                .fixed_decimals(1);
            if ui.add(slider).changed() {
                self.ctx.volume.set(volume);
            }
        });
    }

    fn draw_main(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .stick_to_bottom(true)
            .max_height(240.0)
            .show(ui, |ui| {
                for line in self.log_pane.lines() {
                    ui.label(line);
                }
            });

        ui.separator();

        ui.horizontal_wrapped(|ui| {
            if ui.button("Show Keybinds").clicked() {
                self.show_keybinds();
            }
            let import_label = if self.importing {
                "Importing..."
            } else {
                "Import Audio"
            };
            if ui
                .add_enabled(!self.importing, egui::Button::new(import_label))
                .clicked()
            {
                self.import_audio();
            }
            if ui.button("Add / Change Keybind").clicked() {
                self.open_bind_dialog();
            }
            if ui.button("Delete Keybind").clicked() {
                self.unbind_dialog = Some(String::new());
            }
            let toggle_label = if self.coordinator.is_active() {
                STOP_LABEL
            } else {
                START_LABEL
            };
            if ui.button(toggle_label).clicked() {
                self.toggle_soundboard();
            }
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui.button("Settings").clicked() {
                self.settings_dialog = Some(self.ctx.settings);
            }
            if ui.button("Stop Playback").clicked() {
                self.ctx.player.stop();
            }
        });
    }

    // ── Dialogs ──────────────────────────────────────────────────────────

    fn draw_bind_dialog(&mut self, ctx: &egui::Context) {
        let Some(mut dialog) = self.bind_dialog.take() else {
            return;
        };
        let mut open = true;
        let mut submit = false;

        egui::Window::new("Set Keybind")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Key to bind:");
                ui.add(egui::TextEdit::singleline(&mut dialog.key).hint_text("a, f9, ctrl+1"));
                ui.add_space(4.0);
                ui.label("Available sounds:");
                egui::ScrollArea::vertical()
                    .max_height(200.0)
                    .show(ui, |ui| {
                        for (i, entry) in dialog.sounds.entries().iter().enumerate() {
                            ui.selectable_value(
                                &mut dialog.selected,
                                Some(i),
                                format!("{}. {}", i + 1, entry.name),
                            );
                        }
                    });
                ui.add_space(4.0);
                submit = ui.button("Bind").clicked();
            });

        if submit && self.submit_bind(&dialog) {
            return;
        }
        if open {
            self.bind_dialog = Some(dialog);
        }
    }

    fn draw_unbind_dialog(&mut self, ctx: &egui::Context) {
        let Some(mut key) = self.unbind_dialog.take() else {
            return;
        };
        let mut open = true;
        let mut submit = false;

        egui::Window::new("Delete Keybind")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Enter key to unbind:");
                ui.text_edit_singleline(&mut key);
                submit = ui.button("Delete").clicked();
            });

        if submit && self.submit_unbind(&key) {
            return;
        }
        if open {
            self.unbind_dialog = Some(key);
        }
    }

    fn draw_settings_dialog(&mut self, ctx: &egui::Context) {
        let Some(mut settings) = self.settings_dialog.take() else {
            return;
        };
        let mut open = true;
        let mut save = false;

        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.checkbox(&mut settings.dark_theme, "Enable Dark Theme");
                ui.checkbox(
                    &mut settings.normalize_volume,
                    "Auto Normalize Volume (reduce volume if too loud)",
                );
                ui.add_space(6.0);
                save = ui.button("Save").clicked();
            });

        if save {
            self.save_settings(ctx, settings);
        } else if open {
            self.settings_dialog = Some(settings);
        }
    }

    fn draw_error(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error.clone() else {
            return;
        };
        let response = egui::Modal::new(egui::Id::new("error_dialog")).show(ctx, |ui| {
            ui.set_width(280.0);
            ui.heading("Error");
            ui.label(message.as_str());
            ui.add_space(6.0);
            ui.button("OK").clicked()
        });
        if response.inner || response.should_close() {
            self.error = None;
        }
    }
}

/// Switch between the dark and light palettes.
fn apply_theme(ctx: &egui::Context, settings: &Settings) {
    if settings.dark_theme {
        ctx.set_visuals(egui::Visuals::dark());
    } else {
        ctx.set_visuals(egui::Visuals::light());
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for SoundboardApp {
    /// Called every frame by eframe.  Drains channels, then renders.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_hotkey();
        self.poll_playback();
        self.poll_imports();

        // Playback failures arrive without a wake; poll while they can happen.
        if self.coordinator.is_active() || self.importing {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        egui::SidePanel::right("volume_panel")
            .resizable(false)
            .show(ctx, |ui| self.draw_volume(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_main(ui));

        self.draw_bind_dialog(ctx);
        self.draw_unbind_dialog(ctx);
        self.draw_settings_dialog(ctx);
        self.draw_error(ctx);
    }

    /// Remove every global hook before the window goes away.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.coordinator.stop();
        self.ctx.player.stop();
        log::info!("soundboard closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_pane_drops_oldest_past_capacity() {
        let mut pane = LogPane::with_capacity(3);
        for i in 0..5 {
            pane.push(format!("line {i}"));
        }

        assert_eq!(
            pane.lines().collect::<Vec<_>>(),
            vec!["line 2", "line 3", "line 4"]
        );
    }

    #[test]
    fn log_pane_keeps_a_long_session_bounded() {
        let mut pane = LogPane::with_capacity(LOG_CAPACITY);
        for i in 0..LOG_CAPACITY * 3 {
            pane.push(format!("Bound '{i}' to 'boing.mp3'"));
        }

        assert_eq!(pane.lines().count(), LOG_CAPACITY);
        assert_eq!(
            pane.lines().last(),
            Some(format!("Bound '{}' to 'boing.mp3'", LOG_CAPACITY * 3 - 1).as_str())
        );
    }
}
