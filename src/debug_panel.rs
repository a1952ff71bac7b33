/// Debug/Metrics floating window.
///
/// Provides a runtime debug panel with scrollable log messages and live
/// metrics (FPS, tracking state, surface hit rate, captures and resets).

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use std::collections::VecDeque;

use crate::measure::MeasurementSession;
use crate::tracking::TrackingSession;

const MAX_LOG_MESSAGES: usize = 200;

/// Resource holding debug panel state, log ring buffer, and live metrics.
#[derive(Resource)]
pub struct DebugPanelState {
    pub open: bool,
    pub log_messages: VecDeque<String>,
    // Metrics
    pub fps: f32,
    pub tracking_status: &'static str,
    pub frames: u64,
    pub frames_with_hit: u64,
    pub captures: u64,
    pub resets: u64,
    pub phase: Option<String>,
}

impl Default for DebugPanelState {
    fn default() -> Self {
        Self {
            open: false,
            log_messages: VecDeque::with_capacity(MAX_LOG_MESSAGES),
            fps: 0.0,
            tracking_status: "Not started",
            frames: 0,
            frames_with_hit: 0,
            captures: 0,
            resets: 0,
            phase: None,
        }
    }
}

impl DebugPanelState {
    /// Push a timestamped log entry, trimming the buffer if needed.
    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.log_messages.len() >= MAX_LOG_MESSAGES {
            self.log_messages.pop_front();
        }
        let now = chrono::Local::now().format("%H:%M:%S");
        self.log_messages.push_back(format!("[{}] {}", now, msg.into()));
    }

    /// Share of tracked frames that hit a surface, in percent.
    pub fn hit_rate(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.frames_with_hit as f64 * 100.0 / self.frames as f64
    }
}

pub struct DebugPanelPlugin;

impl Plugin for DebugPanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugPanelState>()
            .add_systems(Update, (toggle_debug_panel, update_debug_metrics))
            .add_systems(EguiPrimaryContextPass, render_debug_panel);
    }
}

/// Backquote toggles the panel.
pub fn toggle_debug_panel(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug: ResMut<DebugPanelState>,
) {
    if keyboard.just_pressed(KeyCode::Backquote) {
        debug.open = !debug.open;
    }
}

/// Update live metrics each frame.
pub fn update_debug_metrics(
    time: Res<Time>,
    mut debug: ResMut<DebugPanelState>,
    tracking: Res<TrackingSession>,
    session: Option<Res<MeasurementSession>>,
) {
    // FPS from delta
    let dt = time.delta_secs();
    if dt > 0.0 {
        debug.fps = 1.0 / dt;
    }

    debug.tracking_status = tracking.status_label();
    debug.frames = tracking.frames;
    debug.frames_with_hit = tracking.frames_with_hit;
    debug.phase = session.map(|s| format!("{:?}", s.phase()));
}

/// Render the debug panel UI into an egui context.
///
/// Kept free of Bevy parameters so it can be driven from a test harness.
pub fn render_debug_panel_ui(ctx: &egui::Context, debug: &mut DebugPanelState) {
    let mut open = debug.open;

    egui::Window::new("Debug")
        .open(&mut open)
        .default_size([360.0, 400.0])
        .resizable(true)
        .collapsible(true)
        .show(ctx, |ui| {
            // -- Metrics section --
            egui::CollapsingHeader::new("Metrics")
                .default_open(true)
                .show(ui, |ui| {
                    egui::Grid::new("debug_metrics_grid")
                        .num_columns(2)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            ui.label("FPS:");
                            ui.label(format!("{:.0}", debug.fps));
                            ui.end_row();

                            ui.label("Tracking:");
                            ui.label(debug.tracking_status);
                            ui.end_row();

                            ui.label("Frames:");
                            ui.label(format!("{}", debug.frames));
                            ui.end_row();

                            ui.label("Surface hits:");
                            ui.label(format!("{:.1}%", debug.hit_rate()));
                            ui.end_row();

                            ui.label("Captures:");
                            ui.label(format!("{}", debug.captures));
                            ui.end_row();

                            ui.label("Resets:");
                            ui.label(format!("{}", debug.resets));
                            ui.end_row();

                            if let Some(ref phase) = debug.phase {
                                ui.label("Phase:");
                                ui.label(phase.as_str());
                                ui.end_row();
                            }
                        });
                });

            ui.separator();

            // -- Log section --
            egui::CollapsingHeader::new("Log")
                .default_open(true)
                .show(ui, |ui| {
                    let text_style = egui::TextStyle::Monospace;
                    let row_height = ui.text_style_height(&text_style);
                    let num_rows = debug.log_messages.len();

                    egui::ScrollArea::vertical()
                        .max_height(250.0)
                        .stick_to_bottom(true)
                        .show_rows(ui, row_height, num_rows, |ui, row_range| {
                            for i in row_range {
                                if let Some(msg) = debug.log_messages.get(i) {
                                    ui.label(
                                        egui::RichText::new(msg)
                                            .text_style(text_style.clone())
                                            .size(11.0),
                                    );
                                }
                            }
                        });
                });
        });

    if !open && debug.open {
        debug.open = false;
    }
}

/// Render the debug panel as a floating egui window (Bevy system).
pub fn render_debug_panel(mut contexts: EguiContexts, mut debug: ResMut<DebugPanelState>) {
    if !debug.open {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    render_debug_panel_ui(ctx, &mut debug);
}
