use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use catppuccin::FlavorName;

use crate::measure::SessionPhase;

/// Convert a catppuccin color to a bevy Color via its RGB values.
fn cat_to_bevy(c: &catppuccin::Color) -> Color {
    Color::srgb(
        c.rgb.r as f32 / 255.0,
        c.rgb.g as f32 / 255.0,
        c.rgb.b as f32 / 255.0,
    )
}

/// Central theme resource for the application.
///
/// Wraps a catppuccin flavor and hands out the colors used for the overlay
/// UI and the in-scene measurement visuals.
#[derive(Resource)]
pub struct AppTheme {
    active_flavor: FlavorName,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            active_flavor: FlavorName::Mocha,
        }
    }
}

impl AppTheme {
    fn colors(&self) -> &catppuccin::FlavorColors {
        &catppuccin::PALETTE.get_flavor(self.active_flavor).colors
    }

    // -- Surfaces --

    pub fn base(&self) -> Color { cat_to_bevy(&self.colors().base) }
    pub fn mantle(&self) -> Color { cat_to_bevy(&self.colors().mantle) }
    pub fn surface0(&self) -> Color { cat_to_bevy(&self.colors().surface0) }
    pub fn surface1(&self) -> Color { cat_to_bevy(&self.colors().surface1) }
    pub fn surface2(&self) -> Color { cat_to_bevy(&self.colors().surface2) }

    // -- Text --

    pub fn text(&self) -> Color { cat_to_bevy(&self.colors().text) }
    pub fn subtext0(&self) -> Color { cat_to_bevy(&self.colors().subtext0) }

    // -- Measurement visuals --

    pub fn reticle(&self) -> Color { cat_to_bevy(&self.colors().teal) }
    pub fn first_point(&self) -> Color { cat_to_bevy(&self.colors().green) }
    pub fn second_point(&self) -> Color { cat_to_bevy(&self.colors().peach) }
    pub fn measure_line(&self) -> Color { cat_to_bevy(&self.colors().yellow) }

    /// Color of the instruction text for a phase.
    pub fn phase_color(&self, phase: SessionPhase) -> Color {
        let colors = self.colors();
        match phase {
            SessionPhase::AwaitingSurface => cat_to_bevy(&colors.red),
            SessionPhase::AimingFirst | SessionPhase::AimingSecond => cat_to_bevy(&colors.teal),
            SessionPhase::FirstPointSet => cat_to_bevy(&colors.yellow),
            SessionPhase::Complete => cat_to_bevy(&colors.green),
        }
    }
}

/// Convert a `bevy::color::Color` to `egui::Color32`.
pub fn to_egui_color32(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        (srgba.alpha * 255.0) as u8,
    )
}

/// Convert a `bevy::color::Color` to `egui::Color32` with a custom alpha.
pub fn to_egui_color32_alpha(color: Color, alpha: u8) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        alpha,
    )
}

/// Dark egui visuals tinted with the active palette.
pub fn egui_visuals(theme: &AppTheme) -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = to_egui_color32_alpha(theme.mantle(), 230);
    visuals.window_fill = to_egui_color32_alpha(theme.base(), 240);
    visuals.extreme_bg_color = to_egui_color32(theme.surface0());
    visuals.widgets.inactive.weak_bg_fill = to_egui_color32(theme.surface1());
    visuals.widgets.hovered.weak_bg_fill = to_egui_color32(theme.surface2());
    visuals.override_text_color = Some(to_egui_color32(theme.text()));
    visuals
}

/// System that applies the themed egui visuals and icon font whenever
/// `AppTheme` changes.
pub fn apply_egui_theme(
    theme: Res<AppTheme>,
    mut contexts: EguiContexts,
    mut fonts_installed: Local<bool>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if !*fonts_installed {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        ctx.set_fonts(fonts);
        *fonts_installed = true;
    }

    if theme.is_changed() {
        ctx.set_visuals(egui_visuals(&theme));
    }
}
