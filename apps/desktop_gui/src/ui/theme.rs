//! Visual palettes: light/dark visuals, severity colors, star tints.

use std::collections::BTreeMap;

use eframe::egui;
use ui_core::{Severity, Theme};

pub const ACCENT_COLOR: egui::Color32 = egui::Color32::from_rgb(78, 84, 200);
pub const PANEL_ROUNDING: u8 = 8;

/// Service-matching star tints: amber for filled, muted gray for empty.
pub const STAR_FILLED_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 193, 7);
pub const STAR_EMPTY_COLOR: egui::Color32 = egui::Color32::from_rgb(108, 117, 125);

pub fn visuals_for_theme(theme: Theme) -> egui::Visuals {
    let mut visuals = match theme {
        Theme::Light => {
            let mut v = egui::Visuals::light();
            v.window_fill = egui::Color32::from_rgb(248, 249, 250);
            v.panel_fill = egui::Color32::WHITE;
            v.faint_bg_color = egui::Color32::from_rgb(241, 243, 245);
            v
        }
        Theme::Dark => {
            let mut v = egui::Visuals::dark();
            v.override_text_color = Some(egui::Color32::from_rgb(222, 226, 230));
            v.window_fill = egui::Color32::from_rgb(33, 37, 41);
            v.panel_fill = egui::Color32::from_rgb(26, 29, 32);
            v.extreme_bg_color = egui::Color32::from_rgb(18, 20, 23);
            v.faint_bg_color = egui::Color32::from_rgb(43, 48, 53);
            v
        }
    };

    visuals.hyperlink_color = ACCENT_COLOR;
    visuals.window_corner_radius = egui::CornerRadius::same(PANEL_ROUNDING);
    visuals.menu_corner_radius = egui::CornerRadius::same(PANEL_ROUNDING);
    visuals.selection.bg_fill = ACCENT_COLOR;
    visuals.widgets.active.bg_fill = ACCENT_COLOR;
    visuals.widgets.hovered.bg_fill = ACCENT_COLOR.gamma_multiply(0.85);

    visuals
}

pub fn scaled_text_styles(text_scale: f32) -> BTreeMap<egui::TextStyle, egui::FontId> {
    let mut styles = egui::Style::default().text_styles;
    for font in styles.values_mut() {
        font.size *= text_scale;
    }
    styles
}

/// Fill and stroke pair for a banner of the given severity.
pub fn severity_colors(severity: Severity) -> (egui::Color32, egui::Stroke) {
    match severity {
        Severity::Danger => (
            egui::Color32::from_rgb(111, 53, 53),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
        ),
        Severity::Success => (
            egui::Color32::from_rgb(53, 111, 66),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(96, 175, 121)),
        ),
        Severity::Info => (
            egui::Color32::from_rgb(53, 83, 111),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(96, 140, 175)),
        ),
    }
}
