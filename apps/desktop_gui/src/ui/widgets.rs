//! Reusable widget helpers shared by the connect, browse, and upload views.

use std::time::Instant;

use eframe::egui;
use ui_core::{
    BackToTop, BannerStack, PasswordVisibility, SortDirection, SortState, StarRating,
    UploadPreview, STAR_COUNT,
};

use crate::ui::theme::{severity_colors, STAR_EMPTY_COLOR, STAR_FILLED_COLOR};

/// Draws the stacked notification banners in the top-right corner.
pub fn show_banner_host(ctx: &egui::Context, banners: &mut BannerStack, now: Instant) {
    banners.prune(now);
    if banners.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("banner_host"))
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .show(ctx, |ui| {
            ui.set_max_width(360.0);
            for banner in banners.iter() {
                let (fill, stroke) = severity_colors(banner.severity);
                egui::Frame::NONE
                    .fill(fill)
                    .stroke(stroke)
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(
                                egui::RichText::new(&banner.message).color(egui::Color32::WHITE),
                            );
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.small_button("Dismiss").clicked() {
                                        dismissed = Some(banner.id);
                                    }
                                },
                            );
                        });
                    });
                ui.add_space(6.0);
            }
        });

    if let Some(id) = dismissed {
        banners.dismiss(id);
    }
}

/// Interactive five-star row. Returns the star the user clicked, if any.
/// Hover preview and the sticky committed value live in the [`StarRating`].
pub fn star_row(ui: &mut egui::Ui, rating: &mut StarRating, enabled: bool) -> Option<u8> {
    let mut clicked = None;
    let mut any_hovered = false;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 2.0;
        for star in 1..=STAR_COUNT {
            let filled = rating.is_filled(star);
            let glyph = if filled { "★" } else { "☆" };
            let color = if filled {
                STAR_FILLED_COLOR
            } else {
                STAR_EMPTY_COLOR
            };
            let text = egui::RichText::new(glyph).size(22.0).color(color);
            let response = ui.add_enabled(enabled, egui::Button::new(text).frame(false));
            if response.hovered() {
                any_hovered = true;
                rating.hover(star);
            }
            if response.clicked() {
                clicked = Some(star);
            }
        }
    });
    if !any_hovered {
        rating.leave();
    }
    clicked
}

/// Column header button carrying the active sort direction marker.
/// Returns true when clicked so the caller can toggle its sort state.
pub fn sortable_header<C: Copy + Eq>(
    ui: &mut egui::Ui,
    label: &str,
    column: C,
    sort: &SortState<C>,
) -> bool {
    let marker = match sort.direction_of(column) {
        Some(SortDirection::Ascending) => " ▲",
        Some(SortDirection::Descending) => " ▼",
        None => "",
    };
    ui.add(egui::Button::new(egui::RichText::new(format!("{label}{marker}")).strong()).frame(false))
        .clicked()
}

/// Single-line password input with a reveal toggle on the right.
pub fn password_field(
    ui: &mut egui::Ui,
    id: &'static str,
    value: &mut String,
    visibility: &mut PasswordVisibility,
    hint: &str,
) -> egui::Response {
    ui.horizontal(|ui| {
        let toggle_width = 30.0;
        let edit_width = (ui.available_width() - toggle_width - 6.0).max(80.0);
        let edit = egui::TextEdit::singleline(value)
            .id_salt(id)
            .password(!visibility.is_revealed())
            .hint_text(hint)
            .desired_width(edit_width);
        let response = ui.add_sized([edit_width, 34.0], edit);
        let toggle_glyph = match visibility.icon() {
            "eye-slash" => "🙈",
            _ => "👁",
        };
        if ui
            .add_sized([toggle_width, 34.0], egui::Button::new(toggle_glyph))
            .on_hover_text(if visibility.is_revealed() {
                "Hide password"
            } else {
                "Show password"
            })
            .clicked()
        {
            visibility.toggle();
        }
        response
    })
    .inner
}

/// Inline validation message under a form field.
pub fn field_error_label(ui: &mut egui::Ui, error: Option<&str>) {
    if let Some(message) = error {
        ui.label(
            egui::RichText::new(message)
                .color(egui::Color32::from_rgb(220, 80, 80))
                .size(12.0),
        );
    }
}

/// Name/size card shown once a picked file passes the upload policy.
pub fn upload_preview_card(ui: &mut egui::Ui, preview: &UploadPreview) {
    egui::Frame::NONE
        .fill(ui.visuals().faint_bg_color)
        .stroke(egui::Stroke::new(1.0, ui.visuals().weak_text_color()))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(8, 6))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("📄");
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&preview.file_name).strong());
                    ui.label(
                        egui::RichText::new(&preview.size_label)
                            .size(12.0)
                            .color(ui.visuals().weak_text_color()),
                    );
                });
            });
        });
}

/// Floating jump-to-top button, shown once the table is scrolled past the
/// visibility threshold.
pub fn back_to_top_button(ctx: &egui::Context, back_to_top: &mut BackToTop) {
    if !back_to_top.is_visible() {
        return;
    }
    egui::Area::new(egui::Id::new("back_to_top"))
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-24.0, -24.0))
        .show(ctx, |ui| {
            if ui
                .add_sized([40.0, 40.0], egui::Button::new("⬆"))
                .on_hover_text("Back to top")
                .clicked()
            {
                back_to_top.request_jump();
            }
        });
}
