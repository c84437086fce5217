//! Centralized theme and styling for the GUI.

use eframe::egui;

/// Application theme: colors, spacing, and styled widget factories.
#[derive(Clone, Copy)]
pub struct AppTheme {
    pub background: egui::Color32,
    pub surface: egui::Color32,
    pub surface_hover: egui::Color32,
    pub panel_fill: egui::Color32,
    pub text_primary: egui::Color32,
    pub text_secondary: egui::Color32,

    pub primary: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,

    pub spacing_xs: f32,
    pub spacing_sm: f32,
    pub spacing_md: f32,
    pub spacing_lg: f32,

    pub button_medium: egui::Vec2,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            // Dark terminal background with Bitcoin-amber accents
            background: egui::Color32::from_rgb(10, 10, 12),
            surface: egui::Color32::from_rgb(18, 18, 22),
            surface_hover: egui::Color32::from_rgb(30, 30, 36),
            panel_fill: egui::Color32::from_rgb(14, 14, 17),
            text_primary: egui::Color32::from_rgb(235, 220, 190),
            text_secondary: egui::Color32::from_rgb(150, 150, 150),

            primary: egui::Color32::from_rgb(247, 147, 26), // #f7931a
            success: egui::Color32::from_rgb(80, 200, 120),
            warning: egui::Color32::from_rgb(255, 196, 0),
            error: egui::Color32::from_rgb(235, 80, 80),

            spacing_xs: 4.0,
            spacing_sm: 8.0,
            spacing_md: 16.0,
            spacing_lg: 24.0,

            button_medium: egui::vec2(160.0, 34.0),
        }
    }
}

impl AppTheme {
    /// Primary action button (amber outline).
    pub fn button_primary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(
            egui::RichText::new(text)
                .color(self.text_primary)
                .strong(),
        )
        .fill(self.surface)
        .stroke(egui::Stroke::new(2.0, self.primary))
        .min_size(self.button_medium)
    }

    /// Secondary action button (muted outline).
    pub fn button_secondary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary))
            .fill(self.surface)
            .stroke(egui::Stroke::new(1.0, self.text_secondary))
            .min_size(self.button_medium)
    }

    /// Framed panel for major sections.
    pub fn frame_panel(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.panel_fill)
            .rounding(3.0)
            .inner_margin(self.spacing_md)
            .stroke(egui::Stroke::new(1.0, self.primary))
    }

    /// Framed surface for inline items like the notification banner.
    pub fn frame_surface(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.surface)
            .rounding(3.0)
            .inner_margin(self.spacing_sm)
            .stroke(egui::Stroke::new(1.0, self.success))
    }
}

/// Apply the theme to the egui context.
pub fn configure_style(ctx: &egui::Context, theme: &AppTheme) {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = theme.background;
    visuals.panel_fill = theme.panel_fill;
    visuals.override_text_color = Some(theme.text_primary);

    visuals.widgets.noninteractive.bg_fill = theme.surface;
    visuals.widgets.inactive.bg_fill = theme.surface;
    visuals.widgets.hovered.bg_fill = theme.surface_hover;
    visuals.widgets.active.bg_fill = theme.surface_hover;

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);

    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::new(20.0, egui::FontFamily::Monospace),
    );
    style.text_styles.insert(
        egui::TextStyle::Body,
        egui::FontId::new(14.0, egui::FontFamily::Monospace),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        egui::FontId::new(14.0, egui::FontFamily::Monospace),
    );
    style.text_styles.insert(
        egui::TextStyle::Monospace,
        egui::FontId::new(13.0, egui::FontFamily::Monospace),
    );

    ctx.set_style(style);
}
