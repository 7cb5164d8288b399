//! Shared UI styling for the gesturenav dark theme.
//!
//! The palette is optimized for the use case this client exists for:
//! hands-free operation at a distance, where the highlighted button must be
//! unmistakable from across the room.

use eframe::egui::{self, Color32, Frame, Stroke};

/// Centralized color palette for the gesturenav dark theme.
pub struct UiColors;

impl UiColors {
    /// Deepest background color for emphasized content areas
    pub const EXTREME_BG: Color32 = Color32::from_rgb(20, 20, 20);

    /// Border color for component separation
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Fill color for the highlighted navigation button
    pub const HIGHLIGHT: Color32 = Color32::from_rgb(70, 130, 220);

    /// Connected status indicator color (green)
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Disconnected status indicator color (red)
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);
}

/// Creates a styled frame with consistent visual parameters.
pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(4)
        .outer_margin(2)
}

/// Connection indicator state for the bottom status panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkIndicator {
    #[default]
    Waiting,
    Connected,
    Disconnected,
}

impl LinkIndicator {
    pub fn color(&self) -> Color32 {
        match self {
            LinkIndicator::Connected => UiColors::ACTIVE,
            LinkIndicator::Disconnected => UiColors::INACTIVE,
            LinkIndicator::Waiting => UiColors::BORDER,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LinkIndicator::Connected => "tracker online",
            LinkIndicator::Disconnected => "tracker offline",
            LinkIndicator::Waiting => "connecting...",
        }
    }
}

/// Paints a small status dot followed by its label.
pub fn link_badge(ui: &mut egui::Ui, indicator: LinkIndicator) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
    ui.painter().circle_filled(rect.center(), 4.0, indicator.color());
    ui.label(indicator.label());
}
