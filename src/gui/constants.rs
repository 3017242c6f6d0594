//! GUI-specific constants for layout and colors

use eframe::egui;

pub const APP_TITLE: &str = "kuusoo";

/// Window minimum enforced by the viewport
pub const WINDOW_MIN_WIDTH: f32 = 300.0;
pub const WINDOW_MIN_HEIGHT: f32 = 300.0;

/// Title bar
pub const TITLE_BAR_HEIGHT: f32 = 30.0;
pub const WINDOW_BUTTON_WIDTH: f32 = 30.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Message colors
pub const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 160, 0);
pub const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const ACCEPT_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 160, 0);
