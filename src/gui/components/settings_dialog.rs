//! Settings dialog for window size and pane ratio

use eframe::egui;
use thiserror::Error;

use crate::config::AppConfig;
use crate::constants::validation::{MAX_RATIO_PERCENT, MIN_WINDOW_DIMENSION};
use crate::constants::AUTHOR_URL;
use crate::types::Size;

use super::super::constants::{ERROR_COLOR, ITEM_SPACING, SECTION_SPACING};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be a whole number, got '{value}'")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be at least {min}")]
    TooSmall { field: &'static str, min: u32 },
    #[error("Sub-group ratio must be between 0 and {max}")]
    RatioOutOfRange { max: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    Apply(AppConfig),
    Close,
}

/// Edits are kept as text until applied so partial input never reaches the config
pub struct SettingsDialog {
    width: String,
    height: String,
    ratio: String,
    error: Option<String>,
}

impl SettingsDialog {
    /// Prefill with the live window size and the stored ratio
    pub fn new(config: &AppConfig, current: Size) -> Self {
        Self {
            width: current.width.to_string(),
            height: current.height.to_string(),
            ratio: config.sub_group_ratio.to_string(),
            error: None,
        }
    }

    /// Validate the text fields into a config
    pub fn parse(&self) -> Result<AppConfig, SettingsError> {
        let window_width = parse_field("Width", &self.width)?;
        let window_height = parse_field("Height", &self.height)?;
        let sub_group_ratio = parse_field("Sub-group ratio", &self.ratio)?;

        if window_width < MIN_WINDOW_DIMENSION {
            return Err(SettingsError::TooSmall {
                field: "Width",
                min: MIN_WINDOW_DIMENSION,
            });
        }
        if window_height < MIN_WINDOW_DIMENSION {
            return Err(SettingsError::TooSmall {
                field: "Height",
                min: MIN_WINDOW_DIMENSION,
            });
        }
        if sub_group_ratio > u32::from(MAX_RATIO_PERCENT) {
            return Err(SettingsError::RatioOutOfRange {
                max: MAX_RATIO_PERCENT,
            });
        }

        Ok(AppConfig {
            sub_group_ratio,
            window_width,
            window_height,
        })
    }

    pub fn show(&mut self, ctx: &egui::Context) -> SettingsAction {
        let mut action = SettingsAction::None;

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.group(|ui| {
                    ui.label(egui::RichText::new("Window").strong());
                    ui.add_space(ITEM_SPACING);

                    egui::Grid::new("settings_grid")
                        .num_columns(2)
                        .spacing([ITEM_SPACING, ITEM_SPACING])
                        .show(ui, |ui| {
                            ui.label("Width:");
                            ui.text_edit_singleline(&mut self.width);
                            ui.end_row();

                            ui.label("Height:");
                            ui.text_edit_singleline(&mut self.height);
                            ui.end_row();

                            ui.label("Sub-group ratio (%):");
                            ui.text_edit_singleline(&mut self.ratio);
                            ui.end_row();
                        });
                });

                if let Some(error) = &self.error {
                    ui.add_space(ITEM_SPACING);
                    ui.colored_label(ERROR_COLOR, error);
                }

                ui.add_space(SECTION_SPACING);

                ui.horizontal(|ui| {
                    ui.label("Author:");
                    ui.hyperlink(AUTHOR_URL);
                });

                ui.add_space(SECTION_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Save and apply").clicked() {
                        match self.parse() {
                            Ok(config) => {
                                self.error = None;
                                action = SettingsAction::Apply(config);
                            }
                            Err(err) => self.error = Some(err.to_string()),
                        }
                    }
                    if ui.button("Close").clicked() {
                        action = SettingsAction::Close;
                    }
                });
            });

        action
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<u32, SettingsError> {
    value.trim().parse().map_err(|_| SettingsError::NotANumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog(width: &str, height: &str, ratio: &str) -> SettingsDialog {
        SettingsDialog {
            width: width.to_string(),
            height: height.to_string(),
            ratio: ratio.to_string(),
            error: None,
        }
    }

    #[test]
    fn test_prefills_from_window_and_config() {
        let config = AppConfig::default();
        let d = SettingsDialog::new(&config, Size::new(812, 640));
        assert_eq!(d.width, "812");
        assert_eq!(d.height, "640");
        assert_eq!(d.ratio, "20");
    }

    #[test]
    fn test_parse_valid_values() {
        let config = dialog(" 900 ", "600", "35").parse().unwrap();
        assert_eq!(config.window_width, 900);
        assert_eq!(config.window_height, 600);
        assert_eq!(config.sub_group_ratio, 35);
    }

    #[test]
    fn test_boundaries_are_accepted() {
        let config = dialog("300", "300", "100").parse().unwrap();
        assert_eq!((config.window_width, config.window_height), (300, 300));
        assert_eq!(config.sub_group_ratio, 100);
        assert!(dialog("300", "300", "0").parse().is_ok());
    }

    #[test]
    fn test_rejects_non_numeric() {
        let err = dialog("wide", "600", "20").parse().unwrap_err();
        assert_eq!(
            err,
            SettingsError::NotANumber {
                field: "Width",
                value: "wide".to_string()
            }
        );
        assert!(dialog("700", "700", "-5").parse().is_err());
    }

    #[test]
    fn test_rejects_small_window() {
        let err = dialog("700", "299", "20").parse().unwrap_err();
        assert_eq!(
            err,
            SettingsError::TooSmall {
                field: "Height",
                min: 300
            }
        );
    }

    #[test]
    fn test_rejects_ratio_over_100() {
        let err = dialog("700", "700", "101").parse().unwrap_err();
        assert_eq!(err, SettingsError::RatioOutOfRange { max: 100 });
        assert_eq!(err.to_string(), "Sub-group ratio must be between 0 and 100");
    }
}
