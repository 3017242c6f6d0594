//! Modal prompts: group names, file paths, delete confirmation and notices

use std::collections::VecDeque;
use std::path::PathBuf;

use eframe::egui;

use crate::gui::constants::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    None,
    Submit(String),
    Cancel,
}

/// Single-line text prompt ("Add main group", "Add sub-group")
pub struct NamePrompt {
    title: String,
    label: String,
    text: String,
}

impl NamePrompt {
    pub fn new(title: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
            text: String::new(),
        }
    }

    /// Empty or whitespace-only input is not submitted
    pub fn show(&mut self, ctx: &egui::Context) -> PromptAction {
        let mut action = PromptAction::None;

        egui::Window::new(self.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(self.label.as_str());
                let edit = ui.text_edit_singleline(&mut self.text);
                edit.request_focus();
                let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if (ui.button("OK").clicked() || entered) && !self.text.trim().is_empty() {
                        action = PromptAction::Submit(self.text.trim().to_string());
                    }
                    if ui.button("Cancel").clicked() {
                        action = PromptAction::Cancel;
                    }
                });
            });

        action
    }
}

/// Multi-line prompt taking one file path per line
pub struct PathsPrompt {
    text: String,
}

impl PathsPrompt {
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> PromptAction {
        let mut action = PromptAction::None;

        egui::Window::new("Add files")
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("File paths, one per line:");
                ui.add(
                    egui::TextEdit::multiline(&mut self.text)
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() {
                        action = PromptAction::Submit(self.text.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        action = PromptAction::Cancel;
                    }
                });
            });

        action
    }
}

/// Split prompt text into paths
///
/// Blank lines are skipped, surrounding quotes and a `file://` prefix are
/// removed so paths copied from a file manager work as-is.
pub fn parse_path_lines(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .map(|line| line.trim_matches('"').trim_matches('\''))
        .map(|line| line.strip_prefix("file://").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    None,
    Confirm,
    Cancel,
}

pub struct ConfirmDialog {
    message: String,
}

impl ConfirmDialog {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn show(&self, ctx: &egui::Context) -> ConfirmAction {
        let mut action = ConfirmAction::None;

        egui::Window::new("Confirm delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(self.message.as_str());
                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        action = ConfirmAction::Confirm;
                    }
                    // Default answer is No
                    if ui.button("No").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                        action = ConfirmAction::Cancel;
                    }
                });
            });

        action
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

/// Queue of messages shown one at a time until dismissed
#[derive(Debug, Default)]
pub struct NoticeBoard {
    queue: VecDeque<Notice>,
}

impl NoticeBoard {
    pub fn warn(&mut self, text: impl Into<String>) {
        self.queue.push_back(Notice {
            severity: Severity::Warning,
            text: text.into(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.queue.push_back(Notice {
            severity: Severity::Error,
            text: text.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn current(&self) -> Option<&Notice> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) {
        self.queue.pop_front();
    }

    /// Show the oldest notice until its OK button is pressed
    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.current() else {
            return;
        };
        let (title, color) = match notice.severity {
            Severity::Warning => ("Warning", WARNING_COLOR),
            Severity::Error => ("Error", ERROR_COLOR),
        };
        let text = notice.text.clone();

        let mut dismissed = false;
        egui::Window::new(title)
            .id(egui::Id::new("notice_board"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.colored_label(color, text);
                ui.add_space(ITEM_SPACING);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.dismiss();
        }
    }
}
