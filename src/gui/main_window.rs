//! Frameless organizer window implemented with egui/eframe

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use eframe::{egui, CreationContext, NativeOptions};
use tracing::{debug, error, info, info_span, warn};

use crate::config::AppConfig;
use crate::filesystem::{open_with_default_app, StdFileStats};
use crate::organizer::{BatchReport, Organizer, OrganizerError};
use crate::persistence::JsonFileStore;
use crate::selection::ViewSync;
use crate::types::{Point, Rect, Size};
use crate::window::{CursorGlyph, PressTarget, WindowController};

use super::components::dialogs::{
    parse_path_lines, ConfirmAction, ConfirmDialog, NamePrompt, NoticeBoard, PathsPrompt,
    PromptAction,
};
use super::components::group_list::{self, ListOrientation, MenuAction};
use super::components::settings_dialog::{SettingsAction, SettingsDialog};
use super::constants::*;
use super::drop::{drop_acceptance, route_drop, DropAcceptance, DropRoute};

pub type AppOrganizer = Organizer<JsonFileStore, StdFileStats>;

/// Entity a confirmed delete applies to, resolved by id when confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteTarget {
    Main { main: u32 },
    Sub { main: u32, sub: u32 },
    File { main: u32, sub: u32, file: u32 },
}

/// How the sub-group pane is sized this frame
#[derive(Debug, Clone, Copy, PartialEq)]
enum PaneWidth {
    Hidden,
    /// Starting width; the user may drag the splitter afterwards
    Default(f32),
    /// Overrides the dragged width once after the ratio changes
    Exact(f32),
}

fn sub_pane_width(config: &AppConfig, total: f32, force: bool) -> PaneWidth {
    let (sub, _) = config.pane_widths(total);
    if sub < 1.0 {
        PaneWidth::Hidden
    } else if force {
        PaneWidth::Exact(sub)
    } else {
        PaneWidth::Default(sub)
    }
}

enum Dialog {
    None,
    AddMain(NamePrompt),
    AddSub { main: u32, prompt: NamePrompt },
    AddFiles { main: u32, sub: u32, prompt: PathsPrompt },
    Confirm { target: DeleteTarget, dialog: ConfirmDialog },
}

struct OrganizerApp {
    organizer: AppOrganizer,
    sync: ViewSync,
    window: WindowController,
    config: AppConfig,
    config_path: PathBuf,
    dialog: Dialog,
    settings: Option<SettingsDialog>,
    notices: NoticeBoard,
    force_pane_width: bool,
}

impl OrganizerApp {
    fn new(
        _cc: &CreationContext<'_>,
        config: AppConfig,
        config_path: PathBuf,
        organizer: AppOrganizer,
        startup_errors: Vec<String>,
    ) -> Self {
        info!("Initializing organizer window");

        let sync = ViewSync::new(organizer.tree());
        let mut notices = NoticeBoard::default();
        for text in startup_errors {
            notices.error(text);
        }

        Self {
            organizer,
            sync,
            window: WindowController::new(info_span!("window")),
            config,
            config_path,
            dialog: Dialog::None,
            settings: None,
            notices,
            force_pane_width: false,
        }
    }

    fn modal_open(&self) -> bool {
        !matches!(self.dialog, Dialog::None) || self.settings.is_some() || !self.notices.is_empty()
    }

    fn report_error(&mut self, err: OrganizerError) {
        let text = err.to_string();
        match err {
            OrganizerError::Tree(_) => self.notices.warn(text),
            OrganizerError::Persistence(_) => self.notices.error(text),
        }
    }

    fn report_batch(&mut self, report: BatchReport) {
        for warning in &report.warnings {
            self.notices.warn(warning.to_string());
        }
        if let Some(err) = &report.save_error {
            self.notices.error(format!(
                "Failed to save files, {} file(s) were not added: {err:#}",
                report.added.len()
            ));
        }
        info!(
            saved = report.saved_count(),
            skipped = report.warnings.len(),
            "File batch finished"
        );
    }

    fn after_mutation(&mut self) {
        self.sync.reconcile(self.organizer.tree());
    }

    /// Returns true when the pointer is over a part of the bar that drags
    fn title_bar(&mut self, ctx: &egui::Context) -> bool {
        let modal = self.modal_open();
        let mut drag_surface = false;

        egui::TopBottomPanel::top("title_bar")
            .min_height(TITLE_BAR_HEIGHT)
            .show(ctx, |ui| {
                let background =
                    ui.interact(ui.max_rect(), ui.id().with("title_drag"), egui::Sense::click());
                drag_surface |= background.hovered();

                ui.horizontal(|ui| {
                    if ui.button("Settings").clicked() && !modal {
                        self.open_settings(ctx);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        window_buttons(ctx, ui);

                        ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
                            let rows = self.sync.main_rows(self.organizer.tree());
                            let response = group_list::show(
                                ui,
                                "main_groups",
                                &rows,
                                ListOrientation::Horizontal,
                                &[
                                    ("Add main group", MenuAction::Add),
                                    ("Delete main group", MenuAction::Delete),
                                ],
                            );
                            drag_surface |= response.background_hovered;
                            if modal {
                                return;
                            }
                            if let Some(index) = response.selected {
                                self.sync.select_main(self.organizer.tree(), index);
                            }
                            match response.menu {
                                Some(MenuAction::Add) => {
                                    self.dialog = Dialog::AddMain(NamePrompt::new(
                                        "Add main group",
                                        "Main group name:",
                                    ));
                                }
                                Some(MenuAction::Delete) => self.request_delete_main(),
                                None => {}
                            }
                        });
                    });
                });
            });

        drag_surface
    }

    fn open_settings(&mut self, ctx: &egui::Context) {
        let current = ctx
            .input(|i| i.viewport().inner_rect)
            .map(|r| Size::new(r.width().round() as i32, r.height().round() as i32))
            .unwrap_or_else(|| {
                Size::new(self.config.window_width as i32, self.config.window_height as i32)
            });
        self.settings = Some(SettingsDialog::new(&self.config, current));
    }

    fn sub_group_panel(&mut self, ctx: &egui::Context) {
        let total = ctx.available_rect().width();
        let panel = egui::SidePanel::left("sub_groups")
            .resizable(true)
            .width_range(0.0..=total);
        let width = sub_pane_width(&self.config, total, self.force_pane_width);
        self.force_pane_width = false;
        let panel = match width {
            PaneWidth::Hidden => return,
            PaneWidth::Default(width) => panel.default_width(width),
            PaneWidth::Exact(width) => panel.exact_width(width),
        };
        let modal = self.modal_open();

        panel.show(ctx, |ui| {
            let rows = self.sync.sub_rows(self.organizer.tree());
            let response = group_list::show(
                ui,
                "sub_groups",
                &rows,
                ListOrientation::Vertical,
                &[
                    ("Add sub-group", MenuAction::Add),
                    ("Delete sub-group", MenuAction::Delete),
                ],
            );
            if modal {
                return;
            }
            if let Some(index) = response.selected {
                self.sync.select_sub(self.organizer.tree(), index);
            }
            match response.menu {
                Some(MenuAction::Add) => self.request_add_sub(),
                Some(MenuAction::Delete) => self.request_delete_sub(),
                None => {}
            }
        });
    }

    fn file_panel(&mut self, ctx: &egui::Context) {
        let modal = self.modal_open();
        let hovered: Vec<Option<PathBuf>> =
            ctx.input(|i| i.raw.hovered_files.iter().map(|f| f.path.clone()).collect());

        egui::CentralPanel::default().show(ctx, |ui| {
            if !hovered.is_empty() {
                let has_target = self.sync.sub_path(self.organizer.tree()).is_some();
                let (color, text) = match drop_acceptance(&hovered, has_target, &StdFileStats) {
                    DropAcceptance::Accept => (ACCEPT_COLOR, "Drop to add files"),
                    DropAcceptance::NoTarget => (WARNING_COLOR, "Select a sub-group first"),
                    DropAcceptance::NotFiles => (WARNING_COLOR, "Only files can be dropped"),
                };
                ui.colored_label(color, text);
                ui.separator();
            }

            let rows = self.sync.file_rows(self.organizer.tree());
            let response = group_list::show(
                ui,
                "files",
                &rows,
                ListOrientation::Vertical,
                &[("Add files", MenuAction::Add), ("Delete file", MenuAction::Delete)],
            );
            if modal {
                return;
            }
            if let Some(index) = response.selected {
                self.sync.select_file(self.organizer.tree(), index);
            }
            if let Some(index) = response.double_clicked {
                self.open_file(index);
            }
            match response.menu {
                Some(MenuAction::Add) => self.request_add_files(),
                Some(MenuAction::Delete) => self.request_delete_file(),
                None => {}
            }
        });
    }

    fn open_file(&self, index: usize) {
        let tree = self.organizer.tree();
        let Some(file) = self.sync.selected_sub(tree).and_then(|sub| sub.files.get(index)) else {
            return;
        };
        if let Err(err) = open_with_default_app(Path::new(&file.path)) {
            error!(error = ?err, name = %file.name, "Failed to open file");
        }
    }

    fn request_add_sub(&mut self) {
        match self.sync.selected_main(self.organizer.tree()) {
            Some(main) => {
                self.dialog = Dialog::AddSub {
                    main: main.id,
                    prompt: NamePrompt::new("Add sub-group", "Sub-group name:"),
                };
            }
            None => self.notices.warn("Select a main group first"),
        }
    }

    fn request_add_files(&mut self) {
        let tree = self.organizer.tree();
        match (self.sync.selected_main(tree), self.sync.selected_sub(tree)) {
            (Some(main), Some(sub)) => {
                self.dialog = Dialog::AddFiles {
                    main: main.id,
                    sub: sub.id,
                    prompt: PathsPrompt::new(),
                };
            }
            _ => self.notices.warn("Select a main group and a sub-group first"),
        }
    }

    fn request_delete_main(&mut self) {
        match self.sync.selected_main(self.organizer.tree()) {
            Some(main) => {
                self.dialog = Dialog::Confirm {
                    target: DeleteTarget::Main { main: main.id },
                    dialog: ConfirmDialog::new(format!(
                        "Delete main group '{}' and everything in it?",
                        main.name
                    )),
                };
            }
            None => self.notices.warn("Select a main group to delete"),
        }
    }

    fn request_delete_sub(&mut self) {
        let tree = self.organizer.tree();
        match (self.sync.selected_main(tree), self.sync.selected_sub(tree)) {
            (Some(main), Some(sub)) => {
                self.dialog = Dialog::Confirm {
                    target: DeleteTarget::Sub {
                        main: main.id,
                        sub: sub.id,
                    },
                    dialog: ConfirmDialog::new(format!(
                        "Delete sub-group '{}' and its files?",
                        sub.name
                    )),
                };
            }
            _ => self.notices.warn("Select a sub-group to delete"),
        }
    }

    fn request_delete_file(&mut self) {
        let tree = self.organizer.tree();
        let (Some(main), Some(sub)) = (self.sync.selected_main(tree), self.sync.selected_sub(tree))
        else {
            self.notices.warn("Select a main group and a sub-group first");
            return;
        };
        match self.sync.selected_file(tree) {
            Some(file) => {
                self.dialog = Dialog::Confirm {
                    target: DeleteTarget::File {
                        main: main.id,
                        sub: sub.id,
                        file: file.id,
                    },
                    dialog: ConfirmDialog::new(format!(
                        "Remove '{}' from this sub-group?",
                        file.name
                    )),
                };
            }
            None => self.notices.warn("Select a file to delete"),
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let dialog = std::mem::replace(&mut self.dialog, Dialog::None);
        self.dialog = match dialog {
            Dialog::None => Dialog::None,
            Dialog::AddMain(mut prompt) => match prompt.show(ctx) {
                PromptAction::None => Dialog::AddMain(prompt),
                PromptAction::Cancel => Dialog::None,
                PromptAction::Submit(name) => {
                    let result = self.organizer.add_main_group(&name);
                    self.after_mutation();
                    if let Err(err) = result {
                        self.report_error(err);
                    }
                    Dialog::None
                }
            },
            Dialog::AddSub { main, mut prompt } => match prompt.show(ctx) {
                PromptAction::None => Dialog::AddSub { main, prompt },
                PromptAction::Cancel => Dialog::None,
                PromptAction::Submit(name) => {
                    self.add_sub_group(main, &name);
                    Dialog::None
                }
            },
            Dialog::AddFiles {
                main,
                sub,
                mut prompt,
            } => match prompt.show(ctx) {
                PromptAction::None => Dialog::AddFiles { main, sub, prompt },
                PromptAction::Cancel => Dialog::None,
                PromptAction::Submit(text) => {
                    self.add_files(main, sub, &parse_path_lines(&text), false);
                    Dialog::None
                }
            },
            Dialog::Confirm { target, dialog } => match dialog.show(ctx) {
                ConfirmAction::None => Dialog::Confirm { target, dialog },
                ConfirmAction::Cancel => Dialog::None,
                ConfirmAction::Confirm => {
                    self.delete(target);
                    Dialog::None
                }
            },
        };
    }

    fn add_sub_group(&mut self, main: u32, name: &str) {
        let Some(main_index) = self.organizer.tree().main_index_of(main) else {
            self.notices.warn("The main group no longer exists");
            return;
        };
        let result = self.organizer.add_sub_group(main_index, name);
        self.after_mutation();
        if let Err(err) = result {
            self.report_error(err);
        }
    }

    fn add_files(&mut self, main: u32, sub: u32, paths: &[PathBuf], dropped: bool) {
        let tree = self.organizer.tree();
        let Some((main_index, sub_index)) = tree
            .main_index_of(main)
            .and_then(|m| Some((m, tree.sub_index_of(m, sub)?)))
        else {
            self.notices.warn("The sub-group no longer exists");
            return;
        };

        let result = if dropped {
            self.organizer.handle_dropped_paths(main_index, sub_index, paths)
        } else {
            self.organizer.add_files(main_index, sub_index, paths)
        };
        self.after_mutation();
        match result {
            Ok(report) => self.report_batch(report),
            Err(err) => self.report_error(err),
        }
    }

    fn delete(&mut self, target: DeleteTarget) {
        let tree = self.organizer.tree();
        let result = match target {
            DeleteTarget::Main { main } => tree
                .main_index_of(main)
                .map(|m| self.organizer.delete_main_group(m).map(drop)),
            DeleteTarget::Sub { main, sub } => tree
                .main_index_of(main)
                .and_then(|m| Some((m, tree.sub_index_of(m, sub)?)))
                .map(|(m, s)| self.organizer.delete_sub_group(m, s).map(drop)),
            DeleteTarget::File { main, sub, file } => tree
                .main_index_of(main)
                .and_then(|m| Some((m, tree.sub_index_of(m, sub)?)))
                .and_then(|(m, s)| {
                    let index = tree.file_index_of(m, s, file)?;
                    let name = tree.sub_group(m, s).ok()?.files[index].name.clone();
                    Some((m, s, name))
                })
                .map(|(m, s, name)| self.organizer.delete_file(m, s, &name).map(drop)),
        };

        self.after_mutation();
        match result {
            Some(Ok(())) => {}
            Some(Err(err)) => self.report_error(err),
            None => warn!(?target, "Delete target vanished before confirmation"),
        }
    }

    fn show_settings(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.settings.as_mut() else {
            return;
        };
        match dialog.show(ctx) {
            SettingsAction::None => {}
            SettingsAction::Close => self.settings = None,
            SettingsAction::Apply(config) => {
                info!(?config, "Applying settings");
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                    config.window_width as f32,
                    config.window_height as f32,
                )));
                self.force_pane_width = config.sub_group_ratio != self.config.sub_group_ratio;
                if let Err(err) = config.save_to(&self.config_path) {
                    error!(error = ?err, "Failed to save config");
                    self.notices.error(format!("Failed to save settings: {err:#}"));
                }
                self.config = config;
                self.settings = None;
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let paths: Vec<PathBuf> =
            ctx.input(|i| i.raw.dropped_files.iter().filter_map(|f| f.path.clone()).collect());
        if paths.is_empty() {
            return;
        }

        let tree = self.organizer.tree();
        let target = self
            .sync
            .selected_main(tree)
            .zip(self.sync.selected_sub(tree))
            .map(|(main, sub)| (main.id, sub.id));
        match route_drop(self.modal_open(), target) {
            DropRoute::Add { main, sub } => {
                debug!(count = paths.len(), "Files dropped onto window");
                self.add_files(main, sub, &paths, true);
            }
            DropRoute::Busy => {
                warn!(count = paths.len(), "Ignoring drop while a dialog is open");
                self.notices
                    .warn("Close the open dialog before dropping files; nothing was added");
            }
            DropRoute::NoTarget => {
                warn!(count = paths.len(), "Ignoring drop without a selected sub-group");
                self.notices.warn("Select a main group and a sub-group first");
            }
        }
    }

    fn handle_window_pointer(&mut self, ctx: &egui::Context, drag_surface: bool) {
        let (pressed, released, local, outer, inner, maximized) = ctx.input(|i| {
            let viewport = i.viewport();
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
                viewport.outer_rect,
                viewport.inner_rect,
                viewport.maximized.unwrap_or(false),
            )
        });

        let (Some(local), Some(outer), Some(inner)) = (local, outer, inner) else {
            // Platforms that hide window geometry still get a native move
            if pressed && drag_surface {
                ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
            }
            if released {
                self.window.release();
            }
            return;
        };

        let window = Rect::new(
            outer.min.x.round() as i32,
            outer.min.y.round() as i32,
            inner.width().round() as i32,
            inner.height().round() as i32,
        );
        let local = to_point(local);
        let global = to_point(inner.min) + local;

        if pressed {
            let target = PressTarget {
                on_drag_surface: drag_surface,
                maximized,
            };
            self.window.try_press(local, global, window, target);
        }

        if let Some(target) = self.window.pointer_moved(local, global, window) {
            if target != window {
                apply_geometry(ctx, target);
            }
        }

        if released {
            self.window.release();
        }

        if let Some(icon) = cursor_icon(self.window.cursor()) {
            ctx.set_cursor_icon(icon);
        }
    }
}

impl eframe::App for OrganizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let drag_surface = self.title_bar(ctx);
        self.sub_group_panel(ctx);
        self.file_panel(ctx);

        self.handle_dropped_files(ctx);

        // Dialogs first so a notice raised by them shows on the next frame
        self.show_dialog(ctx);
        self.show_settings(ctx);
        self.notices.show(ctx);

        self.handle_window_pointer(ctx, drag_surface);
    }
}

/// Close, maximize toggle and minimize, laid out right to left
fn window_buttons(ctx: &egui::Context, ui: &mut egui::Ui) {
    let button_size = egui::vec2(WINDOW_BUTTON_WIDTH, TITLE_BAR_HEIGHT - ITEM_SPACING);

    if ui.add(egui::Button::new("×").min_size(button_size)).clicked() {
        info!("Close requested from title bar");
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
    if ui.add(egui::Button::new("□").min_size(button_size)).clicked() {
        let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        debug!(maximized = !maximized, "Toggling maximized state");
        ctx.send_viewport_cmd(egui::ViewportCommand::Maximized(!maximized));
    }
    if ui.add(egui::Button::new("—").min_size(button_size)).clicked() {
        ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
    }
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x.round() as i32, pos.y.round() as i32)
}

fn apply_geometry(ctx: &egui::Context, rect: Rect) {
    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
        rect.x as f32,
        rect.y as f32,
    )));
    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
        rect.width.max(1) as f32,
        rect.height.max(1) as f32,
    )));
}

fn cursor_icon(glyph: CursorGlyph) -> Option<egui::CursorIcon> {
    match glyph {
        CursorGlyph::Arrow => None,
        CursorGlyph::SizeHorizontal => Some(egui::CursorIcon::ResizeHorizontal),
        CursorGlyph::SizeVertical => Some(egui::CursorIcon::ResizeVertical),
        CursorGlyph::SizeForwardDiagonal => Some(egui::CursorIcon::ResizeNwSe),
        CursorGlyph::SizeBackwardDiagonal => Some(egui::CursorIcon::ResizeNeSw),
    }
}

/// Open the organizer window and block until it is closed
pub fn run_gui(
    config: AppConfig,
    config_path: PathBuf,
    organizer: AppOrganizer,
    startup_errors: Vec<String>,
) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width as f32, config.window_height as f32])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_decorations(false)
            .with_drag_and_drop(true)
            .with_title(APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            Ok(Box::new(OrganizerApp::new(
                cc,
                config,
                config_path,
                organizer,
                startup_errors,
            )))
        }),
    )
    .map_err(|err| anyhow!("Failed to launch organizer window: {err}"))
}
