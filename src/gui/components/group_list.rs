//! Selectable list with hover-select and a right-click menu

use eframe::egui;

use crate::selection::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrientation {
    Horizontal,
    Vertical,
}

/// What happened to the list this frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListResponse {
    /// Row under the pointer or clicked; the row becomes the selection
    pub selected: Option<usize>,
    pub double_clicked: Option<usize>,
    pub menu: Option<MenuAction>,
    /// Pointer is over the list but not over a row
    pub background_hovered: bool,
}

fn menu_ui(ui: &mut egui::Ui, items: &[(&str, MenuAction)], action: &mut Option<MenuAction>) {
    for (label, item) in items {
        if ui.button(*label).clicked() {
            *action = Some(*item);
            ui.close();
        }
    }
}

/// Render `rows`; `menu` lists the context menu entries
pub fn show(
    ui: &mut egui::Ui,
    id_salt: &str,
    rows: &[Row],
    orientation: ListOrientation,
    menu: &[(&str, MenuAction)],
) -> ListResponse {
    let mut response = ListResponse::default();

    // Background first so rows added later win hover and clicks
    let background = ui.interact(
        ui.max_rect(),
        ui.id().with((id_salt, "background")),
        egui::Sense::click(),
    );

    let mut add_rows = |ui: &mut egui::Ui| {
        for (idx, row) in rows.iter().enumerate() {
            let label = ui.selectable_label(row.selected, &row.name);
            if label.hovered() || label.clicked() || label.secondary_clicked() {
                response.selected = Some(idx);
            }
            if label.double_clicked() {
                response.double_clicked = Some(idx);
            }
            label.context_menu(|ui| menu_ui(ui, menu, &mut response.menu));
        }
    };

    match orientation {
        ListOrientation::Horizontal => {
            egui::ScrollArea::horizontal()
                .id_salt(id_salt)
                .show(ui, |ui| ui.horizontal_wrapped(|ui| add_rows(ui)));
        }
        ListOrientation::Vertical => {
            egui::ScrollArea::vertical()
                .id_salt(id_salt)
                .auto_shrink([false, false])
                .show(ui, |ui| ui.vertical(|ui| add_rows(ui)));
        }
    }

    response.background_hovered = background.hovered();
    background.context_menu(|ui| menu_ui(ui, menu, &mut response.menu));
    response
}
