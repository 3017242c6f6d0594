//! Reusable GUI pieces for the organizer window

pub mod dialogs;
pub mod group_list;
pub mod settings_dialog;
