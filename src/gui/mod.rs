//! egui shell around the organizer

mod components;
mod constants;
mod drop;
mod main_window;

pub use main_window::run_gui;
