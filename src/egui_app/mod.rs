//! Egui-based interactive timeline viewer (feature = "egui").
//!
//! The viewer only translates egui input into [`crate::gesture::InputEvent`]s
//! and paints the [`crate::timeline::Scene`]; all layout, viewport and drag
//! logic stays in the headless core.

#![cfg(feature = "egui")]

mod geometry;
mod state;
mod ui;

pub use geometry::{
    CARD_SIZE, JUMP_BUTTON_SIZE, canvas_local, card_rect, hit_test, jump_button_rect, scene_to_abs,
    to_point, to_pos2,
};
pub use state::TimelineApp;
