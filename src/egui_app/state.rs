#![cfg(feature = "egui")]

use eframe::egui::{self, Pos2, Vec2};

use crate::config::TimelineConfig;
use crate::store::DialogueTree;
use crate::timeline::TimelineView;

/// Interactive egui application showing a dialogue tree as a timeline.
pub struct TimelineApp {
    pub tree: DialogueTree,
    pub view: TimelineView,
    /// Editable copy of the system prompt shown in the side panel.
    pub prompt_draft: String,
    pub show_prompt_panel: bool,
    /// Canvas size from the previous frame, used to anchor the zoom buttons.
    pub(crate) canvas_size: Vec2,
    /// Last pointer position seen inside the canvas, absolute coordinates.
    pub(crate) last_hover: Option<Pos2>,
}

impl TimelineApp {
    /// Create a new app for `tree`. Layout runs right away so the first frame
    /// already has positions.
    pub fn new(tree: DialogueTree, cfg: TimelineConfig) -> Self {
        let mut view = TimelineView::new(cfg);
        view.sync(&tree);
        let prompt_draft = tree.system_prompt().to_string();
        Self {
            tree,
            view,
            prompt_draft,
            show_prompt_panel: true,
            canvas_size: Vec2::ZERO,
            last_hover: None,
        }
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        super::ui::update(self, ctx, frame);
    }
}
