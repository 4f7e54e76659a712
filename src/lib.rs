//! Timeline layout and viewport engine for branching dialogue histories.
//!
//! The crate places dialogue nodes on a 2D canvas relative to their parent,
//! keeps a pannable/zoomable viewport, tracks the active root-to-current path
//! and lets the user drag nodes around. [`timeline::TimelineView`] bundles all
//! of it for one visualization; [`store::DialogueTree`] is a simple in-memory
//! node store to drive it.
//!
//! The binary `forking-paths` lays out a tree document and prints the
//! resulting scene as JSON.

pub mod active_path;
pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod model;
pub mod store;
pub mod timeline;
pub mod viewport;

// Optional GUI/egui functionality lives behind the `egui` feature flag.
// It renders a TimelineView interactively and is used by demos/timeline_viewer.rs.
#[cfg(feature = "egui")]
pub mod egui_app;
