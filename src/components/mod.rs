//! Leptos components.

/// Draggable graph board backed by the page's document.
pub mod graph_board;
