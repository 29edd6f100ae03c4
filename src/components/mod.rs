//! Leptos UI: the explorer page and its panels.

pub mod explorer;
pub mod force_graph;
pub mod info_box;
pub mod search_bar;
pub mod tree_view;
