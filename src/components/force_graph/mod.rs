//! Force-directed canvas view of the visible ontology graph.
//!
//! Renders the explorer's visible snapshot on an HTML canvas with:
//! - Physics-based node positioning via force simulation
//! - Incremental updates that keep existing nodes in place
//! - Click to activate, drag to pin, wheel to zoom, background drag to pan
//! - Per-type node colors and dashed `requires` relations
//!
//! # Example
//!
//! ```ignore
//! let on_activate: Rc<dyn Fn(NodeId)> = Rc::new(|id| log::info!("clicked {id}"));
//! view! { <ForceGraphCanvas data=snapshot selected=selected on_activate=on_activate /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::ForceGraphCanvas;
pub use theme::Theme;
