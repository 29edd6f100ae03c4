//! Incremental ontology graph engine.
//!
//! Search results seed a [`GraphRepository`]; activating a node toggles it and
//! pulls its parents and children through a [`FetchGateway`]. The visible set
//! is recomputed after every change, and the selected node's local
//! parent/child tree is derived on demand.
//!
//! # Example
//!
//! ```ignore
//! use std::cell::RefCell;
//! use ontology_explorer::ontology::{Explorer, HttpGateway, session};
//!
//! let explorer = RefCell::new(Explorer::new());
//! let gateway = HttpGateway::new();
//! session::search(&explorer, &gateway, "JansenRit").await;
//! session::activate(&explorer, &gateway, &"1".into(), |e| render(e.snapshot())).await?;
//! let tree = explorer.borrow().selection_tree();
//! ```

mod expansion;
mod gateway;
mod http;
mod repository;
mod selection;
pub mod session;
mod tree;
mod types;

#[cfg(test)]
mod testing;

pub use expansion::{
	Activation, Explorer, ExplorerError, FetchTicket, SearchTicket, VisibleSet, compute_visible,
};
pub use gateway::{FetchError, FetchGateway, Query, fetch_neighborhood, fetch_or_empty};
pub use http::{DEFAULT_API_BASE, HttpGateway};
pub use repository::{GraphRepository, MergeReport, Neighborhood, NodeRecord};
pub use selection::{SelectedNode, SelectionState};
pub use tree::{TreeNode, build_tree};
pub use types::{NodeId, OntologyLink, OntologyNode, Subgraph};
