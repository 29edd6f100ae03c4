//! The explorer page: search bar, graph canvas and the details panels.
//!
//! The [`Explorer`] engine lives in an `Rc<RefCell<..>>` owned by this
//! component. Every state change is pushed into signals through one publish
//! function, so the views only ever see complete snapshots.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};

use super::force_graph::{ForceGraphCanvas, Theme};
use super::info_box::InfoBox;
use super::search_bar::SearchBar;
use super::tree_view::TreeView;
use crate::config::ExplorerConfig;
use crate::ontology::{Explorer, HttpGateway, NodeId, SelectedNode, Subgraph, TreeNode, session};

/// Search bar, canvas and details panels over one [`Explorer`].
///
/// Runs `config.initial_query` on mount.
#[component]
pub fn OntologyExplorer(
	/// Host page settings.
	config: ExplorerConfig,
) -> impl IntoView {
	let explorer = Rc::new(RefCell::new(Explorer::new()));
	let gateway = Rc::new(HttpGateway::with_base_url(config.api_base.clone()));

	let snapshot = RwSignal::new(Subgraph::default());
	let selection = RwSignal::new(None::<SelectedNode>);
	let tree = RwSignal::new(None::<TreeNode>);
	let selected_id =
		Signal::derive(move || selection.with(|s| s.as_ref().map(|node| node.id.clone())));

	let publish = move |state: &Explorer| {
		snapshot.set(state.snapshot());
		selection.set(state.selection().cloned());
		tree.set(state.selection_tree());
	};

	let run_search: Rc<dyn Fn(String)> = {
		let (explorer, gateway) = (explorer.clone(), gateway.clone());
		Rc::new(move |label: String| {
			let (explorer, gateway) = (explorer.clone(), gateway.clone());
			spawn_local(async move {
				let result = session::search(&explorer, gateway.as_ref(), &label).await;
				debug!("ontology-explorer: search returned {} nodes", result.nodes.len());
				publish(&explorer.borrow());
			});
		})
	};

	let on_activate: Rc<dyn Fn(NodeId)> = {
		let (explorer, gateway) = (explorer.clone(), gateway.clone());
		Rc::new(move |id: NodeId| {
			let (explorer, gateway) = (explorer.clone(), gateway.clone());
			spawn_local(async move {
				match session::activate(&explorer, gateway.as_ref(), &id, publish).await {
					Ok(activation) => debug!(
						"ontology-explorer: {} {}",
						if activation.expanded { "expanded" } else { "collapsed" },
						activation.selected.label
					),
					Err(e) => warn!("ontology-explorer: {e}"),
				}
			});
		})
	};

	run_search(config.initial_query.clone());

	view! {
		<div class="ontology-explorer">
			<SearchBar on_search=run_search initial=config.initial_query.clone() />
			<p class="status">
				{move || format!("{} concepts shown", snapshot.with(|s| s.nodes.len()))}
			</p>
			<div class="graph-panel">
				<ForceGraphCanvas
					data=snapshot
					selected=selected_id
					on_activate=on_activate
					theme=Theme::for_name(config.theme)
					simulation=config.simulation.clone()
				/>
			</div>
			<div class="side-panel">
				<InfoBox selection=selection />
				<TreeView tree=tree />
			</div>
		</div>
	}
}
