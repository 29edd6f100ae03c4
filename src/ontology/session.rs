//! Async drivers that run explorer operations against a gateway.
//!
//! The explorer is shared as a `RefCell` (the UI holds it in an `Rc`). Borrows
//! are taken only between awaits, so a second activation can start while the
//! first one's fetch is still in flight; the explorer's ticket check sorts out
//! which result still applies.

use std::cell::RefCell;

use log::info;

use super::expansion::{Activation, Explorer, ExplorerError, SearchTicket};
use super::gateway::{FetchGateway, Query, fetch_neighborhood, fetch_or_empty};
use super::types::{NodeId, Subgraph};

/// Runs a by-label search and starts a new exploration from its result.
/// Surrounding whitespace is trimmed; an empty label loads the whole ontology.
///
/// If another search is started before this one's response arrives, this
/// response is dropped and the returned snapshot is whatever is loaded.
pub async fn search<G: FetchGateway + ?Sized>(
	explorer: &RefCell<Explorer>,
	gateway: &G,
	label: &str,
) -> Subgraph {
	let label = label.trim();
	info!("ontology: searching for {label:?}");
	let ticket = explorer.borrow_mut().begin_search();
	let result = fetch_or_empty(gateway, &Query::ByLabel(label.to_string())).await;
	load(explorer, ticket, &result)
}

/// Like [`search`], but starts from the label's connections query.
pub async fn search_connections<G: FetchGateway + ?Sized>(
	explorer: &RefCell<Explorer>,
	gateway: &G,
	label: &str,
) -> Subgraph {
	let ticket = explorer.borrow_mut().begin_search();
	let result = fetch_or_empty(gateway, &Query::Connections(label.trim().to_string())).await;
	load(explorer, ticket, &result)
}

/// Loads `result` unless a newer search got there first. Returns the visible
/// set either way.
fn load(explorer: &RefCell<Explorer>, ticket: SearchTicket, result: &Subgraph) -> Subgraph {
	let mut explorer = explorer.borrow_mut();
	explorer.complete_search(ticket, result);
	explorer.snapshot()
}

/// Activates a node: toggles it, and when it expands fetches its parents and
/// children and applies them if nothing toggled the node in the meantime.
///
/// `publish` sees the explorer after the toggle and again after a fetch
/// result was applied. A discarded result does not publish.
pub async fn activate<G: FetchGateway + ?Sized>(
	explorer: &RefCell<Explorer>,
	gateway: &G,
	id: &NodeId,
	mut publish: impl FnMut(&Explorer),
) -> Result<Activation, ExplorerError> {
	let activation = explorer.borrow_mut().begin_activation(id)?;
	publish(&explorer.borrow());

	if let Some(ticket) = &activation.ticket {
		let fetched = fetch_neighborhood(gateway, &ticket.label, &ticket.id).await;
		let applied = explorer.borrow_mut().complete_activation(ticket, &fetched);
		if applied {
			publish(&explorer.borrow());
		}
	}

	Ok(activation)
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use futures_util::future::join;

	use super::*;
	use crate::ontology::testing::ScriptedGateway;
	use crate::ontology::types::{OntologyLink, OntologyNode};

	fn visible(explorer: &RefCell<Explorer>) -> BTreeSet<String> {
		explorer
			.borrow()
			.snapshot()
			.node_ids()
			.map(|id| id.to_string())
			.collect()
	}

	fn set(ids: &[&str]) -> BTreeSet<String> {
		ids.iter().map(|s| s.to_string()).collect()
	}

	fn coupling_gateway() -> ScriptedGateway {
		let gateway = ScriptedGateway::default();
		gateway.respond(
			Query::ByLabel("CouplingX".into()),
			Subgraph {
				nodes: vec![OntologyNode::new(1u64, "CouplingX", "Coupling")],
				links: vec![],
			},
		);
		gateway.respond(
			Query::Children {
				label: "CouplingX".into(),
				id: "1".into(),
			},
			Subgraph {
				nodes: vec![OntologyNode::new(2u64, "LinearCoupling", "Coupling")],
				links: vec![OntologyLink::new("1", "2", "is-a")],
			},
		);
		gateway.respond(
			Query::Parents {
				label: "CouplingX".into(),
				id: "1".into(),
			},
			Subgraph {
				nodes: vec![OntologyNode::new(3u64, "Coupling", "Coupling")],
				links: vec![OntologyLink::new("3", "1", "is-a")],
			},
		);
		gateway
	}

	#[tokio::test]
	async fn empty_search_loads_everything() {
		let gateway = ScriptedGateway::default();
		gateway.respond(
			Query::ByLabel(String::new()),
			Subgraph {
				nodes: vec![
					OntologyNode::new("1", "JansenRit", "Neural Mass Model"),
					OntologyNode::new("2", "Linear", "Coupling"),
				],
				links: vec![OntologyLink::new("1", "2", "requires")],
			},
		);
		gateway.respond(
			Query::ByLabel("JansenRit".into()),
			Subgraph {
				nodes: vec![OntologyNode::new("1", "JansenRit", "Neural Mass Model")],
				links: vec![],
			},
		);
		let explorer = RefCell::new(Explorer::new());

		let all = search(&explorer, &gateway, "  ").await;
		assert_eq!(all.nodes.len(), 2);
		assert_eq!(all.links.len(), 1);

		search(&explorer, &gateway, "JansenRit").await;
		assert_eq!(visible(&explorer), set(&["1"]));
	}

	#[tokio::test]
	async fn failed_search_yields_empty_graph() {
		let gateway = ScriptedGateway::default();
		gateway.fail(Query::ByLabel("x".into()));
		let explorer = RefCell::new(Explorer::new());

		let result = search(&explorer, &gateway, "x").await;
		assert!(result.is_empty());
		assert!(explorer.borrow().repository().is_empty());
	}

	#[tokio::test]
	async fn activation_reveals_parents_and_children() {
		let gateway = coupling_gateway();
		let explorer = RefCell::new(Explorer::new());
		search(&explorer, &gateway, "CouplingX").await;

		let mut published = 0;
		let activation = activate(&explorer, &gateway, &"1".into(), |_| published += 1)
			.await
			.unwrap();

		assert!(activation.expanded);
		assert_eq!(activation.selected.label, "CouplingX");
		assert_eq!(published, 2);
		assert_eq!(visible(&explorer), set(&["1", "2", "3"]));

		let collapse = activate(&explorer, &gateway, &"1".into(), |_| {})
			.await
			.unwrap();
		assert!(!collapse.expanded);
		assert_eq!(visible(&explorer), set(&["1"]));
		assert_eq!(explorer.borrow().repository().len(), 3);
	}

	#[tokio::test]
	async fn collapse_issues_no_fetch() {
		let gateway = coupling_gateway();
		let explorer = RefCell::new(Explorer::new());
		search(&explorer, &gateway, "CouplingX").await;
		activate(&explorer, &gateway, &"1".into(), |_| {}).await.unwrap();
		let calls_after_expand = gateway.calls().len();

		activate(&explorer, &gateway, &"1".into(), |_| {}).await.unwrap();
		assert_eq!(gateway.calls().len(), calls_after_expand);
	}

	#[tokio::test]
	async fn collapse_during_fetch_discards_result() {
		let gateway = coupling_gateway();
		let explorer = RefCell::new(Explorer::new());
		search(&explorer, &gateway, "CouplingX").await;

		let id: NodeId = "1".into();
		let (first, second) = join(
			activate(&explorer, &gateway, &id, |_| {}),
			activate(&explorer, &gateway, &id, |_| {}),
		)
		.await;

		assert!(first.unwrap().expanded);
		assert!(!second.unwrap().expanded);
		assert_eq!(visible(&explorer), set(&["1"]));
		assert_eq!(explorer.borrow().repository().len(), 1);
	}

	#[tokio::test]
	async fn unknown_node_is_rejected_without_fetching() {
		let gateway = ScriptedGateway::default();
		let explorer = RefCell::new(Explorer::new());

		let result = activate(&explorer, &gateway, &"42".into(), |_| {}).await;
		assert_eq!(result, Err(ExplorerError::UnknownNode("42".into())));
		assert!(gateway.calls().is_empty());
	}

	#[tokio::test]
	async fn slow_earlier_search_does_not_replace_newer_one() {
		let gateway = ScriptedGateway::default();
		gateway.respond(
			Query::ByLabel(String::new()),
			Subgraph {
				nodes: vec![OntologyNode::new("all", "Everything", "Concept")],
				links: vec![],
			},
		);
		gateway.delay(Query::ByLabel(String::new()), 5);
		gateway.respond(
			Query::ByLabel("JansenRit".into()),
			Subgraph {
				nodes: vec![OntologyNode::new("jr", "JansenRit", "Neural Mass Model")],
				links: vec![],
			},
		);
		let explorer = RefCell::new(Explorer::new());

		let (initial, newer) = join(search(&explorer, &gateway, ""), async {
			tokio::task::yield_now().await;
			search(&explorer, &gateway, "JansenRit").await
		})
		.await;

		assert_eq!(visible(&explorer), set(&["jr"]));
		assert_eq!(newer.node_ids().map(NodeId::as_str).collect::<Vec<_>>(), ["jr"]);
		assert_eq!(initial, newer);
	}

	#[tokio::test]
	async fn connections_search_uses_its_own_query() {
		let gateway = ScriptedGateway::default();
		gateway.respond(
			Query::Connections("Linear".into()),
			Subgraph {
				nodes: vec![
					OntologyNode::new("2", "Linear", "Coupling"),
					OntologyNode::new("5", "Sigmoidal", "Coupling"),
				],
				links: vec![OntologyLink::new("2", "5", "related")],
			},
		);
		let explorer = RefCell::new(Explorer::new());

		let result = search_connections(&explorer, &gateway, " Linear ").await;
		assert_eq!(result.nodes.len(), 2);
		assert_eq!(gateway.calls(), vec![Query::Connections("Linear".into())]);
		assert_eq!(visible(&explorer), set(&["2", "5"]));
	}
}
