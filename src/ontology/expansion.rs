//! Expansion controller: search results, node activation and the visible set.
//!
//! Activating a node is split in two synchronous halves around the network
//! round-trip so the engine is never borrowed across an `.await`:
//!
//! 1. [`Explorer::begin_activation`] selects and toggles the node, republishes
//!    the visible set from whatever is already cached, and hands out a
//!    [`FetchTicket`] when the node is now expanded.
//! 2. [`Explorer::complete_activation`] takes the fetched neighborhood and
//!    applies it only if the ticket is still current: the node must still be
//!    expanded and must not have been toggled since the ticket was issued.
//!
//! A search is split the same way: [`Explorer::begin_search`] hands out a
//! [`SearchTicket`] and [`Explorer::complete_search`] loads the result only if
//! no later search was started in the meantime.
//!
//! Visibility is recomputed from the search roots by a depth-first walk that
//! descends only through expanded nodes. Expansion state is per node, so a
//! node hidden under a collapsed ancestor keeps its own flag.

use std::collections::HashSet;

use log::{debug, info};

use super::repository::{GraphRepository, MergeReport, Neighborhood};
use super::selection::{SelectedNode, SelectionState};
use super::tree::{TreeNode, build_tree};
use super::types::{NodeId, OntologyLink, Subgraph};

/// Errors from driving the engine with invalid input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExplorerError {
	/// The id is not in the repository.
	#[error("unknown node: {0}")]
	UnknownNode(NodeId),
}

/// Permission to apply one neighborhood fetch for one toggle of one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
	/// Node whose neighborhood is fetched.
	pub id: NodeId,
	/// Its label, which the neighborhood queries take alongside the id.
	pub label: String,
	exploration: u64,
	epoch: u64,
}

/// Permission to load the result of one search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// What a call to [`Explorer::begin_activation`] did.
#[derive(Clone, Debug, PartialEq)]
pub struct Activation {
	/// Detail snapshot of the activated node.
	pub selected: SelectedNode,
	/// New expansion state of the node.
	pub expanded: bool,
	/// Present when the node became expanded and its neighborhood should be fetched.
	pub ticket: Option<FetchTicket>,
}

/// Nodes and links reached by the visibility walk, in discovery order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleSet {
	/// Reached nodes.
	pub nodes: Vec<NodeId>,
	/// Cached links of the expanded nodes among them.
	pub links: Vec<OntologyLink>,
}

/// Depth-first visibility walk from `roots` with an explicit stack.
///
/// Every reached node is visible. An expanded node contributes its cached
/// links and pushes its cached neighbors; a collapsed one stops the descent.
/// `visited` is the only deduplication: a node reachable along several paths
/// is staged once.
pub fn compute_visible(repo: &GraphRepository, roots: &[NodeId]) -> VisibleSet {
	let mut visited: HashSet<&NodeId> = HashSet::new();
	let mut staged = VisibleSet::default();
	let mut stack: Vec<&NodeId> = roots.iter().rev().collect();

	while let Some(id) = stack.pop() {
		if !visited.insert(id) {
			continue;
		}
		let Some(record) = repo.record(id) else {
			continue;
		};
		staged.nodes.push(id.clone());

		if !record.expanded() {
			continue;
		}
		if let Some(neighborhood) = record.neighborhood() {
			staged.links.extend(neighborhood.links.iter().cloned());
			stack.extend(
				neighborhood
					.nodes
					.iter()
					.rev()
					.filter(|n| !visited.contains(n)),
			);
		}
	}

	staged
}

/// The exploration engine: repository, selection, and the rules tying them together.
#[derive(Clone, Debug, Default)]
pub struct Explorer {
	repo: GraphRepository,
	selection: SelectionState,
	/// Number of searches started or loaded; only the latest may load.
	searches: u64,
}

impl Explorer {
	/// Creates an engine with nothing loaded and nothing selected.
	pub fn new() -> Self {
		Self::default()
	}

	/// Read access to everything fetched so far.
	pub fn repository(&self) -> &GraphRepository {
		&self.repo
	}

	/// Snapshot of the selected node, if any.
	pub fn selection(&self) -> Option<&SelectedNode> {
		self.selection.current()
	}

	/// The published visible set.
	pub fn snapshot(&self) -> Subgraph {
		self.repo.snapshot()
	}

	/// Registers a search about to be sent. Any earlier search still in
	/// flight becomes stale.
	pub fn begin_search(&mut self) -> SearchTicket {
		self.searches += 1;
		SearchTicket(self.searches)
	}

	/// Loads a search result if `ticket` belongs to the latest search.
	///
	/// Returns `None`, leaving all state untouched, when a newer search was
	/// started or loaded after the ticket was issued.
	pub fn complete_search(&mut self, ticket: SearchTicket, result: &Subgraph) -> Option<MergeReport> {
		if ticket.0 != self.searches {
			debug!("ontology: discarding result of superseded search");
			return None;
		}
		Some(self.load_search(result))
	}

	/// Starts a new exploration from a search result.
	///
	/// Clears the repository and the selection. The result's nodes become the
	/// roots of the visibility walk. Searches still in flight and fetch
	/// tickets from the previous exploration become stale.
	pub fn load_search(&mut self, result: &Subgraph) -> MergeReport {
		self.searches += 1;
		self.repo.reset();
		self.selection.clear();
		let report = self.repo.merge(result);
		self.repo.set_roots(result.node_ids());
		let dangling = self.refresh_visible();

		info!(
			"ontology: search loaded {} nodes, {} links ({} dangling)",
			report.inserted, report.links_added, dangling
		);
		report
	}

	/// Selects and toggles `id`, then republishes the visible set.
	pub fn begin_activation(&mut self, id: &NodeId) -> Result<Activation, ExplorerError> {
		let Some(record) = self.repo.record(id) else {
			return Err(ExplorerError::UnknownNode(id.clone()));
		};
		let label = record.node.label.clone();
		let selected = self.selection.select(record, |n| self.repo.node(n));

		let (expanded, epoch) = self
			.repo
			.toggle(id)
			.ok_or_else(|| ExplorerError::UnknownNode(id.clone()))?;
		debug!(
			"ontology: node {id} {}",
			if expanded { "expanded" } else { "collapsed" }
		);

		self.refresh_visible();

		let ticket = expanded.then(|| FetchTicket {
			id: id.clone(),
			label,
			exploration: self.repo.exploration(),
			epoch,
		});
		Ok(Activation {
			selected,
			expanded,
			ticket,
		})
	}

	/// Applies a fetched neighborhood if `ticket` is still current.
	///
	/// Returns false, leaving all state untouched, when the node was collapsed
	/// or toggled again after the ticket was issued, or a new search started
	/// a new exploration.
	pub fn complete_activation(&mut self, ticket: &FetchTicket, fetched: &Subgraph) -> bool {
		let current = ticket.exploration == self.repo.exploration()
			&& self
				.repo
				.record(&ticket.id)
				.is_some_and(|r| r.expanded() && r.epoch() == ticket.epoch);
		if !current {
			debug!(
				"ontology: discarding stale neighborhood for node {}",
				ticket.id
			);
			return false;
		}

		self.repo.merge(fetched);
		self.repo
			.cache_neighborhood(&ticket.id, Neighborhood::from_subgraph(fetched));
		self.refresh_visible();
		true
	}

	/// Recomputes visibility from the roots and publishes it. Returns the dangling link count.
	pub fn refresh_visible(&mut self) -> usize {
		let roots = self.repo.roots().to_vec();
		let mut visible = compute_visible(&self.repo, &roots);
		self.retain_root_links(&mut visible);
		self.repo.publish(&visible.nodes, &visible.links)
	}

	/// Links among root nodes came with the search result and stay visible.
	fn retain_root_links(&self, visible: &mut VisibleSet) {
		let roots: HashSet<&NodeId> = self.repo.roots().iter().collect();
		visible.links.extend(
			self.repo
				.known_links()
				.iter()
				.filter(|l| roots.contains(&l.source) && roots.contains(&l.target))
				.cloned(),
		);
	}

	/// Clears the selection.
	pub fn clear_selection(&mut self) {
		self.selection.clear();
	}

	/// Focus tree of the selected node over everything known so far.
	pub fn selection_tree(&self) -> Option<TreeNode> {
		let focus = self.selection.selected_id()?;
		self.tree_for(focus)
	}

	/// Focus tree of any known node.
	pub fn tree_for(&self, focus: &NodeId) -> Option<TreeNode> {
		build_tree(focus, self.repo.known_nodes(), self.repo.known_links())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ontology::types::OntologyNode;

	fn node(id: &str) -> OntologyNode {
		OntologyNode::new(id, format!("n{id}"), "Concept")
	}

	fn sub(ids: &[&str], links: &[(&str, &str)]) -> Subgraph {
		Subgraph {
			nodes: ids.iter().map(|id| node(id)).collect(),
			links: links
				.iter()
				.map(|(s, t)| OntologyLink::new(*s, *t, "is-a"))
				.collect(),
		}
	}

	fn visible_ids(explorer: &Explorer) -> Vec<String> {
		let mut ids: Vec<String> = explorer
			.snapshot()
			.node_ids()
			.map(|id| id.to_string())
			.collect();
		ids.sort();
		ids
	}

	fn expand(explorer: &mut Explorer, id: &str, fetched: &Subgraph) {
		let activation = explorer.begin_activation(&id.into()).unwrap();
		let ticket = activation.ticket.expect("node should be expanding");
		assert!(explorer.complete_activation(&ticket, fetched));
	}

	#[test]
	fn search_result_is_visible_with_its_links() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1", "2"], &[("1", "2"), ("1", "9")]));

		let snap = explorer.snapshot();
		assert_eq!(visible_ids(&explorer), ["1", "2"]);
		assert_eq!(snap.links, vec![OntologyLink::new("1", "2", "is-a")]);
	}

	#[test]
	fn expand_then_collapse() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &sub(&["2", "3"], &[("1", "2"), ("3", "1")]));

		assert_eq!(visible_ids(&explorer), ["1", "2", "3"]);
		assert!(explorer.repository().record(&"1".into()).unwrap().expanded());

		let collapse = explorer.begin_activation(&"1".into()).unwrap();
		assert!(!collapse.expanded);
		assert!(collapse.ticket.is_none());
		assert_eq!(visible_ids(&explorer), ["1"]);
		assert!(explorer.snapshot().links.is_empty());

		// Hidden, not discarded.
		let record = explorer.repository().record(&"1".into()).unwrap();
		assert_eq!(record.neighborhood().unwrap().nodes.len(), 2);
		assert_eq!(explorer.repository().len(), 3);
	}

	#[test]
	fn reexpansion_shows_cache_before_fetch_completes() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &sub(&["2"], &[("1", "2")]));
		explorer.begin_activation(&"1".into()).unwrap();

		let again = explorer.begin_activation(&"1".into()).unwrap();
		assert!(again.ticket.is_some());
		assert_eq!(visible_ids(&explorer), ["1", "2"]);
	}

	#[test]
	fn toggle_twice_is_idempotent() {
		let fetched = sub(&["2", "3"], &[("1", "2"), ("3", "1")]);
		let mut once = Explorer::new();
		once.load_search(&sub(&["1"], &[]));
		expand(&mut once, "1", &fetched);

		let mut thrice = once.clone();
		thrice.begin_activation(&"1".into()).unwrap();
		expand(&mut thrice, "1", &fetched);

		assert_eq!(visible_ids(&once), visible_ids(&thrice));
		assert_eq!(once.snapshot().links.len(), thrice.snapshot().links.len());
	}

	#[test]
	fn stale_fetch_after_collapse_is_discarded() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		let ticket = explorer.begin_activation(&"1".into()).unwrap().ticket.unwrap();
		explorer.begin_activation(&"1".into()).unwrap();

		assert!(!explorer.complete_activation(&ticket, &sub(&["2"], &[("1", "2")])));
		assert_eq!(visible_ids(&explorer), ["1"]);
		assert_eq!(explorer.repository().len(), 1);
	}

	#[test]
	fn superseded_fetch_is_discarded() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		let old = explorer.begin_activation(&"1".into()).unwrap().ticket.unwrap();
		explorer.begin_activation(&"1".into()).unwrap();
		let new = explorer.begin_activation(&"1".into()).unwrap().ticket.unwrap();

		assert!(!explorer.complete_activation(&old, &sub(&["stale"], &[("1", "stale")])));
		assert!(explorer.complete_activation(&new, &sub(&["2"], &[("1", "2")])));
		assert_eq!(visible_ids(&explorer), ["1", "2"]);
	}

	#[test]
	fn ticket_from_previous_exploration_is_discarded() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		let old = explorer.begin_activation(&"1".into()).unwrap().ticket.unwrap();

		explorer.load_search(&sub(&["1"], &[]));
		let new = explorer.begin_activation(&"1".into()).unwrap().ticket.unwrap();

		assert!(!explorer.complete_activation(&old, &sub(&["stale"], &[("1", "stale")])));
		assert_eq!(visible_ids(&explorer), ["1"]);
		assert!(explorer.complete_activation(&new, &sub(&["2"], &[("1", "2")])));
		assert_eq!(visible_ids(&explorer), ["1", "2"]);
	}

	#[test]
	fn refresh_reports_dangling_neighborhood_links() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &sub(&["2"], &[("1", "2"), ("1", "ghost")]));

		assert_eq!(explorer.refresh_visible(), 1);
		assert_eq!(explorer.snapshot().links, vec![OntologyLink::new("1", "2", "is-a")]);
	}

	#[test]
	fn only_the_latest_search_loads() {
		let mut explorer = Explorer::new();
		let first = explorer.begin_search();
		let second = explorer.begin_search();

		assert!(explorer.complete_search(second, &sub(&["jr"], &[])).is_some());
		assert!(explorer.complete_search(first, &sub(&["all"], &[])).is_none());
		assert_eq!(visible_ids(&explorer), ["jr"]);
	}

	#[test]
	fn direct_load_supersedes_pending_search() {
		let mut explorer = Explorer::new();
		let pending = explorer.begin_search();
		explorer.load_search(&sub(&["1"], &[]));

		assert_eq!(explorer.complete_search(pending, &sub(&["2"], &[])), None);
		assert_eq!(visible_ids(&explorer), ["1"]);
	}

	#[test]
	fn descendants_keep_their_own_state() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &sub(&["2"], &[("1", "2")]));
		expand(&mut explorer, "2", &sub(&["4"], &[("2", "4")]));
		assert_eq!(visible_ids(&explorer), ["1", "2", "4"]);

		explorer.begin_activation(&"1".into()).unwrap();
		assert_eq!(visible_ids(&explorer), ["1"]);
		assert!(explorer.repository().record(&"2".into()).unwrap().expanded());

		explorer.begin_activation(&"1".into()).unwrap();
		assert_eq!(visible_ids(&explorer), ["1", "2", "4"]);
	}

	#[test]
	fn shared_descendant_is_staged_once() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1", "2"], &[]));
		expand(&mut explorer, "1", &sub(&["3"], &[("1", "3")]));
		expand(&mut explorer, "2", &sub(&["3"], &[("2", "3")]));

		let visible = compute_visible(explorer.repository(), explorer.repository().roots());
		assert_eq!(visible.nodes.len(), 3);
		assert_eq!(explorer.snapshot().links.len(), 2);
	}

	#[test]
	fn cycles_terminate() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &sub(&["2"], &[("1", "2")]));
		expand(&mut explorer, "2", &sub(&["1"], &[("2", "1")]));

		assert_eq!(visible_ids(&explorer), ["1", "2"]);
	}

	#[test]
	fn empty_neighborhood_keeps_node_visible() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &Subgraph::default());

		assert_eq!(visible_ids(&explorer), ["1"]);
	}

	#[test]
	fn visible_links_always_have_visible_endpoints() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &sub(&["2"], &[("1", "2"), ("2", "ghost")]));

		let snap = explorer.snapshot();
		let ids: HashSet<&NodeId> = snap.node_ids().collect();
		for link in &snap.links {
			assert!(ids.contains(&link.source) && ids.contains(&link.target));
		}
		assert_eq!(snap.links.len(), 1);
	}

	#[test]
	fn unknown_node_is_an_error() {
		let mut explorer = Explorer::new();
		assert_eq!(
			explorer.begin_activation(&"nope".into()),
			Err(ExplorerError::UnknownNode("nope".into()))
		);
	}

	#[test]
	fn new_search_resets_state() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &sub(&["2"], &[("1", "2")]));

		explorer.load_search(&sub(&["5"], &[]));
		assert_eq!(visible_ids(&explorer), ["5"]);
		assert!(explorer.selection().is_none());
		assert!(!explorer.repository().contains(&"2".into()));
	}

	#[test]
	fn selection_tree_follows_activation() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &sub(&["2", "3"], &[("1", "2"), ("3", "1")]));

		let tree = explorer.selection_tree().unwrap();
		assert_eq!(tree.child_ids(), vec![&NodeId::from("2")]);
		assert_eq!(tree.parent_ids(), vec![&NodeId::from("3")]);
	}

	#[test]
	fn clearing_selection_drops_tree_but_keeps_graph() {
		let mut explorer = Explorer::new();
		explorer.load_search(&sub(&["1"], &[]));
		expand(&mut explorer, "1", &sub(&["2"], &[("1", "2")]));
		explorer.clear_selection();

		assert!(explorer.selection().is_none());
		assert!(explorer.selection_tree().is_none());
		assert_eq!(visible_ids(&explorer), ["1", "2"]);
	}
}
