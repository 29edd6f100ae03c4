//! Canonical store of every node and link materialized so far.
//!
//! Nodes live in an arena indexed by [`NodeId`]; each record carries the
//! node's expansion flag and its cached neighborhood as id lists rather than
//! nested node copies. Nodes are never removed once inserted (a new search
//! resets the whole store), so positions handed to the renderer stay stable.
//!
//! The repository also holds the currently published visible set. Which nodes
//! are visible is decided by the expansion controller; the repository only
//! guarantees that what it publishes never contains a dangling link.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::types::{NodeId, OntologyLink, OntologyNode, Subgraph};

/// The most recently fetched immediate neighborhood of a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Neighborhood {
	/// Parents and children, children first.
	pub nodes: Vec<NodeId>,
	/// Links as fetched, including ones whose far end was not returned.
	pub links: Vec<OntologyLink>,
}

impl Neighborhood {
	/// Builds a neighborhood from a fetched subgraph, dropping repeated ids and links.
	pub fn from_subgraph(subgraph: &Subgraph) -> Self {
		let mut seen_nodes = HashSet::new();
		let mut seen_links = HashSet::new();
		Self {
			nodes: subgraph
				.node_ids()
				.filter(|id| seen_nodes.insert(*id))
				.cloned()
				.collect(),
			links: subgraph
				.links
				.iter()
				.filter(|l| seen_links.insert(*l))
				.cloned()
				.collect(),
		}
	}

	/// True when the fetch returned nothing.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}
}

/// Per-node state kept alongside the node data.
#[derive(Clone, Debug)]
pub struct NodeRecord {
	/// Node data as first merged.
	pub node: OntologyNode,
	expanded: bool,
	/// Bumped on every toggle so late fetch results can be matched to the toggle that issued them.
	epoch: u64,
	neighborhood: Option<Neighborhood>,
}

impl NodeRecord {
	fn new(node: OntologyNode) -> Self {
		Self {
			node,
			expanded: false,
			epoch: 0,
			neighborhood: None,
		}
	}

	/// Whether the node's neighborhood is shown.
	pub fn expanded(&self) -> bool {
		self.expanded
	}

	/// Toggle count since the node was inserted.
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	/// Most recently applied neighborhood fetch, if any.
	pub fn neighborhood(&self) -> Option<&Neighborhood> {
		self.neighborhood.as_ref()
	}
}

/// Outcome counters for a single [`GraphRepository::merge`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
	/// Nodes whose id was new.
	pub inserted: usize,
	/// Nodes whose id was already known with identical content.
	pub duplicates: usize,
	/// Nodes whose id was already known with different content. The stored node wins.
	pub conflicts: usize,
	/// Links whose (source, target, type) triple was new.
	pub links_added: usize,
}

/// Id-indexed node arena plus the link store and the published visible set.
#[derive(Clone, Debug, Default)]
pub struct GraphRepository {
	records: Vec<NodeRecord>,
	index: HashMap<NodeId, usize>,
	links: Vec<OntologyLink>,
	link_index: HashSet<OntologyLink>,
	roots: Vec<NodeId>,
	visible_nodes: Vec<usize>,
	visible_links: Vec<OntologyLink>,
	/// Number of resets so far. Survives [`GraphRepository::reset`].
	exploration: u64,
}

impl GraphRepository {
	/// Creates an empty repository.
	pub fn new() -> Self {
		Self::default()
	}

	/// Drops every node, link, root and the visible set, and starts a new exploration.
	///
	/// Node epochs restart at zero, so anything keyed on an epoch must also
	/// carry the [`exploration`](Self::exploration) it was issued in.
	pub fn reset(&mut self) {
		*self = Self {
			exploration: self.exploration + 1,
			..Self::default()
		};
	}

	/// Identifies the current exploration. Bumped by every reset.
	pub fn exploration(&self) -> u64 {
		self.exploration
	}

	/// Number of known nodes.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// True when no node has been merged since the last reset.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// True if `id` has been merged.
	pub fn contains(&self, id: &NodeId) -> bool {
		self.index.contains_key(id)
	}

	/// Node data plus its expansion state.
	pub fn record(&self, id: &NodeId) -> Option<&NodeRecord> {
		self.index.get(id).map(|&i| &self.records[i])
	}

	/// Node data only.
	pub fn node(&self, id: &NodeId) -> Option<&OntologyNode> {
		self.record(id).map(|r| &r.node)
	}

	/// Every node ever merged, in insertion order.
	pub fn known_nodes(&self) -> impl Iterator<Item = &OntologyNode> {
		self.records.iter().map(|r| &r.node)
	}

	/// Every distinct link ever merged, in insertion order.
	pub fn known_links(&self) -> &[OntologyLink] {
		&self.links
	}

	/// Inserts nodes with unseen ids and links with unseen triples.
	///
	/// An already-known id keeps its stored node: the incoming copy is dropped
	/// (first write wins) and counted as a duplicate or, if its content
	/// differs, as a conflict.
	pub fn merge(&mut self, subgraph: &Subgraph) -> MergeReport {
		let mut report = MergeReport::default();

		for node in &subgraph.nodes {
			match self.index.get(&node.id) {
				Some(&i) => {
					if self.records[i].node.same_content(node) {
						report.duplicates += 1;
					} else {
						warn!(
							"ontology: conflicting data for node {}, keeping the first copy",
							node.id
						);
						report.conflicts += 1;
					}
				}
				None => {
					self.index.insert(node.id.clone(), self.records.len());
					self.records.push(NodeRecord::new(node.clone()));
					report.inserted += 1;
				}
			}
		}

		for link in &subgraph.links {
			if self.link_index.insert(link.clone()) {
				self.links.push(link.clone());
				report.links_added += 1;
			}
		}

		debug!(
			"ontology: merged {} new nodes ({} duplicate, {} conflicting), {} new links",
			report.inserted, report.duplicates, report.conflicts, report.links_added
		);
		report
	}

	/// Sets the traversal roots. Ids not present in the repository are ignored.
	pub fn set_roots<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>) {
		let mut seen = HashSet::new();
		self.roots = ids
			.into_iter()
			.filter(|id| self.index.contains_key(*id) && seen.insert(*id))
			.cloned()
			.collect();
	}

	/// Current traversal roots, in search result order.
	pub fn roots(&self) -> &[NodeId] {
		&self.roots
	}

	/// Flips a node's expanded flag and bumps its epoch.
	/// Returns the new `(expanded, epoch)` pair, or `None` for an unknown id.
	pub fn toggle(&mut self, id: &NodeId) -> Option<(bool, u64)> {
		let &i = self.index.get(id)?;
		let record = &mut self.records[i];
		record.expanded = !record.expanded;
		record.epoch += 1;
		Some((record.expanded, record.epoch))
	}

	/// Replaces a node's cached neighborhood. Returns false for an unknown id.
	pub fn cache_neighborhood(&mut self, id: &NodeId, neighborhood: Neighborhood) -> bool {
		match self.index.get(id) {
			Some(&i) => {
				self.records[i].neighborhood = Some(neighborhood);
				true
			}
			None => false,
		}
	}

	/// Replaces the visible set.
	///
	/// Unknown and repeated node ids are dropped. A link is kept only if both
	/// endpoints are in the resulting node set; the rest are reported as
	/// dangling and their count returned.
	pub fn publish(&mut self, nodes: &[NodeId], links: &[OntologyLink]) -> usize {
		let mut seen = HashSet::new();
		self.visible_nodes = nodes
			.iter()
			.filter_map(|id| self.index.get(id).copied())
			.filter(|&i| seen.insert(i))
			.collect();

		let visible_ids: HashSet<&NodeId> = self
			.visible_nodes
			.iter()
			.map(|&i| &self.records[i].node.id)
			.collect();

		let mut dangling = 0;
		let mut seen_links = HashSet::new();
		let mut kept = Vec::with_capacity(links.len());
		for link in links {
			if !visible_ids.contains(&link.source) || !visible_ids.contains(&link.target) {
				warn!(
					"ontology: link {} -> {} ({}) references a node outside the visible set",
					link.source, link.target, link.kind
				);
				dangling += 1;
			} else if seen_links.insert(link) {
				kept.push(link.clone());
			}
		}
		self.visible_links = kept;
		dangling
	}

	/// True if `id` is in the published visible set.
	pub fn is_visible(&self, id: &NodeId) -> bool {
		self.index
			.get(id)
			.is_some_and(|i| self.visible_nodes.contains(i))
	}

	/// The published visible set, ready for rendering.
	pub fn snapshot(&self) -> Subgraph {
		Subgraph {
			nodes: self
				.visible_nodes
				.iter()
				.map(|&i| self.records[i].node.clone())
				.collect(),
			links: self.visible_links.clone(),
		}
	}
}
