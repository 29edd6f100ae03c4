//! The currently selected node, held as an immutable detail snapshot.

use super::repository::NodeRecord;
use super::types::{NodeId, OntologyLink, OntologyNode};

/// Detail record of a node as it was when it got selected.
///
/// Owns copies of everything it shows, so later expansion of the same node
/// does not change a snapshot already handed out.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedNode {
	/// Selected node's id.
	pub id: NodeId,
	/// Display name.
	pub label: String,
	/// Node type.
	pub kind: String,
	/// Free-text description.
	pub definition: String,
	/// Canonical external identifier.
	pub iri: String,
	/// Labels of concepts this one depends on.
	pub requires: Vec<String>,
	/// Cached neighborhood at selection time (empty if never fetched).
	pub neighbors: Vec<OntologyNode>,
	/// Links of the cached neighborhood.
	pub neighbor_links: Vec<OntologyLink>,
}

/// Tracks which node is selected. Starts with nothing selected.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
	current: Option<SelectedNode>,
}

impl SelectionState {
	/// Takes a snapshot of `record`, resolving its cached neighbor ids through `lookup`.
	pub fn select<'a>(
		&mut self,
		record: &NodeRecord,
		lookup: impl Fn(&NodeId) -> Option<&'a OntologyNode>,
	) -> SelectedNode {
		let node = &record.node;
		let (neighbors, neighbor_links) = match record.neighborhood() {
			Some(n) => (
				n.nodes.iter().filter_map(&lookup).cloned().collect(),
				n.links.clone(),
			),
			None => (Vec::new(), Vec::new()),
		};

		let snapshot = SelectedNode {
			id: node.id.clone(),
			label: node.label.clone(),
			kind: node.kind.clone(),
			definition: node.definition.clone(),
			iri: node.iri.clone(),
			requires: node.requires.clone(),
			neighbors,
			neighbor_links,
		};
		self.current = Some(snapshot.clone());
		snapshot
	}

	/// The snapshot taken by the last [`select`](Self::select), unless cleared.
	pub fn current(&self) -> Option<&SelectedNode> {
		self.current.as_ref()
	}

	/// Id of the selected node.
	pub fn selected_id(&self) -> Option<&NodeId> {
		self.current.as_ref().map(|s| &s.id)
	}

	/// Back to nothing selected.
	pub fn clear(&mut self) {
		self.current = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ontology::repository::{GraphRepository, Neighborhood};
	use crate::ontology::types::Subgraph;

	fn repo() -> GraphRepository {
		let mut repo = GraphRepository::new();
		let mut noise = OntologyNode::new("1", "Additive", "Noise");
		noise.definition = "Gaussian additive noise".into();
		noise.requires = vec!["Integrator".into()];
		repo.merge(&Subgraph {
			nodes: vec![noise, OntologyNode::new("2", "Heun", "Integrator")],
			links: vec![OntologyLink::new("1", "2", "requires")],
		});
		repo
	}

	#[test]
	fn starts_empty_and_clears() {
		let repo = repo();
		let mut selection = SelectionState::default();
		assert!(selection.current().is_none());

		selection.select(repo.record(&"1".into()).unwrap(), |id| repo.node(id));
		assert_eq!(selection.selected_id(), Some(&NodeId::from("1")));

		selection.clear();
		assert!(selection.current().is_none());
	}

	#[test]
	fn snapshot_copies_details() {
		let repo = repo();
		let mut selection = SelectionState::default();
		let snap = selection.select(repo.record(&"1".into()).unwrap(), |id| repo.node(id));

		assert_eq!(snap.kind, "Noise");
		assert_eq!(snap.definition, "Gaussian additive noise");
		assert_eq!(snap.requires, vec!["Integrator"]);
		assert!(snap.neighbors.is_empty());
	}

	#[test]
	fn later_expansion_does_not_alter_snapshot() {
		let mut repo = repo();
		let mut selection = SelectionState::default();
		let before = selection.select(repo.record(&"1".into()).unwrap(), |id| repo.node(id));

		repo.toggle(&"1".into());
		repo.cache_neighborhood(
			&"1".into(),
			Neighborhood {
				nodes: vec!["2".into()],
				links: vec![OntologyLink::new("1", "2", "requires")],
			},
		);

		assert!(before.neighbors.is_empty());
		assert_eq!(selection.current(), Some(&before));

		let after = selection.select(repo.record(&"1".into()).unwrap(), |id| repo.node(id));
		assert_eq!(after.neighbors.len(), 1);
		assert_eq!(after.neighbors[0].label, "Heun");
	}
}
