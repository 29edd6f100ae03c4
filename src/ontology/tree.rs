//! Local parent/child tree around a focus node.
//!
//! The tree is derived from flat node and link collections each time the focus
//! changes. A link `s -> t` reads as "s is a parent of t". Only one level around
//! the focus is materialized:
//!
//! - the focus's parents and children, each listing the focus reciprocally;
//! - shortcut links from one of those parents straight to one of those
//!   children, recorded on both tree nodes.
//!
//! Nodes below that level are leaves; callers re-focus to go deeper.

use std::collections::HashMap;

use log::{debug, warn};
use serde::Serialize;

use super::types::{NodeId, OntologyLink, OntologyNode};

/// One node of a focus tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeNode {
	/// Node id.
	pub id: NodeId,
	/// Display name.
	pub label: String,
	/// Node type.
	pub kind: String,
	/// Targets of links from this node, in link order.
	pub children: Vec<TreeNode>,
	/// Sources of links into this node, in link order.
	pub parents: Vec<TreeNode>,
}

impl TreeNode {
	/// Ids of `children`.
	pub fn child_ids(&self) -> Vec<&NodeId> {
		self.children.iter().map(|c| &c.id).collect()
	}

	/// Ids of `parents`.
	pub fn parent_ids(&self) -> Vec<&NodeId> {
		self.parents.iter().map(|p| &p.id).collect()
	}

	/// The child with the given id.
	pub fn child(&self, id: &NodeId) -> Option<&TreeNode> {
		self.children.iter().find(|c| &c.id == id)
	}

	/// The parent with the given id.
	pub fn parent(&self, id: &NodeId) -> Option<&TreeNode> {
		self.parents.iter().find(|p| &p.id == id)
	}
}

struct Entry<'a> {
	node: &'a OntologyNode,
	children: Vec<usize>,
	parents: Vec<usize>,
}

fn push_unique(list: &mut Vec<usize>, idx: usize) {
	if !list.contains(&idx) {
		list.push(idx);
	}
}

/// Records `parent -> child` on both entries.
fn relate(entries: &mut [Entry<'_>], parent: usize, child: usize) {
	push_unique(&mut entries[parent].children, child);
	push_unique(&mut entries[child].parents, parent);
}

/// Builds the focus tree for `focus`. Returns `None` if `focus` is not among `nodes`.
///
/// Links whose endpoints are missing from `nodes` are skipped with a warning.
/// Self-links are ignored. When `nodes` repeats an id, the first occurrence is used.
pub fn build_tree<'a>(
	focus: &NodeId,
	nodes: impl IntoIterator<Item = &'a OntologyNode>,
	links: &[OntologyLink],
) -> Option<TreeNode> {
	let mut entries: Vec<Entry<'a>> = Vec::new();
	let mut index: HashMap<&'a NodeId, usize> = HashMap::new();
	for node in nodes {
		index.entry(&node.id).or_insert_with(|| {
			entries.push(Entry {
				node,
				children: Vec::new(),
				parents: Vec::new(),
			});
			entries.len() - 1
		});
	}

	let Some(&f) = index.get(focus) else {
		debug!("ontology: focus {focus} not present, no tree built");
		return None;
	};

	let resolved: Vec<(usize, usize)> = links
		.iter()
		.filter_map(|link| {
			match (index.get(&link.source), index.get(&link.target)) {
				(Some(&s), Some(&t)) => Some((s, t)),
				_ => {
					warn!(
						"ontology: link {} -> {} ({}) has a missing endpoint, skipped in tree",
						link.source, link.target, link.kind
					);
					None
				}
			}
		})
		.filter(|(s, t)| s != t)
		.collect();

	for &(s, t) in &resolved {
		if t == f {
			relate(&mut entries, s, f);
		} else if s == f {
			relate(&mut entries, f, t);
		}
	}

	// Parent-to-child shortcuts that skip the focus.
	for &(s, t) in &resolved {
		if s != f
			&& t != f
			&& entries[f].parents.contains(&s)
			&& entries[f].children.contains(&t)
		{
			relate(&mut entries, s, t);
		}
	}

	Some(materialize(&entries, f, 0))
}

/// Depth 0 is the focus, depth 1 its relatives; anything deeper is a leaf.
fn materialize(entries: &[Entry<'_>], idx: usize, depth: usize) -> TreeNode {
	let entry = &entries[idx];
	let expand = |list: &[usize]| -> Vec<TreeNode> {
		if depth >= 2 {
			return Vec::new();
		}
		list.iter()
			.map(|&i| materialize(entries, i, depth + 1))
			.collect()
	};

	TreeNode {
		id: entry.node.id.clone(),
		label: entry.node.label.clone(),
		kind: entry.node.kind.clone(),
		children: expand(&entry.children),
		parents: expand(&entry.parents),
	}
}
