//! Ontology graph data structures exchanged with the backend.
//!
//! These mirror the JSON the ontology API returns: `{ nodes: [...], links: [...] }`.
//! Field names follow the wire format (`type` is renamed to `kind`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Stable node identity.
///
/// Backends emit ids either as strings or as integers. Both decode into the
/// same textual form, so `1` and `"1"` refer to the same node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
	/// Wraps any string-like id.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The id text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for NodeId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl From<u64> for NodeId {
	fn from(id: u64) -> Self {
		Self(id.to_string())
	}
}

impl<'de> Deserialize<'de> for NodeId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum RawId {
			Text(String),
			Unsigned(u64),
			Signed(i64),
		}

		Ok(match RawId::deserialize(deserializer)? {
			RawId::Text(s) => Self(s),
			RawId::Unsigned(n) => Self(n.to_string()),
			RawId::Signed(n) => Self(n.to_string()),
		})
	}
}

/// A concept in the ontology.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OntologyNode {
	/// Unique, stable identity.
	pub id: NodeId,
	/// Display name. Not guaranteed unique.
	#[serde(default)]
	pub label: String,
	/// Category tag, e.g. "Neural Mass Model", "Coupling" or an ontology class.
	#[serde(rename = "type", default)]
	pub kind: String,
	/// Free-text description.
	#[serde(default)]
	pub definition: String,
	/// Canonical external identifier.
	#[serde(default)]
	pub iri: String,
	/// Labels of other concepts this one depends on.
	#[serde(default)]
	pub requires: Vec<String>,
	/// Layout position, owned by the renderer. Never overwritten on merge.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x: Option<f64>,
	/// See `x`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub y: Option<f64>,
}

impl OntologyNode {
	/// A node with only id, label and type set.
	pub fn new(id: impl Into<NodeId>, label: impl Into<String>, kind: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			kind: kind.into(),
			definition: String::new(),
			iri: String::new(),
			requires: Vec::new(),
			x: None,
			y: None,
		}
	}

	/// Compares descriptive fields only, ignoring layout coordinates.
	pub fn same_content(&self, other: &OntologyNode) -> bool {
		self.id == other.id
			&& self.label == other.label
			&& self.kind == other.kind
			&& self.definition == other.definition
			&& self.iri == other.iri
			&& self.requires == other.requires
	}
}

/// A typed, directed relation between two concepts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OntologyLink {
	/// Parent side.
	pub source: NodeId,
	/// Child side.
	pub target: NodeId,
	/// Relation label, e.g. "is-a" or "requires".
	#[serde(rename = "type", default)]
	pub kind: String,
}

impl OntologyLink {
	/// Builds a link from anything convertible to ids.
	pub fn new(
		source: impl Into<NodeId>,
		target: impl Into<NodeId>,
		kind: impl Into<String>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind: kind.into(),
		}
	}
}

/// A set of nodes and the links between them, as returned by one query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
	/// Nodes in response order.
	#[serde(default)]
	pub nodes: Vec<OntologyNode>,
	/// Links in response order. Endpoints may lie outside `nodes`.
	#[serde(default)]
	pub links: Vec<OntologyLink>,
}

impl Subgraph {
	/// True when there are neither nodes nor links.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}

	/// Appends `other` after `self`. No deduplication happens here.
	pub fn concat(mut self, other: Subgraph) -> Self {
		self.nodes.extend(other.nodes);
		self.links.extend(other.links);
		self
	}

	/// Ids of `nodes`, in order.
	pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
		self.nodes.iter().map(|n| &n.id)
	}
}
