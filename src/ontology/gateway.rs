//! Backend query interface.
//!
//! A [`FetchGateway`] answers the four ontology queries with a [`Subgraph`].
//! Gateways report failures as [`FetchError`]; the engine never sees them,
//! because every call goes through [`fetch_or_empty`], which logs the failure
//! and substitutes an empty subgraph.

use async_trait::async_trait;
use futures_util::future::join;
use log::warn;

use super::types::{NodeId, Subgraph};

/// Transport or decoding failure while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
	/// Request could not be sent or the body not read.
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	/// Backend answered with an error status.
	#[error("backend error (status {status}): {message}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Message taken from the error body.
		message: String,
	},

	/// Body was not a subgraph.
	#[error("invalid response: {0}")]
	Decode(String),
}

/// One of the backend's subgraph queries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Query {
	/// Nodes matching a label. An empty label selects the whole ontology.
	ByLabel(String),
	/// Nodes connected to a label.
	Connections(String),
	/// Immediate children of a node.
	Children {
		/// Label of the node.
		label: String,
		/// Id of the node.
		id: NodeId,
	},
	/// Immediate parents of a node.
	Parents {
		/// Label of the node.
		label: String,
		/// Id of the node.
		id: NodeId,
	},
}

impl Query {
	/// Path segment under the API namespace.
	pub fn endpoint(&self) -> &'static str {
		match self {
			Query::ByLabel(_) => "node",
			Query::Connections(_) => "node-connections",
			Query::Children { .. } => "node-children",
			Query::Parents { .. } => "node-parents",
		}
	}

	/// Query-string parameters, in a fixed order.
	pub fn params(&self) -> Vec<(&'static str, String)> {
		match self {
			Query::ByLabel(label) | Query::Connections(label) => vec![("label", label.clone())],
			Query::Children { label, id } | Query::Parents { label, id } => {
				vec![("label", label.clone()), ("id", id.to_string())]
			}
		}
	}
}

/// Source of ontology subgraphs.
///
/// Futures are not required to be `Send`: the browser build runs everything
/// on one thread and reqwest's WASM futures are `!Send`.
#[async_trait(?Send)]
pub trait FetchGateway {
	/// Runs one query.
	async fn fetch(&self, query: &Query) -> Result<Subgraph, FetchError>;
}

/// Runs `query`, turning any failure into an empty subgraph.
pub async fn fetch_or_empty<G: FetchGateway + ?Sized>(gateway: &G, query: &Query) -> Subgraph {
	match gateway.fetch(query).await {
		Ok(subgraph) => subgraph,
		Err(e) => {
			warn!("ontology: {} query failed: {}", query.endpoint(), e);
			Subgraph::default()
		}
	}
}

/// Fetches children and parents concurrently and concatenates them, children first.
pub async fn fetch_neighborhood<G: FetchGateway + ?Sized>(
	gateway: &G,
	label: &str,
	id: &NodeId,
) -> Subgraph {
	let children = Query::Children {
		label: label.to_string(),
		id: id.clone(),
	};
	let parents = Query::Parents {
		label: label.to_string(),
		id: id.clone(),
	};
	let (children, parents) = join(
		fetch_or_empty(gateway, &children),
		fetch_or_empty(gateway, &parents),
	)
	.await;
	children.concat(parents)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ontology::testing::ScriptedGateway;
	use crate::ontology::types::{OntologyLink, OntologyNode};

	#[test]
	fn queries_map_to_endpoints_and_params() {
		let q = Query::Children {
			label: "Linear".into(),
			id: "7".into(),
		};
		assert_eq!(q.endpoint(), "node-children");
		assert_eq!(
			q.params(),
			vec![("label", "Linear".to_string()), ("id", "7".to_string())]
		);
		assert_eq!(Query::ByLabel(String::new()).endpoint(), "node");
		assert_eq!(Query::Connections("x".into()).endpoint(), "node-connections");
	}

	#[tokio::test]
	async fn failures_resolve_to_empty_subgraph() {
		let gateway = ScriptedGateway::default();
		gateway.fail(Query::ByLabel("JansenRit".into()));

		let result = fetch_or_empty(&gateway, &Query::ByLabel("JansenRit".into())).await;
		assert!(result.is_empty());
	}

	#[tokio::test]
	async fn neighborhood_concatenates_children_then_parents() {
		let gateway = ScriptedGateway::default();
		gateway.respond(
			Query::Children {
				label: "CouplingX".into(),
				id: "1".into(),
			},
			Subgraph {
				nodes: vec![OntologyNode::new("2", "child", "")],
				links: vec![OntologyLink::new("1", "2", "is-a")],
			},
		);
		gateway.respond(
			Query::Parents {
				label: "CouplingX".into(),
				id: "1".into(),
			},
			Subgraph {
				nodes: vec![OntologyNode::new("3", "parent", "")],
				links: vec![OntologyLink::new("3", "1", "is-a")],
			},
		);

		let combined = fetch_neighborhood(&gateway, "CouplingX", &"1".into()).await;
		let ids: Vec<&str> = combined.node_ids().map(NodeId::as_str).collect();
		assert_eq!(ids, ["2", "3"]);
		assert_eq!(combined.links.len(), 2);
	}

	#[tokio::test]
	async fn one_failing_side_keeps_the_other() {
		let gateway = ScriptedGateway::default();
		gateway.respond(
			Query::Children {
				label: "n".into(),
				id: "1".into(),
			},
			Subgraph {
				nodes: vec![OntologyNode::new("2", "child", "")],
				links: vec![],
			},
		);
		gateway.fail(Query::Parents {
			label: "n".into(),
			id: "1".into(),
		});

		let combined = fetch_neighborhood(&gateway, "n", &"1".into()).await;
		assert_eq!(combined.nodes.len(), 1);
	}
}
