//! In-memory gateway for tests.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;

use super::gateway::{FetchError, FetchGateway, Query};
use super::types::Subgraph;

/// Answers queries from a script. Unscripted queries return an empty subgraph.
///
/// Every fetch yields to the executor once before answering, so concurrently
/// driven activations interleave the way real network calls do. `delay`
/// makes a query yield more often, i.e. answer later.
#[derive(Default)]
pub struct ScriptedGateway {
	responses: RefCell<HashMap<Query, Option<Subgraph>>>,
	delays: RefCell<HashMap<Query, usize>>,
	calls: RefCell<Vec<Query>>,
}

impl ScriptedGateway {
	pub fn respond(&self, query: Query, subgraph: Subgraph) {
		self.responses.borrow_mut().insert(query, Some(subgraph));
	}

	pub fn fail(&self, query: Query) {
		self.responses.borrow_mut().insert(query, None);
	}

	pub fn delay(&self, query: Query, extra_yields: usize) {
		self.delays.borrow_mut().insert(query, extra_yields);
	}

	pub fn calls(&self) -> Vec<Query> {
		self.calls.borrow().clone()
	}
}

#[async_trait(?Send)]
impl FetchGateway for ScriptedGateway {
	async fn fetch(&self, query: &Query) -> Result<Subgraph, FetchError> {
		self.calls.borrow_mut().push(query.clone());
		let extra = self.delays.borrow().get(query).copied().unwrap_or(0);
		for _ in 0..=extra {
			tokio::task::yield_now().await;
		}

		match self.responses.borrow().get(query) {
			Some(Some(subgraph)) => Ok(subgraph.clone()),
			Some(None) => Err(FetchError::Status {
				status: 500,
				message: "scripted failure".into(),
			}),
			None => Ok(Subgraph::default()),
		}
	}
}
