//! HTTP gateway for the ontology REST namespace.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::gateway::{FetchError, FetchGateway, Query};
use super::types::Subgraph;

/// Default API namespace, relative to the page origin.
pub const DEFAULT_API_BASE: &str = "/tvb-ext-ontology";

/// Error payload shape used by the backend (`{"error": ...}` or `{"message": ...}`).
#[derive(Deserialize)]
struct ErrorBody {
	error: Option<String>,
	message: Option<String>,
}

/// Queries the backend over HTTP.
#[derive(Clone, Debug)]
pub struct HttpGateway {
	http: Client,
	base_url: String,
}

impl HttpGateway {
	/// Create a gateway for the default namespace.
	pub fn new() -> Self {
		Self::with_base_url(DEFAULT_API_BASE)
	}

	/// Create a gateway rooted at `base_url`. A trailing slash is ignored.
	///
	/// A relative base (e.g. `/api`) is resolved against the page origin in the
	/// browser build.
	pub fn with_base_url(base_url: impl Into<String>) -> Self {
		let base_url: String = base_url.into();
		Self {
			http: Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	/// Namespace URL without trailing slash.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Absolute or origin-relative URL of a query's endpoint, without parameters.
	pub fn endpoint_url(&self, query: &Query) -> String {
		format!("{}/{}", self.base_url, query.endpoint())
	}

	fn request_url(&self, query: &Query) -> String {
		let url = self.endpoint_url(query);
		if url.starts_with("http://") || url.starts_with("https://") {
			return url;
		}
		match web_sys::window().and_then(|w| w.location().origin().ok()) {
			Some(origin) => format!("{origin}{url}"),
			None => url,
		}
	}
}

impl Default for HttpGateway {
	fn default() -> Self {
		Self::new()
	}
}

/// Pulls a human-readable message out of an error response body.
fn error_message(body: &str) -> String {
	match serde_json::from_str::<ErrorBody>(body) {
		Ok(ErrorBody {
			error: Some(msg), ..
		})
		| Ok(ErrorBody {
			message: Some(msg), ..
		}) => msg,
		_ if body.is_empty() => "(no body)".into(),
		_ => body.to_string(),
	}
}

/// Decodes a successful response body. An empty body means an empty subgraph.
fn decode_subgraph(body: &str) -> Result<Subgraph, FetchError> {
	if body.trim().is_empty() {
		return Ok(Subgraph::default());
	}
	serde_json::from_str(body)
		.map_err(|e| FetchError::Decode(format!("failed to parse subgraph: {e}")))
}

#[async_trait(?Send)]
impl FetchGateway for HttpGateway {
	async fn fetch(&self, query: &Query) -> Result<Subgraph, FetchError> {
		let response = self
			.http
			.get(self.request_url(query))
			.query(&query.params())
			.send()
			.await?;

		let status = response.status().as_u16();
		let body = response.text().await?;

		if status >= 400 {
			return Err(FetchError::Status {
				status,
				message: error_message(&body),
			});
		}

		decode_subgraph(&body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_base_url() {
		let gateway = HttpGateway::new();
		assert_eq!(gateway.base_url(), "/tvb-ext-ontology");
	}

	#[test]
	fn trailing_slash_is_trimmed() {
		let gateway = HttpGateway::with_base_url("http://localhost:8888/tvb-ext-ontology/");
		assert_eq!(
			gateway.endpoint_url(&Query::Connections("x".into())),
			"http://localhost:8888/tvb-ext-ontology/node-connections"
		);
	}

	#[test]
	fn absolute_urls_are_used_as_is() {
		let gateway = HttpGateway::with_base_url("https://onto.example.org/api");
		let query = Query::Parents {
			label: "Linear".into(),
			id: "3".into(),
		};
		assert_eq!(
			gateway.request_url(&query),
			"https://onto.example.org/api/node-parents"
		);
	}

	#[test]
	fn error_message_prefers_json_fields() {
		assert_eq!(
			error_message(r#"{"error": "Missing 'label' parameter"}"#),
			"Missing 'label' parameter"
		);
		assert_eq!(error_message(r#"{"message": "boom"}"#), "boom");
		assert_eq!(error_message("gateway timeout"), "gateway timeout");
		assert_eq!(error_message(""), "(no body)");
	}

	#[test]
	fn empty_body_decodes_to_empty_subgraph() {
		assert!(decode_subgraph("  ").unwrap().is_empty());
	}

	#[test]
	fn malformed_body_is_a_decode_error() {
		let err = decode_subgraph("<html>").unwrap_err();
		assert!(matches!(err, FetchError::Decode(_)));
	}
}
