//! ontology-explorer: incremental exploration of an ontology graph.
//!
//! The [`ontology`] module holds the engine: a repository of every concept
//! fetched so far, per-node expand/collapse state, the visible-set traversal,
//! the parent/child tree builder and the gateway to the ontology REST API.
//! [`components`] is the Leptos UI on top of it, rendering the visible graph
//! with a force-directed layout on a canvas.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod config;
pub mod ontology;

pub use components::explorer::OntologyExplorer;
pub use config::ExplorerConfig;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ontology-explorer: logging initialized");
}

/// Load explorer settings from a script element with id="explorer-config".
/// A missing element or invalid JSON falls back to the defaults.
fn load_config() -> ExplorerConfig {
	let Some(json_text) = config_text() else {
		return ExplorerConfig::default();
	};

	match ExplorerConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"ontology-explorer: api at {}, initial query {:?}",
				config.api_base, config.initial_query
			);
			config
		}
		Err(e) => {
			warn!("ontology-explorer: failed to parse config, using defaults: {}", e);
			ExplorerConfig::default()
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("explorer-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let theme = match config.theme {
		config::ThemeName::Dark => "dark",
		config::ThemeName::Light => "light",
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme />
		<Title text="Ontology Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<OntologyExplorer config=config />
	}
}
