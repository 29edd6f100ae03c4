//! Explorer configuration.
//!
//! The host page may embed a JSON object in
//! `<script id="explorer-config" type="application/json">`. Every field is
//! optional; anything missing falls back to its default.

use force_graph::SimulationParameters;
use serde::Deserialize;

use crate::ontology::DEFAULT_API_BASE;

/// Visual theme selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
	/// Dark background with gradients.
	#[default]
	Dark,
	/// Plain light background.
	Light,
}

/// Force-layout parameters passed to the physics simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
	/// Repulsion between nodes.
	pub force_charge: f32,
	/// Attraction along links.
	pub force_spring: f32,
	/// Upper bound on the force applied to a node per step.
	pub force_max: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Fraction of velocity kept per step.
	pub damping_factor: f32,
}

impl Default for SimulationSettings {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

impl SimulationSettings {
	/// Converts to the physics crate's parameter struct.
	pub fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// Top-level explorer settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
	/// Base URL of the ontology API namespace.
	pub api_base: String,
	/// Label searched on startup. Empty loads the whole ontology.
	pub initial_query: String,
	/// Canvas theme.
	pub theme: ThemeName,
	/// Force-layout tuning.
	pub simulation: SimulationSettings,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.to_string(),
			initial_query: String::new(),
			theme: ThemeName::default(),
			simulation: SimulationSettings::default(),
		}
	}
}

impl ExplorerConfig {
	/// Parses the embedded JSON object.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}
