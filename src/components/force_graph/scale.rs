//! Zoom-dependent sizing for graph visuals.
//!
//! Sizes are expressed in world units (the graph's coordinate system) and
//! converted per frame for the current zoom factor `k`. Some elements should
//! grow with zoom, others keep a fixed pixel size, and some grow only within
//! pixel bounds; [`ScaleBehavior`] names those three cases.

/// How a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels).
	Screen,
	/// World-space size, clamped so it stays within `min_screen..max_screen` pixels.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Sizing for every element the renderer draws.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Base node radius in world units.
	pub node_radius: f64,
	/// How node radius follows zoom.
	pub node_behavior: ScaleBehavior,
	/// Pointer hit radius in world units.
	pub hit_radius: f64,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Below this zoom level labels stop shrinking.
	pub label_min_k: f64,
	/// Edge width in screen pixels.
	pub edge_width: f64,
	/// Arrowhead length in world units.
	pub arrow_size: f64,
	/// How arrowheads follow zoom.
	pub arrow_behavior: ScaleBehavior,
	/// Selection/hover ring width in screen pixels.
	pub ring_width: f64,
	/// Gap between node edge and ring in screen pixels.
	pub ring_offset: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: 4.0,
			node_behavior: ScaleBehavior::Clamped {
				min_screen: 4.0,
				max_screen: f64::INFINITY,
			},
			hit_radius: 10.0,
			label_size: 12.0,
			label_min_k: 0.5,
			edge_width: 1.2,
			arrow_size: 3.5,
			arrow_behavior: ScaleBehavior::World,
			ring_width: 1.5,
			ring_offset: 1.5,
		}
	}
}

/// Scale values resolved for one zoom level. Compute once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Node radius.
	pub node_radius: f64,
	/// Pointer hit radius.
	pub hit_radius: f64,
	/// Ready-to-use canvas font string.
	pub label_font: String,
	/// Label font size.
	pub label_size: f64,
	/// Edge stroke width.
	pub edge_width: f64,
	/// Arrowhead length.
	pub arrow_size: f64,
	/// Ring stroke width.
	pub ring_width: f64,
	/// Gap between node and ring.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Resolves `config` for zoom `k`. All values are in world units.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_size = config.label_size / k.max(config.label_min_k);
		Self {
			node_radius: config.node_behavior.apply(config.node_radius, k),
			hit_radius: ScaleBehavior::Clamped {
				min_screen: config.hit_radius,
				max_screen: f64::INFINITY,
			}
			.apply(config.hit_radius, k),
			label_font: format!("{label_size}px sans-serif"),
			label_size,
			edge_width: ScaleBehavior::Screen.apply(config.edge_width, k),
			arrow_size: config.arrow_behavior.apply(config.arrow_size, k),
			ring_width: ScaleBehavior::Screen.apply(config.ring_width, k),
			ring_offset: ScaleBehavior::Screen.apply(config.ring_offset, k),
		}
	}
}
