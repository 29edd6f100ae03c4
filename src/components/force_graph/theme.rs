//! Visual theming for the ontology graph.
//!
//! Provides color palettes, per-type node colors and visual style configuration.

use std::collections::HashMap;

use crate::config::ThemeName;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Alpha, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Hex for opaque colors, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fallback colors for node types without an explicit entry.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Candidate colors. Must not be empty.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted slate blues and teals.
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),
				Color::rgb(129, 161, 193),
				Color::rgb(100, 148, 160),
				Color::rgb(136, 160, 175),
				Color::rgb(108, 142, 173),
				Color::rgb(119, 158, 165),
			],
		}
	}

	/// Deeper tones that read well on a light background.
	pub fn ink() -> Self {
		Self {
			colors: vec![
				Color::rgb(70, 110, 140),
				Color::rgb(120, 90, 140),
				Color::rgb(90, 125, 95),
				Color::rgb(150, 105, 80),
				Color::rgb(95, 95, 130),
				Color::rgb(80, 120, 120),
			],
		}
	}

	/// Stable color for a type name: the same type always maps to the same entry.
	pub fn for_kind(&self, kind: &str) -> Color {
		let hash = kind
			.bytes()
			.fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
		self.colors[hash % self.colors.len()]
	}
}

/// Colors for the simulation component categories.
pub fn default_type_colors() -> HashMap<String, Color> {
	[
		("Neural Mass Model", Color::rgb(25, 118, 210)),
		("Coupling", Color::rgb(230, 81, 0)),
		("Noise", Color::rgb(123, 31, 162)),
		("Integrator", Color::rgb(46, 125, 50)),
	]
	.into_iter()
	.map(|(k, v)| (k.to_string(), v))
	.collect()
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Base fill.
	pub color: Color,
	/// Secondary color for the radial gradient.
	pub color_secondary: Color,
	/// Radial gradient instead of a flat fill.
	pub use_gradient: bool,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Stroke and arrowhead color.
	pub color: Color,
	/// Curve offset as a fraction of edge length (0.0 = straight).
	pub curvature: f64,
	/// Dash pattern (dash, gap) for `requires` relations, in world units.
	pub requires_dash: (f64, f64),
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Shaded node bodies instead of flat ones.
	pub use_gradient: bool,
	/// Label text color.
	pub label_color: Color,
	/// Alpha applied to nodes outside the hover neighborhood while hovering.
	pub dimmed_alpha: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Links.
	pub edge: EdgeStyle,
	/// Nodes and labels.
	pub node: NodeStyle,
	/// Ring drawn around the selected node.
	pub selection: Color,
	/// Ring drawn around the hovered node.
	pub hover: Color,
	/// Fallback colors for unlisted types.
	pub palette: NodePalette,
	/// Fixed colors per node type.
	pub type_colors: HashMap<String, Color>,
}

impl Theme {
	/// Theme for a configured name.
	pub fn for_name(name: ThemeName) -> Self {
		match name {
			ThemeName::Dark => Self::dark(),
			ThemeName::Light => Self::light(),
		}
	}

	/// Dark background with soft gradients (default).
	pub fn dark() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				curvature: 0.15,
				requires_dash: (4.0, 3.0),
			},
			node: NodeStyle {
				use_gradient: true,
				label_color: Color::rgba(255, 255, 255, 0.85),
				dimmed_alpha: 0.35,
			},
			selection: Color::rgb(239, 83, 80),
			hover: Color::rgba(255, 255, 255, 0.8),
			palette: NodePalette::slate(),
			type_colors: default_type_colors(),
		}
	}

	/// Plain light background, black labels.
	pub fn light() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(250, 250, 250),
				color_secondary: Color::rgb(250, 250, 250),
				use_gradient: false,
			},
			edge: EdgeStyle {
				color: Color::rgba(90, 100, 115, 0.6),
				curvature: 0.15,
				requires_dash: (4.0, 3.0),
			},
			node: NodeStyle {
				use_gradient: false,
				label_color: Color::rgb(0, 0, 0),
				dimmed_alpha: 0.3,
			},
			selection: Color::rgb(220, 0, 0),
			hover: Color::rgba(0, 0, 0, 0.6),
			palette: NodePalette::ink(),
			type_colors: default_type_colors(),
		}
	}

	/// Fill color for a node of the given type.
	pub fn node_color(&self, kind: &str) -> Color {
		self.type_colors
			.get(kind)
			.copied()
			.unwrap_or_else(|| self.palette.for_kind(kind))
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}
