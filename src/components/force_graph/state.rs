//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node metadata, view
//! transforms for pan/zoom, hover and selection state. The simulation is
//! rebuilt whenever the visible snapshot changes, carrying over the positions
//! of nodes that stay visible so the layout does not jump.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use crate::config::SimulationSettings;
use crate::ontology::{NodeId, Subgraph};

/// Relation type drawn dashed.
const REQUIRES: &str = "requires";

/// Distance from a placed neighbor at which a newly revealed node spawns.
const SPAWN_DISTANCE: f64 = 30.0;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: String,
	pub color: Color,
	/// Size multiplier (1.0 = normal, >1.0 = more connected)
	pub size: f64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node press, which becomes a drag once the pointer moves.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	/// Set once the pointer moved far enough that release is not a click.
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Hovered node and its direct neighbors.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	pub hovered: Option<DefaultNodeIdx>,
	neighbors: HashSet<DefaultNodeIdx>,
}

impl HighlightState {
	pub fn set_hover(
		&mut self,
		node: Option<DefaultNodeIdx>,
		edges: &[(DefaultNodeIdx, DefaultNodeIdx)],
	) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.neighbors.clear();
		if let Some(idx) = node {
			self.neighbors.insert(idx);
			for &(src, tgt) in edges {
				if src == idx {
					self.neighbors.insert(tgt);
				} else if tgt == idx {
					self.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_active(&self) -> bool {
		self.hovered.is_some()
	}

	/// True for the hovered node and its neighbors.
	pub fn contains(&self, idx: DefaultNodeIdx) -> bool {
		self.neighbors.contains(&idx)
	}
}

/// Core graph state combining physics simulation with interaction tracking.
///
/// Created once when the component mounts, resynced on every snapshot change
/// and advanced each frame by the animation loop.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub highlight: HighlightState,
	pub selected: Option<NodeId>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	simulation: SimulationSettings,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	dashed: HashSet<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl ForceGraphState {
	pub fn new(
		data: &Subgraph,
		width: f64,
		height: f64,
		theme: &Theme,
		simulation: SimulationSettings,
	) -> Self {
		let mut state = Self {
			graph: ForceGraph::new(simulation.parameters()),
			edges: Vec::new(),
			dashed: HashSet::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			selected: None,
			width,
			height,
			animation_running: true,
			simulation,
		};
		state.sync(data, theme);
		state
	}

	/// Current simulated position of every node, keyed by id.
	pub fn positions(&self) -> HashMap<NodeId, (f32, f32, bool)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});
		positions
	}

	/// Rebuilds the simulation for a new visible snapshot.
	///
	/// Nodes that were already simulated keep their position and pinning.
	/// New nodes start next to an already placed neighbor, else at the
	/// position carried by the snapshot, else on a ring around the origin.
	pub fn sync(&mut self, data: &Subgraph, theme: &Theme) {
		let previous = self.positions();
		let mut graph = ForceGraph::new(self.simulation.parameters());
		let mut id_to_idx = HashMap::new();

		let mut degree: HashMap<&NodeId, usize> = HashMap::new();
		let mut neighbors: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
		for link in &data.links {
			*degree.entry(&link.source).or_insert(0) += 1;
			*degree.entry(&link.target).or_insert(0) += 1;
			neighbors.entry(&link.source).or_default().push(&link.target);
			neighbors.entry(&link.target).or_default().push(&link.source);
		}
		let max_degree = degree.values().copied().max().unwrap_or(1).max(1);
		let count = data.nodes.len().max(1);

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count as f64;
			let (x, y, is_anchor) = match previous.get(&node.id) {
				Some(&placed) => placed,
				None => {
					let near = neighbors
						.get(&node.id)
						.and_then(|ns| ns.iter().find_map(|n| previous.get(*n)));
					match (near, node.x, node.y) {
						(Some(&(nx, ny, _)), _, _) => (
							nx + (SPAWN_DISTANCE * angle.cos()) as f32,
							ny + (SPAWN_DISTANCE * angle.sin()) as f32,
							false,
						),
						(None, Some(x), Some(y)) => (x as f32, y as f32, false),
						_ => (
							(100.0 * angle.cos()) as f32,
							(100.0 * angle.sin()) as f32,
							false,
						),
					}
				}
			};

			let node_degree = degree.get(&node.id).copied().unwrap_or(0);
			let degree_factor = (node_degree as f64 / max_degree as f64).sqrt();

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: theme.node_color(&node.kind),
					size: 1.0 + 0.8 * degree_factor,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		let mut edges = Vec::new();
		let mut dashed = HashSet::new();
		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
				if link.kind == REQUIRES {
					dashed.insert((src, tgt));
				}
			}
		}

		self.graph = graph;
		self.edges = edges;
		self.dashed = dashed;
		// Indices changed with the rebuild.
		self.highlight = HighlightState::default();
		self.drag = DragState::default();
	}

	pub fn is_dashed(&self, src: DefaultNodeIdx, tgt: DefaultNodeIdx) -> bool {
		self.dashed.contains(&(src, tgt))
	}

	pub fn is_selected(&self, info: &NodeInfo) -> bool {
		self.selected.as_ref() == Some(&info.id)
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<NodeId> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let node_hit_radius = scale.hit_radius * node.data.user_data.size;
			if (dx * dx + dy * dy).sqrt() < node_hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.highlight.set_hover(node, &self.edges);
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
