//! Canvas rendering for the ontology graph.
//!
//! Drawing order:
//! 1. Background (screen space)
//! 2. Edges with arrowheads (world space)
//! 3. Nodes, then labels, then the selection and hover rings on top

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, NodeInfo};
use super::theme::Theme;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	let gradient = bg
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&bg.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn node_radius(scale: &ScaledValues, info: &NodeInfo) -> f64 {
	scale.node_radius * info.size
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let hovering = state.highlight.is_active();

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let r1 = node_radius(scale, &n1.data.user_data);
		let r2 = node_radius(scale, &n2.data.user_data);

		let lit = state.highlight.contains(n1.index()) && state.highlight.contains(n2.index());
		let alpha = if hovering && !lit {
			theme.node.dimmed_alpha
		} else {
			1.0
		};
		let color = theme.edge.color.with_alpha(theme.edge.color.a * alpha);

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(scale.edge_width);
		if state.is_dashed(n1.index(), n2.index()) {
			let (dash, gap) = theme.edge.requires_dash;
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		// Control point offset perpendicular to the edge.
		let bend = dist * theme.edge.curvature;
		let (cx, cy) = ((x1 + x2) / 2.0 - uy * bend, (y1 + y2) / 2.0 + ux * bend);

		// Arrow tip sits on the target's rim, pointing along the curve's end tangent.
		let (tx, ty) = (x2 - cx, y2 - cy);
		let tlen = (tx * tx + ty * ty).sqrt().max(0.001);
		let (tux, tuy) = (tx / tlen, ty / tlen);
		let (tip_x, tip_y) = (x2 - tux * r2, y2 - tuy * r2);
		let (back_x, back_y) = (tip_x - tux * scale.arrow_size, tip_y - tuy * scale.arrow_size);

		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		if theme.edge.curvature > 0.0 {
			ctx.quadratic_curve_to(cx, cy, back_x, back_y);
		} else {
			ctx.line_to(back_x, back_y);
		}
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&color.to_css());
		let (px, py) = (-tuy * scale.arrow_size * 0.5, tux * scale.arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	});
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let hovering = state.highlight.is_active();

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = node_radius(scale, info);
		let alpha = if hovering && !state.highlight.contains(node.index()) {
			theme.node.dimmed_alpha
		} else {
			1.0
		};

		ctx.set_global_alpha(alpha);
		draw_node_body(ctx, theme, info, x, y, radius);

		ctx.set_fill_style_str(&theme.node.label_color.to_css());
		ctx.set_font(&scale.label_font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		let _ = ctx.fill_text(&info.label, x, y + radius + 2.0);
		ctx.set_global_alpha(1.0);

		if state.is_selected(info) {
			draw_ring(ctx, x, y, radius + scale.ring_offset, scale.ring_width, &theme.selection.to_css());
		}
		if state.highlight.hovered == Some(node.index()) {
			draw_ring(
				ctx,
				x,
				y,
				radius + scale.ring_offset * 2.5,
				scale.ring_width * 0.7,
				&theme.hover.to_css(),
			);
		}
	});
}

fn draw_node_body(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	info: &NodeInfo,
	x: f64,
	y: f64,
	radius: f64,
) {
	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &info.color.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &info.color.to_css());
			let _ = gradient.add_color_stop(1.0, &info.color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&info.color.to_css()),
	}
	ctx.fill();
}

fn draw_ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, width: f64, color: &str) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.stroke();
}
