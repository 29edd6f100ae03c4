//! Hierarchy around the selected concept.
//!
//! Parents are listed above the current node and children below it. Each
//! parent and child carries its own relatives one level down; the current
//! node is left out of those nested lists since it is already shown.

use leptos::prelude::*;

use crate::ontology::{NodeId, TreeNode};

/// Renders the focus tree, or a hint when nothing is selected.
#[component]
pub fn TreeView(
	/// Focus tree of the current selection.
	#[prop(into)]
	tree: Signal<Option<TreeNode>>,
) -> impl IntoView {
	view! {
		<div class="tree-view">
			<h3>"Tree View"</h3>
			{move || match tree.get() {
				Some(root) => render_focus(root).into_any(),
				None => view! { <p class="placeholder">"Please select a node first"</p> }.into_any(),
			}}
		</div>
	}
}

fn render_focus(root: TreeNode) -> impl IntoView {
	let focus = root.id.clone();
	let parents = root
		.parents
		.into_iter()
		.map(|p| relative(p, "Parent", &focus))
		.collect_view();
	let children = root
		.children
		.into_iter()
		.map(|c| relative(c, "Child", &focus))
		.collect_view();

	view! {
		<ul>
			{parents}
			<li class="current">
				<strong>{format!("{} (Current)", root.label)}</strong>
				<ul>{children}</ul>
			</li>
		</ul>
	}
}

fn relative(node: TreeNode, role: &'static str, focus: &NodeId) -> AnyView {
	let nested: Vec<AnyView> = node
		.parents
		.into_iter()
		.filter(|p| &p.id != focus)
		.map(|p| relative(p, "Parent", focus))
		.chain(
			node.children
				.into_iter()
				.filter(|c| &c.id != focus)
				.map(|c| relative(c, "Child", focus)),
		)
		.collect();

	let nested = (!nested.is_empty()).then(|| view! { <ul>{nested}</ul> });
	view! {
		<li class=role.to_lowercase()>
			{format!("{} ({role})", node.label)}
			{nested}
		</li>
	}
	.into_any()
}
