//! Details panel for the selected concept.

use leptos::prelude::*;

use crate::ontology::SelectedNode;

/// Shows the selected concept, or a hint when nothing is selected.
#[component]
pub fn InfoBox(
	/// Current selection snapshot.
	#[prop(into)]
	selection: Signal<Option<SelectedNode>>,
) -> impl IntoView {
	view! {
		<div class="info-box">
			<h3>"Concept Details"</h3>
			{move || match selection.get() {
				Some(node) => details(node).into_any(),
				None => view! { <p class="placeholder">"Select a node to see its details here"</p> }
					.into_any(),
			}}
		</div>
	}
}

fn details(node: SelectedNode) -> impl IntoView {
	let SelectedNode {
		label,
		kind,
		definition,
		iri,
		requires,
		neighbors,
		..
	} = node;
	let href = iri.clone();
	let connected = format!("{} connected concepts", neighbors.len());

	let requires = (!requires.is_empty()).then(|| {
		view! {
			<div>
				<strong>"Requires:"</strong>
				<ul class="requires">
					{requires.into_iter().map(|r| view! { <li>{r}</li> }).collect_view()}
				</ul>
			</div>
		}
	});

	view! {
		<div class="node-info">
			<p><strong>"Name: "</strong>{label}</p>
			<p><strong>"Type: "</strong>{kind}</p>
			<p><strong>"Definition: "</strong>{definition}</p>
			<p>
				<strong>"IRI: "</strong>
				<a href=href target="_blank" rel="noopener noreferrer">{iri}</a>
			</p>
			{requires}
			<p class="neighbors">{connected}</p>
		</div>
	}
}
