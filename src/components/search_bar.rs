//! Label search input.

use std::rc::Rc;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;

/// Text input plus button. Enter or the button submits the current text.
#[component]
pub fn SearchBar(
	/// Called with the raw input text on submit.
	on_search: Rc<dyn Fn(String)>,
	/// Text the input starts with.
	#[prop(optional, into)]
	initial: String,
) -> impl IntoView {
	let query = RwSignal::new(initial);

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		on_search(query.get_untracked());
	};

	view! {
		<form class="search-bar" on:submit=on_submit>
			<input type="text" placeholder="Search concepts by label" bind:value=query />
			<button type="submit">"Search"</button>
		</form>
	}
}
