use leptos::prelude::*;

use crate::components::graph_board::{GraphBoard, provide_registry};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// One registry per page, injected into the board through context.
	provide_registry();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="graph-page">
				<h1>"Graphs"</h1>
				<p class="subtitle">
					"Edit the parameters, then add a graph. Drag boxes to move them; x closes them."
				</p>
				<GraphBoard />
			</div>
		</ErrorBoundary>
	}
}
