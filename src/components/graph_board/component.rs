use leptos::prelude::*;
use log::{error, info, warn};
use serde_json::Value;
use web_sys::{Element, MouseEvent};

use super::web_surface::WebSurface;
use crate::graphs::{GraphError, GraphHandle, GraphRegistry, Result};

const DEFAULT_PARAMS: &str = r#"{ "type": "line", "series": ["load"], "range": "1h" }"#;

/// The page's graph registry, shared through context.
pub type SharedRegistry = StoredValue<Option<GraphRegistry<WebSurface>>, LocalStorage>;

/// Build the page registry and provide it to child components.
pub fn provide_registry() -> SharedRegistry {
	let registry = match WebSurface::new() {
		Ok(surface) => Some(GraphRegistry::new(surface)),
		Err(e) => {
			error!("graph registry unavailable: {}", e);
			None
		}
	};
	let shared: SharedRegistry = StoredValue::new_local(registry);
	provide_context(shared);
	shared
}

fn with_registry<T>(
	shared: SharedRegistry,
	f: impl FnOnce(&mut GraphRegistry<WebSurface>) -> Result<T>,
) -> Result<T> {
	shared
		.try_update_value(|registry| match registry {
			Some(registry) => f(registry),
			None => Err(GraphError::NoDocument),
		})
		.unwrap_or(Err(GraphError::NoDocument))
}

fn parse_params(text: &str) -> std::result::Result<Value, String> {
	serde_json::from_str(text).map_err(|e| format!("invalid parameters: {}", e))
}

/// Toolbar plus a board that graphs are mounted on.
#[component]
pub fn GraphBoard() -> impl IntoView {
	let registry = use_context::<SharedRegistry>().unwrap_or_else(provide_registry);
	let board_ref = NodeRef::<leptos::html::Div>::new();
	let (params_text, set_params_text) = signal(DEFAULT_PARAMS.to_string());
	let (target_id, set_target_id) = signal(String::new());
	let (status, set_status) = signal(String::new());
	let (handles, set_handles) = signal(Vec::<GraphHandle>::new());
	let (inline, set_inline) = signal(Vec::<GraphHandle>::new());

	let report = move |outcome: std::result::Result<String, String>| match outcome {
		Ok(msg) => {
			info!("{}", msg);
			set_status.set(msg);
		}
		Err(msg) => {
			warn!("{}", msg);
			set_status.set(msg);
		}
	};

	let add = move |mounted: bool| {
		let params = match parse_params(&params_text.get_untracked()) {
			Ok(params) => params,
			Err(msg) => return report(Err(msg)),
		};
		let board: Option<Element> = board_ref.get_untracked().map(Into::into);
		if mounted && board.is_none() {
			return report(Err("board is not mounted yet".into()));
		}
		let parent = if mounted { board.as_ref() } else { None };
		match with_registry(registry, |r| r.add_graph(parent, params)) {
			Ok(handle) => {
				set_target_id.set(handle.id().to_string());
				set_handles.update(|all| all.push(handle.clone()));
				if !mounted {
					set_inline.update(|all| all.push(handle.clone()));
				}
				report(Ok(format!("added {}", handle)));
			}
			Err(e) => report(Err(e.to_string())),
		}
	};

	let on_update = move |_: MouseEvent| {
		let id = target_id.get_untracked();
		let params = match parse_params(&params_text.get_untracked()) {
			Ok(params) => params,
			Err(msg) => return report(Err(msg)),
		};
		let outcome = with_registry(registry, |r| {
			let known = r.contains(&id);
			r.update_graph(&id, params).map(|()| known)
		});
		match outcome {
			Ok(true) => report(Ok(format!("updated {}", id))),
			Ok(false) => report(Ok(format!("no graph {:?}, update ignored", id))),
			Err(e) => report(Err(e.to_string())),
		}
	};

	let load_params = move |id: String| {
		let current = registry.with_value(|r| {
			r.as_ref()
				.and_then(|r| r.get_graph(&id))
				.map(|w| w.parameters().to_string())
		});
		if let Some(params) = current {
			set_params_text.set(params);
		}
		set_target_id.set(id);
	};

	view! {
		<div class="graph-toolbar">
			<textarea
				class="graph-params"
				rows="4"
				prop:value=move || params_text.get()
				on:input=move |ev| set_params_text.set(event_target_value(&ev))
			/>
			<div class="graph-actions">
				<button on:click=move |_| add(true)>"Add graph"</button>
				<button on:click=move |_| add(false)>"Add inline"</button>
				<input
					type="text"
					placeholder="graph id"
					prop:value=move || target_id.get()
					on:input=move |ev| set_target_id.set(event_target_value(&ev))
				/>
				<button on:click=on_update>"Update"</button>
			</div>
			<p class="graph-status">{move || status.get()}</p>
			<ul class="graph-ids">
				{move || {
					handles
						.get()
						.into_iter()
						.map(|handle| {
							let id = handle.id().to_string();
							view! {
								<li>
									<button on:click=move |_| load_params(id.clone())>
										{handle.to_string()}
									</button>
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
		</div>
		<div class="graph-inline">
			{move || {
				inline
					.get()
					.into_iter()
					.filter_map(|handle| {
						registry.with_value(|r| {
							r.as_ref()
								.and_then(|r| r.get_graph(handle.id()))
								.map(|w| w.html())
						})
					})
					.map(|html| view! { <div class="inline-graph" inner_html=html></div> })
					.collect_view()
			}}
		</div>
		<div node_ref=board_ref class="graph-board"></div>
	}
}
