//! Page-wide directory of graph widgets.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;
use serde::Serialize;

use super::config::GraphConfig;
use super::error::Result;
use super::surface::Surface;
use super::widget::GraphWidget;

/// Identifies a graph created by a [`GraphRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphHandle {
	sequence: u64,
	id: String,
}

impl GraphHandle {
	/// The string id, usable as a registry key and DOM id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Allocation order of this graph within its registry.
	pub fn sequence(&self) -> u64 {
		self.sequence
	}
}

impl AsRef<str> for GraphHandle {
	fn as_ref(&self) -> &str {
		&self.id
	}
}

impl fmt::Display for GraphHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.id)
	}
}

/// Creates graph widgets, mints their ids and routes updates to them.
///
/// Widgets are never removed. Closing one in the UI detaches its container
/// but its entry stays here and keeps accepting updates.
pub struct GraphRegistry<S: Surface> {
	surface: Rc<S>,
	config: GraphConfig,
	entries: HashMap<String, GraphWidget<S>>,
	order: Vec<GraphHandle>,
	next_sequence: u64,
}

impl<S: Surface> GraphRegistry<S> {
	/// Registry with the default configuration.
	pub fn new(surface: S) -> Self {
		Self::from_parts(Rc::new(surface), GraphConfig::default())
	}

	/// Registry with a custom configuration, validated first.
	pub fn with_config(surface: S, config: GraphConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self::from_parts(Rc::new(surface), config))
	}

	fn from_parts(surface: Rc<S>, config: GraphConfig) -> Self {
		Self {
			surface,
			config,
			entries: HashMap::new(),
			order: Vec::new(),
			next_sequence: 0,
		}
	}

	/// Create a graph and return its handle.
	///
	/// With a `parent` the widget mounts itself there as a draggable box;
	/// without one it stays detached and the caller places
	/// [`GraphWidget::html`]. Parameters that fail to serialize are rejected
	/// before an id is minted.
	pub fn add_graph<P: Serialize>(
		&mut self,
		parent: Option<&S::Node>,
		params: P,
	) -> Result<GraphHandle> {
		let params = serde_json::to_value(params)?;
		let sequence = self.next_sequence;
		self.next_sequence += 1;
		let id = format!("{}{}", self.config.id_prefix, sequence);

		let endpoint = self.config.endpoint.clone();
		let widget = match parent {
			Some(parent) => {
				GraphWidget::mounted(self.surface.clone(), parent, id.clone(), params, endpoint)?
			}
			None => GraphWidget::detached(self.surface.clone(), id.clone(), params, endpoint)?,
		};
		debug!("added graph {} ({:?})", id, widget.presentation());

		let handle = GraphHandle { sequence, id };
		self.entries.insert(handle.id.clone(), widget);
		self.order.push(handle.clone());
		Ok(handle)
	}

	/// The widget registered under `id`, if any.
	pub fn get_graph(&self, id: &str) -> Option<&GraphWidget<S>> {
		self.entries.get(id)
	}

	/// Mutable access to the widget registered under `id`, if any.
	pub fn get_graph_mut(&mut self, id: &str) -> Option<&mut GraphWidget<S>> {
		self.entries.get_mut(id)
	}

	/// Forward new parameters to the widget registered under `id`.
	///
	/// An update to an unknown id is ignored, not an error.
	pub fn update_graph<P: Serialize>(&mut self, id: &str, params: P) -> Result<()> {
		match self.entries.get_mut(id) {
			Some(widget) => widget.set_parameters(params),
			None => {
				debug!("ignoring update for unknown graph {}", id);
				Ok(())
			}
		}
	}

	/// Whether `id` was issued by this registry.
	pub fn contains(&self, id: &str) -> bool {
		self.entries.contains_key(id)
	}

	/// Number of graphs created so far.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether no graph was created yet.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Handles in allocation order.
	pub fn ids(&self) -> impl Iterator<Item = &GraphHandle> {
		self.order.iter()
	}

	/// Active configuration.
	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Surface the widgets render into.
	pub fn surface(&self) -> &S {
		&self.surface
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use serde_json::json;

	use super::*;
	use crate::graphs::{GraphError, MemorySurface, Presentation};

	#[test]
	fn ids_are_distinct_and_increasing() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		let body = registry.surface().body();
		let handles: Vec<_> = (0..25)
			.map(|i| {
				let parent = (i % 2 == 0).then_some(&body);
				registry.add_graph(parent, json!({ "i": i })).unwrap()
			})
			.collect();

		for pair in handles.windows(2) {
			assert!(pair[0].sequence() < pair[1].sequence());
			assert!(pair[0] < pair[1]);
			assert_ne!(pair[0].id(), pair[1].id());
		}
		assert_eq!(handles[0].id(), "DPAGraph0");
		assert_eq!(handles[12].id(), "DPAGraph12");
		assert_eq!(registry.len(), 25);
		assert!(registry.ids().eq(handles.iter()));
	}

	#[test]
	fn update_then_get_returns_the_new_parameters() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		let body = registry.surface().body();
		let mounted = registry.add_graph(Some(&body), json!({})).unwrap();
		let detached = registry.add_graph(None, json!({})).unwrap();

		let params = json!({ "series": ["a", "b"], "log": true });
		for handle in [&mounted, &detached] {
			registry.update_graph(handle.id(), &params).unwrap();
			assert_eq!(registry.get_graph(handle.id()).unwrap().parameters(), &params);
		}
	}

	#[test]
	fn typed_parameters_are_stored_as_json() {
		#[derive(Serialize)]
		struct Plot<'a> {
			kind: &'a str,
			bins: u32,
		}

		let mut registry = GraphRegistry::new(MemorySurface::new());
		let handle = registry.add_graph(None, Plot { kind: "hist", bins: 20 }).unwrap();
		assert_eq!(
			registry.get_graph(handle.id()).unwrap().parameters(),
			&json!({ "kind": "hist", "bins": 20 })
		);
	}

	#[test]
	fn update_to_unknown_id_is_ignored() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		let body = registry.surface().body();
		let handle = registry.add_graph(Some(&body), json!({ "x": 1 })).unwrap();
		let src_before = registry.get_graph(handle.id()).unwrap().src().to_string();

		registry.update_graph("DPAGraph99", json!({ "x": 2 })).unwrap();
		registry.update_graph("", json!(null)).unwrap();

		assert_eq!(registry.len(), 1);
		assert!(!registry.contains("DPAGraph99"));
		let widget = registry.get_graph(handle.id()).unwrap();
		assert_eq!(widget.parameters(), &json!({ "x": 1 }));
		assert_eq!(widget.src(), src_before);
	}

	#[test]
	fn lookup_miss_is_explicit() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		assert!(registry.get_graph("DPAGraph0").is_none());
		assert!(registry.get_graph_mut("DPAGraph0").is_none());
		assert!(registry.is_empty());
	}

	#[test]
	fn mounted_graph_has_one_container_with_image_and_close() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		let surface_body = registry.surface().body();
		let board = registry.surface().create_element("div").unwrap();
		registry.surface().append_child(&surface_body, &board).unwrap();

		let handle = registry.add_graph(Some(&board), json!({ "a": "b c!" })).unwrap();
		let surface = registry.surface();

		let containers = surface.children(board);
		assert_eq!(containers.len(), 1);
		assert_eq!(
			surface.attribute(containers[0], "id"),
			Some(format!("div_{}", handle.id()))
		);
		let inner = surface.children(containers[0]);
		let images: Vec<_> = inner.iter().filter(|n| surface.tag(**n) == "img").collect();
		let closes: Vec<_> = inner
			.iter()
			.filter(|n| surface.attribute(**n, "class").as_deref() == Some("close"))
			.collect();
		assert_eq!(images.len(), 1);
		assert_eq!(closes.len(), 1);
		assert_eq!(surface.attribute(*images[0], "id").as_deref(), Some(handle.id()));
		assert_eq!(
			surface.attribute(*images[0], "src").as_deref(),
			Some("plot/?params=%7B%22a%22%3A%22b%20c%21%22%7D")
		);
	}

	#[test]
	fn graph_mounted_under_unattached_board_has_src() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		let board = registry.surface().create_element("div").unwrap();
		let handle = registry.add_graph(Some(&board), json!({ "x": 1 })).unwrap();

		let surface = registry.surface();
		surface.append_child(&surface.body(), &board).unwrap();
		let image = surface.element_by_id(handle.id()).unwrap();
		assert_eq!(
			surface.attribute(image, "src").as_deref(),
			Some("plot/?params=%7B%22x%22%3A1%7D")
		);
	}

	#[test]
	fn inserted_markup_is_refreshed_by_id() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		let handle = registry.add_graph(None, json!({ "x": 1 })).unwrap();

		// Stand-in for the caller inserting `html()` into the page.
		let surface = registry.surface();
		let image = surface.create_element("img").unwrap();
		surface.set_attribute(&image, "id", handle.id()).unwrap();
		surface.append_child(&surface.body(), &image).unwrap();
		assert_eq!(surface.attribute(image, "src"), None);

		registry.update_graph(handle.id(), json!({ "x": 2 })).unwrap();
		assert_eq!(
			registry.surface().attribute(image, "src").as_deref(),
			Some("plot/?params=%7B%22x%22%3A2%7D")
		);
	}

	#[test]
	fn closing_keeps_the_registry_entry() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		let body = registry.surface().body();
		let handle = registry.add_graph(Some(&body), json!({ "x": 1 })).unwrap();
		let container = *registry.get_graph(handle.id()).unwrap().container().unwrap();
		let close = registry.surface().children(container)[1];

		registry.surface().click(close);

		assert!(registry.surface().children(body).is_empty());
		assert!(registry.surface().element_by_id(&format!("div_{}", handle.id())).is_none());
		let widget = registry.get_graph(handle.id()).unwrap();
		assert_eq!(widget.presentation(), Presentation::Closed);
		assert_eq!(widget.parameters(), &json!({ "x": 1 }));

		registry.update_graph(handle.id(), json!({ "x": 2 })).unwrap();
		assert_eq!(registry.get_graph(handle.id()).unwrap().parameters(), &json!({ "x": 2 }));
	}

	#[test]
	fn ids_are_not_reused_after_close() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		let body = registry.surface().body();
		let first = registry.add_graph(Some(&body), json!(1)).unwrap();
		let container = *registry.get_graph(first.id()).unwrap().container().unwrap();
		let close = registry.surface().children(container)[1];
		registry.surface().click(close);

		let second = registry.add_graph(Some(&body), json!(2)).unwrap();
		assert_eq!(second.id(), "DPAGraph1");
		assert_eq!(registry.len(), 2);
	}

	#[test]
	fn unserializable_params_do_not_consume_an_id() {
		let mut registry = GraphRegistry::new(MemorySurface::new());
		let mut bad = BTreeMap::new();
		bad.insert(vec![0u8], 1);

		let err = registry.add_graph(None, &bad).unwrap_err();
		assert!(matches!(err, GraphError::Serialize(_)));
		assert!(registry.is_empty());
		assert_eq!(registry.add_graph(None, json!({})).unwrap().id(), "DPAGraph0");
	}

	#[test]
	fn custom_config_shapes_ids_and_sources() {
		let config = GraphConfig::from_json(
			r#"{ "id_prefix": "chart-", "endpoint": { "path": "/png", "query_key": "p" } }"#,
		)
		.unwrap();
		let mut registry = GraphRegistry::with_config(MemorySurface::new(), config).unwrap();
		let handle = registry.add_graph(None, json!(0)).unwrap();
		assert_eq!(handle.to_string(), "chart-0");
		assert_eq!(registry.get_graph("chart-0").unwrap().src(), "/png?p=0");
	}

	#[test]
	fn invalid_config_is_rejected() {
		let config = GraphConfig {
			id_prefix: "bad id".into(),
			..GraphConfig::default()
		};
		assert!(matches!(
			GraphRegistry::with_config(MemorySurface::new(), config),
			Err(GraphError::Config(_))
		));
	}
}
