//! A single graph instance and its presentation.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use super::encode::PlotEndpoint;
use super::error::Result;
use super::surface::Surface;

/// Where a widget currently stands visually.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presentation {
	/// Never mounted; the caller places [`GraphWidget::html`] itself.
	Detached,
	/// Container is in the document.
	Mounted,
	/// The user closed the container. The widget still exists.
	Closed,
}

/// One graph: an id, its parameters and the image that shows them.
pub struct GraphWidget<S: Surface> {
	id: String,
	params: Value,
	src: String,
	endpoint: PlotEndpoint,
	surface: Rc<S>,
	container: Option<S::Node>,
	image: Option<S::Node>,
	presentation: Rc<Cell<Presentation>>,
}

impl<S: Surface> GraphWidget<S> {
	/// A widget that renders nothing until its markup is placed by the caller.
	pub(crate) fn detached(
		surface: Rc<S>,
		id: String,
		params: Value,
		endpoint: PlotEndpoint,
	) -> Result<Self> {
		let mut widget = Self {
			id,
			params: Value::Null,
			src: String::new(),
			endpoint,
			surface,
			container: None,
			image: None,
			presentation: Rc::new(Cell::new(Presentation::Detached)),
		};
		widget.apply(params)?;
		Ok(widget)
	}

	/// A widget mounted as a draggable, closable box under `parent`.
	pub(crate) fn mounted(
		surface: Rc<S>,
		parent: &S::Node,
		id: String,
		params: Value,
		endpoint: PlotEndpoint,
	) -> Result<Self> {
		let container = surface.create_element("div")?;
		surface.set_attribute(&container, "id", &container_id(&id))?;
		surface.set_attribute(&container, "class", "drag")?;
		surface.append_child(parent, &container)?;
		surface.make_draggable(&container)?;

		let image = surface.create_element("img")?;
		surface.set_attribute(&image, "id", &id)?;
		surface.append_child(&container, &image)?;

		let close = surface.create_element("div")?;
		surface.set_attribute(&close, "title", "close")?;
		surface.set_attribute(&close, "class", "close")?;
		let label = surface.create_element("b")?;
		surface.set_text(&label, "x")?;
		surface.append_child(&close, &label)?;
		surface.append_child(&container, &close)?;

		let presentation = Rc::new(Cell::new(Presentation::Mounted));
		let (on_close_surface, on_close_node, on_close_state, on_close_id) = (
			surface.clone(),
			container.clone(),
			presentation.clone(),
			id.clone(),
		);
		surface.on_click(
			&close,
			Box::new(move || {
				// Only the presentation goes away; the registry entry stays.
				on_close_surface.remove(&on_close_node);
				on_close_state.set(Presentation::Closed);
				info!("graph {} closed", on_close_id);
			}),
		)?;

		let mut widget = Self {
			id,
			params: Value::Null,
			src: String::new(),
			endpoint,
			surface,
			container: Some(container),
			image: Some(image),
			presentation,
		};
		widget.apply(params)?;
		Ok(widget)
	}

	/// Identifier, also the DOM id of the image element.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Current parameter set.
	pub fn parameters(&self) -> &Value {
		&self.params
	}

	/// Image source derived from the current parameters.
	pub fn src(&self) -> &str {
		&self.src
	}

	/// Current presentation state.
	pub fn presentation(&self) -> Presentation {
		self.presentation.get()
	}

	/// The `div_<id>` container of a mounted widget.
	pub fn container(&self) -> Option<&S::Node> {
		self.container.as_ref()
	}

	/// Markup for an image showing this graph.
	pub fn html(&self) -> String {
		format!(r#"<img id="{}" src="{}" />"#, self.id, self.src)
	}

	/// Replace the parameters and refresh the image.
	///
	/// Contents are not validated. On a serialization error the previous
	/// parameters are kept.
	pub fn set_parameters<P: Serialize>(&mut self, params: P) -> Result<()> {
		let value = serde_json::to_value(params)?;
		self.apply(value)
	}

	fn apply(&mut self, params: Value) -> Result<()> {
		let src = self.endpoint.src_for(&params);
		self.params = params;
		self.src = src;
		// A mounted widget owns its image; inline markup is only reachable by id.
		if let Some(image) = &self.image {
			return self.surface.set_attribute(image, "src", &self.src);
		}
		let found = self.surface.set_attribute_by_id(&self.id, "src", &self.src)?;
		if !found {
			debug!("graph {} has no image in the document yet", self.id);
		}
		Ok(())
	}
}

impl<S: Surface> fmt::Debug for GraphWidget<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GraphWidget")
			.field("id", &self.id)
			.field("params", &self.params)
			.field("presentation", &self.presentation.get())
			.finish()
	}
}

/// DOM id of the container wrapping the image with id `id`.
pub fn container_id(id: &str) -> String {
	format!("div_{}", id)
}
