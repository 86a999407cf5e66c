use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use super::state::{DragState, DragTracker};
use crate::graphs::{ClickHandler, GraphError, Result, Surface};

fn dom_err(err: JsValue) -> GraphError {
	GraphError::Dom(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// [`Surface`] backed by the page's document.
///
/// Click and mousedown listeners live as long as the page. Moves and
/// releases go through one shared pair of document listeners.
#[derive(Clone, Debug)]
pub struct WebSurface {
	document: Document,
	tracker: Rc<RefCell<DragTracker<HtmlElement>>>,
	tracking: Rc<Cell<bool>>,
}

impl WebSurface {
	/// Surface over the current window's document.
	pub fn new() -> Result<Self> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or(GraphError::NoDocument)?;
		Ok(Self::with_document(document))
	}

	/// Surface over an explicit document.
	pub fn with_document(document: Document) -> Self {
		Self {
			document,
			tracker: Rc::new(RefCell::new(DragTracker::default())),
			tracking: Rc::new(Cell::new(false)),
		}
	}

	/// Install the document move/release listeners on first use.
	fn track_drags(&self) -> Result<()> {
		if self.tracking.get() {
			return Ok(());
		}
		let tracker_mm = self.tracker.clone();
		Self::listen(&self.document, "mousemove", move |ev: MouseEvent| {
			let tracker = tracker_mm.borrow();
			let (cx, cy) = (ev.client_x() as f64, ev.client_y() as f64);
			if let Some((el, x, y)) = tracker.move_to(cx, cy) {
				let style = el.style();
				let _ = style.set_property("left", &format!("{}px", x));
				let _ = style.set_property("top", &format!("{}px", y));
			}
		})?;
		let tracker_mu = self.tracker.clone();
		Self::listen(&self.document, "mouseup", move |_: MouseEvent| {
			tracker_mu.borrow_mut().finish();
		})?;
		self.tracking.set(true);
		Ok(())
	}

	fn listen(
		target: &web_sys::EventTarget,
		event: &str,
		cb: impl FnMut(MouseEvent) + 'static,
	) -> Result<()> {
		let closure = Closure::<dyn FnMut(MouseEvent)>::new(cb);
		target
			.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
			.map_err(dom_err)?;
		closure.forget();
		Ok(())
	}
}

impl Surface for WebSurface {
	type Node = Element;

	fn create_element(&self, tag: &str) -> Result<Element> {
		self.document.create_element(tag).map_err(dom_err)
	}

	fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<()> {
		node.set_attribute(name, value).map_err(dom_err)
	}

	fn set_text(&self, node: &Element, text: &str) -> Result<()> {
		node.set_text_content(Some(text));
		Ok(())
	}

	fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
		parent.append_child(child).map(|_| ()).map_err(dom_err)
	}

	fn make_draggable(&self, node: &Element) -> Result<()> {
		let el: HtmlElement = node
			.clone()
			.dyn_into()
			.map_err(|_| GraphError::Dom("draggable node is not an HTML element".into()))?;
		let style = el.style();
		style.set_property("position", "relative").map_err(dom_err)?;
		style.set_property("cursor", "move").map_err(dom_err)?;
		self.track_drags()?;

		let (drag, tracker, el_md) = (
			Rc::new(RefCell::new(DragState::default())),
			self.tracker.clone(),
			el.clone(),
		);
		Self::listen(&el, "mousedown", move |ev: MouseEvent| {
			// Presses on the close control are clicks, not drags.
			let on_close = ev
				.target()
				.and_then(|t| t.dyn_into::<Element>().ok())
				.and_then(|t| t.closest(".close").ok().flatten())
				.is_some();
			if on_close || ev.button() != 0 {
				return;
			}
			ev.prevent_default();
			tracker.borrow_mut().start(
				el_md.clone(),
				drag.clone(),
				ev.client_x() as f64,
				ev.client_y() as f64,
			);
		})
	}

	fn on_click(&self, node: &Element, mut handler: ClickHandler) -> Result<()> {
		Self::listen(node, "click", move |ev: MouseEvent| {
			ev.stop_propagation();
			handler();
		})
	}

	fn remove(&self, node: &Element) {
		node.remove();
	}

	fn set_attribute_by_id(&self, id: &str, name: &str, value: &str) -> Result<bool> {
		match self.document.get_element_by_id(id) {
			Some(el) => {
				el.set_attribute(name, value).map_err(dom_err)?;
				Ok(true)
			}
			None => Ok(false),
		}
	}
}
