//! DOM capabilities the widgets need from their host.

use super::error::Result;

/// Handler invoked when a node is clicked.
pub type ClickHandler = Box<dyn FnMut()>;

/// The element tree a widget renders into.
///
/// Implemented on the real document by
/// [`WebSurface`](crate::components::graph_board::WebSurface) and in memory by
/// [`MemorySurface`](super::MemorySurface).
pub trait Surface: 'static {
	/// Handle to an element.
	type Node: Clone + 'static;

	/// Create a detached element.
	fn create_element(&self, tag: &str) -> Result<Self::Node>;

	/// Set an attribute on an element.
	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<()>;

	/// Replace the element's content with a text node.
	fn set_text(&self, node: &Self::Node, text: &str) -> Result<()>;

	/// Append `child` as the last child of `parent`.
	fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

	/// Let the user move the element around with the mouse.
	fn make_draggable(&self, node: &Self::Node) -> Result<()>;

	/// Run `handler` whenever the element is clicked.
	fn on_click(&self, node: &Self::Node, handler: ClickHandler) -> Result<()>;

	/// Detach the element and its descendants from the document.
	fn remove(&self, node: &Self::Node);

	/// Set an attribute on the document element with the given id.
	///
	/// Returns `false` without doing anything when no such element is
	/// currently in the document.
	fn set_attribute_by_id(&self, id: &str, name: &str, value: &str) -> Result<bool>;
}
