//! In-memory [`Surface`] used for headless rendering and tests.

use std::cell::RefCell;
use std::collections::HashMap;

use super::error::{GraphError, Result};
use super::surface::{ClickHandler, Surface};

/// Handle to an element of a [`MemorySurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemoryNode(usize);

#[derive(Debug, Default)]
struct Element {
	tag: String,
	attrs: Vec<(String, String)>,
	text: Option<String>,
	children: Vec<MemoryNode>,
	parent: Option<MemoryNode>,
	draggable: bool,
}

/// A minimal element tree with a `body` root.
pub struct MemorySurface {
	elements: RefCell<Vec<Element>>,
	handlers: RefCell<HashMap<MemoryNode, ClickHandler>>,
}

impl Default for MemorySurface {
	fn default() -> Self {
		Self::new()
	}
}

impl MemorySurface {
	/// An empty document containing only `body`.
	pub fn new() -> Self {
		Self {
			elements: RefCell::new(vec![Element {
				tag: "body".into(),
				..Element::default()
			}]),
			handlers: RefCell::new(HashMap::new()),
		}
	}

	/// The document root.
	pub fn body(&self) -> MemoryNode {
		MemoryNode(0)
	}

	/// Children of `node` in document order.
	pub fn children(&self, node: MemoryNode) -> Vec<MemoryNode> {
		self.elements.borrow()[node.0].children.clone()
	}

	/// Tag name of `node`.
	pub fn tag(&self, node: MemoryNode) -> String {
		self.elements.borrow()[node.0].tag.clone()
	}

	/// Value of an attribute, if set.
	pub fn attribute(&self, node: MemoryNode, name: &str) -> Option<String> {
		self.elements.borrow()[node.0]
			.attrs
			.iter()
			.find(|(k, _)| k == name)
			.map(|(_, v)| v.clone())
	}

	/// Text content set through [`Surface::set_text`].
	pub fn text(&self, node: MemoryNode) -> Option<String> {
		self.elements.borrow()[node.0].text.clone()
	}

	/// Whether `node` was made draggable.
	pub fn is_draggable(&self, node: MemoryNode) -> bool {
		self.elements.borrow()[node.0].draggable
	}

	/// Whether `node` is reachable from `body`.
	pub fn is_attached(&self, node: MemoryNode) -> bool {
		let elements = self.elements.borrow();
		let mut current = node;
		loop {
			if current == self.body() {
				return true;
			}
			match elements[current.0].parent {
				Some(parent) => current = parent,
				None => return false,
			}
		}
	}

	/// First attached element with the given `id`, in document order.
	pub fn element_by_id(&self, id: &str) -> Option<MemoryNode> {
		let elements = self.elements.borrow();
		let mut stack = vec![self.body()];
		while let Some(node) = stack.pop() {
			let element = &elements[node.0];
			if element.attrs.iter().any(|(k, v)| k == "id" && v == id) {
				return Some(node);
			}
			stack.extend(element.children.iter().rev().copied());
		}
		None
	}

	/// Simulate a user click on `node`.
	pub fn click(&self, node: MemoryNode) {
		// The handler may call back into the surface, so no borrow is held
		// while it runs.
		let handler = self.handlers.borrow_mut().remove(&node);
		if let Some(mut handler) = handler {
			handler();
			self.handlers.borrow_mut().entry(node).or_insert(handler);
		}
	}

	/// Serialize `node` and its subtree as markup.
	pub fn outer_html(&self, node: MemoryNode) -> String {
		let elements = self.elements.borrow();
		let mut out = String::new();
		write_element(&elements, node, &mut out);
		out
	}

	fn detach(elements: &mut [Element], node: MemoryNode) {
		if let Some(parent) = elements[node.0].parent.take() {
			elements[parent.0].children.retain(|c| *c != node);
		}
	}

	fn check(&self, node: MemoryNode) -> Result<()> {
		if node.0 < self.elements.borrow().len() {
			Ok(())
		} else {
			Err(GraphError::Dom(format!("unknown node {}", node.0)))
		}
	}
}

fn write_element(elements: &[Element], node: MemoryNode, out: &mut String) {
	let element = &elements[node.0];
	out.push('<');
	out.push_str(&element.tag);
	for (name, value) in &element.attrs {
		out.push_str(&format!(" {}=\"{}\"", name, value.replace('"', "&quot;")));
	}
	out.push('>');
	if let Some(text) = &element.text {
		out.push_str(&text.replace('&', "&amp;").replace('<', "&lt;"));
	}
	for child in &element.children {
		write_element(elements, *child, out);
	}
	out.push_str(&format!("</{}>", element.tag));
}

impl Surface for MemorySurface {
	type Node = MemoryNode;

	fn create_element(&self, tag: &str) -> Result<MemoryNode> {
		let mut elements = self.elements.borrow_mut();
		elements.push(Element {
			tag: tag.to_string(),
			..Element::default()
		});
		Ok(MemoryNode(elements.len() - 1))
	}

	fn set_attribute(&self, node: &MemoryNode, name: &str, value: &str) -> Result<()> {
		self.check(*node)?;
		let mut elements = self.elements.borrow_mut();
		let attrs = &mut elements[node.0].attrs;
		match attrs.iter_mut().find(|(k, _)| k == name) {
			Some((_, v)) => *v = value.to_string(),
			None => attrs.push((name.to_string(), value.to_string())),
		}
		Ok(())
	}

	fn set_text(&self, node: &MemoryNode, text: &str) -> Result<()> {
		self.check(*node)?;
		let mut elements = self.elements.borrow_mut();
		for child in std::mem::take(&mut elements[node.0].children) {
			elements[child.0].parent = None;
		}
		elements[node.0].text = Some(text.to_string());
		Ok(())
	}

	fn append_child(&self, parent: &MemoryNode, child: &MemoryNode) -> Result<()> {
		self.check(*parent)?;
		self.check(*child)?;
		let mut elements = self.elements.borrow_mut();
		// Reject appends that would make a node its own ancestor.
		let mut ancestor = Some(*parent);
		while let Some(node) = ancestor {
			if node == *child {
				return Err(GraphError::Dom(format!(
					"cannot append node {} inside itself",
					child.0
				)));
			}
			ancestor = elements[node.0].parent;
		}
		Self::detach(&mut elements, *child);
		elements[child.0].parent = Some(*parent);
		elements[parent.0].children.push(*child);
		Ok(())
	}

	fn make_draggable(&self, node: &MemoryNode) -> Result<()> {
		self.check(*node)?;
		self.elements.borrow_mut()[node.0].draggable = true;
		Ok(())
	}

	fn on_click(&self, node: &MemoryNode, handler: ClickHandler) -> Result<()> {
		self.check(*node)?;
		self.handlers.borrow_mut().insert(*node, handler);
		Ok(())
	}

	fn remove(&self, node: &MemoryNode) {
		if *node == self.body() || self.check(*node).is_err() {
			return;
		}
		Self::detach(&mut self.elements.borrow_mut(), *node);
	}

	fn set_attribute_by_id(&self, id: &str, name: &str, value: &str) -> Result<bool> {
		match self.element_by_id(id) {
			Some(node) => {
				self.set_attribute(&node, name, value)?;
				Ok(true)
			}
			None => Ok(false),
		}
	}
}
