use std::cell::RefCell;
use std::rc::Rc;

/// Pointer drag of a single element, in client pixels.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	/// Offset currently applied to the element.
	pub offset_x: f64,
	pub offset_y: f64,
}

impl DragState {
	pub fn begin(&mut self, x: f64, y: f64) {
		self.active = true;
		self.start_x = x;
		self.start_y = y;
		self.node_start_x = self.offset_x;
		self.node_start_y = self.offset_y;
	}

	/// New element offset for a pointer at `(x, y)`, or `None` when idle.
	pub fn drag_to(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
		if !self.active {
			return None;
		}
		self.offset_x = self.node_start_x + (x - self.start_x);
		self.offset_y = self.node_start_y + (y - self.start_y);
		Some((self.offset_x, self.offset_y))
	}

	pub fn end(&mut self) {
		self.active = false;
	}
}

/// Routes pointer moves to whichever element is being dragged.
///
/// One tracker serves every draggable element, so the document needs a single
/// pair of move/release listeners no matter how many widgets exist.
#[derive(Debug)]
pub struct DragTracker<E> {
	current: Option<(E, Rc<RefCell<DragState>>)>,
}

impl<E> Default for DragTracker<E> {
	fn default() -> Self {
		Self { current: None }
	}
}

impl<E> DragTracker<E> {
	pub fn start(&mut self, element: E, drag: Rc<RefCell<DragState>>, x: f64, y: f64) {
		self.finish();
		drag.borrow_mut().begin(x, y);
		self.current = Some((element, drag));
	}

	/// Element to move and its new offset, or `None` when nothing is dragged.
	pub fn move_to(&self, x: f64, y: f64) -> Option<(&E, f64, f64)> {
		let (element, drag) = self.current.as_ref()?;
		let (dx, dy) = drag.borrow_mut().drag_to(x, y)?;
		Some((element, dx, dy))
	}

	pub fn finish(&mut self) {
		if let Some((_, drag)) = self.current.take() {
			drag.borrow_mut().end();
		}
	}
}
