//! DOM-backed page handles.

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Element, HtmlElement};

use crate::page::PageHandle;

/// Event dispatched on a page root when its background activity should
/// pause. Long-lived views inside the page (feeds, observers, pollers)
/// subscribe to these on their page root.
pub const SUSPEND_EVENT: &str = "navstack:suspend";

/// Event dispatched on a page root when background activity may resume.
pub const RESUME_EVENT: &str = "navstack:resume";

/// Nearest ancestor that owns the scroll position: the first one whose
/// computed `overflow-y` is `auto` or `scroll`, else the document
/// element. `None` for detached elements.
pub fn scroll_parent(element: &Element) -> Option<Element> {
	let window = web_sys::window()?;
	let document = window.document()?;
	let root: Element = document.document_element()?;

	let mut node = Some(element.clone());
	while let Some(el) = node {
		if el == root {
			return Some(root);
		}
		if let Ok(Some(style)) = window.get_computed_style(&el) {
			if let Ok(overflow) = style.get_property_value("overflow-y") {
				if overflow == "auto" || overflow == "scroll" {
					return Some(el);
				}
			}
		}
		node = el.parent_element();
	}
	None
}

/// [`PageHandle`] over an `HtmlElement` living in an outlet element.
///
/// Hiding flips `style.display` to `none` and remembers the previous
/// inline value, so showing restores whatever layout mode the page had.
/// The element itself stays in the document until `destroy`.
pub struct DomPage {
	element: HtmlElement,
	prev_display: RefCell<Option<String>>,
}

impl DomPage {
	/// Appends `element` to `outlet` and wraps it as a page handle.
	pub fn mount(outlet: &Element, element: HtmlElement) -> Result<Rc<Self>, String> {
		outlet
			.append_child(element.as_ref())
			.map_err(|_| "failed to append page element".to_string())?;
		Ok(Rc::new(Self {
			element,
			prev_display: RefCell::new(None),
		}))
	}

	/// The underlying element.
	pub fn element(&self) -> &HtmlElement {
		&self.element
	}

	fn dispatch(&self, name: &str) {
		if let Ok(event) = web_sys::Event::new(name) {
			let _ = self.element.dispatch_event(&event);
		}
	}
}

impl PageHandle for DomPage {
	fn show(&self) {
		let style = self.element.style();
		match self.prev_display.borrow_mut().take() {
			Some(display) if !display.is_empty() => {
				let _ = style.set_property("display", &display);
			}
			_ => {
				let _ = style.remove_property("display");
			}
		}
	}

	fn hide(&self) {
		let style = self.element.style();
		let current = style.get_property_value("display").unwrap_or_default();
		*self.prev_display.borrow_mut() = Some(current);
		let _ = style.set_property("display", "none");
	}

	fn is_visible(&self) -> bool {
		self.element
			.style()
			.get_property_value("display")
			.map(|display| display != "none")
			.unwrap_or(true)
	}

	fn destroy(&self) {
		self.element.remove();
	}

	fn suspend_background_activity(&self) {
		self.dispatch(SUSPEND_EVENT);
	}

	fn resume_background_activity(&self) {
		self.dispatch(RESUME_EVENT);
	}

	fn scroll_offset(&self) -> f64 {
		scroll_parent(self.element.as_ref())
			.map(|el| el.scroll_top() as f64)
			.unwrap_or(0.0)
	}

	fn set_scroll_offset(&self, offset: f64) {
		if let Some(el) = scroll_parent(self.element.as_ref()) {
			el.set_scroll_top(offset as i32);
		}
	}
}
