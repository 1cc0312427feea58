//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use navstack::{MemoryHistory, PageHandle, PageRef, Route, Router};

/// Page double recording every lifecycle interaction.
pub struct TestPage {
	pub name: String,
	pub visible: Cell<bool>,
	pub suspended: Cell<bool>,
	pub scroll: Cell<f64>,
	pub show_count: Cell<usize>,
	pub hide_count: Cell<usize>,
	pub destroy_count: Cell<usize>,
}

impl TestPage {
	pub fn new(name: &str) -> Rc<Self> {
		Rc::new(Self {
			name: name.to_string(),
			visible: Cell::new(false),
			suspended: Cell::new(false),
			scroll: Cell::new(0.0),
			show_count: Cell::new(0),
			hide_count: Cell::new(0),
			destroy_count: Cell::new(0),
		})
	}

	pub fn destroyed(&self) -> bool {
		self.destroy_count.get() > 0
	}
}

impl PageHandle for TestPage {
	fn show(&self) {
		self.visible.set(true);
		self.show_count.set(self.show_count.get() + 1);
	}

	fn hide(&self) {
		self.visible.set(false);
		self.hide_count.set(self.hide_count.get() + 1);
	}

	fn is_visible(&self) -> bool {
		self.visible.get()
	}

	fn destroy(&self) {
		self.destroy_count.set(self.destroy_count.get() + 1);
		self.visible.set(false);
	}

	fn suspend_background_activity(&self) {
		self.suspended.set(true);
	}

	fn resume_background_activity(&self) {
		self.suspended.set(false);
	}

	fn scroll_offset(&self) -> f64 {
		self.scroll.get()
	}

	fn set_scroll_offset(&self, offset: f64) {
		self.scroll.set(offset);
	}
}

/// Handle onto a route's render factory: invocation count plus every
/// page it created.
pub struct Tracked {
	calls: Rc<Cell<usize>>,
	pages: Rc<RefCell<Vec<Rc<TestPage>>>>,
}

impl Tracked {
	pub fn call_count(&self) -> usize {
		self.calls.get()
	}

	pub fn page(&self, index: usize) -> Rc<TestPage> {
		self.pages.borrow()[index].clone()
	}

	pub fn last_page(&self) -> Rc<TestPage> {
		self.pages
			.borrow()
			.last()
			.expect("factory never invoked")
			.clone()
	}
}

/// Builds a route whose factory counts invocations and retains every
/// page it creates.
pub fn tracked_route(pattern: &str, name: &'static str) -> (Route, Tracked) {
	let calls = Rc::new(Cell::new(0));
	let pages: Rc<RefCell<Vec<Rc<TestPage>>>> = Rc::new(RefCell::new(Vec::new()));

	let route = Route::new(pattern, {
		let calls = Rc::clone(&calls);
		let pages = Rc::clone(&pages);
		move || {
			calls.set(calls.get() + 1);
			let page = TestPage::new(name);
			pages.borrow_mut().push(Rc::clone(&page));
			let handle: PageRef = page;
			handle
		}
	})
	.expect("valid pattern");

	(route, Tracked { calls, pages })
}

/// Router over a fresh in-memory history (one untagged pre-app entry at
/// `/`).
pub fn fixture() -> (Router, MemoryHistory) {
	let history = MemoryHistory::new();
	let router = Router::new(Rc::new(history.clone()));
	(router, history)
}
