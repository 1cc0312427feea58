//! Page stack bookkeeping.
//!
//! The stack mirrors the app-created history entries: its length equals
//! the number of currently-retained entries, the top is visible and all
//! entries below it are hidden but alive.

use std::cell::Cell;
use std::rc::Rc;

use crate::history::NavigationTag;
use crate::page::PageRef;
use crate::route::Route;

/// One retained page plus the state needed to bring it back exactly as
/// the user left it.
pub(crate) struct PageStackEntry {
	route: Rc<Route>,
	page: PageRef,
	/// Tag of the history entry this page mirrors; `None` when the page
	/// was mounted onto a pre-app entry.
	tag: Option<NavigationTag>,
	saved_scroll: Cell<f64>,
	saved_visible: Cell<bool>,
}

impl PageStackEntry {
	pub(crate) fn new(route: Rc<Route>, page: PageRef, tag: Option<NavigationTag>) -> Self {
		Self {
			route,
			page,
			tag,
			saved_scroll: Cell::new(0.0),
			saved_visible: Cell::new(true),
		}
	}

	pub(crate) fn route(&self) -> &Rc<Route> {
		&self.route
	}

	pub(crate) fn tag(&self) -> Option<NavigationTag> {
		self.tag
	}

	pub(crate) fn page(&self) -> &PageRef {
		&self.page
	}

	/// Captures scroll offset and visibility, suspends background
	/// activity and hides the page.
	///
	/// When the page is already hidden only the visibility flag is
	/// recorded: the earlier saved scroll offset stays authoritative.
	pub(crate) fn capture_and_hide(&self) {
		let visible = self.page.is_visible();
		self.saved_visible.set(visible);
		if visible {
			self.saved_scroll.set(self.page.scroll_offset());
			self.page.suspend_background_activity();
			self.page.hide();
		}
	}

	/// Restores the captured visibility and resumes background activity.
	///
	/// Scroll restoration is deferred by the caller until the re-shown
	/// layout has settled; see [`restore_scroll`].
	///
	/// [`restore_scroll`]: PageStackEntry::restore_scroll
	pub(crate) fn restore(&self) {
		if self.saved_visible.get() {
			self.page.show();
		}
		self.page.resume_background_activity();
	}

	/// Restores the captured scroll offset.
	pub(crate) fn restore_scroll(&self) {
		self.page.set_scroll_offset(self.saved_scroll.get());
	}
}

/// Ordered list of retained page entries. Top is last.
pub(crate) struct PageStack {
	entries: Vec<Rc<PageStackEntry>>,
}

impl PageStack {
	pub(crate) fn new() -> Self {
		Self { entries: Vec::new() }
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub(crate) fn top(&self) -> Option<&Rc<PageStackEntry>> {
		self.entries.last()
	}

	/// Tag of the bottom entry — the baseline a pop-to-root walk ends
	/// on. `None` when the stack is empty.
	pub(crate) fn baseline_tag(&self) -> Option<Option<NavigationTag>> {
		self.entries.first().map(|e| e.tag())
	}

	pub(crate) fn push(&mut self, entry: PageStackEntry) {
		self.entries.push(Rc::new(entry));
	}

	pub(crate) fn pop(&mut self) -> Option<Rc<PageStackEntry>> {
		self.entries.pop()
	}

	/// Empties the stack, handing every entry back to the caller (which
	/// destroys the handles without holding the stack borrow).
	pub(crate) fn take_all(&mut self) -> Vec<Rc<PageStackEntry>> {
		std::mem::take(&mut self.entries)
	}
}
