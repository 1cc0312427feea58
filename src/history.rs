//! History adapter layer.
//!
//! The router core never talks to the browser directly: every native
//! history interaction goes through [`HistoryAdapter`], which makes the
//! reconciliation state machine testable against the in-memory
//! [`MemoryHistory`] and portable to non-browser hosts.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::warn_log;

/// Index attached to every history entry this subsystem creates.
///
/// Tags are assigned once, monotonically from 1, and never change except
/// when an entry is replaced (the replacement keeps the tag). Entries
/// that predate the application carry no tag. Comparing an incoming tag
/// with the last known one classifies a pop event as forward or
/// backward.
///
/// The serialized form, `{"page": n}`, is the only state this subsystem
/// persists into a native history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NavigationTag {
	/// 1-based position among app-created entries.
	pub page: u32,
}

impl NavigationTag {
	/// Tag of the first app-created entry, the baseline a pop-to-root
	/// walk ends on.
	pub const BASELINE: NavigationTag = NavigationTag { page: 1 };

	/// Creates a tag with the given index.
	pub fn new(page: u32) -> Self {
		Self { page }
	}

	/// The tag following this one.
	pub fn next(self) -> Self {
		Self { page: self.page + 1 }
	}
}

/// Handler invoked for every native pop (back/forward) event, carrying
/// the tag of the entry the browser landed on, if any.
pub type PopHandler = Box<dyn Fn(Option<NavigationTag>)>;

/// Interface between the router and the host's session history.
///
/// The browser implementation is [`crate::dom::BrowserHistory`]; tests
/// and native hosts use [`MemoryHistory`]. Implementations are
/// single-threaded; `back()` may report its pop event synchronously or
/// on a later turn of the event loop.
pub trait HistoryAdapter {
	/// Appends a new entry, discarding any forward entries.
	fn push_entry(&self, tag: NavigationTag, path: &str);

	/// Rewrites the current entry in place.
	fn replace_entry(&self, tag: NavigationTag, path: &str);

	/// Requests one backward navigation. Completion is reported through
	/// the pop handler.
	fn back(&self);

	/// Tag of the current entry, `None` for pre-app entries.
	fn current_tag(&self) -> Option<NavigationTag>;

	/// Full current location (path, query string and fragment).
	fn current_path(&self) -> String;

	/// Sets the host's document title.
	fn set_title(&self, title: &str);

	/// Installs the pop-event handler. Called once, at router
	/// construction.
	fn on_pop_entry(&self, handler: PopHandler);

	/// Schedules `task` to run once the current turn has settled
	/// (a microtask in the browser).
	fn defer(&self, task: Box<dyn FnOnce()>);
}

/// One entry of an in-memory history timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
	/// App-assigned tag, `None` for pre-app entries.
	pub tag: Option<NavigationTag>,
	/// Full location of the entry.
	pub path: String,
}

struct MemoryInner {
	entries: Vec<MemoryEntry>,
	index: usize,
	title: String,
}

/// In-memory [`HistoryAdapter`].
///
/// Keeps the whole timeline plus a cursor, truncating forward entries on
/// push exactly like a browser. `back()` and `forward()` deliver their
/// pop events synchronously and `defer` runs its task inline, which
/// makes test scenarios fully deterministic. Clones share the same
/// timeline.
#[derive(Clone)]
pub struct MemoryHistory {
	inner: Rc<RefCell<MemoryInner>>,
	handler: Rc<RefCell<Option<Rc<dyn Fn(Option<NavigationTag>)>>>>,
}

impl MemoryHistory {
	/// Creates a timeline holding a single untagged pre-app entry at `/`.
	pub fn new() -> Self {
		Self::with_entries(
			vec![MemoryEntry {
				tag: None,
				path: "/".to_string(),
			}],
			0,
		)
	}

	/// Creates a timeline from explicit entries, positioned at `index`.
	///
	/// # Panics
	///
	/// Panics if `entries` is empty or `index` is out of bounds.
	pub fn with_entries(entries: Vec<MemoryEntry>, index: usize) -> Self {
		assert!(
			index < entries.len(),
			"index {} out of bounds for {} entries",
			index,
			entries.len()
		);
		Self {
			inner: Rc::new(RefCell::new(MemoryInner {
				entries,
				index,
				title: String::new(),
			})),
			handler: Rc::new(RefCell::new(None)),
		}
	}

	/// Moves one entry forward and delivers the pop event, like a
	/// browser-forward gesture. No-op at the end of the timeline.
	pub fn forward(&self) {
		{
			let mut inner = self.inner.borrow_mut();
			if inner.index + 1 >= inner.entries.len() {
				return;
			}
			inner.index += 1;
		}
		self.dispatch();
	}

	/// Snapshot of the timeline.
	pub fn entries(&self) -> Vec<MemoryEntry> {
		self.inner.borrow().entries.clone()
	}

	/// Current cursor position.
	pub fn index(&self) -> usize {
		self.inner.borrow().index
	}

	/// Number of entries in the timeline.
	pub fn len(&self) -> usize {
		self.inner.borrow().entries.len()
	}

	/// Whether the timeline is empty. Never true in practice: even a
	/// fresh timeline holds the pre-app entry.
	pub fn is_empty(&self) -> bool {
		self.inner.borrow().entries.is_empty()
	}

	/// Last title written through the adapter.
	pub fn title(&self) -> String {
		self.inner.borrow().title.clone()
	}

	/// Calls the installed pop handler with the current entry's tag,
	/// without holding any internal borrow.
	fn dispatch(&self) {
		let handler = self.handler.borrow().clone();
		let tag = {
			let inner = self.inner.borrow();
			inner.entries[inner.index].tag
		};
		if let Some(handler) = handler {
			handler(tag);
		}
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new()
	}
}

impl HistoryAdapter for MemoryHistory {
	fn push_entry(&self, tag: NavigationTag, path: &str) {
		let mut inner = self.inner.borrow_mut();
		let index = inner.index;
		inner.entries.truncate(index + 1);
		inner.entries.push(MemoryEntry {
			tag: Some(tag),
			path: path.to_string(),
		});
		inner.index += 1;
	}

	fn replace_entry(&self, tag: NavigationTag, path: &str) {
		let mut inner = self.inner.borrow_mut();
		let index = inner.index;
		inner.entries[index] = MemoryEntry {
			tag: Some(tag),
			path: path.to_string(),
		};
	}

	fn back(&self) {
		{
			let mut inner = self.inner.borrow_mut();
			if inner.index == 0 {
				warn_log!("back() at the start of history");
				return;
			}
			inner.index -= 1;
		}
		self.dispatch();
	}

	fn current_tag(&self) -> Option<NavigationTag> {
		let inner = self.inner.borrow();
		inner.entries[inner.index].tag
	}

	fn current_path(&self) -> String {
		let inner = self.inner.borrow();
		inner.entries[inner.index].path.clone()
	}

	fn set_title(&self, title: &str) {
		self.inner.borrow_mut().title = title.to_string();
	}

	fn on_pop_entry(&self, handler: PopHandler) {
		*self.handler.borrow_mut() = Some(handler.into());
	}

	fn defer(&self, task: Box<dyn FnOnce()>) {
		// Single-threaded tests: running inline preserves ordering.
		task();
	}
}
