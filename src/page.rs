//! Page handle abstraction.
//!
//! Every page managed by the router is normalized into one [`PageHandle`]
//! at creation time, whatever its concrete representation (a DOM subtree,
//! a widget, a test double). No downstream code branches on the original
//! representation.

use std::rc::Rc;

/// Capability set required of a page instance under router management.
///
/// Visibility flips are cheap state changes: a hidden page keeps its
/// full internal state and is expected to come back exactly as it was.
/// Only `destroy` releases the page.
pub trait PageHandle {
	/// Makes the page visible.
	fn show(&self);

	/// Makes the page non-rendering without destroying it.
	fn hide(&self);

	/// Returns whether the page is currently visible.
	fn is_visible(&self) -> bool;

	/// Releases the page. No other method is called afterwards.
	fn destroy(&self);

	/// Pauses polling, observers and similar background work while the
	/// page is hidden.
	fn suspend_background_activity(&self);

	/// Resumes background work paused by `suspend_background_activity`.
	fn resume_background_activity(&self);

	/// Scroll offset of the page's nearest scrollable ancestor.
	fn scroll_offset(&self) -> f64;

	/// Restores the scroll offset of the page's nearest scrollable
	/// ancestor.
	fn set_scroll_offset(&self, offset: f64);
}

/// Shared, single-threaded reference to a page handle.
pub type PageRef = Rc<dyn PageHandle>;
