//! Core Router implementation.
//!
//! All navigation operations are synchronous from the caller's point of
//! view; the only cross-turn operation is [`Router::pop_all`], whose
//! backward walk is driven by the bridge (see `bridge.rs`) one pop event
//! at a time.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::debug_log;
use crate::error::NavError;
use crate::history::{HistoryAdapter, NavigationTag};
use crate::page::PageRef;
use crate::route::{Route, RouteMatch, RouteRegistry};
use crate::stack::{PageStack, PageStackEntry};

use super::bridge::BridgeState;

/// Authorization predicate gating entry into protected routes. Must be
/// free of side effects.
pub type AuthFn = Rc<dyn Fn() -> bool>;

/// Callback invoked with the landed-on path after every completed
/// navigation (e.g. a tab bar highlighting the active destination).
pub type NavigationListener = Rc<dyn Fn(&str)>;

/// Client-side navigation controller.
///
/// Constructed once by the host application with an injected history
/// adapter and passed by reference (it is a cheap clonable handle) to
/// every consumer:
///
/// ```ignore
/// use std::rc::Rc;
/// use navstack::{MemoryHistory, Route, Router};
///
/// let router = Router::new(Rc::new(MemoryHistory::new()));
/// router.add_route(Route::new("/", home_page)?)?;
/// router.add_route(Route::new("/profile/:id", profile_page)?)?;
/// router.add_route(Route::new("/404", not_found_page)?)?;
/// router.push("/profile/abc123")?;
/// ```
///
/// The page stack is mutated only by the operations below and by the
/// bridge's reconciliation of native pop events; `pop` itself never
/// touches the stack, keeping it strictly a function of observed
/// history state.
#[derive(Clone)]
pub struct Router {
	inner: Rc<RouterInner>,
}

pub(super) struct RouterInner {
	pub(super) adapter: Rc<dyn HistoryAdapter>,
	pub(super) registry: RefCell<RouteRegistry>,
	pub(super) stack: RefCell<PageStack>,
	pub(super) modal: RefCell<Option<PageRef>>,
	pub(super) auth: RefCell<AuthFn>,
	pub(super) listeners: RefCell<Vec<NavigationListener>>,
	pub(super) state: RefCell<BridgeState>,
	/// Tag of the last known history entry; 0 when the current entry
	/// predates the application.
	pub(super) current: Cell<u32>,
}

/// Outcome of resolving a requested path: the route to mount and the
/// path actually landed on (differs from the request after a not-found
/// or authorization redirect).
pub(super) struct Resolution {
	pub(super) route: Rc<Route>,
	pub(super) path: String,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("routes", &self.inner.registry.borrow().len())
			.field("stack_depth", &self.inner.stack.borrow().len())
			.field("current", &self.inner.current.get())
			.finish()
	}
}

impl Router {
	/// Creates a router over the given history adapter and subscribes to
	/// its pop events.
	pub fn new(adapter: Rc<dyn HistoryAdapter>) -> Self {
		let current = adapter.current_tag().map(|t| t.page).unwrap_or(0);
		let inner = Rc::new(RouterInner {
			adapter,
			registry: RefCell::new(RouteRegistry::new()),
			stack: RefCell::new(PageStack::new()),
			modal: RefCell::new(None),
			auth: RefCell::new(Rc::new(|| true)),
			listeners: RefCell::new(Vec::new()),
			state: RefCell::new(BridgeState::Idle),
			current: Cell::new(current),
		});

		let weak = Rc::downgrade(&inner);
		inner.adapter.on_pop_entry(Box::new(move |tag| {
			if let Some(inner) = weak.upgrade() {
				inner.handle_pop(tag);
			}
		}));

		Self { inner }
	}

	/// Registers a route. Fails fast on duplicate patterns.
	pub fn add_route(&self, route: Route) -> Result<(), NavError> {
		self.inner.registry.borrow_mut().add(route)
	}

	/// Sets the root destination; `path` must match a registered route.
	pub fn set_root_route(&self, path: &str) -> Result<(), NavError> {
		self.inner.registry.borrow_mut().set_root_route(path)
	}

	/// Sets the not-found destination; `path` must match a registered
	/// route.
	pub fn set_not_found_route(&self, path: &str) -> Result<(), NavError> {
		self.inner.registry.borrow_mut().set_not_found_route(path)
	}

	/// Installs the authorization predicate. The default allows
	/// everything.
	pub fn set_auth_provider<F>(&self, auth: F)
	where
		F: Fn() -> bool + 'static,
	{
		*self.inner.auth.borrow_mut() = Rc::new(auth);
	}

	/// Registers a navigation listener.
	pub fn add_listener<F>(&self, listener: F)
	where
		F: Fn(&str) + 'static,
	{
		self.inner.listeners.borrow_mut().push(Rc::new(listener));
	}

	/// Navigates to `path`, retaining the current page hidden on the
	/// stack.
	///
	/// An unmatched path lands on the not-found route; a protected path
	/// with authorization denied lands on the root route via `replace`,
	/// so an inaccessible page is never stacked behind a back gesture.
	/// A repeat navigation to the route already on top reuses the live
	/// page when the route's reuse predicate accepts it.
	pub fn push(&self, path: &str) -> Result<(), NavError> {
		self.inner.ensure_active()?;
		self.inner.push_with(path, None, false)
	}

	/// Like [`push`](Router::push), but mounts the supplied handle
	/// instead of invoking the route's render factory.
	pub fn push_prerendered(&self, path: &str, page: PageRef) -> Result<(), NavError> {
		self.inner.ensure_active()?;
		self.inner.push_with(path, Some(page), false)
	}

	/// Replaces the current page with `path`, destroying its page handle
	/// and reusing its history entry (same tag, different content).
	pub fn replace(&self, path: &str) -> Result<(), NavError> {
		self.inner.ensure_active()?;
		self.inner.replace_with(path)
	}

	/// Rewrites the current entry's URL without touching any page.
	pub fn replace_url(&self, path: &str) -> Result<(), NavError> {
		self.inner.ensure_active()?;
		let tag = self
			.inner
			.adapter
			.current_tag()
			.unwrap_or_else(|| NavigationTag::new(self.inner.stack.borrow().len() as u32));
		self.inner.adapter.replace_entry(tag, path);
		Ok(())
	}

	/// Requests one native back navigation.
	///
	/// The stack is not touched here: mutation happens when the
	/// resulting pop event reaches the bridge.
	pub fn pop(&self) -> Result<(), NavError> {
		self.inner.ensure_active()?;
		self.inner.adapter.back();
		Ok(())
	}

	/// Collapses the whole stack and lands on `path` in one logical
	/// step.
	///
	/// With an empty stack this is equivalent to
	/// [`replace`](Router::replace). Otherwise every retained page is
	/// destroyed and native history is walked back to the baseline
	/// entry, which is then replaced with `path`. The walk spans
	/// multiple event-loop turns; bridge reconciliation is suspended
	/// for its duration.
	pub fn pop_all(&self, path: &str) -> Result<(), NavError> {
		self.inner.ensure_active()?;
		self.inner.pop_all(path)
	}

	/// Displays `page` as an overlay consuming one history slot, so a
	/// single back gesture dismisses it. The page stack is not touched.
	///
	/// If a modal is already active its handle is destroyed and the new
	/// overlay takes over the existing slot.
	pub fn push_modal(&self, page: PageRef) -> Result<(), NavError> {
		self.inner.ensure_active()?;
		self.inner.push_modal(page)
	}

	/// Parameters extracted from the live location, if it matches a
	/// registered route.
	pub fn get_current_params(&self) -> Option<HashMap<String, String>> {
		let path = self.inner.adapter.current_path();
		self.inner
			.registry
			.borrow()
			.match_path(&path)
			.map(|m| m.params)
	}

	/// Page handle on top of the stack, if any.
	pub fn top_page(&self) -> Option<PageRef> {
		self.inner.stack.borrow().top().map(|e| Rc::clone(e.page()))
	}

	/// Current page stack depth.
	pub fn stack_depth(&self) -> usize {
		self.inner.stack.borrow().len()
	}

	/// Whether a modal overlay is active.
	pub fn has_modal(&self) -> bool {
		self.inner.modal.borrow().is_some()
	}

	/// Number of registered routes.
	pub fn route_count(&self) -> usize {
		self.inner.registry.borrow().len()
	}

	/// Whether the subsystem halted after a fatal reconciliation error.
	pub fn is_halted(&self) -> bool {
		matches!(*self.inner.state.borrow(), BridgeState::Halted)
	}
}

impl RouterInner {
	pub(super) fn ensure_active(&self) -> Result<(), NavError> {
		if matches!(*self.state.borrow(), BridgeState::Halted) {
			Err(NavError::Halted)
		} else {
			Ok(())
		}
	}

	pub(super) fn match_path(&self, path: &str) -> Option<RouteMatch> {
		self.registry.borrow().match_path(path)
	}

	pub(super) fn root_path(&self) -> String {
		self.registry.borrow().root_path().to_string()
	}

	pub(super) fn not_found_path(&self) -> String {
		self.registry.borrow().not_found_path().to_string()
	}

	pub(super) fn auth_passes(&self, route: &Route) -> bool {
		if !route.requires_auth() {
			return true;
		}
		let auth = self.auth.borrow().clone();
		auth()
	}

	/// Resolves `path` to the route actually landed on, applying the
	/// not-found fallback (exactly once) and the authorization redirect
	/// to root.
	pub(super) fn resolve(&self, path: &str) -> Result<Resolution, NavError> {
		let (m, path) = match self.match_path(path) {
			Some(m) => (m, path.to_string()),
			None => {
				let not_found = self.not_found_path();
				debug_log!("no route for {}, falling back to {}", path, not_found);
				let m = self
					.match_path(&not_found)
					.ok_or_else(|| NavError::NoRouteForPath(not_found.clone()))?;
				(m, not_found)
			}
		};

		if self.auth_passes(&m.route) {
			return Ok(Resolution {
				route: m.route,
				path,
			});
		}

		let root = self.root_path();
		let rm = self
			.match_path(&root)
			.ok_or_else(|| NavError::NoRouteForPath(root.clone()))?;
		if !self.auth_passes(&rm.route) {
			return Err(NavError::RootRouteInaccessible(root));
		}
		debug_log!("auth denied for {}, landing on {}", path, root);
		Ok(Resolution {
			route: rm.route,
			path: root,
		})
	}

	pub(super) fn push_with(
		&self,
		path: &str,
		prerendered: Option<PageRef>,
		is_fallback: bool,
	) -> Result<(), NavError> {
		let Some(m) = self.match_path(path) else {
			// Unmatched: recover through the not-found route, exactly
			// once. A not-found route that itself fails to match is a
			// configuration error.
			if is_fallback {
				return Err(NavError::NoRouteForPath(path.to_string()));
			}
			let not_found = self.not_found_path();
			debug_log!("no route for {}, falling back to {}", path, not_found);
			return self.push_with(&not_found, None, true);
		};

		if !self.auth_passes(&m.route) {
			// Landing on root via replace keeps the inaccessible page
			// off the stack and out of the back gesture.
			let root = self.root_path();
			debug_log!("auth denied for {}, replacing with {}", path, root);
			return self.replace_with(&root);
		}

		if self.try_reuse(&m) {
			debug_log!("reusing existing page for {}", path);
			if self.adapter.current_path() != path {
				// Same entry, fresher location: keep the tag, fix the
				// URL so current-params lookups stay truthful.
				let tag = NavigationTag::new(self.current.get().max(1));
				self.adapter.replace_entry(tag, path);
			}
			self.finish_navigation(&m.route, path);
			return Ok(());
		}

		// Hide the outgoing top, instantiate, then claim the next
		// history slot before the new entry becomes visible.
		let top = self.stack.borrow().top().cloned();
		if let Some(top) = top {
			top.capture_and_hide();
		}
		let page = prerendered.unwrap_or_else(|| m.route.render());
		let tag = NavigationTag::new(self.current.get() + 1);
		self.adapter.push_entry(tag, path);
		self.current.set(tag.page);
		self.stack.borrow_mut().push(PageStackEntry::new(
			Rc::clone(&m.route),
			Rc::clone(&page),
			Some(tag),
		));
		page.show();
		self.finish_navigation(&m.route, path);
		Ok(())
	}

	pub(super) fn replace_with(&self, path: &str) -> Result<(), NavError> {
		// The outgoing top is destroyed, not hidden: replace reuses its
		// history slot, so there is no entry to come back to.
		let outgoing = self.stack.borrow_mut().pop();
		if let Some(entry) = outgoing {
			entry.page().destroy();
		}

		let res = self.resolve(path)?;
		let page = res.route.render();
		let tag = self.adapter.current_tag().unwrap_or(NavigationTag::BASELINE);
		self.adapter.replace_entry(tag, &res.path);
		self.current.set(tag.page);
		self.stack.borrow_mut().push(PageStackEntry::new(
			Rc::clone(&res.route),
			Rc::clone(&page),
			Some(tag),
		));
		page.show();
		self.finish_navigation(&res.route, &res.path);
		Ok(())
	}

	pub(super) fn pop_all(&self, path: &str) -> Result<(), NavError> {
		// A modal would otherwise survive the walk as a dead overlay.
		let modal = self.modal.borrow_mut().take();
		if let Some(modal) = modal {
			modal.destroy();
		}

		let (depth, baseline) = {
			let stack = self.stack.borrow();
			(stack.len(), stack.baseline_tag())
		};
		let Some(baseline) = baseline else {
			// Empty stack: nothing to walk back over.
			return self.replace_with(path);
		};

		if baseline.map(|t| t.page).unwrap_or(0) == self.current.get() {
			// Already standing on the baseline entry: collapse in
			// place, no walk.
			let entries = self.stack.borrow_mut().take_all();
			for entry in entries {
				entry.page().destroy();
			}
			return self.replace_with(path);
		}

		// Suspend reconciliation: the walk consumes its own pop events;
		// without the guard each one would also backward-reconcile the
		// stack (double-pop). The bound covers one slot of slack for a
		// dismissed modal.
		let bound = depth as u32 + 1;
		*self.state.borrow_mut() = BridgeState::Suspended {
			target: path.to_string(),
			baseline,
			remaining: bound,
			bound,
		};
		let entries = self.stack.borrow_mut().take_all();
		for entry in entries {
			entry.page().destroy();
		}
		self.adapter.back();
		Ok(())
	}

	pub(super) fn push_modal(&self, page: PageRef) -> Result<(), NavError> {
		let existing = self.modal.borrow_mut().take();
		if let Some(old) = existing {
			// Swap in place: the overlay already owns a history slot.
			debug_log!("replacing active modal");
			old.destroy();
		} else {
			let tag = NavigationTag::new(self.current.get() + 1);
			self.adapter.push_entry(tag, &self.adapter.current_path());
			self.current.set(tag.page);
		}
		*self.modal.borrow_mut() = Some(Rc::clone(&page));
		page.show();
		Ok(())
	}

	/// Whether the route already on top can absorb this navigation.
	pub(super) fn try_reuse(&self, m: &RouteMatch) -> bool {
		let top = self.stack.borrow().top().cloned();
		let Some(top) = top else {
			return false;
		};
		Rc::ptr_eq(top.route(), &m.route) && m.route.reuse(top.page().as_ref())
	}

	/// Hides the current top and mounts a page for `route` onto the
	/// history entry the browser is already standing on: instantiate
	/// (factory or prerendered handle), append the stack entry, show.
	pub(super) fn mount_new(&self, route: &Rc<Route>, path: &str, prerendered: Option<PageRef>) {
		let top = self.stack.borrow().top().cloned();
		if let Some(top) = top {
			top.capture_and_hide();
		}
		let page = prerendered.unwrap_or_else(|| route.render());
		let tag = match self.current.get() {
			0 => None,
			n => Some(NavigationTag::new(n)),
		};
		self.stack
			.borrow_mut()
			.push(PageStackEntry::new(Rc::clone(route), Rc::clone(&page), tag));
		page.show();
		self.finish_navigation(route, path);
	}

	pub(super) fn finish_navigation(&self, route: &Route, path: &str) {
		if let Some(title) = route.title() {
			self.adapter.set_title(&title);
		}
		self.notify_listeners(path);
	}

	pub(super) fn notify_listeners(&self, path: &str) {
		let listeners: Vec<NavigationListener> = self.listeners.borrow().clone();
		for listener in listeners {
			listener(path);
		}
	}
}
