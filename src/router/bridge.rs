//! History bridge: reconciles native back/forward events with the page
//! stack.
//!
//! The bridge is the only consumer of pop events. Its job is to keep the
//! page stack a pure function of observed history state: programmatic
//! operations write history, the bridge reads it back. Classification is
//! relative — an incoming tag greater than the last known one is a
//! forward move, anything else (including an absent tag on a pre-app
//! entry) is backward.

use std::rc::Rc;

use crate::debug_log;
use crate::error::NavError;
use crate::error_log;
use crate::history::NavigationTag;

use super::core::RouterInner;

/// Reconciliation mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum BridgeState {
	/// Normal operation: every pop event is reconciled against the
	/// stack.
	Idle,
	/// A pop_all walk owns reconciliation; pop events drive the walk
	/// instead of being reconciled.
	Suspended {
		/// Path to land on once the walk reaches the baseline entry.
		target: String,
		/// Tag of the entry the walk ends on: the bottom of the stack
		/// being collapsed (`None` when that page sat on a pre-app
		/// entry).
		baseline: Option<NavigationTag>,
		/// Back navigations left before the walk is declared overrun.
		remaining: u32,
		/// Total back navigations the walk was allowed.
		bound: u32,
	},
	/// A fatal reconciliation error occurred; the subsystem is inert.
	Halted,
}

impl RouterInner {
	/// Entry point for every native pop event.
	pub(super) fn handle_pop(self: &Rc<Self>, tag: Option<NavigationTag>) {
		let state = self.state.borrow().clone();
		match state {
			BridgeState::Halted => {}
			BridgeState::Suspended {
				target,
				baseline,
				remaining,
				bound,
			} => {
				self.suspended_step(tag, target, baseline, remaining, bound);
			}
			BridgeState::Idle => self.reconcile(tag),
		}
	}

	/// One step of the pop_all walk.
	///
	/// The baseline tag ends the walk: the baseline entry is replaced
	/// with the walk's target and the guard cleared. Any other tag
	/// spends one unit of the iteration budget and requests another
	/// back navigation. An exhausted budget means the baseline is
	/// unreachable — history state is corrupt — and the subsystem
	/// halts rather than walking forever.
	fn suspended_step(
		self: &Rc<Self>,
		tag: Option<NavigationTag>,
		target: String,
		baseline: Option<NavigationTag>,
		remaining: u32,
		bound: u32,
	) {
		if tag == baseline {
			// Land, then clear the guard.
			let result = self.replace_with(&target);
			*self.state.borrow_mut() = match result {
				Ok(()) => BridgeState::Idle,
				Err(err) => {
					error_log!("pop_all landing on {} failed: {}", target, err);
					BridgeState::Halted
				}
			};
			return;
		}

		if remaining == 0 {
			error_log!("{}", NavError::ReconciliationOverrun { bound });
			*self.state.borrow_mut() = BridgeState::Halted;
			return;
		}

		*self.state.borrow_mut() = BridgeState::Suspended {
			target,
			baseline,
			remaining: remaining - 1,
			bound,
		};
		self.adapter.back();
	}

	/// Idle-state reconciliation of one pop event.
	fn reconcile(self: &Rc<Self>, tag: Option<NavigationTag>) {
		// Modal dismissal consumes the event without touching the
		// stack.
		let modal = self.modal.borrow_mut().take();
		if let Some(modal) = modal {
			debug_log!("dismissing modal on pop");
			modal.destroy();
			self.current.set(tag.map(|t| t.page).unwrap_or(0));
			return;
		}

		let n = tag.map(|t| t.page).unwrap_or(0);
		let forward = n > self.current.get();
		// Adopt the observed tag before reconciling: a nested pop_all
		// (auth failure on forward) must start from it.
		self.current.set(n);
		if forward {
			self.reconcile_forward();
		} else {
			self.reconcile_backward();
		}
	}

	/// The browser moved forward into app-tracked history (the page for
	/// that entry was destroyed on the way back). Re-runs push's
	/// reuse/hide/show logic against the already-existing native entry;
	/// no new entry is written.
	fn reconcile_forward(self: &Rc<Self>) {
		let path = self.adapter.current_path();
		let (m, path) = match self.match_path(&path) {
			Some(m) => (m, path),
			None => {
				let not_found = self.not_found_path();
				let Some(m) = self.match_path(&not_found) else {
					error_log!("not-found route {} is not registered", not_found);
					*self.state.borrow_mut() = BridgeState::Halted;
					return;
				};
				(m, not_found)
			}
		};

		if !self.auth_passes(&m.route) {
			// The forward target is off limits: collapse everything
			// back to the root.
			debug_log!("auth denied on forward into {}, collapsing to root", path);
			let root = self.root_path();
			if let Err(err) = self.pop_all(&root) {
				error_log!("collapse to {} failed: {}", root, err);
				*self.state.borrow_mut() = BridgeState::Halted;
			}
			return;
		}

		if self.try_reuse(&m) {
			debug_log!("reusing existing page for {}", path);
			self.finish_navigation(&m.route, &path);
			return;
		}
		self.mount_new(&m.route, &path, None);
	}

	/// The browser moved backward: drop exactly one entry and bring the
	/// one beneath it back.
	fn reconcile_backward(self: &Rc<Self>) {
		let popped = self.stack.borrow_mut().pop();
		if let Some(entry) = popped {
			entry.page().destroy();
		}

		let has_top = !self.stack.borrow().is_empty();
		let weak = Rc::downgrade(self);
		// Restoration waits one microtask so the removal has settled
		// and layout is stable; the scroll offset waits one more so the
		// re-shown page has dimensions again.
		self.adapter.defer(Box::new(move || {
			let Some(inner) = weak.upgrade() else { return };
			let top = inner.stack.borrow().top().cloned();
			match top {
				Some(entry) => {
					entry.restore();
					if let Some(title) = entry.route().title() {
						inner.adapter.set_title(&title);
					}
					let scroll_entry = Rc::clone(&entry);
					inner
						.adapter
						.defer(Box::new(move || scroll_entry.restore_scroll()));
				}
				None => {
					// Backed past the last tracked page, onto the
					// pre-app baseline entry: treat the location as a
					// fresh top-level navigation.
					let path = inner.adapter.current_path();
					inner.fresh_navigate(&path);
				}
			}
		}));

		if has_top {
			self.notify_listeners(&self.adapter.current_path());
		}
	}

	/// Mounts a page for a location that has no tracked entry (the
	/// pre-app baseline reached by backing out of the whole stack).
	fn fresh_navigate(self: &Rc<Self>, path: &str) {
		match self.resolve(path) {
			Ok(res) => self.mount_new(&res.route, &res.path, None),
			Err(err) => {
				error_log!("cannot navigate {}: {}", path, err);
				*self.state.borrow_mut() = BridgeState::Halted;
			}
		}
	}
}
