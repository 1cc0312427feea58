//! Browser history adapter.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error_log;
use crate::history::{HistoryAdapter, NavigationTag, PopHandler};

/// [`HistoryAdapter`] over the browser's History API.
///
/// Navigation tags travel as the entry's native state object
/// (`{"page": n}`). Entries created outside the application carry
/// arbitrary or no state; anything that does not deserialize into a
/// [`NavigationTag`] is reported as untagged.
pub struct BrowserHistory {
	window: web_sys::Window,
	history: web_sys::History,
	/// popstate closure, retained for the adapter's lifetime.
	pop_listener: RefCell<Option<Closure<dyn FnMut(web_sys::PopStateEvent)>>>,
}

impl BrowserHistory {
	/// Binds to the global window.
	///
	/// # Errors
	///
	/// Fails when no window or History API is available (e.g. a worker
	/// context).
	pub fn new() -> Result<Self, String> {
		let window = web_sys::window().ok_or_else(|| "no global window".to_string())?;
		let history = window
			.history()
			.map_err(|_| "History API unavailable".to_string())?;
		Ok(Self {
			window,
			history,
			pop_listener: RefCell::new(None),
		})
	}

	fn tag_to_js(tag: NavigationTag) -> JsValue {
		serde_json::to_string(&tag)
			.ok()
			.and_then(|json| js_sys::JSON::parse(&json).ok())
			.unwrap_or(JsValue::NULL)
	}

	fn tag_from_js(state: &JsValue) -> Option<NavigationTag> {
		if state.is_null() || state.is_undefined() {
			return None;
		}
		let json = js_sys::JSON::stringify(state).ok()?;
		serde_json::from_str(&String::from(json)).ok()
	}
}

impl HistoryAdapter for BrowserHistory {
	fn push_entry(&self, tag: NavigationTag, path: &str) {
		if let Err(err) = self
			.history
			.push_state_with_url(&Self::tag_to_js(tag), "", Some(path))
		{
			error_log!("pushState failed: {:?}", err);
		}
	}

	fn replace_entry(&self, tag: NavigationTag, path: &str) {
		if let Err(err) = self
			.history
			.replace_state_with_url(&Self::tag_to_js(tag), "", Some(path))
		{
			error_log!("replaceState failed: {:?}", err);
		}
	}

	fn back(&self) {
		if let Err(err) = self.history.back() {
			error_log!("history.back failed: {:?}", err);
		}
	}

	fn current_tag(&self) -> Option<NavigationTag> {
		self.history
			.state()
			.ok()
			.as_ref()
			.and_then(Self::tag_from_js)
	}

	fn current_path(&self) -> String {
		let location = self.window.location();
		let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
		let search = location.search().unwrap_or_default();
		let hash = location.hash().unwrap_or_default();
		format!("{}{}{}", pathname, search, hash)
	}

	fn set_title(&self, title: &str) {
		if let Some(document) = self.window.document() {
			document.set_title(title);
		}
	}

	fn on_pop_entry(&self, handler: PopHandler) {
		let closure = Closure::wrap(Box::new(move |event: web_sys::PopStateEvent| {
			handler(Self::tag_from_js(&event.state()));
		}) as Box<dyn FnMut(web_sys::PopStateEvent)>);

		if self
			.window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			.is_err()
		{
			error_log!("failed to attach popstate listener");
		}
		// The closure must outlive every future popstate event; it is
		// dropped with the adapter.
		*self.pop_listener.borrow_mut() = Some(closure);
	}

	fn defer(&self, task: Box<dyn FnOnce()>) {
		wasm_bindgen_futures::spawn_local(async move { task() });
	}
}
