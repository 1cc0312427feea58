//! Browser smoke tests for the DOM adapters.
//!
//! Run with `wasm-pack test --chrome --headless`.

#![cfg(target_arch = "wasm32")]

use navstack::dom::{BrowserHistory, DomPage};
use navstack::{HistoryAdapter, NavigationTag, PageHandle};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn tag_round_trips_through_native_state() {
	let history = BrowserHistory::new().unwrap();

	history.replace_entry(NavigationTag::new(7), "/tagged");
	assert_eq!(history.current_tag(), Some(NavigationTag::new(7)));
	assert!(history.current_path().starts_with("/tagged"));
}

#[wasm_bindgen_test]
fn set_title_writes_document_title() {
	let history = BrowserHistory::new().unwrap();
	history.set_title("navstack test");

	let document = web_sys::window().unwrap().document().unwrap();
	assert_eq!(document.title(), "navstack test");
}

#[wasm_bindgen_test]
fn dom_page_hide_show_round_trips_display() {
	let document = web_sys::window().unwrap().document().unwrap();
	let body = document.body().unwrap();
	let element: web_sys::HtmlElement =
		document.create_element("div").unwrap().dyn_into().unwrap();
	element.style().set_property("display", "flex").unwrap();

	let page = DomPage::mount(body.as_ref(), element).unwrap();
	assert!(page.is_visible());

	page.hide();
	assert!(!page.is_visible());
	assert_eq!(
		page.element().style().get_property_value("display").unwrap(),
		"none"
	);

	page.show();
	assert!(page.is_visible());
	assert_eq!(
		page.element().style().get_property_value("display").unwrap(),
		"flex"
	);

	page.destroy();
	assert!(page.element().parent_element().is_none());
}
