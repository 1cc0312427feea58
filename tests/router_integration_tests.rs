//! Integration tests for the navigation operations.
//!
//! These drive a [`Router`] over the in-memory history adapter and
//! verify:
//! 1. Registration fails fast on configuration errors
//! 2. push/replace stack, hide and reuse semantics
//! 3. pop and pop_all collapse behavior
//! 4. Modal, listener, title and current-params behavior

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{TestPage, Tracked, fixture, tracked_route};
use navstack::{HistoryAdapter, NavError, NavigationTag, PageRef, Route, Router};
use rstest::rstest;

struct App {
	login: Tracked,
	not_found: Tracked,
	home: Tracked,
	profile: Tracked,
}

/// Registers the standard app fixture: a public root, a not-found page,
/// a protected home and a public profile.
fn app(router: &Router) -> App {
	let (login_route, login) = tracked_route("/", "login");
	let (not_found_route, not_found) = tracked_route("/404", "not-found");
	let (home_route, home) = tracked_route("/home", "home");
	let (profile_route, profile) = tracked_route("/profile/:id", "profile");

	router.add_route(login_route).unwrap();
	router.add_route(not_found_route).unwrap();
	router.add_route(home_route.protected()).unwrap();
	router.add_route(profile_route).unwrap();
	router.set_root_route("/").unwrap();
	router.set_not_found_route("/404").unwrap();

	App {
		login,
		not_found,
		home,
		profile,
	}
}

#[test]
fn test_duplicate_route_fails_fast() {
	let (router, _history) = fixture();
	let (route_a, _) = tracked_route("/home", "a");
	let (route_b, _) = tracked_route("/home", "b");

	router.add_route(route_a).unwrap();
	assert_eq!(
		router.add_route(route_b),
		Err(NavError::DuplicateRoute("/home".to_string()))
	);
}

#[test]
fn test_root_and_not_found_must_be_registered() {
	let (router, _history) = fixture();
	assert_eq!(
		router.set_root_route("/"),
		Err(NavError::NoRouteForPath("/".to_string()))
	);
	assert!(router.set_not_found_route("/404").is_err());

	let (route, _) = tracked_route("/", "login");
	router.add_route(route).unwrap();
	assert!(router.set_root_route("/").is_ok());
}

#[test]
fn test_push_hides_previous_and_shows_new() {
	let (router, history) = fixture();
	let app = app(&router);

	router.push("/").unwrap();
	let login = app.login.last_page();
	assert!(login.visible.get());
	assert_eq!(router.stack_depth(), 1);

	router.push("/profile/abc123").unwrap();
	let profile = app.profile.last_page();

	assert_eq!(router.stack_depth(), 2);
	assert!(profile.visible.get());
	// The outgoing page is hidden and quiesced, not destroyed.
	assert!(!login.visible.get());
	assert!(login.suspended.get());
	assert!(!login.destroyed());

	assert_eq!(history.current_path(), "/profile/abc123");
	assert_eq!(history.current_tag(), Some(NavigationTag::new(2)));
}

#[test]
fn test_push_same_route_reuses_page() {
	let (router, history) = fixture();
	let app = app(&router);

	router.push("/profile/alice").unwrap();
	router.push("/profile/bob").unwrap();

	// One live page, one factory call, and the URL re-synced onto the
	// same history entry.
	assert_eq!(router.stack_depth(), 1);
	assert_eq!(app.profile.call_count(), 1);
	assert_eq!(history.current_path(), "/profile/bob");
	assert_eq!(history.current_tag(), Some(NavigationTag::new(1)));
	assert_eq!(history.len(), 2);

	let params = router.get_current_params().unwrap();
	assert_eq!(params.get("id"), Some(&"bob".to_string()));
}

#[test]
fn test_push_with_reuse_declined_stacks() {
	let (router, _history) = fixture();
	let calls = Rc::new(Cell::new(0));
	let factory_calls = Rc::clone(&calls);
	let route = Route::new("/profile/:id", move || {
		factory_calls.set(factory_calls.get() + 1);
		let page: PageRef = TestPage::new("profile");
		page
	})
	.unwrap()
	.with_reuse(|_| false);
	router.add_route(route).unwrap();
	let (nf, _) = tracked_route("/404", "nf");
	router.add_route(nf).unwrap();

	router.push("/profile/alice").unwrap();
	router.push("/profile/bob").unwrap();

	assert_eq!(router.stack_depth(), 2);
	assert_eq!(calls.get(), 2);
}

#[test]
fn test_push_prerendered_skips_factory() {
	let (router, _history) = fixture();
	let app = app(&router);

	let page = TestPage::new("prebuilt");
	let handle: PageRef = Rc::clone(&page) as PageRef;
	router.push_prerendered("/profile/abc", handle).unwrap();

	assert_eq!(app.profile.call_count(), 0);
	assert!(page.visible.get());
	assert!(Rc::ptr_eq(&router.top_page().unwrap(), &(Rc::clone(&page) as PageRef)));
}

#[test]
fn test_unmatched_path_lands_on_not_found() {
	let (router, history) = fixture();
	let app = app(&router);

	router.push("/no/such/page").unwrap();

	assert_eq!(router.stack_depth(), 1);
	assert_eq!(app.not_found.call_count(), 1);
	assert_eq!(history.current_path(), "/404");
}

#[test]
fn test_unregistered_not_found_is_configuration_error() {
	let (router, _history) = fixture();
	let (route, _) = tracked_route("/", "login");
	router.add_route(route).unwrap();

	assert_eq!(
		router.push("/no/such/page"),
		Err(NavError::NoRouteForPath("/404".to_string()))
	);
}

#[test]
fn test_protected_root_is_a_configuration_error() {
	let (router, _history) = fixture();
	let (root_route, _) = tracked_route("/", "login");
	let (home_route, _) = tracked_route("/home", "home");
	let (nf_route, _) = tracked_route("/404", "nf");
	// A protected root leaves authorization redirects nowhere to land.
	router.add_route(root_route.protected()).unwrap();
	router.add_route(home_route.protected()).unwrap();
	router.add_route(nf_route).unwrap();
	router.set_auth_provider(|| false);

	assert_eq!(
		router.push("/home"),
		Err(NavError::RootRouteInaccessible("/".to_string()))
	);
}

#[test]
fn test_auth_denied_push_never_grows_stack() {
	let (router, history) = fixture();
	let app = app(&router);
	let authed = Rc::new(Cell::new(false));
	let auth = Rc::clone(&authed);
	router.set_auth_provider(move || auth.get());

	// From an empty stack: land on root at depth 1.
	router.push("/home").unwrap();
	assert_eq!(router.stack_depth(), 1);
	assert_eq!(app.home.call_count(), 0);
	assert_eq!(app.login.call_count(), 1);
	assert_eq!(history.current_path(), "/");

	// From depth 1: still depth 1, the previous root page is replaced.
	let first_login = app.login.last_page();
	router.push("/home").unwrap();
	assert_eq!(router.stack_depth(), 1);
	assert!(first_login.destroyed());
	assert_eq!(app.login.call_count(), 2);

	// Once authorized the protected route stacks normally.
	authed.set(true);
	router.push("/home").unwrap();
	assert_eq!(router.stack_depth(), 2);
	assert_eq!(app.home.call_count(), 1);
}

#[test]
fn test_pop_restores_prior_page_by_identity() {
	let (router, _history) = fixture();
	let app = app(&router);

	router.push("/").unwrap();
	let login = app.login.last_page();
	router.push("/profile/abc").unwrap();
	let profile = app.profile.last_page();

	router.pop().unwrap();

	assert_eq!(router.stack_depth(), 1);
	assert_eq!(profile.destroy_count.get(), 1);
	// The exact prior instance, not a re-render.
	assert!(Rc::ptr_eq(
		&router.top_page().unwrap(),
		&(login.clone() as PageRef)
	));
	assert_eq!(app.login.call_count(), 1);
	assert!(login.visible.get());
	assert!(!login.suspended.get());
}

#[test]
fn test_scroll_round_trip() {
	let (router, _history) = fixture();
	let app = app(&router);

	router.push("/").unwrap();
	let login = app.login.last_page();
	login.scroll.set(137.0);

	router.push("/profile/abc").unwrap();
	// The shared scroll parent moves while the next page is up.
	login.scroll.set(5.0);

	router.pop().unwrap();
	assert_eq!(login.scroll.get(), 137.0);
}

#[test]
fn test_replace_destroys_top_and_keeps_tag() {
	let (router, history) = fixture();
	let app = app(&router);

	router.push("/").unwrap();
	router.push("/profile/abc").unwrap();
	let profile = app.profile.last_page();

	router.replace("/404").unwrap();

	assert!(profile.destroyed());
	assert_eq!(router.stack_depth(), 2);
	assert_eq!(app.not_found.call_count(), 1);
	// Same slot, same tag, different content.
	assert_eq!(history.current_tag(), Some(NavigationTag::new(2)));
	assert_eq!(history.current_path(), "/404");
	assert_eq!(history.len(), 3);
}

#[test]
fn test_replace_url_touches_nothing_but_the_url() {
	let (router, history) = fixture();
	let app = app(&router);

	router.push("/profile/abc").unwrap();
	let page = app.profile.last_page();
	let seen = Rc::new(Cell::new(0usize));
	let count = Rc::clone(&seen);
	router.add_listener(move |_| count.set(count.get() + 1));

	router.replace_url("/profile/abc?tab=posts").unwrap();

	assert_eq!(history.current_path(), "/profile/abc?tab=posts");
	assert_eq!(app.profile.call_count(), 1);
	assert!(Rc::ptr_eq(&router.top_page().unwrap(), &(page as PageRef)));
	assert_eq!(seen.get(), 0);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
fn test_pop_all_lands_at_depth_one(#[case] depth: usize) {
	let (router, history) = fixture();
	let app = app(&router);
	let (pages_route, pages) = tracked_route("/page/:n", "numbered");
	router.add_route(pages_route.with_reuse(|_| false)).unwrap();

	for n in 0..depth {
		router.push(&format!("/page/{}", n)).unwrap();
	}
	assert_eq!(router.stack_depth(), depth);

	router.pop_all("/").unwrap();

	assert_eq!(router.stack_depth(), 1);
	assert!(!router.is_halted());
	assert_eq!(history.current_path(), "/");
	assert_eq!(history.current_tag(), Some(NavigationTag::new(1)));
	assert_eq!(app.login.call_count(), 1);
	// Every collapsed page was destroyed exactly once.
	for n in 0..depth {
		assert_eq!(pages.page(n).destroy_count.get(), 1);
	}
}

#[test]
fn test_modal_consumes_one_slot_and_back_dismisses_it() {
	let (router, history) = fixture();
	let app = app(&router);

	router.push("/").unwrap();
	let login = app.login.last_page();
	let shows_before = login.show_count.get();
	let entries_before = history.len();

	let modal = TestPage::new("modal");
	router.push_modal(Rc::clone(&modal) as PageRef).unwrap();

	assert!(router.has_modal());
	assert!(modal.visible.get());
	assert_eq!(router.stack_depth(), 1);
	assert_eq!(history.len(), entries_before + 1);
	// The overlay shares the page's URL.
	assert_eq!(history.current_path(), "/");

	router.pop().unwrap();

	// Exactly the modal is gone; the page beneath it was never hidden,
	// re-shown or re-rendered.
	assert!(!router.has_modal());
	assert!(modal.destroyed());
	assert_eq!(router.stack_depth(), 1);
	assert!(Rc::ptr_eq(&router.top_page().unwrap(), &(login.clone() as PageRef)));
	assert!(login.visible.get());
	assert_eq!(login.show_count.get(), shows_before);
	assert_eq!(login.hide_count.get(), 0);
	assert_eq!(app.login.call_count(), 1);
}

#[test]
fn test_second_modal_swaps_in_place() {
	let (router, history) = fixture();
	let app = app(&router);
	router.push("/").unwrap();
	let login = app.login.last_page();

	let first = TestPage::new("modal-1");
	let second = TestPage::new("modal-2");
	router.push_modal(Rc::clone(&first) as PageRef).unwrap();
	let entries_after_first = history.len();

	router.push_modal(Rc::clone(&second) as PageRef).unwrap();

	// Still a single overlay and a single extra history slot.
	assert!(first.destroyed());
	assert!(second.visible.get());
	assert_eq!(history.len(), entries_after_first);

	router.pop().unwrap();
	assert!(second.destroyed());
	assert!(!router.has_modal());
	assert_eq!(router.stack_depth(), 1);
	assert!(login.visible.get());
}

#[test]
fn test_listeners_observe_every_completed_navigation() {
	let (router, _history) = fixture();
	let _app = app(&router);
	let seen: Rc<std::cell::RefCell<Vec<String>>> = Rc::new(std::cell::RefCell::new(Vec::new()));
	let sink = Rc::clone(&seen);
	router.add_listener(move |path| sink.borrow_mut().push(path.to_string()));

	router.push("/").unwrap();
	router.push("/profile/abc").unwrap();
	router.pop().unwrap();
	router.pop_all("/404").unwrap();

	assert_eq!(
		*seen.borrow(),
		vec![
			"/".to_string(),
			"/profile/abc".to_string(),
			"/".to_string(),
			"/404".to_string(),
		]
	);
}

#[test]
fn test_titles_follow_navigation() {
	let (router, history) = fixture();
	let (login_route, _login) = tracked_route("/", "login");
	let (profile_route, _profile) = tracked_route("/profile/:id", "profile");
	let (nf_route, _) = tracked_route("/404", "nf");
	router
		.add_route(login_route.with_title(|| "Skylight".to_string()))
		.unwrap();
	router
		.add_route(profile_route.with_title(|| "Skylight - Profile".to_string()))
		.unwrap();
	router.add_route(nf_route).unwrap();

	router.push("/").unwrap();
	assert_eq!(history.title(), "Skylight");

	router.push("/profile/abc").unwrap();
	assert_eq!(history.title(), "Skylight - Profile");

	// Restored on the way back.
	router.pop().unwrap();
	assert_eq!(history.title(), "Skylight");
}

#[test]
fn test_get_current_params_without_matching_route() {
	let (router, _history) = fixture();
	// Nothing registered: the live location resolves to no route.
	assert_eq!(router.get_current_params(), None);
}

#[test]
fn test_get_current_params_tracks_live_location() {
	let (router, _history) = fixture();
	let _app = app(&router);

	router.push("/profile/abc123").unwrap();
	let params = router.get_current_params().unwrap();
	assert_eq!(params.get("id"), Some(&"abc123".to_string()));

	router.push("/404").unwrap();
	assert!(router.get_current_params().unwrap().is_empty());
}
