//! navstack - client-side navigation stack for single-page applications
//!
//! A navigation controller that maps logical paths to page instances,
//! keeps an internal stack of live (but possibly hidden) pages
//! synchronized with the browser's session-history entries, and exposes
//! push/replace/pop/pop-to-root/modal operations to the rest of the UI.
//!
//! ## Features
//!
//! - **Route registry**: path patterns with named segments
//!   (`/profile/:id`), auth requirements, per-route reuse predicates and
//!   document titles
//! - **Page stack**: pages navigated away from are hidden, not
//!   destroyed, and come back with their scroll position and background
//!   activity restored
//! - **History bridge**: a reconciliation state machine absorbs native
//!   back/forward events, so the stack is always a function of observed
//!   history state
//! - **Modal layer**: a single overlay consuming one history slot, so a
//!   back gesture dismisses it naturally
//! - **Injected history**: the core only talks to a
//!   [`HistoryAdapter`]; tests run against the in-memory
//!   [`MemoryHistory`], browsers use `dom::BrowserHistory`
//!
//! ## Architecture
//!
//! - [`pattern`]: path pattern compilation and matching
//! - [`route`]: route definitions and the registry
//! - [`page`]: the [`PageHandle`] capability set every page is
//!   normalized into
//! - [`history`]: [`NavigationTag`], the [`HistoryAdapter`] seam and the
//!   in-memory adapter
//! - [`router`]: the [`Router`] operations and the history bridge
//! - `dom`: browser implementations of the adapter and page handle
//!   (wasm32 targets only)
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use navstack::{MemoryHistory, Route, Router};
//!
//! let router = Router::new(Rc::new(MemoryHistory::new()));
//! router.add_route(Route::new("/", login_page)?)?;
//! router.add_route(Route::new("/404", not_found_page)?)?;
//! router.add_route(Route::new("/home", home_page)?.protected())?;
//! router.add_route(Route::new("/profile/:id", profile_page)?)?;
//! router.set_root_route("/")?;
//! router.set_not_found_route("/404")?;
//! router.set_auth_provider(|| session().is_some());
//!
//! router.push("/profile/abc123")?;
//! assert_eq!(router.get_current_params().unwrap()["id"], "abc123");
//! router.pop()?;
//! ```

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub mod dom;
pub mod error;
pub mod history;
mod logging;
pub mod page;
pub mod pattern;
pub mod route;
pub mod router;
mod stack;

pub use error::NavError;
pub use history::{HistoryAdapter, MemoryEntry, MemoryHistory, NavigationTag};
pub use page::{PageHandle, PageRef};
pub use pattern::PathPattern;
pub use route::{Route, RouteMatch, RouteRegistry};
pub use router::{AuthFn, NavigationListener, Router};
