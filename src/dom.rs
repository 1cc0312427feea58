//! Browser bindings (wasm32 targets only).
//!
//! Implements the crate's two seams against the real browser:
//! [`BrowserHistory`] over the History API and [`DomPage`] over an
//! `HtmlElement` in the document.

mod history;
mod page;

pub use history::BrowserHistory;
pub use page::{DomPage, RESUME_EVENT, SUSPEND_EVENT, scroll_parent};
