//! Route definitions and the route registry.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::NavError;
use crate::page::{PageHandle, PageRef};
use crate::pattern::{PathPattern, normalize_path};

/// Factory producing a fresh page handle for a route.
pub type RenderFn = Rc<dyn Fn() -> PageRef>;

/// Factory producing the document title for a route.
pub type TitleFn = Rc<dyn Fn() -> String>;

/// Predicate deciding whether a repeat navigation to the same route may
/// reuse the existing page instance instead of creating a new one.
pub type ReuseFn = Rc<dyn Fn(&dyn PageHandle) -> bool>;

/// A single route: pattern, render factory, optional title factory, auth
/// requirement and reuse predicate. Immutable once registered.
pub struct Route {
	pattern: PathPattern,
	render: RenderFn,
	title: Option<TitleFn>,
	requires_auth: bool,
	reuse: ReuseFn,
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("pattern", &self.pattern)
			.field("requires_auth", &self.requires_auth)
			.field("has_title", &self.title.is_some())
			.finish()
	}
}

impl Route {
	/// Creates a route for `pattern` rendered by `render`.
	///
	/// The route is public and reusable by default; see [`protected`]
	/// and [`with_reuse`].
	///
	/// [`protected`]: Route::protected
	/// [`with_reuse`]: Route::with_reuse
	pub fn new<F>(pattern: &str, render: F) -> Result<Self, NavError>
	where
		F: Fn() -> PageRef + 'static,
	{
		Ok(Self {
			pattern: PathPattern::new(pattern)?,
			render: Rc::new(render),
			title: None,
			requires_auth: false,
			reuse: Rc::new(|_| true),
		})
	}

	/// Sets the document-title factory for this route.
	pub fn with_title<F>(mut self, title: F) -> Self
	where
		F: Fn() -> String + 'static,
	{
		self.title = Some(Rc::new(title));
		self
	}

	/// Marks this route as requiring authorization.
	pub fn protected(mut self) -> Self {
		self.requires_auth = true;
		self
	}

	/// Sets the reuse predicate for this route.
	pub fn with_reuse<F>(mut self, reuse: F) -> Self
	where
		F: Fn(&dyn PageHandle) -> bool + 'static,
	{
		self.reuse = Rc::new(reuse);
		self
	}

	/// Returns the compiled pattern.
	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	/// Whether entry requires authorization.
	pub fn requires_auth(&self) -> bool {
		self.requires_auth
	}

	pub(crate) fn render(&self) -> PageRef {
		(self.render)()
	}

	pub(crate) fn title(&self) -> Option<String> {
		self.title.as_ref().map(|t| t())
	}

	pub(crate) fn reuse(&self, page: &dyn PageHandle) -> bool {
		(self.reuse)(page)
	}
}

/// A matched route with its extracted parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch {
	/// The matched route.
	pub route: Rc<Route>,
	/// Named segment values, keyed by parameter name.
	pub params: HashMap<String, String>,
}

/// Ordered collection of registered routes plus the two well-known
/// destinations (root and not-found).
pub struct RouteRegistry {
	routes: Vec<Rc<Route>>,
	root_path: String,
	not_found_path: String,
}

impl RouteRegistry {
	/// Creates an empty registry. Root defaults to `/`, not-found to
	/// `/404`.
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			root_path: "/".to_string(),
			not_found_path: "/404".to_string(),
		}
	}

	/// Registers a route.
	///
	/// # Errors
	///
	/// Returns [`NavError::DuplicateRoute`] when the pattern is already
	/// registered. Fatal at startup: callers are expected to fail fast.
	pub fn add(&mut self, route: Route) -> Result<(), NavError> {
		if self
			.routes
			.iter()
			.any(|other| other.pattern().pattern() == route.pattern().pattern())
		{
			return Err(NavError::DuplicateRoute(route.pattern().pattern().to_string()));
		}
		self.routes.push(Rc::new(route));
		Ok(())
	}

	/// Sets the root destination. Fails when no registered route matches
	/// `path`.
	pub fn set_root_route(&mut self, path: &str) -> Result<(), NavError> {
		if self.match_path(path).is_none() {
			return Err(NavError::NoRouteForPath(path.to_string()));
		}
		self.root_path = path.to_string();
		Ok(())
	}

	/// Sets the not-found destination. Fails when no registered route
	/// matches `path`.
	pub fn set_not_found_route(&mut self, path: &str) -> Result<(), NavError> {
		if self.match_path(path).is_none() {
			return Err(NavError::NoRouteForPath(path.to_string()));
		}
		self.not_found_path = path.to_string();
		Ok(())
	}

	/// The configured root destination.
	pub fn root_path(&self) -> &str {
		&self.root_path
	}

	/// The configured not-found destination.
	pub fn not_found_path(&self) -> &str {
		&self.not_found_path
	}

	/// Resolves a path to a route and its parameters.
	///
	/// Pure: patterns are tested in registration order, first match
	/// wins, and no navigation state is touched. The path is normalized
	/// first, so absolute URLs and query strings match as expected.
	pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
		let path = normalize_path(path);
		for route in &self.routes {
			if let Some(params) = route.pattern().matches(path) {
				return Some(RouteMatch {
					route: Rc::clone(route),
					params,
				});
			}
		}
		None
	}

	/// Number of registered routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Whether no routes are registered.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

impl Default for RouteRegistry {
	fn default() -> Self {
		Self::new()
	}
}
