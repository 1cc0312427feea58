//! Error types for the navigation subsystem.

use thiserror::Error;

/// Error type for navigation operations.
///
/// Unmatched paths and denied authorization are deliberately absent:
/// both are recovered at the point of detection by redirecting (to the
/// not-found route and the root route respectively) and never reach the
/// caller. The variants below are the fatal configuration and
/// environment errors that do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
	/// A route with the same pattern is already registered.
	#[error("route `{0}` already defined")]
	DuplicateRoute(String),
	/// The route pattern failed to compile.
	#[error("invalid route pattern `{pattern}`: {reason}")]
	InvalidPattern {
		/// The offending pattern string.
		pattern: String,
		/// Why compilation was rejected.
		reason: String,
	},
	/// No registered route matches the given path.
	#[error("no route defined for path `{0}`")]
	NoRouteForPath(String),
	/// The root route itself denies access, leaving authorization
	/// redirects nowhere to land.
	#[error("root route `{0}` is not accessible")]
	RootRouteInaccessible(String),
	/// A pop-to-root walk failed to reach the baseline history entry
	/// within its iteration bound. Indicates corrupted history state.
	#[error("history reconciliation overran its bound of {bound} back navigations")]
	ReconciliationOverrun {
		/// Number of back navigations the walk was allowed.
		bound: u32,
	},
	/// The subsystem halted after a fatal reconciliation error.
	#[error("navigation subsystem halted")]
	Halted,
}
