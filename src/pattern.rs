//! Path pattern matching for route registration.
//!
//! Patterns are templated paths with named segments:
//! - `/profile/:id` — `:id` captures a single path segment (excludes `/`)
//! - `/files/*path` — `*path` captures the rest of the path, separators
//!   included
//! - Literal text matches exactly.
//!
//! Matching is pure: a pattern never observes or mutates navigation
//! state. Captured wildcard values can span `/`, so callers using them
//! for anything security-sensitive must validate them.

use std::collections::HashMap;

use regex::RegexBuilder;

use crate::error::NavError;

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for the compiled regex in bytes.
const MAX_REGEX_SIZE: usize = 1 << 20;

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The original pattern string.
	pattern: String,
	/// Compiled regex.
	regex: regex::Regex,
	/// Parameter names in the order they appear in the pattern.
	param_names: Vec<String>,
	/// Whether the pattern contains no parameters.
	is_exact: bool,
}

impl PathPattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns [`NavError::InvalidPattern`] when the pattern exceeds the
	/// length or segment limits, names a parameter twice, leaves a
	/// parameter unnamed, or compiles to an oversized regex.
	pub fn new(pattern: &str) -> Result<Self, NavError> {
		let invalid = |reason: String| NavError::InvalidPattern {
			pattern: pattern.to_string(),
			reason,
		};

		// Length and segment caps bound the compiled regex (anti-ReDoS).
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(invalid(format!(
				"length {} exceeds the maximum of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			)));
		}
		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(invalid(format!(
				"{} path segments exceed the maximum of {}",
				segment_count, MAX_PATH_SEGMENTS
			)));
		}

		let (regex_str, param_names) = Self::compile(pattern).map_err(&invalid)?;
		let regex = RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| invalid(format!("regex compilation failed: {}", e)))?;

		let is_exact = param_names.is_empty();
		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
			is_exact,
		})
	}

	/// Translates a pattern into a regex string plus its parameter names.
	fn compile(pattern: &str) -> Result<(String, Vec<String>), String> {
		let mut regex_str = String::from("^");
		let mut param_names: Vec<String> = Vec::new();
		let mut chars = pattern.chars().peekable();

		while let Some(c) = chars.next() {
			match c {
				':' | '*' => {
					let mut name = String::new();
					while let Some(&next) = chars.peek() {
						if next.is_ascii_alphanumeric() || next == '_' {
							name.push(next);
							chars.next();
						} else {
							break;
						}
					}
					if name.is_empty() {
						return Err(format!("`{}` must be followed by a parameter name", c));
					}
					if param_names.contains(&name) {
						return Err(format!("duplicate parameter name `{}`", name));
					}
					if c == '*' {
						// Rest-of-path capture, separators included.
						regex_str.push_str(&format!("(?P<{}>.*)", name));
					} else {
						// Single segment capture.
						regex_str.push_str(&format!("(?P<{}>[^/]+)", name));
					}
					param_names.push(name);
				}
				'/' | '.' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|'
				| '\\' => {
					regex_str.push('\\');
					regex_str.push(c);
				}
				_ => regex_str.push(c),
			}
		}

		regex_str.push('$');
		Ok((regex_str, param_names))
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether the pattern contains no parameters.
	pub fn is_exact(&self) -> bool {
		self.is_exact
	}

	/// Attempts to match a path, returning extracted parameters by name.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.regex.captures(path).map(|caps| {
			self.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect()
		})
	}

	/// Checks whether a path matches without extracting parameters.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Generates a concrete path by substituting parameters back into the
	/// pattern. Returns `None` when a parameter is missing.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut result = String::new();
		let mut chars = self.pattern.chars().peekable();

		while let Some(c) = chars.next() {
			if c == ':' || c == '*' {
				let mut name = String::new();
				while let Some(&next) = chars.peek() {
					if next.is_ascii_alphanumeric() || next == '_' {
						name.push(next);
						chars.next();
					} else {
						break;
					}
				}
				result.push_str(params.get(&name)?);
			} else {
				result.push(c);
			}
		}

		Some(result)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

/// Reduces a location to its matchable path: strips the scheme and host
/// of absolute URLs and truncates at the query string or fragment.
pub(crate) fn normalize_path(path: &str) -> &str {
	let path = if let Some(rest) = path
		.strip_prefix("http://")
		.or_else(|| path.strip_prefix("https://"))
	{
		match rest.find('/') {
			Some(idx) => &rest[idx..],
			None => "/",
		}
	} else {
		path
	};
	let end = path.find(['?', '#']).unwrap_or(path.len());
	&path[..end]
}
