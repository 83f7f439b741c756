//! Project configuration unit

/// A named unit of work tracked in the external system.
///
/// Projects are loaded once at startup and immutable thereafter. The
/// stored `jql` filter is already wrapped for query concatenation
/// (`AND (<filter>)`) or empty, and `label` is never empty (it falls
/// back to the project name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
	/// Project key in the tracking service
	pub name: String,

	/// Numeric identifier of the agile board holding the project's sprints
	pub board: u64,

	/// Optional query filter fragment, pre-wrapped as `AND (<filter>)`
	pub jql: String,

	/// Display label used on emitted metric points
	pub label: String,
}
