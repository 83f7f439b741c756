//! JQL query-string builders
//!
//! The output strings are compatibility-relevant: downstream Jira
//! instances see exactly these queries, so the formatting is kept
//! stable and covered by tests.

use boardpulse_types::Project;
use chrono::NaiveDate;

/// Build the epic search query for a set of projects.
///
/// An empty project list yields an empty string; otherwise the
/// projects form a parenthesized disjunction with each project's
/// filter fragment appended inside its own clause:
/// `(project = "P1" AND (f1) OR project = "P2") AND issuetype = Epic`.
pub fn epic_query(projects: &[Project]) -> String {
	if projects.is_empty() {
		return String::new();
	}

	let clauses = projects
		.iter()
		.map(project_clause)
		.collect::<Vec<_>>()
		.join(" OR ");

	format!("({}) AND issuetype = Epic", clauses)
}

/// Query for the child issues of an epic.
pub fn epic_issues_query(epic_key: &str) -> String {
	format!("\"Epic Link\" = {}", epic_key)
}

/// Optional per-sprint issue filter; `None` when the project carries
/// no filter fragment (the sprint endpoint is then queried unfiltered).
pub fn sprint_issue_filter(project: &Project) -> Option<String> {
	if project.jql.is_empty() {
		None
	} else {
		Some(format!("project={} {}", project.name, project.jql))
	}
}

/// Closed impediments updated within a sprint's date window that have
/// recorded time-spent.
pub fn sprint_impediments_query(
	project: &Project,
	closed_statuses: &[String],
	start: NaiveDate,
	end: NaiveDate,
) -> String {
	format!(
		"({}) AND status in {} AND labels in (Impediment, impediment) \
		 AND updated >= {} AND updated <= {} AND timespent is not EMPTY",
		project_clause(project),
		closed_clause(closed_statuses),
		start.format("%Y-%m-%d"),
		end.format("%Y-%m-%d"),
	)
}

/// Impediments closed within the last 24 hours that have recorded
/// time-spent.
pub fn daily_impediments_query(project: &Project, closed_statuses: &[String]) -> String {
	format!(
		"({}) AND status in {} AND labels in (Impediment, impediment) \
		 AND updated >= -1d AND timespent is not EMPTY",
		project_clause(project),
		closed_clause(closed_statuses),
	)
}

fn project_clause(project: &Project) -> String {
	if project.jql.is_empty() {
		format!("project = \"{}\"", project.name)
	} else {
		format!("project = \"{}\" {}", project.name, project.jql)
	}
}

fn closed_clause(closed_statuses: &[String]) -> String {
	format!("({})", closed_statuses.join(","))
}
