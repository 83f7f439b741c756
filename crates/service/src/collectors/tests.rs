use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use boardpulse_adapters::jql;
use boardpulse_types::{
	Batch, Issue, MetricPoint, MetricValue, MetricsSink, Project, PushResult, Sprint,
	TrackerClient, TrackerError, TrackerResult,
};

use crate::emitter::BatchEmitter;
use crate::scheduler::Cycle;

use super::{EpicCollector, SprintCollector};

const SP_FIELD: &str = "customfield_10006";
const IMPEDIMENT_FIELD: &str = "customfield_11028";

/// Tracker stub with canned responses keyed by query string.
#[derive(Default)]
struct ScriptedTracker {
	searches: HashMap<String, Vec<Issue>>,
	sprints: HashMap<u64, Vec<Sprint>>,
	sprint_issues: HashMap<u64, Vec<Issue>>,
	failing_queries: HashSet<String>,
	failing_boards: HashSet<u64>,
}

fn scripted_failure() -> TrackerError {
	TrackerError::Status {
		status: 500,
		reason: "scripted failure".to_string(),
	}
}

#[async_trait]
impl TrackerClient for ScriptedTracker {
	async fn search_issues(&self, jql: &str, _fields: &[&str]) -> TrackerResult<Vec<Issue>> {
		if self.failing_queries.iter().any(|query| jql.contains(query)) {
			return Err(scripted_failure());
		}
		Ok(self.searches.get(jql).cloned().unwrap_or_default())
	}

	async fn active_sprints(&self, board: u64) -> TrackerResult<Vec<Sprint>> {
		if self.failing_boards.contains(&board) {
			return Err(scripted_failure());
		}
		Ok(self.sprints.get(&board).cloned().unwrap_or_default())
	}

	async fn sprint_issues(&self, sprint: u64, _jql: Option<&str>) -> TrackerResult<Vec<Issue>> {
		Ok(self.sprint_issues.get(&sprint).cloned().unwrap_or_default())
	}
}

/// Sink stub capturing every pushed batch.
#[derive(Default)]
struct RecordingSink {
	batches: Mutex<Vec<Batch>>,
}

#[async_trait]
impl MetricsSink for RecordingSink {
	async fn push(&self, batch: &Batch) -> PushResult {
		self.batches.lock().unwrap().push(batch.clone());
		Ok(())
	}
}

fn project(name: &str) -> Project {
	Project {
		name: name.to_string(),
		board: 7,
		jql: String::new(),
		label: name.to_string(),
	}
}

fn epic(key: &str, summary: &str, category: &str, labels: &[&str]) -> Issue {
	serde_json::from_value(json!({
		"key": key,
		"fields": {
			"summary": summary,
			"labels": labels,
			"status": {"statusCategory": {"key": category}}
		}
	}))
	.unwrap()
}

fn story(key: &str, points: f64, category: &str) -> Issue {
	serde_json::from_value(json!({
		"key": key,
		"fields": {
			"labels": [],
			"status": {"statusCategory": {"key": category}},
			"customfield_10006": points
		}
	}))
	.unwrap()
}

fn impediment(key: &str, kind: &str, timespent: i64, created: &str) -> Issue {
	serde_json::from_value(json!({
		"key": key,
		"fields": {
			"created": created,
			"timespent": timespent,
			"customfield_11028": [{"value": kind}]
		}
	}))
	.unwrap()
}

fn sprint(id: u64, name: &str, dates: Option<(DateTime<Utc>, DateTime<Utc>)>) -> Sprint {
	Sprint {
		id,
		name: name.to_string(),
		state: Some("active".to_string()),
		start_date: dates.map(|(start, _)| start),
		end_date: dates.map(|(_, end)| end),
	}
}

fn pushed_batches(sink: &RecordingSink) -> Vec<Batch> {
	sink.batches.lock().unwrap().clone()
}

fn points_with_class<'a>(batch: &'a Batch, class: &str) -> Vec<&'a MetricPoint> {
	batch
		.points()
		.iter()
		.filter(|point| point.class == class)
		.collect()
}

#[tokio::test]
async fn epic_cycle_emits_five_series_per_quarter_label() {
	let pj1 = project("PJ1");
	let mut tracker = ScriptedTracker::default();
	tracker.searches.insert(
		jql::epic_query(std::slice::from_ref(&pj1)),
		vec![epic(
			"PJ1-1",
			"Rework the parser",
			"indeterminate",
			&["Q1-20", "Q2-20", "Project_Alpha"],
		)],
	);
	tracker.searches.insert(
		jql::epic_issues_query("PJ1-1"),
		vec![
			story("PJ1-2", 3.0, "done"),
			story("PJ1-3", 5.0, "indeterminate"),
		],
	);

	let sink = Arc::new(RecordingSink::default());
	let collector = EpicCollector::new(
		Arc::new(tracker),
		BatchEmitter::new(Arc::clone(&sink) as Arc<dyn MetricsSink>),
		vec![pj1],
		SP_FIELD,
	);
	collector.run().await;

	let batches = pushed_batches(&sink);
	assert_eq!(batches.len(), 1);
	// five series per quarter label, two quarter labels
	assert_eq!(batches[0].len(), 10);

	let storypoints = points_with_class(&batches[0], "boardpulse.jira.epic.storypoint");
	assert_eq!(storypoints.len(), 2);
	let mut quarters: Vec<&str> = storypoints
		.iter()
		.filter_map(|point| point.label("quarter"))
		.collect();
	quarters.sort_unstable();
	assert_eq!(quarters, vec!["Q1-20", "Q2-20"]);

	for point in &storypoints {
		assert_eq!(point.label("project"), Some("PJ1"));
		assert_eq!(point.label("key"), Some("PJ1-1"));
		assert_eq!(point.label("summary"), Some("Rework the parser"));
		assert_eq!(point.label("global"), Some("Alpha"));
		assert_eq!(point.datapoints[0].value, MetricValue::Double(8.0));
	}

	let done = points_with_class(&batches[0], "boardpulse.jira.epic.storypoint.done");
	assert_eq!(done[0].datapoints[0].value, MetricValue::Double(3.0));
	let inprogress = points_with_class(&batches[0], "boardpulse.jira.epic.storypoint.inprogress");
	assert_eq!(inprogress[0].datapoints[0].value, MetricValue::Double(5.0));
}

#[tokio::test]
async fn epic_without_quarter_label_emits_nothing() {
	let pj1 = project("PJ1");
	let mut tracker = ScriptedTracker::default();
	tracker.searches.insert(
		jql::epic_query(std::slice::from_ref(&pj1)),
		vec![epic("PJ1-1", "No quarter", "new", &["Project_Alpha"])],
	);

	let sink = Arc::new(RecordingSink::default());
	let collector = EpicCollector::new(
		Arc::new(tracker),
		BatchEmitter::new(Arc::clone(&sink) as Arc<dyn MetricsSink>),
		vec![pj1],
		SP_FIELD,
	);
	collector.run().await;

	// empty batch: the sink is never touched
	assert!(pushed_batches(&sink).is_empty());
}

#[tokio::test]
async fn done_epics_are_skipped() {
	let pj1 = project("PJ1");
	let mut tracker = ScriptedTracker::default();
	tracker.searches.insert(
		jql::epic_query(std::slice::from_ref(&pj1)),
		vec![epic("PJ1-1", "Shipped already", "done", &["Q1-20"])],
	);

	let sink = Arc::new(RecordingSink::default());
	let collector = EpicCollector::new(
		Arc::new(tracker),
		BatchEmitter::new(Arc::clone(&sink) as Arc<dyn MetricsSink>),
		vec![pj1],
		SP_FIELD,
	);
	collector.run().await;

	assert!(pushed_batches(&sink).is_empty());
}

#[tokio::test]
async fn epic_global_label_defaults_to_none() {
	let pj1 = project("PJ1");
	let mut tracker = ScriptedTracker::default();
	tracker.searches.insert(
		jql::epic_query(std::slice::from_ref(&pj1)),
		vec![epic("PJ1-1", "Unassigned", "new", &["Q4-21"])],
	);
	tracker
		.searches
		.insert(jql::epic_issues_query("PJ1-1"), vec![]);

	let sink = Arc::new(RecordingSink::default());
	let collector = EpicCollector::new(
		Arc::new(tracker),
		BatchEmitter::new(Arc::clone(&sink) as Arc<dyn MetricsSink>),
		vec![pj1],
		SP_FIELD,
	);
	collector.run().await;

	let batches = pushed_batches(&sink);
	assert_eq!(batches.len(), 1);
	for point in batches[0].points() {
		assert_eq!(point.label("global"), Some("None"));
	}
}

#[tokio::test]
async fn failing_project_does_not_abort_the_others() {
	let bad = project("BAD");
	let pj1 = project("PJ1");
	let mut tracker = ScriptedTracker::default();
	tracker
		.failing_queries
		.insert("project = \"BAD\"".to_string());
	tracker.searches.insert(
		jql::epic_query(std::slice::from_ref(&pj1)),
		vec![epic("PJ1-1", "Still collected", "new", &["Q1-20"])],
	);
	tracker.searches.insert(
		jql::epic_issues_query("PJ1-1"),
		vec![story("PJ1-2", 2.0, "new")],
	);

	let sink = Arc::new(RecordingSink::default());
	let collector = EpicCollector::new(
		Arc::new(tracker),
		BatchEmitter::new(Arc::clone(&sink) as Arc<dyn MetricsSink>),
		vec![bad, pj1],
		SP_FIELD,
	);
	collector.run().await;

	let batches = pushed_batches(&sink);
	assert_eq!(batches.len(), 1);
	assert_eq!(batches[0].len(), 5);
	assert_eq!(batches[0].points()[0].label("project"), Some("PJ1"));
}

fn sprint_window() -> (DateTime<Utc>, DateTime<Utc>) {
	(
		Utc.with_ymd_and_hms(2020, 3, 2, 9, 0, 0).unwrap(),
		Utc.with_ymd_and_hms(2020, 3, 13, 17, 0, 0).unwrap(),
	)
}

fn sprint_collector(
	tracker: ScriptedTracker,
	sink: &Arc<RecordingSink>,
	projects: Vec<Project>,
) -> SprintCollector {
	SprintCollector::new(
		Arc::new(tracker),
		BatchEmitter::new(Arc::clone(sink) as Arc<dyn MetricsSink>),
		projects,
		SP_FIELD,
		IMPEDIMENT_FIELD,
		vec!["Resolved".to_string(), "Closed".to_string()],
	)
}

#[tokio::test]
async fn sprint_series_are_duplicated_across_current_and_name() {
	let pj1 = project("PJ1");
	let (start, end) = sprint_window();
	let mut tracker = ScriptedTracker::default();
	tracker
		.sprints
		.insert(7, vec![sprint(37, "Sprint 12", Some((start, end)))]);
	tracker.sprint_issues.insert(
		37,
		vec![story("PJ1-2", 5.0, "done"), story("PJ1-3", 3.0, "new")],
	);
	tracker.searches.insert(
		jql::sprint_impediments_query(
			&pj1,
			&["Resolved".to_string(), "Closed".to_string()],
			start.date_naive(),
			end.date_naive(),
		),
		vec![impediment(
			"PJ1-9",
			"blocked",
			3600,
			"2020-03-05T10:00:00.000Z",
		)],
	);

	let sink = Arc::new(RecordingSink::default());
	sprint_collector(tracker, &sink, vec![pj1]).run().await;

	let batches = pushed_batches(&sink);
	assert_eq!(batches.len(), 1);
	let batch = &batches[0];

	let totals = points_with_class(batch, "boardpulse.jira.sprint.storypoint.total");
	let mut tags: Vec<&str> = totals
		.iter()
		.filter_map(|point| point.label("sprint"))
		.collect();
	tags.sort_unstable();
	assert_eq!(tags, vec!["Sprint 12", "current"]);
	for point in &totals {
		assert_eq!(point.datapoints[0].value, MetricValue::Double(8.0));
	}

	let events = points_with_class(batch, "boardpulse.jira.sprint.events");
	assert_eq!(events.len(), 2);
	for point in &events {
		assert_eq!(point.datapoints.len(), 2);
		assert_eq!(point.datapoints[0].timestamp, start);
		assert_eq!(point.datapoints[0].value, MetricValue::Text("start".into()));
		assert_eq!(point.datapoints[1].timestamp, end);
		assert_eq!(point.datapoints[1].value, MetricValue::Text("end".into()));
	}

	let counts = points_with_class(batch, "boardpulse.jira.impediment.total.count");
	assert_eq!(counts.len(), 2);
	for point in &counts {
		assert_eq!(point.label("type"), Some("sprint"));
		assert_eq!(point.datapoints[0].value, MetricValue::Long(1));
	}

	let blocked = points_with_class(batch, "boardpulse.jira.impediment.blocked.timespent");
	assert_eq!(blocked.len(), 2);
	for point in &blocked {
		assert_eq!(point.datapoints[0].value, MetricValue::Long(3600));
	}
}

#[tokio::test]
async fn sprint_without_dates_skips_events_and_impediments() {
	let pj1 = project("PJ1");
	let mut tracker = ScriptedTracker::default();
	tracker
		.sprints
		.insert(7, vec![sprint(37, "Sprint 12", None)]);
	tracker
		.sprint_issues
		.insert(37, vec![story("PJ1-2", 5.0, "done")]);

	let sink = Arc::new(RecordingSink::default());
	sprint_collector(tracker, &sink, vec![pj1]).run().await;

	let batches = pushed_batches(&sink);
	assert_eq!(batches.len(), 1);
	let batch = &batches[0];

	// story points survive, boundary and impediment series do not
	assert_eq!(
		points_with_class(batch, "boardpulse.jira.sprint.storypoint.total").len(),
		2
	);
	assert!(points_with_class(batch, "boardpulse.jira.sprint.events").is_empty());
	assert!(points_with_class(batch, "boardpulse.jira.impediment.total.count").is_empty());
}

#[tokio::test]
async fn daily_impediments_become_one_datapoint_per_issue() {
	let pj1 = project("PJ1");
	let (start, end) = sprint_window();
	let mut tracker = ScriptedTracker::default();
	tracker
		.sprints
		.insert(7, vec![sprint(37, "Sprint 12", Some((start, end)))]);
	tracker.searches.insert(
		jql::daily_impediments_query(&pj1, &["Resolved".to_string(), "Closed".to_string()]),
		vec![
			impediment("PJ1-9", "blocked", 3600, "2020-03-05T10:00:00.000Z"),
			impediment("PJ1-10", "late delivery", 600, "2020-03-06T11:00:00.000Z"),
		],
	);

	let sink = Arc::new(RecordingSink::default());
	sprint_collector(tracker, &sink, vec![pj1]).run().await;

	let batches = pushed_batches(&sink);
	assert_eq!(batches.len(), 1);

	let created = points_with_class(&batches[0], "boardpulse.jira.impediment.total.created");
	assert_eq!(created.len(), 1);
	let point = created[0];
	assert_eq!(point.label("type"), Some("daily"));
	assert_eq!(point.label("value"), Some("timespent"));
	assert_eq!(point.datapoints.len(), 2);
	assert_eq!(point.datapoints[0].value, MetricValue::Long(3600));
	assert_eq!(point.datapoints[1].value, MetricValue::Long(600));
}

#[tokio::test]
async fn no_daily_impediments_means_no_daily_series() {
	let pj1 = project("PJ1");
	let mut tracker = ScriptedTracker::default();
	tracker.sprints.insert(7, vec![]);

	let sink = Arc::new(RecordingSink::default());
	sprint_collector(tracker, &sink, vec![pj1]).run().await;

	// nothing collected at all: no sprints, no daily impediments
	assert!(pushed_batches(&sink).is_empty());
}
