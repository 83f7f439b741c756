//! Sprint collection cycle

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use boardpulse_adapters::jql;
use boardpulse_types::{
	Batch, MetricPoint, Project, Sprint, StatusCategory, TrackerClient, TrackerResult,
};

use crate::aggregate::{impediment_totals, story_point_totals, TOTAL_BUCKET};
use crate::emitter::BatchEmitter;
use crate::scheduler::Cycle;

/// Every sprint series is written twice: under this literal tag, so
/// dashboards can address "whatever sprint is running now", and under
/// the sprint's own name for the historical record.
const CURRENT_TAG: &str = "current";

const IMPEDIMENT_CLASS: &str = "boardpulse.jira.impediment";

/// Collects story-point progress, boundary events and impediment
/// figures for every active sprint, plus a per-project daily series of
/// freshly closed impediments.
pub struct SprintCollector {
	tracker: Arc<dyn TrackerClient>,
	emitter: BatchEmitter,
	projects: Vec<Project>,
	story_point_field: String,
	impediment_field: String,
	closed_statuses: Vec<String>,
}

impl SprintCollector {
	pub fn new(
		tracker: Arc<dyn TrackerClient>,
		emitter: BatchEmitter,
		projects: Vec<Project>,
		story_point_field: impl Into<String>,
		impediment_field: impl Into<String>,
		closed_statuses: Vec<String>,
	) -> Self {
		Self {
			tracker,
			emitter,
			projects,
			story_point_field: story_point_field.into(),
			impediment_field: impediment_field.into(),
			closed_statuses,
		}
	}

	async fn collect_project(&self, project: &Project, batch: &mut Batch) -> TrackerResult<()> {
		let sprints = self.tracker.active_sprints(project.board).await?;
		debug!(project = %project.label, count = sprints.len(), "Fetched active sprints");

		for sprint in &sprints {
			self.collect_sprint(project, sprint, batch).await?;
		}

		self.collect_daily_impediments(project, batch).await
	}

	async fn collect_sprint(
		&self,
		project: &Project,
		sprint: &Sprint,
		batch: &mut Batch,
	) -> TrackerResult<()> {
		let filter = jql::sprint_issue_filter(project);
		let issues = self
			.tracker
			.sprint_issues(sprint.id, filter.as_deref())
			.await?;

		let totals = story_point_totals(&issues, &self.story_point_field);
		let now = Utc::now();
		let tags = [CURRENT_TAG, sprint.name.as_str()];

		for tag in tags {
			let series = [
				("boardpulse.jira.sprint.storypoint.total", totals.total()),
				(
					"boardpulse.jira.sprint.storypoint.inprogress",
					totals.bucket(StatusCategory::Indeterminate.as_str()),
				),
				(
					"boardpulse.jira.sprint.storypoint.done",
					totals.bucket(StatusCategory::Done.as_str()),
				),
			];
			for (class, value) in series {
				batch.register(sprint_metric(class, project, tag).datapoint(now, value));
			}
		}

		match (sprint.start_date, sprint.end_date) {
			(Some(start), Some(end)) => {
				for tag in tags {
					batch.register(
						sprint_metric("boardpulse.jira.sprint.events", project, tag)
							.datapoint(start, "start")
							.datapoint(end, "end"),
					);
				}
				self.collect_sprint_impediments(project, sprint, start, end, batch)
					.await?;
			},
			_ => {
				warn!(
					project = %project.label,
					sprint = %sprint.name,
					"Sprint has no date window, skipping events and impediments"
				);
			},
		}

		Ok(())
	}

	async fn collect_sprint_impediments(
		&self,
		project: &Project,
		sprint: &Sprint,
		start: DateTime<Utc>,
		end: DateTime<Utc>,
		batch: &mut Batch,
	) -> TrackerResult<()> {
		let query = jql::sprint_impediments_query(
			project,
			&self.closed_statuses,
			start.date_naive(),
			end.date_naive(),
		);
		let fields = ["labels", "timespent", self.impediment_field.as_str()];
		let issues = self.tracker.search_issues(&query, &fields).await?;

		let totals = impediment_totals(&issues, &self.impediment_field);
		let now = Utc::now();

		for tag in [CURRENT_TAG, sprint.name.as_str()] {
			batch.register(
				impediment_metric(&format!("{}.total.count", IMPEDIMENT_CLASS), project, tag)
					.datapoint(now, totals.count(TOTAL_BUCKET)),
			);
			batch.register(
				impediment_metric(
					&format!("{}.total.timespent", IMPEDIMENT_CLASS),
					project,
					tag,
				)
				.datapoint(now, totals.seconds(TOTAL_BUCKET)),
			);

			for kind in totals.kinds() {
				batch.register(
					impediment_metric(
						&format!("{}.{}.count", IMPEDIMENT_CLASS, kind),
						project,
						tag,
					)
					.datapoint(now, totals.count(kind)),
				);
				batch.register(
					impediment_metric(
						&format!("{}.{}.timespent", IMPEDIMENT_CLASS, kind),
						project,
						tag,
					)
					.datapoint(now, totals.seconds(kind)),
				);
			}
		}

		Ok(())
	}

	/// One series per project where every impediment closed in the last
	/// 24 hours becomes a datapoint at its creation time, valued at its
	/// time-spent. Nothing is registered when no impediment qualifies.
	async fn collect_daily_impediments(
		&self,
		project: &Project,
		batch: &mut Batch,
	) -> TrackerResult<()> {
		let query = jql::daily_impediments_query(project, &self.closed_statuses);
		let issues = self
			.tracker
			.search_issues(&query, &["created", "timespent"])
			.await?;

		if issues.is_empty() {
			return Ok(());
		}

		let mut point = MetricPoint::new(format!("{}.total.created", IMPEDIMENT_CLASS))
			.with_label("project", &project.label)
			.with_label("type", "daily")
			.with_label("value", "timespent");

		for issue in &issues {
			match issue.fields.created {
				Some(created) => {
					point.add_datapoint(created, issue.fields.timespent.unwrap_or_default());
				},
				None => warn!(key = %issue.key, "Closed impediment has no creation date"),
			}
		}

		batch.register(point);
		Ok(())
	}
}

fn sprint_metric(class: &str, project: &Project, tag: &str) -> MetricPoint {
	MetricPoint::new(class)
		.with_label("project", &project.label)
		.with_label("sprint", tag)
}

fn impediment_metric(class: &str, project: &Project, tag: &str) -> MetricPoint {
	MetricPoint::new(class)
		.with_label("project", &project.label)
		.with_label("type", "sprint")
		.with_label("sprint", tag)
}

#[async_trait]
impl Cycle for SprintCollector {
	fn name(&self) -> &'static str {
		"sprint"
	}

	async fn run(&self) {
		let mut batch = Batch::new();

		for project in &self.projects {
			if let Err(error) = self.collect_project(project, &mut batch).await {
				warn!(project = %project.label, %error, "Sprint collection failed");
			}
		}

		self.emitter.emit(batch).await;
	}
}
