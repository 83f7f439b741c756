//! Epic collection cycle

use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

use boardpulse_adapters::jql;
use boardpulse_types::{
	Batch, Issue, MetricPoint, Project, StatusCategory, TrackerClient, TrackerResult,
};

use crate::aggregate::story_point_totals;
use crate::emitter::BatchEmitter;
use crate::scheduler::Cycle;

const GLOBAL_LABEL_PREFIX: &str = "Project_";
const DEFAULT_GLOBAL: &str = "None";

const EPIC_FIELDS: &[&str] = &["summary", "labels", "status"];

lazy_static! {
	// Labels carrying a quarter assignment, e.g. `Q3-20`
	static ref QUARTER_LABEL: Regex = Regex::new(r"^Q[1-4]-\d{2}$").unwrap();
}

/// Collects per-quarter story-point progress for every open epic.
///
/// An epic carrying several quarter labels is reported once per
/// quarter, as distinct series; an epic carrying none is silent.
pub struct EpicCollector {
	tracker: Arc<dyn TrackerClient>,
	emitter: BatchEmitter,
	projects: Vec<Project>,
	story_point_field: String,
}

impl EpicCollector {
	pub fn new(
		tracker: Arc<dyn TrackerClient>,
		emitter: BatchEmitter,
		projects: Vec<Project>,
		story_point_field: impl Into<String>,
	) -> Self {
		Self {
			tracker,
			emitter,
			projects,
			story_point_field: story_point_field.into(),
		}
	}

	async fn collect_project(&self, project: &Project, batch: &mut Batch) -> TrackerResult<()> {
		let query = jql::epic_query(std::slice::from_ref(project));
		let epics = self.tracker.search_issues(&query, EPIC_FIELDS).await?;
		debug!(project = %project.label, count = epics.len(), "Fetched epics");

		for epic in &epics {
			if epic.status_category() == StatusCategory::Done {
				continue;
			}

			let global = epic
				.fields
				.labels
				.iter()
				.find_map(|label| label.strip_prefix(GLOBAL_LABEL_PREFIX))
				.unwrap_or(DEFAULT_GLOBAL);

			for quarter in epic
				.fields
				.labels
				.iter()
				.filter(|label| QUARTER_LABEL.is_match(label))
			{
				self.collect_epic(project, epic, quarter, global, batch)
					.await?;
			}
		}

		Ok(())
	}

	async fn collect_epic(
		&self,
		project: &Project,
		epic: &Issue,
		quarter: &str,
		global: &str,
		batch: &mut Batch,
	) -> TrackerResult<()> {
		let fields = ["labels", "status", self.story_point_field.as_str()];
		let issues = self
			.tracker
			.search_issues(&jql::epic_issues_query(&epic.key), &fields)
			.await?;

		let totals = story_point_totals(&issues, &self.story_point_field);
		let summary = epic.fields.summary.as_deref().unwrap_or("");
		let now = Utc::now();

		let series = [
			("boardpulse.jira.epic.storypoint", totals.total()),
			(
				"boardpulse.jira.epic.unestimated",
				f64::from(totals.unestimated),
			),
			(
				"boardpulse.jira.epic.dependency",
				f64::from(totals.dependencies),
			),
			(
				"boardpulse.jira.epic.storypoint.inprogress",
				totals.bucket(StatusCategory::Indeterminate.as_str()),
			),
			(
				"boardpulse.jira.epic.storypoint.done",
				totals.bucket(StatusCategory::Done.as_str()),
			),
		];

		for (class, value) in series {
			batch.register(
				MetricPoint::new(class)
					.with_label("project", &project.label)
					.with_label("key", &epic.key)
					.with_label("summary", summary)
					.with_label("quarter", quarter)
					.with_label("global", global)
					.datapoint(now, value),
			);
		}

		Ok(())
	}
}

#[async_trait]
impl Cycle for EpicCollector {
	fn name(&self) -> &'static str {
		"epic"
	}

	async fn run(&self) {
		let mut batch = Batch::new();

		for project in &self.projects {
			if let Err(error) = self.collect_project(project, &mut batch).await {
				warn!(project = %project.label, %error, "Epic collection failed");
			}
		}

		self.emitter.emit(batch).await;
	}
}
