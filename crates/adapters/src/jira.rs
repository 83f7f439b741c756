//! Jira query client
//!
//! Thin reqwest wrapper around the Jira search and agile-board APIs.
//! Every operation paginates internally and hands back a fully
//! materialized sequence; retries are a caller concern (there are
//! none — a failed cycle waits for the next tick).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use boardpulse_types::{Issue, Sprint, TrackerClient, TrackerError, TrackerResult};

const PAGE_SIZE: u64 = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Jira REST client with basic authentication
#[derive(Debug, Clone)]
pub struct JiraClient {
	http: Client,
	base_url: String,
	username: String,
	password: String,
}

impl JiraClient {
	pub fn new(url: &str, username: &str, password: &str) -> TrackerResult<Self> {
		let mut headers = HeaderMap::new();
		headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

		let http = Client::builder()
			.default_headers(headers)
			.timeout(REQUEST_TIMEOUT)
			.build()?;

		Ok(Self {
			http,
			base_url: url.trim_end_matches('/').to_string(),
			username: username.to_string(),
			password: password.to_string(),
		})
	}

	async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> TrackerResult<T>
	where
		T: serde::de::DeserializeOwned,
	{
		let url = format!("{}{}", self.base_url, path);
		let response = self
			.http
			.get(&url)
			.basic_auth(&self.username, Some(&self.password))
			.query(query)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let reason = response.text().await.unwrap_or_default();
			return Err(TrackerError::Status {
				status: status.as_u16(),
				reason,
			});
		}

		Ok(response.json::<T>().await?)
	}
}

/// One page of an issue search response
#[derive(Debug, Deserialize)]
struct IssuePage {
	#[serde(rename = "startAt", default)]
	start_at: u64,
	#[serde(default)]
	total: u64,
	#[serde(default)]
	issues: Vec<Issue>,
}

/// One page of a board sprint listing
#[derive(Debug, Deserialize)]
struct SprintPage {
	#[serde(rename = "isLast", default)]
	is_last: bool,
	#[serde(default)]
	values: Vec<Sprint>,
}

#[async_trait]
impl TrackerClient for JiraClient {
	async fn search_issues(&self, jql: &str, fields: &[&str]) -> TrackerResult<Vec<Issue>> {
		let fields = fields.join(",");
		let mut issues: Vec<Issue> = Vec::new();
		let mut start_at: u64 = 0;

		loop {
			let start = start_at.to_string();
			let page_size = PAGE_SIZE.to_string();
			let page: IssuePage = self
				.get_json(
					"/rest/api/2/search",
					&[
						("jql", jql),
						("fields", &fields),
						("startAt", &start),
						("maxResults", &page_size),
					],
				)
				.await?;

			let fetched = page.issues.len() as u64;
			issues.extend(page.issues);
			start_at = page.start_at + fetched;

			if fetched == 0 || start_at >= page.total {
				break;
			}
		}

		debug!(jql, count = issues.len(), "Issue search finished");
		Ok(issues)
	}

	async fn active_sprints(&self, board: u64) -> TrackerResult<Vec<Sprint>> {
		let path = format!("/rest/agile/1.0/board/{}/sprint", board);
		let mut sprints: Vec<Sprint> = Vec::new();
		let mut start_at: u64 = 0;

		loop {
			let start = start_at.to_string();
			let page: SprintPage = self
				.get_json(&path, &[("state", "active"), ("startAt", &start)])
				.await?;

			let fetched = page.values.len() as u64;
			sprints.extend(page.values);
			start_at += fetched;

			if page.is_last || fetched == 0 {
				break;
			}
		}

		debug!(board, count = sprints.len(), "Active sprint listing finished");
		Ok(sprints)
	}

	async fn sprint_issues(&self, sprint: u64, jql: Option<&str>) -> TrackerResult<Vec<Issue>> {
		let path = format!("/rest/agile/1.0/sprint/{}/issue", sprint);
		let mut issues: Vec<Issue> = Vec::new();
		let mut start_at: u64 = 0;

		loop {
			let start = start_at.to_string();
			let page_size = PAGE_SIZE.to_string();
			let mut query = vec![("startAt", start.as_str()), ("maxResults", &page_size)];
			if let Some(jql) = jql {
				query.push(("jql", jql));
			}

			let page: IssuePage = self.get_json(&path, &query).await?;

			let fetched = page.issues.len() as u64;
			issues.extend(page.issues);
			start_at = page.start_at + fetched;

			if fetched == 0 || start_at >= page.total {
				break;
			}
		}

		debug!(sprint, count = issues.len(), "Sprint issue fetch finished");
		Ok(issues)
	}
}
