use reqwest::Url;
use std::sync::Arc;

use crate::action::{ActionHandler, ActionOutcome};
use crate::charts;
use crate::dom::Document;
use crate::endpoints::{ResourceSearch, SaveResourceProgress};
use crate::error::{PageError, Result};
use crate::html;
use crate::models::{ResourceProgressRequest, ResourceSearchRequest};
use crate::phases::PhaseSet;
use crate::transport::Transport;

pub const HEADING: &str = "topic-heading";
pub const AI_RESOURCES: &str = "ai-resources";
pub const PROGRESS_STATUS: &str = "progress-status";

const PHASES: &[&str] = &["resources-section", "analysis-section"];

/// Topic carried by a `/resources?topic=...` location.
pub fn topic_from_location(location: &str) -> Option<String> {
    let url = Url::parse(location)
        .or_else(|_| Url::parse("http://localhost/")?.join(location))
        .ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "topic")
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct ResourcesPage {
    document: Document,
    search: ActionHandler<ResourceSearch>,
    progress: ActionHandler<SaveResourceProgress>,
    phases: PhaseSet,
}

impl ResourcesPage {
    /// Open the page at `location`; the topic is written into the heading.
    pub fn open(transport: Arc<dyn Transport>, document: Document, location: &str) -> Result<Self> {
        let topic = topic_from_location(location)
            .ok_or_else(|| PageError::validation(format!("No topic in '{location}'")))?;
        document.navigate(location);
        document.replace_html(HEADING, html::escape(&topic));
        tracing::info!("Opened resources page for topic '{}'", topic);

        Ok(Self {
            search: ActionHandler::new(transport.clone(), document.clone()),
            progress: ActionHandler::new(transport, document.clone()),
            phases: PhaseSet::new(document.clone(), PHASES),
            document,
        })
    }

    /// Topic as shown in the page heading.
    pub fn topic(&self) -> Result<String> {
        self.document
            .html(HEADING)
            .map(|markup| html::unescape(&markup))
            .filter(|topic| !topic.trim().is_empty())
            .ok_or_else(|| PageError::validation("page heading has no topic"))
    }

    /// Ask the backend for resources on `query`; the returned markup is
    /// rendered as produced by the server.
    pub async fn search(&self, query: &str) -> ActionOutcome<String> {
        let query = query.trim().to_string();
        let build = move |_: &Document| -> Result<ResourceSearchRequest> {
            if query.is_empty() {
                return Err(PageError::validation("search query is empty"));
            }
            Ok(ResourceSearchRequest { query })
        };
        self.search
            .trigger(AI_RESOURCES, build, |markup| markup.clone())
            .await
    }

    /// Persist progress for a resource, clamped to 0..=100.
    pub async fn save_progress(&self, resource_id: &str, progress: i64) -> ActionOutcome<bool> {
        let resource_id = resource_id.trim().to_string();
        let progress = progress.clamp(0, 100) as u8;
        let build = move |_: &Document| -> Result<ResourceProgressRequest> {
            if resource_id.is_empty() {
                return Err(PageError::validation("resource id is empty"));
            }
            Ok(ResourceProgressRequest {
                resource_id,
                progress,
            })
        };
        self.progress
            .trigger(PROGRESS_STATUS, build, move |_| {
                html::paragraph("saved", &format!("Progress saved: {progress}%"))
            })
            .await
    }

    /// Switch to the analysis section and draw its charts.
    pub fn show_analysis(&mut self) -> Result<usize> {
        self.phases.show("analysis-section")?;
        charts::draw_all(&self.document, charts::resources_analysis_charts())
    }
}
