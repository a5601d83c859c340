use reqwest::Url;
use std::sync::Arc;

use crate::action::{ActionHandler, ActionOutcome};
use crate::dom::Document;
use crate::endpoints::GenerateRoadmap;
use crate::error::{PageError, Result};
use crate::html;
use crate::models::{Roadmap, RoadmapItem, RoadmapRequest};
use crate::phases::PhaseSet;
use crate::session::SessionStamp;
use crate::transport::Transport;

pub const ROADMAP: &str = "roadmap";
pub const CAREER_INPUT: &str = "careerPath";
pub const SKILL_INPUT: &str = "skillLevel";

const PHASES: &[&str] = &["step-career", "step-skill", "step-roadmap"];

/// Relative link to the resources page for `topic`, percent-encoded.
pub fn resources_link(topic: &str) -> String {
    // any absolute base works; only path and query are kept
    match Url::parse("http://localhost/resources") {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("topic", topic);
            format!("{}?{}", url.path(), url.query().unwrap_or_default())
        }
        Err(_) => "/resources".to_string(),
    }
}

/// Selections and the generated roadmap for one onboarding view
#[derive(Debug)]
pub struct RoadmapSession {
    stamp: SessionStamp,
    roadmap: Option<Roadmap>,
}

impl Default for RoadmapSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadmapSession {
    pub fn new() -> Self {
        Self {
            stamp: SessionStamp::new("roadmap"),
            roadmap: None,
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.stamp.id()
    }

    pub fn roadmap(&self) -> Option<&Roadmap> {
        self.roadmap.as_ref()
    }

    pub fn item(&self, index: usize) -> Option<&RoadmapItem> {
        self.roadmap.as_ref().and_then(|r| r.items().get(index))
    }

    /// End the session; the disposal is logged.
    pub fn dispose(self) {}
}

pub struct OnboardingPage {
    document: Document,
    handler: ActionHandler<GenerateRoadmap>,
    phases: PhaseSet,
    session: RoadmapSession,
}

impl OnboardingPage {
    pub fn new(transport: Arc<dyn Transport>, document: Document) -> Self {
        Self {
            handler: ActionHandler::new(transport, document.clone()),
            phases: PhaseSet::new(document.clone(), PHASES),
            document,
            session: RoadmapSession::new(),
        }
    }

    pub fn session(&self) -> &RoadmapSession {
        &self.session
    }

    pub fn phase(&self) -> Option<&str> {
        self.phases.current()
    }

    pub fn choose_career(&mut self, career: &str) {
        self.document.set_input(CAREER_INPUT, career);
        self.phases.advance();
    }

    pub fn choose_skill_level(&mut self, level: &str) {
        self.document.set_input(SKILL_INPUT, level);
        self.phases.advance();
    }

    pub async fn generate_roadmap(&mut self) -> ActionOutcome<Roadmap> {
        let build = |doc: &Document| -> Result<RoadmapRequest> {
            Ok(RoadmapRequest {
                career_path: doc.required_input(CAREER_INPUT)?,
                skill_level: doc.required_input(SKILL_INPUT)?,
            })
        };
        let outcome = self.handler.trigger(ROADMAP, build, render_roadmap).await;
        if let ActionOutcome::Rendered(roadmap) = &outcome {
            tracing::info!("Roadmap ready with {} entries", roadmap.len());
            self.session.roadmap = Some(roadmap.clone());
        }
        outcome
    }

    /// Follow the "view resources" action of card `index`.
    pub fn view_resources(&self, index: usize) -> Result<String> {
        let item = self
            .session
            .item(index)
            .ok_or_else(|| PageError::InvalidState(format!("No roadmap card at {index}")))?;
        let link = resources_link(&item.topics);
        self.document.navigate(link.clone());
        Ok(link)
    }

    /// Leave the page, typically after navigating; the disposal is logged.
    pub fn dispose(self) {
        self.session.dispose();
    }
}

fn render_card(item: &RoadmapItem) -> String {
    format!(
        r#"<div class="week-card"><h3>{}</h3><p>{}</p><a class="view-resources" href="{}">View resources</a></div>"#,
        html::escape(&item.week),
        html::escape(&item.topics),
        html::escape(&resources_link(&item.topics))
    )
}

fn render_roadmap(roadmap: &Roadmap) -> String {
    roadmap.items().iter().map(render_card).collect()
}
