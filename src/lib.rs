pub mod action;
pub mod charts;
pub mod config;
pub mod dom;
pub mod endpoints;
pub mod error;
pub mod html;
pub mod models;
pub mod pages;
pub mod phases;
pub mod quiz;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::config::Config;
use crate::dom::Document;
use crate::error::Result;
use crate::pages::{
    ChatPage, InterviewPage, OnboardingPage, QuizPage, ResourcesPage, SkillsPage,
};
use crate::transport::{HttpTransport, Transport};

/// Builds page controllers that share one backend transport
pub struct PageApp {
    transport: Arc<dyn Transport>,
    config: Config,
}

impl PageApp {
    pub fn new(cfg: &Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(
            &cfg.backend.base_url,
            cfg.request_timeout(),
        )?);
        Ok(Self::with_transport(transport, cfg.clone()))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: Config) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn quiz(&self, document: Document) -> QuizPage {
        QuizPage::new(
            Arc::clone(&self.transport),
            document,
            self.config.quiz.reward_per_correct,
        )
    }

    pub fn chat(&self, document: Document) -> ChatPage {
        ChatPage::new(Arc::clone(&self.transport), document)
    }

    pub fn interview(&self, document: Document) -> InterviewPage {
        InterviewPage::new(Arc::clone(&self.transport), document)
    }

    pub fn onboarding(&self, document: Document) -> OnboardingPage {
        OnboardingPage::new(Arc::clone(&self.transport), document)
    }

    pub fn resources(&self, document: Document, location: &str) -> Result<ResourcesPage> {
        ResourcesPage::open(Arc::clone(&self.transport), document, location)
    }

    pub fn skills(&self, document: Document) -> SkillsPage {
        SkillsPage::new(document)
    }
}
