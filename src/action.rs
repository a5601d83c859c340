//! The request/render cycle shared by every page.
//!
//! A trigger builds its payload from the document, puts the render target
//! into its loading state before the request is sent, and renders either the
//! endpoint's response or its fixed failure message into the same target.

use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dom::Document;
use crate::endpoints::Endpoint;
use crate::error::{PageError, Result};
use crate::html;

pub const LOADING_HTML: &str = r#"<p class="loading">Loading...</p>"#;

/// How responses to overlapping triggers are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fencing {
    /// Responses to anything but the newest issued request are discarded.
    #[default]
    LatestIssued,
    /// Every response renders; whichever resolves last stays visible.
    LastWriteWins,
}

/// Monotonic request tokens for one handler
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}

#[derive(Debug)]
pub enum ActionOutcome<T> {
    /// The payload failed validation; nothing was sent.
    Skipped(PageError),
    Rendered(T),
    Failed(PageError),
    /// A newer request was issued before this one resolved.
    Superseded,
}

impl<T> ActionOutcome<T> {
    pub fn rendered(self) -> Option<T> {
        match self {
            ActionOutcome::Rendered(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, ActionOutcome::Rendered(_))
    }
}

pub struct ActionHandler<E: Endpoint> {
    transport: Arc<dyn crate::transport::Transport>,
    document: Document,
    sequencer: RequestSequencer,
    fencing: Fencing,
    loading_html: String,
    _endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> ActionHandler<E> {
    pub fn new(transport: Arc<dyn crate::transport::Transport>, document: Document) -> Self {
        Self {
            transport,
            document,
            sequencer: RequestSequencer::default(),
            fencing: Fencing::default(),
            loading_html: LOADING_HTML.to_string(),
            _endpoint: PhantomData,
        }
    }

    pub fn with_fencing(mut self, fencing: Fencing) -> Self {
        self.fencing = fencing;
        self
    }

    pub fn with_loading_html(mut self, markup: impl Into<String>) -> Self {
        self.loading_html = markup.into();
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Run one round trip against `target`.
    pub async fn trigger<B, R>(&self, target: &str, build: B, render: R) -> ActionOutcome<E::Response>
    where
        B: FnOnce(&Document) -> Result<E::Request>,
        R: FnOnce(&E::Response) -> String,
    {
        let request = match build(&self.document) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(endpoint = E::PATH, "Action skipped: {}", e);
                return ActionOutcome::Skipped(e);
            }
        };

        let body = match serde_json::to_value(&request) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(e) => {
                return self.fail(target, PageError::Internal(format!("Failed to encode request: {e}")));
            }
        };

        let token = self.sequencer.issue();
        self.document.replace_html(target, self.loading_html.clone());

        let result = self
            .transport
            .post_json(E::PATH, body)
            .await
            .and_then(E::extract)
            .and_then(|response| {
                if E::is_renderable(&response) {
                    Ok(response)
                } else {
                    Err(PageError::Contract(format!(
                        "Field `{}` has nothing to render",
                        E::FIELD
                    )))
                }
            });

        if self.fencing == Fencing::LatestIssued && !self.sequencer.is_current(token) {
            tracing::debug!(endpoint = E::PATH, token, "Discarding superseded response");
            return ActionOutcome::Superseded;
        }

        match result {
            Ok(response) => {
                self.document.replace_html(target, render(&response));
                tracing::info!(endpoint = E::PATH, region = target, "Rendered response");
                ActionOutcome::Rendered(response)
            }
            Err(e) => self.fail(target, e),
        }
    }

    fn fail(&self, target: &str, error: PageError) -> ActionOutcome<E::Response> {
        tracing::warn!(
            endpoint = E::PATH,
            kind = %error.kind(),
            error = %error,
            "Action failed"
        );
        self.document
            .replace_html(target, html::paragraph("error", E::FAILURE_MESSAGE));
        ActionOutcome::Failed(error)
    }
}
