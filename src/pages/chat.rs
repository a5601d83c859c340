use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::action::{ActionHandler, ActionOutcome, Fencing};
use crate::dom::Document;
use crate::endpoints::Chat;
use crate::error::Result;
use crate::html;
use crate::models::ChatRequest;
use crate::session::SessionStamp;
use crate::transport::Transport;

pub const TRANSCRIPT: &str = "chat-messages";
pub const PROMPT_INPUT: &str = "chat-input";

const TYPING_HTML: &str = r#"<p class="typing">Typing...</p>"#;

/// Transcript bookkeeping for one chat view
#[derive(Debug)]
pub struct ChatSession {
    stamp: SessionStamp,
    next_bubble: AtomicU64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            stamp: SessionStamp::new("chat"),
            next_bubble: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.stamp.id()
    }

    fn bubble_id(&self) -> String {
        format!("bubble-{}", self.next_bubble.fetch_add(1, Ordering::SeqCst))
    }

    /// Bubbles created so far, user and bot alike.
    pub fn bubbles_created(&self) -> u64 {
        self.next_bubble.load(Ordering::SeqCst)
    }

    /// End the session; the disposal is logged.
    pub fn dispose(self) {}
}

/// Chat widget; every exchange appends a user bubble and a bot bubble.
pub struct ChatPage {
    document: Document,
    handler: ActionHandler<Chat>,
    session: ChatSession,
}

impl ChatPage {
    pub fn new(transport: Arc<dyn Transport>, document: Document) -> Self {
        Self {
            // each reply lands in its own bubble, so overlapping sends never
            // compete for a target
            handler: ActionHandler::new(transport, document.clone())
                .with_fencing(Fencing::LastWriteWins)
                .with_loading_html(TYPING_HTML),
            document,
            session: ChatSession::new(),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Send the prompt input. Blank prompts are ignored.
    pub async fn send(&self) -> ActionOutcome<String> {
        let prompt = match self.document.required_input(PROMPT_INPUT) {
            Ok(prompt) => prompt,
            Err(e) => return ActionOutcome::Skipped(e),
        };
        self.document.set_input(PROMPT_INPUT, "");
        self.document
            .append_region(TRANSCRIPT, &self.session.bubble_id(), "message user", html::escape(&prompt));

        let bot = self.session.bubble_id();
        self.document
            .append_region(TRANSCRIPT, &bot, "message bot", String::new());

        let build = move |_: &Document| -> Result<ChatRequest> { Ok(ChatRequest { prompt }) };
        self.handler
            .trigger(&bot, build, |reply| html::escape(reply))
            .await
    }

    pub fn message_count(&self) -> usize {
        self.document.children(TRANSCRIPT).len()
    }

    /// Leave the page; the session disposal is logged.
    pub fn dispose(self) {
        self.session.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::Endpoint;
    use crate::error::PageError;
    use crate::test_support::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_send_appends_both_bubbles() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .respond("/api/chat", Ok(json!({"reply": "Start with <Python>."})))
                .respond("/api/chat", Ok(json!({"reply": "Then SQL."}))),
        );
        let doc = Document::new();
        let chat = ChatPage::new(transport.clone(), doc.clone());

        doc.set_input(PROMPT_INPUT, "Where do I start?");
        assert!(chat.send().await.is_rendered());
        doc.set_input(PROMPT_INPUT, "And next?");
        assert!(chat.send().await.is_rendered());

        assert_eq!(chat.message_count(), 4);
        assert_eq!(chat.session().bubbles_created(), 4);
        assert_eq!(doc.input(PROMPT_INPUT).as_deref(), Some(""));
        let transcript = doc.render(TRANSCRIPT);
        assert!(transcript.contains(r#"class="message user">Where do I start?</div>"#));
        assert!(transcript.contains("Start with &lt;Python&gt;."));
        assert!(transcript.find("Start with").unwrap() < transcript.find("Then SQL.").unwrap());
        assert_eq!(
            transport.calls_to("/api/chat")[0],
            Some(json!({"prompt": "Where do I start?"}))
        );
    }

    #[tokio::test]
    async fn test_blank_prompt_is_ignored() {
        let transport = Arc::new(ScriptedTransport::default());
        let doc = Document::new();
        let chat = ChatPage::new(transport.clone(), doc.clone());

        doc.set_input(PROMPT_INPUT, "   ");
        assert!(matches!(chat.send().await, ActionOutcome::Skipped(_)));
        assert_eq!(chat.message_count(), 0);
        assert_eq!(chat.session().bubbles_created(), 0);
        assert!(transport.calls().is_empty());
        chat.dispose();
    }

    #[tokio::test]
    async fn test_failed_reply_shows_message_in_bubble() {
        let transport = Arc::new(ScriptedTransport::default().respond(
            "/api/chat",
            Err(PageError::Transport("connection refused".to_string())),
        ));
        let doc = Document::new();
        let chat = ChatPage::new(transport, doc.clone());

        doc.set_input(PROMPT_INPUT, "hello");
        assert!(matches!(chat.send().await, ActionOutcome::Failed(_)));
        let bot = doc.children(TRANSCRIPT).pop().unwrap();
        assert!(doc.html(&bot).unwrap().contains(Chat::FAILURE_MESSAGE));
    }
}
