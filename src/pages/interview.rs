use std::sync::Arc;

use crate::action::{ActionHandler, ActionOutcome};
use crate::dom::Document;
use crate::endpoints::{InterviewFeedback, InterviewQuestionFetch, InterviewQuestionSet};
use crate::error::{PageError, Result};
use crate::html;
use crate::models::{Feedback, FeedbackRequest, InterviewQuestion};
use crate::session::SessionStamp;
use crate::transport::Transport;

pub const QUESTION: &str = "question-text";
pub const PROGRESS: &str = "question-progress";
pub const FEEDBACK: &str = "feedback";
pub const ANSWER_INPUT: &str = "answer";

/// Interview state for one page view
#[derive(Debug)]
pub struct InterviewSession {
    stamp: SessionStamp,
    current: Option<String>,
    set: Vec<InterviewQuestion>,
    position: usize,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            stamp: SessionStamp::new("interview"),
            current: None,
            set: Vec::new(),
            position: 0,
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.stamp.id()
    }

    /// Practice a single question; leaves any mock interview.
    fn ask(&mut self, question: String) {
        self.current = Some(question);
        self.set.clear();
        self.position = 0;
    }

    /// Start walking `set` from its first question.
    fn start_set(&mut self, set: Vec<InterviewQuestion>) {
        self.current = set.first().map(|q| q.question.clone());
        self.set = set;
        self.position = 0;
    }

    pub fn current_question(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn in_mock_interview(&self) -> bool {
        !self.set.is_empty()
    }

    pub fn position(&self) -> Option<(usize, usize)> {
        self.in_mock_interview()
            .then(|| (self.position + 1, self.set.len()))
    }

    /// End the session; the disposal is logged.
    pub fn dispose(self) {}
}

pub struct InterviewPage {
    document: Document,
    question: ActionHandler<InterviewQuestionFetch>,
    question_set: ActionHandler<InterviewQuestionSet>,
    feedback: ActionHandler<InterviewFeedback>,
    session: InterviewSession,
}

impl InterviewPage {
    pub fn new(transport: Arc<dyn Transport>, document: Document) -> Self {
        Self {
            question: ActionHandler::new(transport.clone(), document.clone()),
            question_set: ActionHandler::new(transport.clone(), document.clone()),
            feedback: ActionHandler::new(transport, document.clone()),
            document,
            session: InterviewSession::new(),
        }
    }

    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    fn reset_answer(&self) {
        self.document.set_input(ANSWER_INPUT, "");
        self.document.replace_html(FEEDBACK, "");
    }

    /// Fetch a single practice question.
    pub async fn next_question(&mut self) -> ActionOutcome<String> {
        let outcome = self
            .question
            .trigger(QUESTION, |_| Ok(()), |q| html::escape(q))
            .await;
        if let ActionOutcome::Rendered(question) = &outcome {
            self.session.ask(question.clone());
            self.document.replace_html(PROGRESS, "");
            self.reset_answer();
        }
        outcome
    }

    /// Fetch a full mock interview and show its first question.
    pub async fn start_mock_interview(&mut self) -> ActionOutcome<Vec<InterviewQuestion>> {
        let outcome = self
            .question_set
            .trigger(QUESTION, |_| Ok(()), |set| render_question(&set[0]))
            .await;
        if let ActionOutcome::Rendered(set) = &outcome {
            self.session.start_set(set.clone());
            self.render_progress();
            self.reset_answer();
        }
        outcome
    }

    /// Step to the next question of the mock interview. Returns false on the last one.
    pub fn advance(&mut self) -> Result<bool> {
        if !self.session.in_mock_interview() {
            return Err(PageError::InvalidState(
                "no mock interview in progress".to_string(),
            ));
        }
        if self.session.position + 1 >= self.session.set.len() {
            return Ok(false);
        }
        self.session.position += 1;
        let next = &self.session.set[self.session.position];
        self.session.current = Some(next.question.clone());
        self.document.replace_html(QUESTION, render_question(next));
        self.render_progress();
        self.reset_answer();
        Ok(true)
    }

    fn render_progress(&self) {
        if let Some((at, of)) = self.session.position() {
            self.document
                .replace_html(PROGRESS, format!("Question {at} of {of}"));
        }
    }

    /// Send the current question and the typed answer for feedback.
    pub async fn submit_answer(&self) -> ActionOutcome<Feedback> {
        let current = self.session.current.clone();
        let build = move |doc: &Document| -> Result<FeedbackRequest> {
            let question = current
                .ok_or_else(|| PageError::validation("no question has been asked"))?;
            Ok(FeedbackRequest {
                question,
                answer: doc.required_input(ANSWER_INPUT)?,
            })
        };
        self.feedback.trigger(FEEDBACK, build, render_feedback).await
    }

    /// Leave the page; the session disposal is logged.
    pub fn dispose(self) {
        self.session.dispose();
    }
}

fn render_question(q: &InterviewQuestion) -> String {
    format!(
        r#"<span class="question-type">{}</span><p>{}</p>"#,
        html::escape(&q.kind),
        html::escape(&q.question)
    )
}

fn render_feedback(feedback: &Feedback) -> String {
    let mut out = html::paragraph("feedback-text", &feedback.feedback);
    if let Some(score) = feedback.score {
        out.push_str(&format!(r#"<p class="feedback-score">Score: {score}/100</p>"#));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::Endpoint;
    use crate::test_support::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_question_then_feedback() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .respond("/get-interview-question", Ok(json!({"question": "Explain lists vs tuples."})))
                .respond(
                    "/get-interview-feedback",
                    Ok(json!({"feedback": "Mention mutability.", "score": 70})),
                ),
        );
        let doc = Document::new();
        let mut page = InterviewPage::new(transport.clone(), doc.clone());

        assert!(page.next_question().await.is_rendered());
        assert_eq!(doc.html(QUESTION).unwrap(), "Explain lists vs tuples.");
        assert_eq!(page.session().current_question(), Some("Explain lists vs tuples."));

        doc.set_input(ANSWER_INPUT, "Tuples are immutable.");
        let feedback = page.submit_answer().await.rendered().unwrap();
        assert_eq!(feedback.score, Some(70));
        let shown = doc.html(FEEDBACK).unwrap();
        assert!(shown.contains("Mention mutability."));
        assert!(shown.contains("Score: 70/100"));
        assert_eq!(
            transport.calls_to("/get-interview-feedback"),
            vec![Some(json!({
                "question": "Explain lists vs tuples.",
                "answer": "Tuples are immutable."
            }))]
        );
    }

    #[tokio::test]
    async fn test_submit_without_question_is_skipped() {
        let transport = Arc::new(ScriptedTransport::default());
        let doc = Document::new();
        let page = InterviewPage::new(transport.clone(), doc.clone());

        doc.set_input(ANSWER_INPUT, "An answer");
        assert!(matches!(page.submit_answer().await, ActionOutcome::Skipped(_)));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_feedback_field_shows_error() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .respond("/get-interview-question", Ok(json!({"question": "What is a deadlock?"})))
                .respond(
                    "/get-interview-feedback",
                    Ok(json!({"error": "Could not generate feedback"})),
                ),
        );
        let doc = Document::new();
        let mut page = InterviewPage::new(transport, doc.clone());
        page.next_question().await;
        doc.set_input(ANSWER_INPUT, "Two threads wait on each other.");

        assert!(matches!(page.submit_answer().await, ActionOutcome::Failed(_)));
        assert!(doc.html(FEEDBACK).unwrap().contains(InterviewFeedback::FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_mock_interview_walks_questions() {
        let transport = Arc::new(ScriptedTransport::default().respond(
            "/get-interview-questions",
            Ok(json!({"questions": [
                {"type": "Technical", "question": "Explain overfitting in ML."},
                {"type": "HR", "question": "Why should we hire you?"}
            ]})),
        ));
        let doc = Document::new();
        let mut page = InterviewPage::new(transport.clone(), doc.clone());

        assert!(page.start_mock_interview().await.is_rendered());
        assert!(doc.html(QUESTION).unwrap().contains("Technical"));
        assert_eq!(doc.html(PROGRESS).unwrap(), "Question 1 of 2");
        assert_eq!(transport.calls_to("/get-interview-questions"), vec![None]);

        assert!(page.advance().unwrap());
        assert_eq!(page.session().current_question(), Some("Why should we hire you?"));
        assert_eq!(doc.html(PROGRESS).unwrap(), "Question 2 of 2");
        assert!(!page.advance().unwrap());
    }

    #[tokio::test]
    async fn test_session_survives_questions() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .respond("/get-interview-question", Ok(json!({"question": "What is REST?"})))
                .respond(
                    "/get-interview-questions",
                    Ok(json!({"questions": [{"question": "Tell me about yourself."}]})),
                )
                .respond("/get-interview-question", Ok(json!({"question": "What is gRPC?"}))),
        );
        let mut page = InterviewPage::new(transport, Document::new());
        let id = page.session().id();

        page.next_question().await;
        page.start_mock_interview().await;
        assert!(page.session().in_mock_interview());
        page.next_question().await;

        assert!(!page.session().in_mock_interview());
        assert_eq!(page.session().current_question(), Some("What is gRPC?"));
        assert_eq!(page.session().id(), id);
        page.dispose();
    }

    #[test]
    fn test_advance_without_mock_interview_fails() {
        let mut page = InterviewPage::new(Arc::new(ScriptedTransport::default()), Document::new());
        assert!(page.advance().is_err());
    }
}
