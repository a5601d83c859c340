use std::sync::Arc;

use crate::action::{ActionHandler, ActionOutcome};
use crate::dom::Document;
use crate::endpoints::{GenerateQuiz, SubmitQuizResult};
use crate::error::{PageError, Result};
use crate::html;
use crate::models::{QuizQuestion, QuizResultRequest, TopicRequest};
use crate::phases::PhaseSet;
use crate::quiz::{QuizSession, SAMPLE_LEADERBOARD, ScoreReport, group_name};
use crate::transport::Transport;

pub const QUESTIONS: &str = "quiz-questions";
pub const RESULT: &str = "quiz-result";
pub const LEADERBOARD: &str = "leaderboard";
pub const SYNC_STATUS: &str = "quiz-sync-status";
pub const TOPIC_INPUT: &str = "topic";

const PHASE_QUIZ: &str = "quiz-section";
const PHASE_RESULT: &str = "result-section";

pub struct QuizPage {
    document: Document,
    generate: ActionHandler<GenerateQuiz>,
    submit: ActionHandler<SubmitQuizResult>,
    phases: PhaseSet,
    session: QuizSession,
    reward_per_correct: u32,
}

impl QuizPage {
    pub fn new(transport: Arc<dyn Transport>, document: Document, reward_per_correct: u32) -> Self {
        Self {
            generate: ActionHandler::new(transport.clone(), document.clone()),
            submit: ActionHandler::new(transport, document.clone()),
            phases: PhaseSet::new(document.clone(), &[PHASE_QUIZ, PHASE_RESULT]),
            session: QuizSession::new(),
            document,
            reward_per_correct,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Fetch questions for the topic in the topic input.
    pub async fn load(&mut self) -> ActionOutcome<Vec<QuizQuestion>> {
        if self.session.report().is_some() {
            return ActionOutcome::Skipped(PageError::InvalidState(
                "quiz has already been scored".to_string(),
            ));
        }
        let build = |doc: &Document| -> Result<TopicRequest> {
            Ok(TopicRequest {
                topic: doc.required_input(TOPIC_INPUT)?,
            })
        };
        let shown = self.session.questions().len();
        let outcome = self.generate.trigger(QUESTIONS, build, render_questions).await;
        match &outcome {
            ActionOutcome::Rendered(questions) => {
                if let Err(e) = self.session.begin_answering(questions.clone()) {
                    return ActionOutcome::Failed(e);
                }
                self.clear_selections(shown.max(questions.len()));
            }
            // the failure message replaced the questions; nothing left to answer
            ActionOutcome::Failed(_) => {
                if let Err(e) = self.session.reset() {
                    return ActionOutcome::Failed(e);
                }
                self.clear_selections(shown);
            }
            ActionOutcome::Skipped(_) | ActionOutcome::Superseded => {}
        }
        outcome
    }

    fn clear_selections(&self, groups: usize) {
        for i in 0..groups {
            self.document.clear_radio(&group_name(i));
        }
    }

    /// Score the checked options and show the result section.
    pub fn submit(&mut self) -> Result<ScoreReport> {
        let selected: Vec<Option<String>> = (0..self.session.questions().len())
            .map(|i| self.document.checked(&group_name(i)))
            .collect();
        let report = self.session.score(&selected, self.reward_per_correct)?;

        self.document.replace_html(RESULT, render_report(&report));
        self.document.replace_html(LEADERBOARD, render_leaderboard());
        self.phases.show(PHASE_RESULT)?;
        Ok(report)
    }

    /// Report the final score to the backend. Never changes the quiz state.
    pub async fn report_score(&self, username: Option<String>, stream: &str) -> ActionOutcome<bool> {
        let Some(report) = self.session.report() else {
            return ActionOutcome::Skipped(PageError::InvalidState(
                "quiz has not been scored".to_string(),
            ));
        };
        let build = |_: &Document| -> Result<QuizResultRequest> {
            Ok(QuizResultRequest {
                username,
                score: report.score,
                stream: stream.to_string(),
            })
        };
        self.submit
            .trigger(SYNC_STATUS, build, |_| html::paragraph("synced", "Score saved."))
            .await
    }

    /// Leave the page; the session disposal is logged.
    pub fn dispose(self) {
        self.session.dispose();
    }
}

fn render_questions(questions: &Vec<QuizQuestion>) -> String {
    let mut out = String::new();
    for (i, q) in questions.iter().enumerate() {
        let group = group_name(i);
        out.push_str(r#"<div class="question-block">"#);
        out.push_str(&format!("<h4>{}. {}</h4>", i + 1, html::escape(&q.question)));
        for option in &q.options {
            out.push_str(&html::radio(&group, option));
        }
        out.push_str("</div>");
    }
    out
}

fn render_report(report: &ScoreReport) -> String {
    format!(
        r#"<h3>You scored {} / {}</h3><p class="percentage">{}%</p><p class="reward">+{} XP</p>"#,
        report.score, report.total, report.percentage, report.reward
    )
}

fn render_leaderboard() -> String {
    let mut out = String::from(r#"<ol class="leaderboard sample">"#);
    for (name, xp) in SAMPLE_LEADERBOARD {
        out.push_str(&format!("<li>{} - {} XP</li>", html::escape(name), xp));
    }
    out.push_str("</ol>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::Endpoint;
    use crate::quiz::QuizState;
    use crate::test_support::ScriptedTransport;
    use serde_json::json;

    fn quiz_body() -> serde_json::Value {
        json!({"quiz": [
            {"question": "Which tool is widely used for automation in DevOps?",
             "options": ["Kubernetes", "Jenkins", "Figma", "Tableau"],
             "answer": "Jenkins"},
            {"question": "Docker is used for?",
             "options": ["Containerization", "Design", "Testing", "Billing"],
             "answer": "Containerization"}
        ]})
    }

    fn page(transport: Arc<ScriptedTransport>) -> (QuizPage, Document) {
        let doc = Document::new();
        doc.set_input(TOPIC_INPUT, "DevOps");
        (QuizPage::new(transport, doc.clone(), 10), doc)
    }

    #[tokio::test]
    async fn test_load_renders_question_blocks() {
        let transport = Arc::new(ScriptedTransport::default().respond("/generate-quiz", Ok(quiz_body())));
        let (mut page, doc) = page(transport.clone());

        assert!(page.load().await.is_rendered());
        let markup = doc.html(QUESTIONS).unwrap();
        assert_eq!(markup.matches("question-block").count(), 2);
        assert!(markup.contains(r#"name="q1" value="Containerization""#));
        assert!(matches!(page.session().state(), QuizState::Answering { .. }));
        assert_eq!(
            transport.calls_to("/generate-quiz"),
            vec![Some(json!({"topic": "DevOps"}))]
        );
    }

    #[tokio::test]
    async fn test_empty_topic_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::default());
        let (mut page, doc) = page(transport.clone());
        doc.set_input(TOPIC_INPUT, "  ");

        assert!(matches!(page.load().await, ActionOutcome::Skipped(_)));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_quiz_shows_error() {
        let transport =
            Arc::new(ScriptedTransport::default().respond("/generate-quiz", Ok(json!({"quiz": []}))));
        let (mut page, doc) = page(transport);

        assert!(matches!(page.load().await, ActionOutcome::Failed(_)));
        assert!(doc.html(QUESTIONS).unwrap().contains(GenerateQuiz::FAILURE_MESSAGE));
        assert!(matches!(page.session().state(), QuizState::Loading));
    }

    #[tokio::test]
    async fn test_failed_reload_discards_previous_questions() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .respond("/generate-quiz", Ok(quiz_body()))
                .respond(
                    "/generate-quiz",
                    Err(PageError::Transport("connection reset".to_string())),
                ),
        );
        let (mut page, doc) = page(transport);
        assert!(page.load().await.is_rendered());
        doc.check_radio("q0", "Jenkins");

        assert!(matches!(page.load().await, ActionOutcome::Failed(_)));
        assert!(doc.html(QUESTIONS).unwrap().contains(GenerateQuiz::FAILURE_MESSAGE));
        assert!(matches!(page.session().state(), QuizState::Loading));
        assert_eq!(doc.checked("q0"), None);
        assert!(matches!(page.submit(), Err(PageError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_submit_scores_checked_options() {
        let transport = Arc::new(ScriptedTransport::default().respond("/generate-quiz", Ok(quiz_body())));
        let (mut page, doc) = page(transport);
        page.load().await;

        doc.check_radio("q0", "Jenkins");
        let report = page.submit().expect("answering quiz can be submitted");
        assert_eq!(report.score, 1);
        assert_eq!(report.percentage, 50);
        assert_eq!(report.reward, 10);
        assert!(doc.html(RESULT).unwrap().contains("50%"));
        assert!(doc.html(LEADERBOARD).unwrap().contains("sample"));
        assert!(doc.is_hidden(PHASE_QUIZ));
        assert!(!doc.is_hidden(PHASE_RESULT));

        assert!(page.submit().is_err());
    }

    #[tokio::test]
    async fn test_unanswered_quiz_scores_zero() {
        let transport = Arc::new(ScriptedTransport::default().respond("/generate-quiz", Ok(quiz_body())));
        let (mut page, _doc) = page(transport);
        page.load().await;

        let report = page.submit().unwrap();
        assert_eq!(report.score, 0);
        assert_eq!(report.percentage, 0);
    }

    #[tokio::test]
    async fn test_report_failure_keeps_scored_state() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .respond("/generate-quiz", Ok(quiz_body()))
                .respond(
                    "/api/submit-quiz",
                    Err(PageError::Server {
                        status: 500,
                        body: "Failed to save quiz".to_string(),
                    }),
                ),
        );
        let (mut page, doc) = page(transport.clone());
        page.load().await;
        doc.check_radio("q0", "Jenkins");
        doc.check_radio("q1", "Containerization");
        page.submit().unwrap();

        let outcome = page.report_score(Some("user-1".to_string()), "DevOps").await;
        assert!(matches!(outcome, ActionOutcome::Failed(_)));
        assert!(doc.html(SYNC_STATUS).unwrap().contains("Could not save your score."));
        assert_eq!(page.session().report().map(|r| r.score), Some(2));
        assert_eq!(
            transport.calls_to("/api/submit-quiz"),
            vec![Some(json!({"username": "user-1", "score": 2, "stream": "DevOps"}))]
        );
    }

    #[tokio::test]
    async fn test_rejected_report_shows_failure_message() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .respond("/generate-quiz", Ok(quiz_body()))
                .respond("/api/submit-quiz", Ok(json!({"ok": false}))),
        );
        let (mut page, doc) = page(transport);
        page.load().await;
        page.submit().unwrap();

        let outcome = page.report_score(None, "General").await;
        assert!(matches!(outcome, ActionOutcome::Failed(PageError::Contract(_))));
        assert!(doc.html(SYNC_STATUS).unwrap().contains(SubmitQuizResult::FAILURE_MESSAGE));
        assert!(page.session().report().is_some());
    }

    #[tokio::test]
    async fn test_report_before_scoring_is_skipped() {
        let transport = Arc::new(ScriptedTransport::default());
        let (page, _doc) = page(transport.clone());
        assert!(matches!(
            page.report_score(None, "General").await,
            ActionOutcome::Skipped(_)
        ));
        assert!(transport.calls().is_empty());
    }
}
