//! Quiz scoring and per-page-view quiz state.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{PageError, Result};
use crate::models::QuizQuestion;
use crate::session::SessionStamp;

pub const DEFAULT_REWARD_PER_CORRECT: u32 = 10;

/// Decorative leaderboard shown next to a result; not live data.
pub const SAMPLE_LEADERBOARD: &[(&str, u32)] = &[
    ("Aarav", 1520),
    ("Meera", 1340),
    ("Kabir", 1210),
    ("Isha", 980),
    ("Rohan", 860),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub reward: u32,
}

impl ScoreReport {
    pub fn new(score: u32, total: u32, reward_per_correct: u32) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (f64::from(score) * 100.0 / f64::from(total)).round() as u32
        };
        Self {
            score,
            total,
            percentage,
            reward: score.saturating_mul(reward_per_correct),
        }
    }
}

/// Radio group name for the question at `index`.
pub fn group_name(index: usize) -> String {
    format!("q{index}")
}

/// Count exact, case-sensitive matches; unanswered questions score nothing.
pub fn score_answers(questions: &[QuizQuestion], selected: &[Option<String>]) -> u32 {
    questions
        .iter()
        .zip(selected.iter().chain(std::iter::repeat(&None)))
        .filter(|(q, choice)| choice.as_deref() == Some(q.answer.as_str()))
        .count() as u32
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizState {
    Loading,
    Answering { questions: Vec<QuizQuestion> },
    Scored { questions: Vec<QuizQuestion>, report: ScoreReport },
}

/// Quiz state for one page view
#[derive(Debug)]
pub struct QuizSession {
    stamp: SessionStamp,
    state: QuizState,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            stamp: SessionStamp::new("quiz"),
            state: QuizState::Loading,
        }
    }

    pub fn id(&self) -> Uuid {
        self.stamp.id()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.stamp.started_at()
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        match &self.state {
            QuizState::Loading => &[],
            QuizState::Answering { questions } | QuizState::Scored { questions, .. } => questions,
        }
    }

    /// Loading -> Answering. A reload while answering replaces the questions.
    pub fn begin_answering(&mut self, questions: Vec<QuizQuestion>) -> Result<()> {
        match self.state {
            QuizState::Scored { .. } => Err(PageError::InvalidState(
                "quiz has already been scored".to_string(),
            )),
            _ => {
                self.state = QuizState::Answering { questions };
                Ok(())
            }
        }
    }

    /// Back to Loading, forgetting any questions that were shown.
    /// A scored quiz keeps its result.
    pub fn reset(&mut self) -> Result<()> {
        if let QuizState::Scored { .. } = self.state {
            return Err(PageError::InvalidState(
                "quiz has already been scored".to_string(),
            ));
        }
        self.state = QuizState::Loading;
        Ok(())
    }

    /// Answering -> Scored.
    pub fn score(&mut self, selected: &[Option<String>], reward_per_correct: u32) -> Result<ScoreReport> {
        let questions = match &self.state {
            QuizState::Answering { questions } => questions.clone(),
            QuizState::Loading => {
                return Err(PageError::InvalidState("quiz has not loaded yet".to_string()));
            }
            QuizState::Scored { .. } => {
                return Err(PageError::InvalidState(
                    "quiz has already been scored".to_string(),
                ));
            }
        };
        let score = score_answers(&questions, selected);
        let report = ScoreReport::new(score, questions.len() as u32, reward_per_correct);
        tracing::info!(
            "Quiz session {} scored {}/{} ({}%)",
            self.id(),
            report.score,
            report.total,
            report.percentage
        );
        self.state = QuizState::Scored { questions, report };
        Ok(report)
    }

    pub fn report(&self) -> Option<ScoreReport> {
        match &self.state {
            QuizState::Scored { report, .. } => Some(*report),
            _ => None,
        }
    }

    /// End the session; the disposal is logged.
    pub fn dispose(self) {}
}
