//! Backend routes used by the pages.
//!
//! Each route is a zero-sized type carrying its path, the response field it
//! consumes, and the fixed message shown when the round trip fails.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PageError, Result};
use crate::models::{
    ChatRequest, Feedback, FeedbackRequest, InterviewQuestion, QuizQuestion, QuizResultRequest,
    ResourceProgressRequest, ResourceSearchRequest, Roadmap, RoadmapRequest, TopicRequest,
};

pub trait Endpoint: Send + Sync + 'static {
    /// Request body; `()` sends no body.
    type Request: Serialize + Send;
    type Response: DeserializeOwned + Send;

    const PATH: &'static str;
    /// Field of the JSON response the page consumes.
    const FIELD: &'static str;
    const FAILURE_MESSAGE: &'static str;

    /// Pull the expected field out of a successful response body.
    fn extract(body: Value) -> Result<Self::Response> {
        let value = match body {
            Value::Object(mut map) => map.remove(Self::FIELD),
            _ => None,
        };
        match value {
            None | Some(Value::Null) => Err(PageError::MissingField { field: Self::FIELD }),
            Some(v) => serde_json::from_value(v).map_err(|e| {
                PageError::Contract(format!("Field `{}` has unexpected shape: {e}", Self::FIELD))
            }),
        }
    }

    /// Whether a decoded response has anything to render.
    fn is_renderable(_response: &Self::Response) -> bool {
        true
    }
}

pub struct GenerateQuiz;

impl Endpoint for GenerateQuiz {
    type Request = TopicRequest;
    type Response = Vec<QuizQuestion>;

    const PATH: &'static str = "/generate-quiz";
    const FIELD: &'static str = "quiz";
    const FAILURE_MESSAGE: &'static str = "Could not load the quiz. Please try again.";

    fn is_renderable(questions: &Self::Response) -> bool {
        !questions.is_empty()
    }
}

pub struct Chat;

impl Endpoint for Chat {
    type Request = ChatRequest;
    type Response = String;

    const PATH: &'static str = "/api/chat";
    const FIELD: &'static str = "reply";
    const FAILURE_MESSAGE: &'static str = "Sorry, I couldn't reach the mentor. Please try again.";
}

pub struct InterviewQuestionFetch;

impl Endpoint for InterviewQuestionFetch {
    type Request = ();
    type Response = String;

    const PATH: &'static str = "/get-interview-question";
    const FIELD: &'static str = "question";
    const FAILURE_MESSAGE: &'static str = "Could not load a question. Please try again.";
}

pub struct InterviewFeedback;

impl Endpoint for InterviewFeedback {
    type Request = FeedbackRequest;
    type Response = Feedback;

    const PATH: &'static str = "/get-interview-feedback";
    const FIELD: &'static str = "feedback";
    const FAILURE_MESSAGE: &'static str = "Could not get feedback. Please try again.";

    // `score` sits next to `feedback`, so decode the whole body once the
    // required field is known to be present.
    fn extract(body: Value) -> Result<Self::Response> {
        match body.get(Self::FIELD) {
            None | Some(Value::Null) => Err(PageError::MissingField { field: Self::FIELD }),
            Some(_) => Ok(serde_json::from_value(body)?),
        }
    }
}

pub struct InterviewQuestionSet;

impl Endpoint for InterviewQuestionSet {
    type Request = ();
    type Response = Vec<InterviewQuestion>;

    const PATH: &'static str = "/get-interview-questions";
    const FIELD: &'static str = "questions";
    const FAILURE_MESSAGE: &'static str = "Could not start the mock interview. Please try again.";

    fn is_renderable(questions: &Self::Response) -> bool {
        !questions.is_empty()
    }
}

pub struct GenerateRoadmap;

impl Endpoint for GenerateRoadmap {
    type Request = RoadmapRequest;
    type Response = Roadmap;

    const PATH: &'static str = "/generate-roadmap";
    const FIELD: &'static str = "roadmap";
    const FAILURE_MESSAGE: &'static str = "Could not generate your roadmap. Please try again.";

    fn is_renderable(roadmap: &Self::Response) -> bool {
        !roadmap.is_empty()
    }
}

pub struct SubmitQuizResult;

impl Endpoint for SubmitQuizResult {
    type Request = QuizResultRequest;
    type Response = bool;

    const PATH: &'static str = "/api/submit-quiz";
    const FIELD: &'static str = "ok";
    const FAILURE_MESSAGE: &'static str = "Could not save your score.";

    fn is_renderable(ok: &Self::Response) -> bool {
        *ok
    }
}

pub struct ResourceSearch;

impl Endpoint for ResourceSearch {
    type Request = ResourceSearchRequest;
    type Response = String;

    const PATH: &'static str = "/api/resources/ai";
    const FIELD: &'static str = "html";
    const FAILURE_MESSAGE: &'static str = "Could not load resources. Please try again.";
}

pub struct SaveResourceProgress;

impl Endpoint for SaveResourceProgress {
    type Request = ResourceProgressRequest;
    type Response = bool;

    const PATH: &'static str = "/api/resource-progress";
    const FIELD: &'static str = "ok";
    const FAILURE_MESSAGE: &'static str = "Could not save your progress.";

    fn is_renderable(ok: &Self::Response) -> bool {
        *ok
    }
}
