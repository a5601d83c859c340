use serde::{Deserialize, Deserializer, Serialize};

/// Flexible label deserializer: the backend sends week labels as either
/// "Weeks 1-2" or a bare week number
fn deserialize_flexible_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleLabel {
        Int(i64),
        Float(f64),
        String(String),
    }

    let value = FlexibleLabel::deserialize(deserializer)?;
    match value {
        FlexibleLabel::Int(i) => Ok(i.to_string()),
        FlexibleLabel::Float(f) => Ok(f.to_string()),
        FlexibleLabel::String(s) => Ok(s),
    }
}

/// Topics arrive as a comma separated string or as a list of strings
fn deserialize_flexible_topics<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleTopics {
        One(String),
        Many(Vec<String>),
    }

    let value = FlexibleTopics::deserialize(deserializer)?;
    match value {
        FlexibleTopics::One(s) => Ok(s),
        FlexibleTopics::Many(list) => Ok(list.join(", ")),
    }
}

/// Feedback scores arrive as ints, floats or numeric strings. Anything else,
/// or a value outside 0..=100, is treated as absent.
fn deserialize_flexible_score<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleScore {
        Int(i64),
        Float(f64),
        String(String),
        Other(serde::de::IgnoredAny),
    }

    let value = match FlexibleScore::deserialize(deserializer)? {
        FlexibleScore::Int(i) => Some(i as f64),
        FlexibleScore::Float(f) => Some(f),
        FlexibleScore::String(s) => s.trim().parse::<f64>().ok(),
        FlexibleScore::Other(_) => None,
    };
    Ok(value
        .filter(|v| v.is_finite() && (0.0..=100.0).contains(v))
        .map(|v| v.round() as u32))
}

// ---- requests ----

#[derive(Debug, Clone, Serialize)]
pub struct TopicRequest {
    pub topic: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRequest {
    pub career_path: String,
    pub skill_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResultRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub score: u32,
    pub stream: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProgressRequest {
    pub resource_id: String,
    pub progress: u8,
}

// ---- responses ----

/// One multiple-choice question as produced by the quiz generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapItem {
    #[serde(deserialize_with = "deserialize_flexible_label")]
    pub week: String,
    #[serde(deserialize_with = "deserialize_flexible_topics")]
    pub topics: String,
}

/// Ordered roadmap; a single object on the wire is a one-element roadmap
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Roadmap(pub Vec<RoadmapItem>);

impl<'de> Deserialize<'de> for Roadmap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<RoadmapItem>),
            One(RoadmapItem),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::Many(items) => Roadmap(items),
            OneOrMany::One(item) => Roadmap(vec![item]),
        })
    }
}

impl Roadmap {
    pub fn items(&self) -> &[RoadmapItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Interview feedback; `score` is only present on newer backends
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feedback {
    pub feedback: String,
    #[serde(default, deserialize_with = "deserialize_flexible_score")]
    pub score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InterviewQuestion {
    #[serde(rename = "type", default = "default_question_kind")]
    pub kind: String,
    pub question: String,
}

fn default_question_kind() -> String {
    "General".to_string()
}
