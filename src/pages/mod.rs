/// Page controllers, one per view of the learning platform
pub mod chat;
pub mod interview;
pub mod onboarding;
pub mod quiz;
pub mod resources;
pub mod skills;

pub use chat::{ChatPage, ChatSession};
pub use interview::{InterviewPage, InterviewSession};
pub use onboarding::{OnboardingPage, RoadmapSession};
pub use quiz::QuizPage;
pub use resources::ResourcesPage;
pub use skills::SkillsPage;
